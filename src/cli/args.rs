//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

/// Client for the hybridguard encryption CLI: encrypt, decrypt, keygen and status
#[derive(Parser, Debug)]
#[command(name = "hgc")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output (-d info, -dd debug, -ddd trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub debug: u8,

    /// Path to the hybridguard executable (overrides config)
    #[arg(short, long, global = true, env = "HGC_BINARY", value_hint = ValueHint::ExecutablePath)]
    pub binary: Option<PathBuf>,

    /// Kill the executable after this many seconds (overrides config)
    #[arg(short, long, global = true)]
    pub timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Encrypt a file
    Encrypt {
        /// Input file
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        input: PathBuf,
        /// Encrypted output file
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: PathBuf,
        /// Key file
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        key: Option<PathBuf>,
    },

    /// Decrypt a file
    Decrypt {
        /// Encrypted input file
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        input: PathBuf,
        /// Decrypted output file
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: PathBuf,
        /// Key file
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        key: Option<PathBuf>,
    },

    /// Generate a new key
    Keygen {
        /// Where the executable writes the key
        #[arg(short, long, value_hint = ValueHint::AnyPath)]
        output: PathBuf,
    },

    /// Show executable status
    Status,

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Show resolved settings
    Info,

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Create config template
    Init {
        /// Create global config
        #[arg(short, long)]
        global: bool,
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Show config paths
    Path,
}
