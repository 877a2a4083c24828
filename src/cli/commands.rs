//! Command dispatch: resolves settings, builds the client and runs one operation.

use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use tracing::{debug, instrument};

use crate::application::services::HybridGuardClient;
use crate::application::IoResultExt;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path, Settings};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Err(CliError::Usage("no command given, see --help".into()));
    };

    match command {
        Commands::Encrypt { input, output, key } => {
            _encrypt(cli, input, output, key.as_deref())
        }
        Commands::Decrypt { input, output, key } => {
            _decrypt(cli, input, output, key.as_deref())
        }
        Commands::Keygen { output } => _keygen(cli, output),
        Commands::Status => _status(cli),
        Commands::Config { command } => _config(cli, command),
        Commands::Info => _info(cli),
        Commands::Completion { shell } => {
            _completion(*shell);
            Ok(())
        }
    }
}

fn current_dir() -> CliResult<PathBuf> {
    std::env::current_dir()
        .map_err(|e| CliError::from(InfraError::io("get current directory", e)))
}

/// Resolve settings from config layers, then apply command-line overrides.
pub fn resolve_settings(cli: &Cli, dir: &Path) -> CliResult<Settings> {
    let mut settings = Settings::load(Some(dir))?;
    if let Some(binary) = &cli.binary {
        settings.binary_path = binary.clone();
    }
    if let Some(timeout) = cli.timeout {
        settings.timeout_secs = Some(timeout);
    }
    debug!(
        "resolve_settings: binary_path={}, timeout_secs={:?}",
        settings.binary_path.display(),
        settings.timeout_secs
    );
    Ok(settings)
}

fn client(cli: &Cli) -> CliResult<HybridGuardClient> {
    let settings = resolve_settings(cli, &current_dir()?)?;
    let container = ServiceContainer::new(settings);
    Ok(container.client()?)
}

#[instrument(skip(cli))]
fn _encrypt(cli: &Cli, input: &Path, output_path: &Path, key: Option<&Path>) -> CliResult<()> {
    client(cli)?.try_encrypt(input, output_path, key)?;
    output::action(
        "Encrypted",
        &format!("{} -> {}", input.display(), output_path.display()),
    );
    Ok(())
}

#[instrument(skip(cli))]
fn _decrypt(cli: &Cli, input: &Path, output_path: &Path, key: Option<&Path>) -> CliResult<()> {
    client(cli)?.try_decrypt(input, output_path, key)?;
    output::action(
        "Decrypted",
        &format!("{} -> {}", input.display(), output_path.display()),
    );
    Ok(())
}

#[instrument(skip(cli))]
fn _keygen(cli: &Cli, output_path: &Path) -> CliResult<()> {
    client(cli)?.try_generate_key(output_path)?;
    output::action("Key written", &output_path.display());
    Ok(())
}

#[instrument(skip(cli))]
fn _status(cli: &Cli) -> CliResult<()> {
    let text = client(cli)?.try_status()?;
    output::info(text.trim_end());
    Ok(())
}

#[instrument(skip(cli))]
fn _info(cli: &Cli) -> CliResult<()> {
    let dir = current_dir()?;
    let settings = resolve_settings(cli, &dir)?;

    output::header("hgc");
    let binary = &settings.binary_path;
    if binary.exists() {
        output::success(&format!("executable: {}", binary.display()));
    } else {
        output::failure(&format!("executable not found: {}", binary.display()));
    }
    match settings.timeout() {
        Some(timeout) => output::detail(&format!("timeout: {}s", timeout.as_secs())),
        None => output::detail("timeout: none"),
    }
    Ok(())
}

#[instrument(skip(cli))]
fn _config(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    let dir = current_dir()?;
    match command {
        ConfigCommands::Show => {
            let settings = resolve_settings(cli, &dir)?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => output::detail(&format!(
                    "global: {}{}",
                    path.display(),
                    if path.exists() { "" } else { " (missing)" }
                )),
                None => output::detail("global: unavailable"),
            }
            let local = local_config_path(&dir);
            output::detail(&format!(
                "local:  {}{}",
                local.display(),
                if local.exists() { "" } else { " (missing)" }
            ));
        }
        ConfigCommands::Init { global, force } => {
            let path = if *global {
                global_config_path().ok_or_else(|| {
                    CliError::Usage("cannot determine global config directory".into())
                })?
            } else {
                local_config_path(&dir)
            };
            write_template(&path, *force)?;
            output::action("Created", &path.display());
        }
    }
    Ok(())
}

/// Write the config template, refusing to clobber unless `force`.
pub fn write_template(path: &Path, force: bool) -> CliResult<()> {
    if path.exists() && !force {
        return Err(CliError::Usage(format!(
            "config already exists: {} (use --force to overwrite)",
            path.display()
        )));
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).with_path_context("create config dir", parent)?;
        }
    }
    std::fs::write(path, Settings::template()).with_path_context("write config", path)?;
    Ok(())
}

fn _completion(shell: Shell) {
    let mut cmd = Cli::command();
    eprintln!("Generating completion file for {shell:?}...");
    generate(shell, &mut cmd, "hgc", &mut io::stdout());
}
