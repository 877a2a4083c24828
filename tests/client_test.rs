//! Tests for HybridGuardClient against fake executables (shell scripts)
#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tempfile::TempDir;

use hgclient::util::testing;
use hgclient::{ApplicationError, HybridGuardClient, Operation};

/// Write an executable `#!/bin/sh` script into `dir`.
fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("write script");
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).expect("chmod");
    path
}

/// Fake hybridguard: parses -i/-o/-k, "encrypts" by prefixing a header,
/// "decrypts" by stripping it, writes a key file on keygen.
const FAKE_HYBRIDGUARD: &str = r#"
cmd="$1"; shift
in=""; out=""; key=""
while [ $# -gt 0 ]; do
  case "$1" in
    -i) in="$2"; shift 2 ;;
    -o) out="$2"; shift 2 ;;
    -k) key="$2"; shift 2 ;;
    *) echo "unknown argument: $1" >&2; exit 2 ;;
  esac
done
case "$cmd" in
  status)
    echo "HybridGuard v0.1.0"
    echo "layers: 4 active"
    ;;
  keygen)
    printf 'key-material' > "$out" || { echo "cannot write key: $out" >&2; exit 1; }
    ;;
  encrypt)
    [ -f "$in" ] || { echo "input not found: $in" >&2; exit 1; }
    { echo "HGENC"; cat "$in"; } > "$out" || exit 1
    ;;
  decrypt)
    [ -f "$in" ] || { echo "input not found: $in" >&2; exit 1; }
    tail -n +2 "$in" > "$out" || exit 1
    ;;
  *)
    echo "unknown command: $cmd" >&2; exit 2 ;;
esac
"#;

fn fake_client(temp: &TempDir) -> HybridGuardClient {
    let binary = write_script(temp.path(), "hybridguard", FAKE_HYBRIDGUARD);
    HybridGuardClient::new(binary).expect("create client")
}

// ============================================================
// construction
// ============================================================

#[test]
fn given_nonexistent_path_when_constructing_then_missing_executable() {
    testing::init_test_setup();
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("no-such-binary");

    let result = HybridGuardClient::new(&missing);

    match result {
        Err(ApplicationError::MissingExecutable(path)) => assert_eq!(path, missing),
        other => panic!("expected MissingExecutable, got {other:?}"),
    }
}

#[test]
fn given_existing_path_when_constructing_then_keeps_path() {
    let temp = TempDir::new().unwrap();
    let client = fake_client(&temp);

    assert_eq!(client.binary_path(), temp.path().join("hybridguard"));
    assert_eq!(client.timeout(), None);
}

// ============================================================
// status
// ============================================================

#[test]
fn given_working_executable_when_get_status_then_returns_stdout_verbatim() {
    testing::init_test_setup();
    let temp = TempDir::new().unwrap();
    let client = fake_client(&temp);

    let status = client.get_status();

    assert_eq!(status, "HybridGuard v0.1.0\nlayers: 4 active\n");
    assert!(!status.starts_with("Status check failed"));
}

#[test]
fn given_failing_executable_when_get_status_then_embeds_stderr() {
    let temp = TempDir::new().unwrap();
    let binary = write_script(temp.path(), "broken", "echo 'engine offline' >&2\nexit 3");
    let client = HybridGuardClient::new(binary).unwrap();

    let status = client.get_status();

    assert_eq!(status, "Status check failed: engine offline\n");
}

#[test]
fn given_failing_executable_when_try_status_then_returns_invocation_failure() {
    let temp = TempDir::new().unwrap();
    let binary = write_script(temp.path(), "broken", "echo 'engine offline' >&2\nexit 3");
    let client = HybridGuardClient::new(binary).unwrap();

    let err = client.try_status().unwrap_err();

    match &err {
        ApplicationError::InvocationFailed {
            operation,
            status,
            stderr,
        } => {
            assert_eq!(*operation, Operation::Status);
            assert_eq!(status.code, Some(3));
            assert_eq!(stderr, "engine offline\n");
        }
        other => panic!("expected InvocationFailed, got {other:?}"),
    }
    assert!(err.is_invocation_failure());
}

// ============================================================
// encrypt / decrypt / keygen
// ============================================================

#[test]
fn given_plaintext_when_encrypt_then_decrypt_then_both_succeed_and_outputs_exist() {
    testing::init_test_setup();
    let temp = TempDir::new().unwrap();
    let client = fake_client(&temp);
    let key = temp.path().join("key.json");
    let plain = temp.path().join("secret.txt");
    let sealed = temp.path().join("secret.enc");
    let restored = temp.path().join("restored.txt");
    std::fs::write(&plain, "top secret\n").unwrap();

    assert!(client.generate_key(&key));
    assert!(client.encrypt(&plain, &sealed, Some(&key)));
    assert!(client.decrypt(&sealed, &restored, Some(&key)));

    assert!(key.exists());
    assert!(sealed.exists());
    assert!(restored.exists());
}

#[test]
fn given_no_key_when_encrypt_then_succeeds_without_key_flag() {
    let temp = TempDir::new().unwrap();
    let client = fake_client(&temp);
    let plain = temp.path().join("notes.txt");
    let sealed = temp.path().join("notes.enc");
    std::fs::write(&plain, "hello").unwrap();

    let outcome = client.try_encrypt(&plain, &sealed, None).unwrap();

    assert!(outcome.success());
    assert_eq!(outcome.status.code, Some(0));
    assert!(sealed.exists());
}

#[test]
fn given_missing_input_when_encrypt_then_false() {
    let temp = TempDir::new().unwrap();
    let client = fake_client(&temp);

    let ok = client.encrypt(
        &temp.path().join("absent.txt"),
        &temp.path().join("absent.enc"),
        None,
    );

    assert!(!ok);
    assert!(!temp.path().join("absent.enc").exists());
}

#[test]
fn given_always_failing_executable_when_any_operation_then_false_with_diagnostic() {
    testing::init_test_setup();
    let temp = TempDir::new().unwrap();
    let binary = write_script(temp.path(), "failing", "echo 'refused' >&2\nexit 1");
    let client = HybridGuardClient::new(binary).unwrap();
    let input = temp.path().join("in.txt");
    let output = temp.path().join("out.bin");
    std::fs::write(&input, "data").unwrap();

    assert!(!client.encrypt(&input, &output, None));
    assert!(!client.decrypt(&input, &output, None));
    assert!(!client.generate_key(&output));

    let errors = [
        client.try_encrypt(&input, &output, None).unwrap_err(),
        client.try_decrypt(&input, &output, None).unwrap_err(),
        client.try_generate_key(&output).unwrap_err(),
    ];
    for err in &errors {
        assert!(!err.diagnostic().is_empty());
        assert_eq!(err.diagnostic(), "refused\n");
    }
}

#[test]
fn given_silent_failing_executable_when_encrypt_then_diagnostic_names_exit_status() {
    let temp = TempDir::new().unwrap();
    let binary = write_script(temp.path(), "silent", "exit 42");
    let client = HybridGuardClient::new(binary).unwrap();

    let err = client
        .try_encrypt(Path::new("a"), Path::new("b"), None)
        .unwrap_err();

    assert_eq!(err.diagnostic(), "exit status 42");
}

#[test]
fn given_unwritable_location_when_generate_key_then_false_without_panic() {
    let temp = TempDir::new().unwrap();
    let client = fake_client(&temp);
    // parent is a regular file, so nobody (not even root) can create the key
    let blocker = temp.path().join("blocker");
    std::fs::write(&blocker, "").unwrap();
    let key = blocker.join("key.json");

    assert!(!client.generate_key(&key));

    let err = client.try_generate_key(&key).unwrap_err();
    assert!(err.diagnostic().contains("cannot write key"));
}

// ============================================================
// spawn failure and timeout
// ============================================================

#[test]
fn given_non_executable_file_when_encrypt_then_false_and_spawn_failed_with_os_reason() {
    let temp = TempDir::new().unwrap();
    let binary = temp.path().join("not-executable");
    std::fs::write(&binary, "plain data, not a program").unwrap();
    std::fs::set_permissions(&binary, std::fs::Permissions::from_mode(0o644)).unwrap();

    // construction only checks existence
    let client = HybridGuardClient::new(&binary).unwrap();

    assert!(!client.encrypt(Path::new("a"), Path::new("b"), None));
    let err = client
        .try_encrypt(Path::new("a"), Path::new("b"), None)
        .unwrap_err();
    assert!(matches!(err, ApplicationError::SpawnFailed { .. }));
    assert!(err.is_invocation_failure());
    assert!(err.diagnostic().contains("os error"));
    assert!(client.get_status().starts_with("Status check failed: "));
}

#[test]
fn given_hanging_executable_with_timeout_when_status_then_timed_out() {
    let temp = TempDir::new().unwrap();
    let binary = write_script(temp.path(), "hang", "sleep 10");
    let client = HybridGuardClient::new(binary)
        .unwrap()
        .with_timeout(Some(Duration::from_millis(300)));

    let started = Instant::now();
    let err = client.try_status().unwrap_err();

    assert!(started.elapsed() < Duration::from_secs(5));
    match err {
        ApplicationError::TimedOut { operation, timeout } => {
            assert_eq!(operation, Operation::Status);
            assert_eq!(timeout, Duration::from_millis(300));
        }
        other => panic!("expected TimedOut, got {other:?}"),
    }
}

#[test]
fn given_fast_executable_with_timeout_when_status_then_captures_streams() {
    let temp = TempDir::new().unwrap();
    let binary = write_script(temp.path(), "hybridguard", FAKE_HYBRIDGUARD);
    let client = HybridGuardClient::new(binary)
        .unwrap()
        .with_timeout(Some(Duration::from_secs(10)));

    assert_eq!(client.get_status(), "HybridGuard v0.1.0\nlayers: 4 active\n");
}

// ============================================================
// concurrency
// ============================================================

#[test]
fn given_shared_client_when_mixed_operations_run_concurrently_then_outcomes_do_not_interfere() {
    testing::init_test_setup();
    let temp = TempDir::new().unwrap();
    // echoes the path after the first flag; fails for paths containing "bad"
    let binary = write_script(
        temp.path(),
        "echoer",
        r#"if [ "$1" = status ]; then echo "status ok"; exit 0; fi
echo "$1 $3"
case "$3" in *bad*) echo "bad input $3" >&2; exit 1 ;; esac"#,
    );
    let client = HybridGuardClient::new(binary).unwrap();
    let out = temp.path().join("out");

    std::thread::scope(|scope| {
        for i in 0..24 {
            let client = &client;
            let out = &out;
            scope.spawn(move || {
                let name = if i % 3 == 0 {
                    format!("bad-{i}")
                } else {
                    format!("good-{i}")
                };
                let good = name.starts_with("good");
                let path = Path::new(&name);
                match i % 4 {
                    0 => match client.try_encrypt(path, out, None) {
                        Ok(outcome) => {
                            assert!(good);
                            assert_eq!(outcome.stdout, format!("encrypt {name}\n"));
                        }
                        Err(err) => {
                            assert!(!good);
                            assert_eq!(err.diagnostic(), format!("bad input {name}\n"));
                        }
                    },
                    1 => assert_eq!(client.decrypt(path, out, None), good),
                    2 => match client.try_generate_key(path) {
                        Ok(outcome) => {
                            assert!(good);
                            assert_eq!(outcome.stdout, format!("keygen {name}\n"));
                        }
                        Err(err) => {
                            assert!(!good);
                            assert_eq!(err.diagnostic(), format!("bad input {name}\n"));
                        }
                    },
                    _ => assert_eq!(client.get_status(), "status ok\n"),
                }
            });
        }
    });
}
