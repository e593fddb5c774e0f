//! Integration tests for the konfd binary
//!
//! These cover argument and configuration handling, which fails before any
//! cluster connection is attempted.

use std::process::Command;

/// A konfd command with a clean environment and unwrapped, uncolored reports
fn konfd_command() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_konfd"));
    for (key, _) in std::env::vars() {
        if key.starts_with("KONFD_") {
            command.env_remove(key);
        }
    }
    command
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1")
        .env("COLUMNS", "400");
    command
}

/// Helper to run konfd with the given arguments
fn konfd(args: &[&str]) -> std::process::Output {
    konfd_command()
        .args(args)
        .output()
        .expect("Failed to execute konfd")
}

mod help_output {
    use super::*;

    #[test]
    fn test_help_lists_flags() {
        let output = konfd(&["--help"]);

        assert!(output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout);
        for flag in [
            "--namespace",
            "--template",
            "--noop",
            "--onetime",
            "--sync-interval",
            "--request-timeout",
            "--config",
            "--log-format",
        ] {
            assert!(stdout.contains(flag), "help is missing {}", flag);
        }
    }

    #[test]
    fn test_version() {
        let output = konfd(&["--version"]);

        assert!(output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.starts_with("konfd "));
    }
}

mod configuration_errors {
    use super::*;

    #[test]
    fn test_zero_sync_interval() {
        let output = konfd(&["--onetime", "--sync-interval", "0"]);

        assert_eq!(output.status.code(), Some(2));
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("Configuration error"));
        assert!(stderr.contains("sync interval"));
    }

    #[test]
    fn test_zero_sync_interval_from_env() {
        let output = konfd_command()
            .env("KONFD_SYNC_INTERVAL", "0")
            .env("KONFD_ONETIME", "true")
            .output()
            .expect("Failed to execute konfd");

        assert_eq!(output.status.code(), Some(2));
    }

    #[test]
    fn test_missing_config_file() {
        let output = konfd(&["--config", "/nonexistent/konfd.yaml"]);

        assert_eq!(output.status.code(), Some(2));
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("/nonexistent/konfd.yaml"));
    }

    #[test]
    fn test_invalid_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("konfd.yaml");
        std::fs::write(&path, "syncInterval: soon\n").unwrap();

        let output = konfd(&["--config", path.to_str().unwrap()]);

        assert_eq!(output.status.code(), Some(2));
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("Configuration error"));
    }

    #[test]
    fn test_unknown_log_format() {
        let output = konfd(&["--log-format", "yaml"]);

        assert!(!output.status.success());
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("yaml"));
    }
}
