//! Integration tests for CLI argument handling
//!
//! Runs the binary with arguments that exit before the terminal UI starts.

use std::process::Command;

/// Helper to run the CLI with given args and capture output
fn run_cli(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_weatherdash"))
        .args(args)
        .env_remove("OPENWEATHER_API_KEY")
        .output()
        .expect("Failed to execute weatherdash")
}

#[test]
fn test_help_flag_exits_successfully() {
    let output = run_cli(&["--help"]);
    assert!(
        output.status.success(),
        "Expected --help to exit successfully"
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("weatherdash"), "Help should mention weatherdash");
    assert!(stdout.contains("--city"), "Help should mention --city flag");
    assert!(stdout.contains("--api-key"), "Help should mention --api-key flag");
    assert!(!stdout.contains("--base-url"), "--base-url is hidden");
}

#[test]
fn test_version_flag_exits_successfully() {
    let output = run_cli(&["--version"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_missing_api_key_prints_error_and_exits() {
    let output = run_cli(&["--city", "London"]);
    assert!(!output.status.success(), "Expected missing key to fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Missing API key"),
        "Should explain the missing key: {}",
        stderr
    );
}

#[test]
fn test_invalid_latitude_prints_error_and_exits() {
    let output = run_cli(&["--api-key", "k", "--lat", "95", "--lon", "0"]);
    assert!(!output.status.success(), "Expected invalid latitude to fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Invalid latitude"),
        "Should print error message about the latitude: {}",
        stderr
    );
}

#[test]
fn test_lat_without_lon_is_rejected() {
    let output = run_cli(&["--api-key", "k", "--lat", "10"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--lon"), "Should name the missing flag: {}", stderr);
}

#[test]
fn test_city_with_help_is_valid() {
    // With --help, it should succeed regardless of other flags
    let output = run_cli(&["--city", "Paris", "--help"]);
    assert!(output.status.success());
}

#[cfg(test)]
mod unit_tests {
    //! Unit tests for CLI parsing that don't require running the binary

    use clap::Parser;
    use weatherdash::cli::{Cli, CliError, StartupConfig, StartupTarget};
    use weatherdash::data::Coordinate;

    #[test]
    fn test_cli_negative_coordinates() {
        let cli = Cli::parse_from(["weatherdash", "--api-key", "k", "--lat", "-22.9", "--lon", "-43.2"]);
        let config = StartupConfig::from_cli(&cli).unwrap();
        assert_eq!(
            config.target,
            StartupTarget::Coordinate(Coordinate::new(-22.9, -43.2))
        );
    }

    #[test]
    fn test_cli_custom_home_and_tuning() {
        let cli = Cli::parse_from([
            "weatherdash",
            "--api-key",
            "k",
            "--home-lat",
            "51.5",
            "--home-lon",
            "-0.12",
            "--debounce-ms",
            "250",
            "--zoom",
            "5",
        ]);
        let config = StartupConfig::from_cli(&cli).unwrap();
        assert_eq!(config.target, StartupTarget::Home);
        assert_eq!(config.home, Coordinate::new(51.5, -0.12));
        assert_eq!(config.debounce.as_millis(), 250);
        assert_eq!(config.zoom, 5);
    }

    #[test]
    fn test_startup_config_invalid_longitude() {
        let cli = Cli::parse_from(["weatherdash", "--api-key", "k", "--lat", "0", "--lon", "200"]);
        assert_eq!(
            StartupConfig::from_cli(&cli).unwrap_err(),
            CliError::InvalidLongitude(200.0)
        );
    }
}
