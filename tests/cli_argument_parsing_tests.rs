//! Tests for CLI argument parsing functionality
//!
//! These tests verify that command line arguments are parsed and layered over
//! configuration files and defaults in the right order.

use clap::Parser;
use std::io::Write;
use tempfile::Builder;
use venue_position_faker::types::config::{defaults, CliArgs, SimulationConfig};

/// Parse arguments the way the binary does
fn parse(args: &[&str]) -> CliArgs {
    CliArgs::try_parse_from(std::iter::once("test").chain(args.iter().copied())).unwrap()
}

/// No arguments leaves every override unset
#[test]
fn test_no_arguments() {
    let args = parse(&[]);
    assert!(args.config.is_none());
    assert!(args.venue.is_none());
    assert!(args.total_devices.is_none());
    assert!(args.steps.is_none());
    assert!(args.api_url.is_none());
    assert!(args.registry.is_none());
    assert!(args.seed.is_none());
    assert!(!args.verbose && !args.debug && !args.json_logs);
    assert!(!args.dry_run && !args.print_config);

    let config = SimulationConfig::from_cli_args(args).unwrap();
    assert_eq!(config, SimulationConfig::default());
}

/// Every simulation option is picked up
#[test]
fn test_full_argument_set() {
    let args = parse(&[
        "--venue", "arena-7",
        "--total-devices", "12",
        "--steps", "300",
        "--step-interval-ms", "5000",
        "--step-delay-ms", "0",
        "--api-url", "https://ingest.example.test/v1",
        "--request-timeout-secs", "15",
        "--batch-threshold", "40",
        "--registry", "devices.json",
        "--seed", "9",
        "--log-dir", "logs",
        "--json-logs",
        "-v",
        "--dry-run",
    ]);

    assert!(args.verbose);
    assert!(args.json_logs);
    assert!(args.dry_run);
    assert_eq!(args.log_dir.as_deref(), Some("logs"));

    let config = SimulationConfig::from_cli_args(args).unwrap();
    assert_eq!(config.venue, "arena-7");
    assert_eq!(config.total_devices, 12);
    assert_eq!(config.steps, 300);
    assert_eq!(config.step_interval_ms, 5000);
    assert_eq!(config.step_delay_ms, 0);
    assert_eq!(config.api_base_url, "https://ingest.example.test/v1");
    assert_eq!(config.request_timeout_secs, 15);
    assert_eq!(config.batch_threshold, 40);
    assert_eq!(config.registry_path.as_deref(), Some("devices.json"));
    assert_eq!(config.seed, Some(9));
    config.validate().unwrap();
}

/// Malformed values are rejected by the parser
#[test]
fn test_invalid_argument_values() {
    assert!(CliArgs::try_parse_from(["test", "--total-devices", "many"]).is_err());
    assert!(CliArgs::try_parse_from(["test", "--steps", "-3"]).is_err());
    assert!(CliArgs::try_parse_from(["test", "--seed"]).is_err());
    assert!(CliArgs::try_parse_from(["test", "--no-such-flag"]).is_err());
}

/// Zero counts parse but fail validation
#[test]
fn test_zero_counts_fail_validation() {
    let config = SimulationConfig::from_cli_args(parse(&["--total-devices", "0"])).unwrap();
    assert!(config.validate().is_err());

    let config = SimulationConfig::from_cli_args(parse(&["--steps", "0"])).unwrap();
    assert!(config.validate().is_err());

    let config = SimulationConfig::from_cli_args(parse(&["--batch-threshold", "0"])).unwrap();
    assert!(config.validate().is_err());
}

/// A non-http API URL fails validation
#[test]
fn test_api_url_scheme_checked() {
    let config = SimulationConfig::from_cli_args(parse(&["--api-url", "ftp://example.test"])).unwrap();
    assert!(config.validate().is_err());

    let config = SimulationConfig::from_cli_args(parse(&["--api-url", "not a url"])).unwrap();
    assert!(config.validate().is_err());
}

/// CLI flags win over the configuration file, which wins over defaults
#[test]
fn test_config_file_precedence() {
    let mut file = Builder::new().suffix(".json").tempfile().unwrap();
    write!(
        file,
        r#"{{
            "venue": "file-venue",
            "boundingBox": [[10.0, 50.0], [10.002, 50.0], [10.002, 50.001], [10.0, 50.001]],
            "floorBounds": [0, 2],
            "totalDevices": 8,
            "steps": 40
        }}"#
    )
    .unwrap();

    let path = file.path().to_str().unwrap().to_string();
    let args = parse(&["--config", &path, "--steps", "7"]);
    let config = SimulationConfig::from_cli_args(args).unwrap();

    assert_eq!(config.venue, "file-venue");
    assert_eq!(config.boundary.len(), 4);
    assert_eq!(config.floor_bounds, [0, 2]);
    assert_eq!(config.total_devices, 8);
    assert_eq!(config.steps, 7);
    assert_eq!(config.step_interval_ms, defaults::STEP_INTERVAL_MS);
    assert_eq!(config.batch_threshold, defaults::BATCH_THRESHOLD);
    config.validate().unwrap();
}

/// A missing configuration file is reported, not silently ignored
#[test]
fn test_missing_config_file() {
    let args = parse(&["--config", "/definitely/not/here.json"]);
    assert!(SimulationConfig::from_cli_args(args).is_err());
}

/// Logging flags are independent of the simulation settings
#[test]
fn test_logging_flags() {
    let args = parse(&["-d", "--print-config"]);
    assert!(args.debug);
    assert!(!args.verbose);
    assert!(args.print_config);
}
