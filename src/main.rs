// Venue Position Faker - Main Entry Point
//
// You can run it via Cargo:
//
// ```console
// $ cargo build --release
// $ ./target/release/venue-position-faker --api-url http://localhost:8080
// ```
//
// Or with a venue file and a persistent registry:
//
// ```console
// $ ./target/release/venue-position-faker --config venue.json --registry devices.json --verbose
// ```

use anyhow::{Context, Result};
use clap::Parser;
use std::process;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{error, info, warn};
use venue_position_faker::registry::{DeviceRegistry, InMemoryRegistry, JsonFileRegistry};
use venue_position_faker::simulation::{
    LoggingConfig, RunStatistics, SimulationDriver, SimulationError,
};
use venue_position_faker::types::config::CliArgs;
use venue_position_faker::types::SimulationConfig;

#[tokio::main]
async fn main() {
    // Parse CLI arguments first to check for special flags
    let args = CliArgs::parse();

    // Handle special CLI flags that don't require full initialization
    if args.print_config {
        match SimulationConfig::default().print_json() {
            Ok(json) => {
                println!("{}", json);
                return;
            }
            Err(e) => {
                eprintln!("Failed to serialize default configuration: {}", e);
                process::exit(1);
            }
        }
    }

    // Initialize logging based on CLI flags
    let _logging_guard = match LoggingConfig::from_flags(
        args.verbose,
        args.debug,
        args.json_logs,
        args.log_dir.as_deref(),
    )
    .init()
    {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            process::exit(1);
        }
    };

    info!("Starting Venue Position Faker");

    if let Err(e) = run(args).await {
        match e.downcast_ref::<SimulationError>() {
            Some(cause) => error!(
                category = cause.category(),
                retry_may_help = cause.is_recoverable(),
                "Simulation failed: {:#}",
                e
            ),
            None => error!("Simulation failed: {:#}", e),
        }
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }

    info!("Venue Position Faker completed successfully");
}

/// Load configuration, build collaborators, and drive the simulation
async fn run(args: CliArgs) -> Result<()> {
    let dry_run = args.dry_run;

    // Load configuration from CLI arguments and optional config file
    let config =
        SimulationConfig::from_cli_args(args).context("Failed to load configuration")?;
    config.validate().context("Configuration validation failed")?;
    info!("Configuration loaded and validated successfully");

    // Handle dry run mode
    if dry_run {
        eprintln!("Configuration validation successful!");
        eprintln!("Dry run mode - simulation will not be executed.");
        print_configuration_summary(&config);
        return Ok(());
    }

    print_startup_banner(&config);

    let registry = open_registry(&config).await?;

    let mut driver = SimulationDriver::over_http(config, registry)
        .context("Failed to initialize simulation")?;

    eprintln!("Provisioning devices...");
    let devices = driver.provision().await.context("Failed to provision devices")?;
    eprintln!("Provisioned {} devices, starting simulation...", devices);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Ctrl-C received, finishing the current step");
            eprintln!("\nShutdown requested, finishing the current step...");
            let _ = shutdown_tx.send(true);
        }
    });

    let statistics = driver.run(shutdown_rx).await.context("Simulation run failed")?;
    print_final_statistics(&statistics);
    Ok(())
}

/// Open the configured registry, falling back to an in-memory one
async fn open_registry(config: &SimulationConfig) -> Result<Arc<dyn DeviceRegistry>> {
    match &config.registry_path {
        Some(path) => {
            let registry = JsonFileRegistry::open(path)
                .await
                .with_context(|| format!("Failed to open registry at {}", path))?;
            Ok(Arc::new(registry))
        }
        None => {
            info!("No registry path configured, using an in-memory registry");
            Ok(Arc::new(InMemoryRegistry::new()))
        }
    }
}

/// Print startup banner and configuration summary
fn print_startup_banner(config: &SimulationConfig) {
    eprintln!("Venue Position Faker");
    eprintln!("====================");
    eprintln!("Synthetic indoor-positioning telemetry generator");
    eprintln!();

    print_configuration_summary(config);
}

/// Print configuration summary
fn print_configuration_summary(config: &SimulationConfig) {
    let simulated_minutes = config.simulated_span_millis().map(|span| span / 60_000);

    eprintln!("Configuration:");
    eprintln!("  Venue: {}", config.venue);
    eprintln!("  Boundary Vertices: {}", config.boundary.len());
    eprintln!("  Floors: {} - {}", config.floor_bounds[0], config.floor_bounds[1]);
    eprintln!("  Devices: {}", config.total_devices);
    eprintln!(
        "  Steps: {} x {} ms (~{} simulated minutes)",
        config.steps,
        config.step_interval_ms,
        simulated_minutes.map_or_else(|_| "too many".to_string(), |minutes| minutes.to_string())
    );
    eprintln!("  Step Delay: {} ms", config.step_delay_ms);
    eprintln!("  Batch Threshold: {} samples", config.batch_threshold);
    eprintln!("  Heartbeat: {} ms", config.heartbeat_interval_ms);
    eprintln!("  API: {} (timeout {}s)", config.api_base_url, config.request_timeout_secs);
    match &config.registry_path {
        Some(path) => eprintln!("  Registry: {}", path),
        None => eprintln!("  Registry: in-memory"),
    }
    if let Some(seed) = config.seed {
        eprintln!("  Random Seed: {}", seed);
    }
    eprintln!();
}

/// Print the end-of-run report
fn print_final_statistics(statistics: &RunStatistics) {
    eprintln!();
    eprintln!("{}", statistics.generate_summary_report());
}
