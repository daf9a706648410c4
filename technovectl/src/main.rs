//! TechnoVE CLI
//!
//! Command-line interface for controlling TechnoVE charging stations.

use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use technove::TechnoVE;
use technovectl::cli::{
    generate_completion, handle_auto_charge, handle_charging, handle_config, handle_high_tariff,
    handle_info, handle_set_current, handle_status, Cli, Commands, OutputFormat,
};
use technovectl::config::CliConfig;
use tracing::debug;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Build configuration using the priority chain: defaults, then config
    // file, then environment variables, then CLI args.
    let mut builder = CliConfig::builder();

    // Load config file (unless --no-config is specified)
    if !cli.no_config {
        builder = builder.with_config_file(cli.config.as_deref())?;
    }

    // Apply environment variable overrides
    builder = builder.with_env_overrides();

    // Apply CLI argument overrides (highest priority)
    if let Some(ref host) = cli.host {
        builder = builder.with_host(host.as_str())?;
    }
    if let Some(port) = cli.port {
        builder = builder.with_port(port)?;
    }
    if let Some(ref format) = cli.format {
        let format_str = match format {
            OutputFormat::Table => "table",
            OutputFormat::Json => "json",
        };
        builder = builder.with_output_format(format_str)?;
    }
    if let Some(verbose) = cli.verbose {
        builder = builder.with_verbose(verbose);
    }

    // Build final configuration with validation
    let config = match builder.build() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", "Configuration error:".red().bold(), e);
            std::process::exit(1);
        }
    };

    init_tracing(config.verbose);

    // Determine final settings from validated config
    let output_format = match config.output_format.as_str() {
        "json" => OutputFormat::Json,
        _ => OutputFormat::Table,
    };
    let config_path = cli.config.clone();

    // Execute commands
    let result = run(cli.command, &config, config_path.as_deref(), &output_format).await;

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        if config.verbose {
            eprintln!("Error details: {:?}", e);
        }
        std::process::exit(1);
    }

    Ok(())
}

/// Dispatch a parsed command, connecting to the station where needed
async fn run(
    command: Commands,
    config: &CliConfig,
    config_path: Option<&str>,
    format: &OutputFormat,
) -> Result<()> {
    match command {
        Commands::Status => handle_status(&mut connect(config)?, format).await,
        Commands::Info => handle_info(&mut connect(config)?, format).await,
        Commands::SetCurrent { amps } => handle_set_current(&mut connect(config)?, amps).await,
        Commands::AutoCharge { state } => handle_auto_charge(&connect(config)?, state).await,
        Commands::Charging { action } => handle_charging(&mut connect(config)?, action).await,
        Commands::HighTariff { state } => handle_high_tariff(&connect(config)?, state).await,
        Commands::Config { command } => handle_config(command, config, config_path, format).await,
        Commands::Completion { shell } => {
            generate_completion(shell);
            Ok(())
        }
    }
}

/// Build a station client from the resolved configuration
fn connect(config: &CliConfig) -> Result<TechnoVE> {
    if config.host.is_empty() {
        anyhow::bail!(
            "No station host configured. Pass --host, set TECHNOVE_HOST, \
             or run `technovectl config set host <address>`"
        );
    }

    debug!("Using station at {}:{}", config.host, config.port);

    let client = TechnoVE::builder(config.host.as_str())
        .port(config.port)
        .request_timeout(Duration::from_secs(config.timeout))
        .build()?;

    Ok(client)
}

/// Initialize tracing subscriber for logging
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    // Tables go to stdout, diagnostics stay on stderr
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
