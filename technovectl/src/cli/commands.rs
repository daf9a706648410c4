//! CLI command and subcommand definitions

use clap::{Parser, Subcommand};

/// TechnoVE Charging Station CLI
#[derive(Parser, Debug)]
#[command(name = "technovectl")]
#[command(version, about = "TechnoVE Charging Station CLI", long_about = None)]
pub struct Cli {
    /// Station host name or IP address (overrides config file)
    #[arg(short = 'H', long)]
    pub host: Option<String>,

    /// Station HTTP port (overrides config file)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Output format (overrides config file)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Enable verbose logging (overrides config file)
    #[arg(short, long)]
    pub verbose: Option<bool>,

    /// Don't load config file
    #[arg(long)]
    pub no_config: bool,

    /// Config file path (default: ~/.config/technove/cli.toml)
    #[arg(long)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum OutputFormat {
    /// Pretty table output
    Table,
    /// JSON output
    Json,
}

impl From<&OutputFormat> for crate::format::OutputFormat {
    fn from(format: &OutputFormat) -> Self {
        match format {
            OutputFormat::Table => crate::format::OutputFormat::Table,
            OutputFormat::Json => crate::format::OutputFormat::Json,
        }
    }
}

/// On/off switch argument for station toggles
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

impl Toggle {
    pub fn is_on(self) -> bool {
        matches!(self, Toggle::On)
    }
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum ChargingAction {
    /// Start charging the plugged-in vehicle
    Start,
    /// Stop the running charging session
    Stop,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the current charging status
    Status,

    /// Show station identity and network information
    Info,

    /// Set the maximum charging current
    SetCurrent {
        /// Current limit in amps (at least 8, at most the station limit)
        amps: u32,
    },

    /// Enable or disable automatic charging
    AutoCharge {
        /// Desired auto-charge state
        #[arg(value_enum)]
        state: Toggle,
    },

    /// Start or stop charging manually
    ///
    /// Manual control is rejected by the station while auto-charge is
    /// enabled; turn auto-charge off first.
    Charging {
        #[arg(value_enum)]
        action: ChargingAction,
    },

    /// Enable or disable the high-tariff charging schedule
    HighTariff {
        /// Desired schedule state
        #[arg(value_enum)]
        state: Toggle,
    },

    /// Show or manage CLI configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completion for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Set configuration value
    Set {
        /// Configuration key
        key: String,
        /// Configuration value
        value: String,
    },

    /// Reset configuration to defaults
    Reset,
}
