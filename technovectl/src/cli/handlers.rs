//! Command execution handlers

use std::path::Path;

use anyhow::Result;
use technove::TechnoVE;

use crate::config::CliConfig;
use crate::format::format_success;

use super::commands::*;

/// Handle status command
pub async fn handle_status(client: &mut TechnoVE, format: &OutputFormat) -> Result<()> {
    let station = client.update().await?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&station.info)?);
        }
        OutputFormat::Table => {
            let formatted = crate::format::format_status(&station.info, &format.into())?;
            println!("{}", formatted);
        }
    }

    Ok(())
}

/// Handle info command
pub async fn handle_info(client: &mut TechnoVE, format: &OutputFormat) -> Result<()> {
    let station = client.update().await?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&station.info)?);
        }
        OutputFormat::Table => {
            let formatted = crate::format::format_info(&station.info, &format.into())?;
            println!("{}", formatted);
        }
    }

    Ok(())
}

/// Handle set-current command
pub async fn handle_set_current(client: &mut TechnoVE, amps: u32) -> Result<()> {
    // Refresh the snapshot first so the sharing-mode and station-limit
    // checks run against current station state.
    client.update().await?;
    client.set_max_current(amps).await?;

    println!(
        "{}",
        format_success(&format!("Set max charging current to {} A", amps))
    );
    Ok(())
}

/// Handle auto-charge command
pub async fn handle_auto_charge(client: &TechnoVE, state: Toggle) -> Result<()> {
    client.set_auto_charge(state.is_on()).await?;

    let label = if state.is_on() { "enabled" } else { "disabled" };
    println!("{}", format_success(&format!("Auto-charge {}", label)));
    Ok(())
}

/// Handle charging start/stop command
pub async fn handle_charging(client: &mut TechnoVE, action: ChargingAction) -> Result<()> {
    // The station rejects manual control while auto-charge is enabled,
    // so refresh the snapshot before issuing the command.
    client.update().await?;

    match action {
        ChargingAction::Start => {
            client.set_charging_enabled(true).await?;
            println!("{}", format_success("Charging started"));
        }
        ChargingAction::Stop => {
            client.set_charging_enabled(false).await?;
            println!("{}", format_success("Charging stopped"));
        }
    }

    Ok(())
}

/// Handle high-tariff schedule command
pub async fn handle_high_tariff(client: &TechnoVE, state: Toggle) -> Result<()> {
    client.set_high_tariff_schedule(state.is_on()).await?;

    let label = if state.is_on() { "enabled" } else { "disabled" };
    println!(
        "{}",
        format_success(&format!("High-tariff schedule {}", label))
    );
    Ok(())
}

/// Handle config commands
pub async fn handle_config(
    command: ConfigCommands,
    current_config: &CliConfig,
    config_path: Option<&str>,
    format: &OutputFormat,
) -> Result<()> {
    match command {
        ConfigCommands::Show => match format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(current_config)?);
            }
            OutputFormat::Table => {
                let host = if current_config.host.is_empty() {
                    "(not set)"
                } else {
                    current_config.host.as_str()
                };

                println!("CLI Configuration:");
                println!("{:<20} Value", "Setting");
                println!("{}", "-".repeat(40));
                println!("{:<20} {}", "Host", host);
                println!("{:<20} {}", "Port", current_config.port);
                println!("{:<20} {}", "Output Format", current_config.output_format);
                println!("{:<20} {}", "Verbose", current_config.verbose);
                println!("{:<20} {}s", "Timeout", current_config.timeout);
            }
        },
        ConfigCommands::Set { key, value } => {
            let mut config = current_config.clone();
            let value_clone = value.clone();
            match key.as_str() {
                "host" => config.host = value,
                "port" => {
                    config.port = value
                        .parse()
                        .map_err(|_| anyhow::anyhow!("Invalid port value. Must be a number"))?;
                }
                "output_format" => {
                    if ["table", "json"].contains(&value.as_str()) {
                        config.output_format = value;
                    } else {
                        return Err(anyhow::anyhow!(
                            "Invalid output format. Must be 'table' or 'json'"
                        ));
                    }
                }
                "verbose" => {
                    config.verbose = value.to_lowercase() == "true" || value == "1";
                }
                "timeout" => {
                    config.timeout = value
                        .parse()
                        .map_err(|_| anyhow::anyhow!("Invalid timeout value. Must be a number"))?;
                }
                _ => return Err(anyhow::anyhow!("Unknown config key: {}", key)),
            }

            save_config(&config, config_path)?;
            println!(
                "{}",
                format_success(&format!("Set {} = {}", key, value_clone))
            );
        }
        ConfigCommands::Reset => {
            let default_config = CliConfig::default();
            save_config(&default_config, config_path)?;
            println!("{}", format_success("Configuration reset to defaults"));
        }
    }

    Ok(())
}

fn save_config(config: &CliConfig, path: Option<&str>) -> Result<()> {
    match path {
        Some(path) => config.save_to(Path::new(path)),
        None => config.save(),
    }
}

/// Generate shell completion script
pub fn generate_completion(shell: clap_complete::Shell) {
    use clap::CommandFactory;
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}
