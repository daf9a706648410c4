//! Output formatting utilities for the CLI
//!
//! Provides table and JSON formatting with colors.

use anyhow::Result;
use colored::*;
use technove::{StationInfo, Status};

use tabled::{settings::Style, Table, Tabled};

/// Output format options
#[derive(Debug, Clone)]
pub enum OutputFormat {
    Table,
    Json,
}

/// Format the charging status view
pub fn format_status(info: &StationInfo, format: &OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(info)?),
        OutputFormat::Table => {
            #[derive(Tabled)]
            struct StatusRow {
                #[tabled(rename = "Setting")]
                name: String,
                #[tabled(rename = "Value")]
                value: String,
            }

            let row = |name: &str, value: String| StatusRow {
                name: name.to_string(),
                value,
            };

            let battery_protection = if info.is_battery_protected {
                format!("Enabled (limit {:.0}%)", info.max_charge_percentage)
                    .green()
                    .to_string()
            } else {
                "Disabled".dimmed().to_string()
            };

            let rows = vec![
                row("Status", status_label(&info.status).to_string()),
                row("Auto-charge", on_off_label(info.auto_charge)),
                row("Session active", yes_no_label(info.is_session_active)),
                row("Current", format!("{} A", info.current).cyan().to_string()),
                row("Max current", format!("{} A", info.max_current)),
                row("Station limit", format!("{} A", info.max_station_current)),
                row("Voltage in", format!("{} V", info.voltage_in)),
                row("Voltage out", format!("{} V", info.voltage_out)),
                row("Session energy", format!("{:.2} kWh", info.energy_session)),
                row("Total energy", format!("{} kWh", info.energy_total)),
                row(
                    "High-tariff period",
                    active_label(info.high_charge_period_active),
                ),
                row("Normal period", active_label(info.normal_period_active)),
                row("Battery protection", battery_protection),
            ];

            let table = Table::new(rows).with(Style::rounded()).to_string();
            Ok(format!("{}\n{}", "Charging Status:".bold(), table))
        }
    }
}

/// Format the station identity view
pub fn format_info(info: &StationInfo, format: &OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(info)?),
        OutputFormat::Table => {
            let mut output = String::new();
            output.push_str(&"TechnoVE Station".bold().to_string());
            output.push('\n');
            output.push_str(&format!("Name: {}", info.name.cyan()));
            output.push('\n');
            output.push_str(&format!("MAC address: {}", info.mac_address));
            output.push('\n');
            output.push_str(&format!(
                "Firmware: {} {}",
                info.version.cyan(),
                if info.is_up_to_date {
                    "(up to date)".green()
                } else {
                    "(update available)".yellow()
                }
            ));
            output.push('\n');
            output.push_str(&format!(
                "Wi-Fi network: {} ({})",
                info.network_ssid,
                signal_label(info.rssi)
            ));
            output.push('\n');
            output.push_str(&format!(
                "Static IP: {}",
                if info.is_static_ip { "Yes" } else { "No" }
            ));
            output.push('\n');
            output.push_str(&format!("Station limit: {} A", info.max_station_current));
            output.push('\n');
            output.push_str(&format!(
                "Sharing mode: {}",
                if info.in_sharing_mode {
                    "Enabled".yellow()
                } else {
                    "Disabled".normal()
                }
            ));

            if info.conflict_in_sharing_config {
                output.push('\n');
                output.push_str(
                    &"Warning: conflicting sharing configuration detected"
                        .red()
                        .to_string(),
                );
            }

            Ok(output)
        }
    }
}

/// Human-readable colored label for a station status
fn status_label(status: &Status) -> ColoredString {
    match status {
        Status::Unknown => "Unknown".red(),
        Status::Unplugged => "Unplugged".dimmed(),
        Status::PluggedWaiting => "Plugged in (waiting)".yellow(),
        Status::PluggedCharging => "Charging".green(),
        Status::OutOfActivationPeriod => "Out of activation period".yellow(),
        Status::HighChargePeriod => "High charge period".cyan(),
    }
}

/// Wi-Fi signal strength label colored by quality
fn signal_label(rssi: i32) -> ColoredString {
    let label = format!("{} dBm", rssi);
    if rssi >= -60 {
        label.green()
    } else if rssi >= -75 {
        label.yellow()
    } else {
        label.red()
    }
}

fn on_off_label(enabled: bool) -> String {
    if enabled {
        "Enabled".green().to_string()
    } else {
        "Disabled".dimmed().to_string()
    }
}

fn yes_no_label(value: bool) -> String {
    if value {
        "Yes".green().to_string()
    } else {
        "No".dimmed().to_string()
    }
}

fn active_label(active: bool) -> String {
    if active {
        "Active".green().to_string()
    } else {
        "Inactive".dimmed().to_string()
    }
}

/// Format success message
pub fn format_success(message: &str) -> String {
    format!("{} {}", "✓".green().bold(), message)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_info() -> StationInfo {
        StationInfo {
            auto_charge: true,
            current: 16,
            energy_session: 7.25,
            energy_total: 1234,
            mac_address: "02:42:ac:11:00:02".to_string(),
            is_session_active: true,
            max_current: 24,
            max_station_current: 32,
            name: "Garage".to_string(),
            network_ssid: "Home Wi-Fi".to_string(),
            rssi: -61,
            status: Status::PluggedCharging,
            version: "1.82".to_string(),
            voltage_in: 240,
            voltage_out: 238,
            ..StationInfo::default()
        }
    }

    #[test]
    fn test_format_success() {
        let message = format_success("Operation completed");
        assert!(message.contains("✓"));
        assert!(message.contains("Operation completed"));
    }

    #[test]
    fn test_format_status_json() {
        let info = sample_info();
        let result = format_status(&info, &OutputFormat::Json).unwrap();

        assert!(result.contains("maxCurrent"));
        assert!(result.contains("24"));
        assert!(result.contains("plugged_charging"));
    }

    #[test]
    fn test_format_status_table() {
        let info = sample_info();
        let result = format_status(&info, &OutputFormat::Table).unwrap();

        assert!(result.contains("Charging Status:"));
        assert!(result.contains("Charging"));
        assert!(result.contains("16 A"));
        assert!(result.contains("7.25 kWh"));
    }

    #[test]
    fn test_format_info_json() {
        let info = sample_info();
        let result = format_info(&info, &OutputFormat::Json).unwrap();

        assert!(result.contains("version"));
        assert!(result.contains("1.82"));
        assert!(result.contains("network_ssid"));
    }

    #[test]
    fn test_format_info_table() {
        let info = sample_info();
        let result = format_info(&info, &OutputFormat::Table).unwrap();

        assert!(result.contains("Garage"));
        assert!(result.contains("02:42:ac:11:00:02"));
        assert!(result.contains("-61 dBm"));
        assert!(!result.contains("Warning"));
    }

    #[test]
    fn test_format_info_table_sharing_conflict() {
        let mut info = sample_info();
        info.conflict_in_sharing_config = true;

        let result = format_info(&info, &OutputFormat::Table).unwrap();
        assert!(result.contains("conflicting sharing configuration"));
    }
}
