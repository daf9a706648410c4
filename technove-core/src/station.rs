//! Station data model for TechnoVE charging stations

use serde::{Deserialize, Serialize};

/// Smallest max current accepted by the firmware, in amps.
///
/// The station silently ignores anything below this, so clients reject such
/// values before issuing a request.
pub const MIN_CURRENT: u32 = 8;

/// Charging status reported by the station.
///
/// The client only reflects this state; transitions are dictated entirely by
/// the station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Status code missing or not recognized
    Unknown,
    /// No vehicle plugged in (code 65)
    Unplugged,
    /// Vehicle plugged in, waiting to charge (code 66)
    PluggedWaiting,
    /// Vehicle plugged in and charging (code 67)
    PluggedCharging,
    /// Charging held outside the configured activation period (code 83)
    OutOfActivationPeriod,
    /// Charging during a high-tariff period (code 84)
    HighChargePeriod,
}

impl Status {
    /// Map a raw status code from the station to a `Status`.
    ///
    /// Unrecognized codes map to `Status::Unknown` rather than failing, since
    /// firmware updates introduce codes faster than this list tracks them.
    pub fn from_code(code: u64) -> Self {
        match code {
            65 => Status::Unplugged,
            66 => Status::PluggedWaiting,
            67 => Status::PluggedCharging,
            83 => Status::OutOfActivationPeriod,
            84 => Status::HighChargePeriod,
            _ => Status::Unknown,
        }
    }
}

impl Default for Status {
    fn default() -> Self {
        Status::Unknown
    }
}

// The firmware reports the status as a bare integer. Older revisions have
// been seen sending strings or omitting the field, so anything that is not a
// recognized integer code becomes Unknown.
fn status_from_code<'de, D>(deserializer: D) -> Result<Status, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(serde_json::Value::as_u64)
        .map(Status::from_code)
        .unwrap_or(Status::Unknown))
}

/// Snapshot of a station as reported by `GET /station/get/info`.
///
/// The endpoint returns one flat JSON object carrying identity, network, and
/// charger state together. Every field is optional on the wire; firmware
/// revisions omit fields freely, so each one falls back to a default when
/// absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StationInfo {
    /// Whether the station decides on its own when to start charging
    pub auto_charge: bool,
    /// The sharing config disagrees with what the station applies
    #[serde(rename = "conflictInSharingConfig")]
    pub conflict_in_sharing_config: bool,
    /// Current being delivered to the vehicle, in amps
    pub current: u32,
    /// Energy delivered during the active session, in kWh
    #[serde(rename = "energySession")]
    pub energy_session: f64,
    /// Energy delivered over the lifetime of the station, in kWh
    #[serde(rename = "energyTotal")]
    pub energy_total: u64,
    /// A high-tariff charging period is in effect
    #[serde(rename = "highChargePeriodActive")]
    pub high_charge_period_active: bool,
    /// MAC address of the station; doubles as its serial identity
    #[serde(rename = "id")]
    pub mac_address: String,
    /// The station shares a circuit with others and lets the sharing
    /// config own per-station current limits
    #[serde(rename = "inSharingMode")]
    pub in_sharing_mode: bool,
    /// Battery protection is limiting the charge level
    #[serde(rename = "isBatteryProtected")]
    pub is_battery_protected: bool,
    /// A charging session is currently open
    #[serde(rename = "isSessionActive")]
    pub is_session_active: bool,
    /// The station uses a static IP configuration
    #[serde(rename = "isStaticIp")]
    pub is_static_ip: bool,
    /// Firmware is current
    #[serde(rename = "isUpToDate")]
    pub is_up_to_date: bool,
    /// Raw log of the most recent charge, as recorded by the station
    #[serde(rename = "lastCharge")]
    pub last_charge: String,
    /// Battery-protection charge ceiling, in percent
    // The wire key keeps the vendor's French spelling.
    #[serde(rename = "maxChargePourcentage")]
    pub max_charge_percentage: f64,
    /// Max current the station is currently set to deliver, in amps
    #[serde(rename = "maxCurrent")]
    pub max_current: u32,
    /// Max current the hardware installation supports, in amps
    #[serde(rename = "maxStationCurrent")]
    pub max_station_current: u32,
    /// Name given to the station by its owner
    pub name: String,
    /// SSID of the Wi-Fi network the station is joined to
    pub network_ssid: String,
    /// A normal-tariff charging period is in effect
    #[serde(rename = "normalPeriodActive")]
    pub normal_period_active: bool,
    /// Wi-Fi signal strength, in dBm
    pub rssi: i32,
    /// Charging status
    #[serde(deserialize_with = "status_from_code")]
    pub status: Status,
    /// Clock of the station, in milliseconds since the epoch
    pub time: i64,
    /// Firmware version
    pub version: String,
    /// Voltage measured on the supply side, in volts
    #[serde(rename = "voltageIn")]
    pub voltage_in: u32,
    /// Voltage measured on the vehicle side, in volts
    #[serde(rename = "voltageOut")]
    pub voltage_out: u32,
}

impl Default for StationInfo {
    fn default() -> Self {
        Self {
            auto_charge: false,
            conflict_in_sharing_config: false,
            current: 0,
            energy_session: 0.0,
            energy_total: 0,
            high_charge_period_active: false,
            mac_address: "unknown".to_string(),
            in_sharing_mode: false,
            is_battery_protected: false,
            is_session_active: false,
            is_static_ip: false,
            is_up_to_date: true,
            last_charge: String::new(),
            max_charge_percentage: 0.0,
            max_current: 0,
            max_station_current: 0,
            name: "Unknown".to_string(),
            network_ssid: "Unknown".to_string(),
            normal_period_active: false,
            rssi: 0,
            status: Status::Unknown,
            time: 0,
            version: "Unknown".to_string(),
            voltage_in: 0,
            voltage_out: 0,
        }
    }
}

/// The charging device and its last reported state.
///
/// Replaced wholesale on each successful update; a failed update leaves the
/// previous snapshot untouched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Station {
    /// Snapshot from the last successful update
    pub info: StationInfo,
}

impl Station {
    /// Wrap a parsed snapshot.
    pub fn new(info: StationInfo) -> Self {
        Self { info }
    }
}
