//! Request payloads for the station's local HTTP API
//!
//! The station firmware serves a small unauthenticated REST surface on port
//! 80. Endpoints observed from the vendor's mobile app, beyond the ones the
//! client uses today: `GET /station/get/statistic`,
//! `GET /station/network/list`, `GET /station/get/schedule`,
//! `GET /station/partage/get/config`, and `POST /station/update`.

use serde::{Deserialize, Serialize};

/// Body for `POST /station/set/automatic`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoChargeRequest {
    /// Whether the station should start charging on its own
    pub activated: bool,
}

/// Body for `POST /station/schedule/high/activate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighTariffScheduleRequest {
    /// Whether the station should follow the high-tariff schedule
    pub activated: bool,
}

/// Body for `POST /station/control/partage`.
///
/// The firmware parses the literal key `" stationNumber"`, leading space
/// included; without it the request is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaxCurrentRequest {
    /// Which station of a sharing group the limit applies to
    #[serde(rename = " stationNumber")]
    pub station_number: u8,
    /// Requested per-station max current, in amps
    pub current: u32,
}

impl MaxCurrentRequest {
    /// Limit request for the station being addressed.
    ///
    /// The local API always talks to station number 1; orchestrating a whole
    /// sharing group is the mobile app's job.
    pub fn new(current: u32) -> Self {
        Self {
            station_number: 1,
            current,
        }
    }
}
