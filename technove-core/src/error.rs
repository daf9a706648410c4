//! Error types for TechnoVE station operations

use thiserror::Error;

/// Core error type for TechnoVE station operations
#[derive(Error, Debug)]
pub enum TechnoVEError {
    /// Network-level failure reaching the station
    #[error("Error communicating with the station at {host}: {message}")]
    Connection { host: String, message: String },

    /// The station did not answer within the request timeout
    #[error("Timeout occurred while connecting to the station at {host}")]
    ConnectionTimeout { host: String },

    /// The station answered with an unexpected HTTP status
    #[error("Unexpected HTTP {status} from the station: {message}")]
    Api { status: u16, message: String },

    /// The station answered with a body that could not be interpreted
    #[error("Invalid response from the station: {0}")]
    InvalidResponse(String),

    /// The station answered with an empty snapshot
    #[error("No data was returned by the station")]
    EmptyResponse,

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Requested max current below the firmware minimum
    #[error("Max current out of range: {value} A (must be at least {min} A)")]
    CurrentTooLow { value: u32, min: u32 },

    /// Requested max current above what the station supports
    #[error("Max current out of range: {value} A (station supports at most {max} A)")]
    CurrentTooHigh { value: u32, max: u32 },

    /// Per-station current limits are owned by the sharing config
    #[error("Cannot set the max current when sharing mode is enabled")]
    SharingModeEnabled,

    /// Manual start/stop is rejected by the station in auto-charge mode
    #[error("Cannot start or stop charging when auto-charge is enabled")]
    AutoChargeEnabled,
}

impl TechnoVEError {
    /// Whether this error is a transient connection failure.
    ///
    /// Connection failures are the only class the request executor retries;
    /// everything else surfaces immediately.
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            TechnoVEError::Connection { .. } | TechnoVEError::ConnectionTimeout { .. }
        )
    }
}

/// Result type alias for TechnoVE station operations
pub type Result<T> = std::result::Result<T, TechnoVEError>;

impl From<serde_json::Error> for TechnoVEError {
    fn from(err: serde_json::Error) -> Self {
        TechnoVEError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_json_error_conversion() {
        // Create a serde_json error by trying to parse invalid JSON
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: TechnoVEError = json_err.into();

        match err {
            TechnoVEError::Serialization(msg) => {
                assert!(!msg.is_empty());
            }
            _ => panic!("Expected Serialization error"),
        }
    }

    #[test]
    fn test_error_display() {
        let err = TechnoVEError::Connection {
            host: "192.168.1.25".to_string(),
            message: "connection refused".to_string(),
        };
        assert_eq!(
            format!("{}", err),
            "Error communicating with the station at 192.168.1.25: connection refused"
        );

        let err = TechnoVEError::ConnectionTimeout {
            host: "192.168.1.25".to_string(),
        };
        assert_eq!(
            format!("{}", err),
            "Timeout occurred while connecting to the station at 192.168.1.25"
        );

        let err = TechnoVEError::Api {
            status: 404,
            message: "Not Found".to_string(),
        };
        assert_eq!(
            format!("{}", err),
            "Unexpected HTTP 404 from the station: Not Found"
        );

        let err = TechnoVEError::CurrentTooLow { value: 2, min: 8 };
        assert_eq!(
            format!("{}", err),
            "Max current out of range: 2 A (must be at least 8 A)"
        );

        let err = TechnoVEError::CurrentTooHigh { value: 48, max: 32 };
        assert_eq!(
            format!("{}", err),
            "Max current out of range: 48 A (station supports at most 32 A)"
        );

        let err = TechnoVEError::EmptyResponse;
        assert_eq!(format!("{}", err), "No data was returned by the station");
    }

    #[test]
    fn test_is_connection_error() {
        let err = TechnoVEError::ConnectionTimeout {
            host: "example.com".to_string(),
        };
        assert!(err.is_connection_error());

        let err = TechnoVEError::Connection {
            host: "example.com".to_string(),
            message: "reset by peer".to_string(),
        };
        assert!(err.is_connection_error());

        let err = TechnoVEError::Api {
            status: 500,
            message: "boom".to_string(),
        };
        assert!(!err.is_connection_error());

        assert!(!TechnoVEError::AutoChargeEnabled.is_connection_error());
        assert!(!TechnoVEError::EmptyResponse.is_connection_error());
    }
}
