//! TechnoVE Station Client
//!
//! Asynchronous client for the local HTTP API of TechnoVE charging stations,
//! meant for embedding into home-automation platforms.
//!
//! # Public API
//!
//! The entry point is [`TechnoVE`], built from the station's IP address with
//! optional tuning via [`TechnoVE::builder`]. The data model and error types
//! come from `technove-core` and are re-exported here.
//!
//! ```no_run
//! use technove::TechnoVE;
//!
//! # async fn example() -> technove::Result<()> {
//! let mut station = TechnoVE::new("192.168.1.25")?;
//!
//! let snapshot = station.update().await?;
//! println!("{} is {:?}", snapshot.info.name, snapshot.info.status);
//!
//! station.set_max_current(16).await?;
//! # Ok(())
//! # }
//! ```

/// HTTP client for communicating with a station.
pub mod client;

pub use client::{TechnoVE, TechnoVEBuilder};

// Callers get the whole vocabulary from one import.
pub use technove_core::{
    Result, Station, StationInfo, Status, TechnoVEError, MIN_CURRENT,
};
