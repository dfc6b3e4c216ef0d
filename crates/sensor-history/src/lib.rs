//! Client for historical sensor data.
//!
//! This crate talks to the sensor API's query endpoints. It supports:
//!
//! - Paginated time-series queries by signal kind, location and time window
//! - Assembling one chartable [`Series`] per building/floor pair
//! - Per-kind sensor statistics
//! - Fire status of a location and the list of active events
//!
//! The alert pipeline does not use this crate; it only shares the server.
//!
//! # Example
//!
//! ```no_run
//! use sensor_history::{HistoryClient, HistoryConfig, HistoryQuery, Location, SignalKind};
//! use alert_stream::Building;
//!
//! # async fn example() -> Result<(), sensor_history::HistoryError> {
//! let client = HistoryClient::new(HistoryConfig::default())?;
//!
//! let query = HistoryQuery::new(SignalKind::Temperature)
//!     .with_location(Location::new(Building::A, 1)?)
//!     .with_location(Location::new(Building::B, 2)?);
//!
//! for series in client.fetch_series(&query).await? {
//!     println!("{}: {} points", series.label, series.points.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod types;

pub use client::HistoryClient;
pub use config::HistoryConfig;
pub use error::HistoryError;
pub use types::*;
