//! Push-channel client for the fire alert stream.
//!
//! This crate owns the long-lived connection to the alert server. It:
//!
//! - Opens one WebSocket connection to the alert endpoint (`/ws/alerts`)
//! - Decodes each message into a typed, validated [`Alert`]
//! - Surfaces connection lifecycle signals (opened, closed, errored) and
//!   decode failures as [`ChannelEvent`] values instead of failing the stream
//!
//! There is no reconnection. Once the stream reports
//! [`ChannelEvent::Closed`] or [`ChannelEvent::Errored`] it ends.
//!
//! # Example
//!
//! ```no_run
//! use alert_stream::{AlertClient, ChannelEvent, StreamConfig};
//! use futures::StreamExt;
//!
//! # async fn example() -> Result<(), alert_stream::StreamError> {
//! let client = AlertClient::connect(StreamConfig::default()).await?;
//!
//! let mut events = alert_stream::subscribe(&client).await?;
//! while let Some(event) = events.next().await {
//!     match event {
//!         ChannelEvent::Alert(alert) => {
//!             println!("Fire in building {} floor {}", alert.building(), alert.floor());
//!         }
//!         other => println!("{:?}", other),
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod channel;
pub mod client;
pub mod config;
pub mod error;
pub mod types;

pub use channel::{subscribe, AlertStream, ChannelEvent};
pub use client::AlertClient;
pub use config::StreamConfig;
pub use error::{DecodeError, StreamError};
pub use types::*;

/// Crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
