//! Alert model and wire payload types.

mod alert;
mod payload;

pub use alert::{Alert, Building, SensorSnapshot};
pub use payload::{decode_alert, AlertPayload};
