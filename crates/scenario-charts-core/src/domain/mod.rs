//! Domain models for scenario charts.
//!
//! Canonical definitions for the data the pipeline moves around:
//! - `RawProjection`: per-day records from the data fetch layer
//! - `InterventionParams`: the policy a projection was run under
//! - `Availability`: the "unavailable" sentinel for missing data

pub mod availability;
pub mod error;
pub mod intervention;
pub mod projection;

pub use availability::Availability;
pub use error::{ChartError, Result};
pub use intervention::{InterventionKind, InterventionParams, PolicyTable, ScenarioSlot};
pub use projection::{Metric, RawProjection, RawRecord};
