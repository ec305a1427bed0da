//! Structured observability hooks for the scenario pipeline.
//!
//! This module provides:
//! - Location-scoped tracing spans via `LocationSpan` RAII guard
//! - Emission functions for scenario set construction and chart derivation
//!
//! Events are emitted at `info!` level, except unavailable scenario slots
//! which are `warn!`. Filter with `RUST_LOG`.

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::domain::ScenarioSlot;
use crate::series::ChartKind;

/// RAII guard that enters a location-scoped span for the duration of a
/// pipeline invocation.
///
/// # Example
///
/// ```ignore
/// let _span = LocationSpan::enter("CA");
/// // every event below carries location = "CA"
/// ```
pub struct LocationSpan {
    _span: tracing::span::EnteredSpan,
}

impl LocationSpan {
    pub fn enter(location: &str) -> Self {
        let span = tracing::info_span!("scenario_charts.location", location = %location);
        Self {
            _span: span.entered(),
        }
    }
}

/// Emit event: all four scenarios were built.
pub fn emit_scenario_set_built(start: NaiveDate, records: usize) {
    info!(event = "scenario_set.built", start = %start, records = records);
}

/// Emit event: the scenario set is unavailable (warning level).
///
/// `slot` is `None` when the whole bundle is absent.
pub fn emit_scenario_set_unavailable(slot: Option<ScenarioSlot>, reason: &str) {
    match slot {
        Some(slot) => warn!(
            event = "scenario_set.unavailable",
            slot = %slot,
            bundle_key = slot.bundle_key(),
            reason = %reason,
        ),
        None => warn!(event = "scenario_set.unavailable", reason = %reason),
    }
}

/// Emit event: a chart payload was derived.
pub fn emit_chart_derived(kind: ChartKind, points: usize, ticks: usize) {
    info!(event = "chart.derived", kind = %kind, points = points, ticks = ticks);
}

/// Emit event: a chart has no payload.
pub fn emit_chart_unavailable(kind: ChartKind, reason: &str) {
    info!(event = "chart.unavailable", kind = %kind, reason = %reason);
}
