//! Scenario Charts Core Library
//!
//! Turns raw epidemiological projections into chart-ready data:
//! - `InterventionScenarioSet`: the four named intervention scenarios,
//!   all-or-nothing
//! - `ScenarioModel`: a validated projection with derived outcomes
//! - `zones`: zone classification and zone-aligned ticks
//! - `series` / `chart`: derived series and geometry-free chart payloads
//!
//! Everything here is synchronous and pure. Missing data is reported as
//! [`Availability::Unavailable`], never as an error.

pub mod chart;
pub mod config;
pub mod digest;
pub mod domain;
pub mod model;
pub mod obs;
pub mod outcomes;
pub mod reporting;
pub mod scenario_set;
pub mod series;
pub mod telemetry;
pub mod zones;

pub use chart::{build_charts, ChartPayload, ChartSet, CurrentValue};
pub use config::{ChartConfig, DEFAULT_HORIZON_DAYS};
pub use digest::{canonical_json, projection_digest};
pub use domain::{
    Availability, ChartError, InterventionKind, InterventionParams, Metric, PolicyTable,
    RawProjection, RawRecord, Result, ScenarioSlot,
};
pub use model::{OutcomeSummary, ScenarioModel};
pub use obs::{
    emit_chart_derived, emit_chart_unavailable, emit_scenario_set_built,
    emit_scenario_set_unavailable, LocationSpan,
};
pub use outcomes::{outcomes_table, OutcomeRow};
pub use reporting::{
    render_outcomes_md, write_charts_json, write_outcomes_md, ChartReport,
    CHART_REPORT_SCHEMA_VERSION,
};
pub use scenario_set::{BundleEntry, ErrorMarker, InterventionScenarioSet, RawBundle, TimedScenario};
pub use series::{
    derive, derive_line, derive_range, derive_scenario_series, ChartKind, DerivedSeries,
    LinePoint, RangePoint, ScenarioSeries, SeriesSpec,
};
pub use telemetry::init_tracing;
pub use zones::{classify, compute_ticks, format_decimal, Zone, ZoneTables, ZoneThresholds};

/// Scenario Charts version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
