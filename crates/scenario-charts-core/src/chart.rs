//! Geometry-free chart payloads handed to the rendering layer.
//!
//! A payload carries the derived series, zone-aligned ticks, the zone table
//! behind `zone_label_at`, and the scale domains. Scales, SVG geometry and
//! anything DOM-facing stay with the renderer.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::ChartConfig;
use crate::domain::error::Result;
use crate::domain::Availability;
use crate::model::ScenarioModel;
use crate::obs;
use crate::series::{derive, ChartKind, DerivedSeries};
use crate::zones::{compute_ticks, format_decimal, ZoneThresholds};

/// The latest defined value, annotated at the right edge of the chart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CurrentValue {
    pub date: NaiveDate,
    pub value: f64,
    pub label: String,
    pub zone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChartPayload {
    pub kind: ChartKind,
    pub series: DerivedSeries,
    pub ticks: Vec<f64>,
    pub tick_labels: Vec<String>,
    pub zones: ZoneThresholds,
    pub x_domain: (NaiveDate, NaiveDate),
    pub y_domain: (f64, f64),
    pub current_value: Option<CurrentValue>,
}

impl ChartPayload {
    /// Assemble a payload for `series`.
    ///
    /// Returns `Unavailable` when the series is empty or has no defined
    /// value: without a y-domain there is nothing to tick.
    pub fn from_series(
        kind: ChartKind,
        series: DerivedSeries,
        zones: &ZoneThresholds,
        end_date: Option<NaiveDate>,
    ) -> Result<Availability<Self>> {
        let dates = series.dates();
        let (Some(&first), Some(&last), Some(y_domain)) =
            (dates.first(), dates.last(), series.extent())
        else {
            return Ok(Availability::Unavailable);
        };

        // Not `clamp`: deserialized series may carry unordered dates.
        let x_end = match end_date {
            Some(end) => end.max(first).min(last),
            None => last,
        };

        let ticks = compute_ticks(y_domain.0, y_domain.1, zones)?;
        let tick_labels = ticks.iter().map(|t| format_decimal(*t)).collect();

        let current_value = match series.last_defined() {
            Some((date, value)) => Some(CurrentValue {
                date,
                value,
                label: format_decimal(value),
                zone: zones.classify(value)?.to_string(),
            }),
            None => None,
        };

        Ok(Availability::Available(Self {
            kind,
            series,
            ticks,
            tick_labels,
            zones: zones.clone(),
            x_domain: (first, x_end),
            y_domain,
            current_value,
        }))
    }

    /// Zone label for a value on this chart's metric.
    pub fn zone_label_at(&self, value: f64) -> Result<&str> {
        self.zones.classify(value)
    }
}

/// Payloads for the three product charts of one scenario.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChartSet {
    pub rt: Availability<ChartPayload>,
    pub positive_tests: Availability<ChartPayload>,
    pub icu_utilization: Availability<ChartPayload>,
}

impl ChartSet {
    pub fn unavailable() -> Self {
        Self {
            rt: Availability::Unavailable,
            positive_tests: Availability::Unavailable,
            icu_utilization: Availability::Unavailable,
        }
    }

    pub fn get(&self, kind: ChartKind) -> &Availability<ChartPayload> {
        match kind {
            ChartKind::Rt => &self.rt,
            ChartKind::PositiveTests => &self.positive_tests,
            ChartKind::IcuUtilization => &self.icu_utilization,
        }
    }
}

/// Build all chart payloads for a scenario.
///
/// # Errors
///
/// Propagates `ChartError::OutOfRange` from tick computation; this only
/// happens for non-finite values that slipped past projection validation.
pub fn build_charts(model: Availability<&ScenarioModel>, config: &ChartConfig) -> Result<ChartSet> {
    let Availability::Available(model) = model else {
        for kind in ChartKind::ALL {
            obs::emit_chart_unavailable(kind, "scenario unavailable");
        }
        return Ok(ChartSet::unavailable());
    };

    let chart = |kind: ChartKind| -> Result<Availability<ChartPayload>> {
        let series = derive(model, kind.spec());
        let payload =
            ChartPayload::from_series(kind, series, config.zones_for(kind), config.end_date)?;
        match &payload {
            Availability::Available(p) => obs::emit_chart_derived(kind, p.series.len(), p.ticks.len()),
            Availability::Unavailable => obs::emit_chart_unavailable(kind, "no defined values"),
        }
        Ok(payload)
    };

    Ok(ChartSet {
        rt: chart(ChartKind::Rt)?,
        positive_tests: chart(ChartKind::PositiveTests)?,
        icu_utilization: chart(ChartKind::IcuUtilization)?,
    })
}
