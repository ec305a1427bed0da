//! Zone classification and zone-aligned axis ticks.
//!
//! A [`ZoneThresholds`] table splits a metric's range into contiguous,
//! labeled bands. Values are classified into the band with the greatest
//! lower bound not above them; values below the lowest bound fall into the
//! lowest band. Axis ticks are built from the band boundaries so that grid
//! lines line up with zone shading.

use serde::{Deserialize, Serialize};

use crate::domain::error::{ChartError, Result};

/// One band of a zone table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Zone {
    pub lower_bound: f64,
    pub label: String,
}

impl Zone {
    pub fn new(lower_bound: f64, label: impl Into<String>) -> Self {
        Self {
            lower_bound,
            label: label.into(),
        }
    }
}

/// Ordered zone bands with strictly increasing lower bounds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "Vec<Zone>", into = "Vec<Zone>")]
pub struct ZoneThresholds {
    zones: Vec<Zone>,
}

impl ZoneThresholds {
    /// # Errors
    ///
    /// `ChartError::InvalidThresholds` for an empty table, a non-finite
    /// bound, or bounds that are not strictly increasing.
    pub fn new(zones: Vec<Zone>) -> Result<Self> {
        if zones.is_empty() {
            return Err(ChartError::InvalidThresholds(
                "at least one zone is required".to_string(),
            ));
        }
        if let Some(zone) = zones.iter().find(|z| !z.lower_bound.is_finite()) {
            return Err(ChartError::InvalidThresholds(format!(
                "zone '{}' has a non-finite lower bound",
                zone.label
            )));
        }
        for pair in zones.windows(2) {
            if pair[1].lower_bound <= pair[0].lower_bound {
                return Err(ChartError::InvalidThresholds(format!(
                    "bounds must be strictly increasing: '{}' ({}) follows '{}' ({})",
                    pair[1].label, pair[1].lower_bound, pair[0].label, pair[0].lower_bound
                )));
            }
        }
        Ok(Self { zones })
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn boundaries(&self) -> impl Iterator<Item = f64> + '_ {
        self.zones.iter().map(|z| z.lower_bound)
    }

    /// Index of the band containing `value`.
    pub fn classify_index(&self, value: f64) -> Result<usize> {
        if !value.is_finite() {
            return Err(ChartError::OutOfRange { value });
        }
        let above = self.zones.partition_point(|z| z.lower_bound <= value);
        Ok(above.saturating_sub(1))
    }

    /// Label of the band containing `value`.
    pub fn classify(&self, value: f64) -> Result<&str> {
        let index = self.classify_index(value)?;
        Ok(self.zones[index].label.as_str())
    }
}

impl TryFrom<Vec<Zone>> for ZoneThresholds {
    type Error = ChartError;

    fn try_from(zones: Vec<Zone>) -> Result<Self> {
        Self::new(zones)
    }
}

impl From<ZoneThresholds> for Vec<Zone> {
    fn from(thresholds: ZoneThresholds) -> Self {
        thresholds.zones
    }
}

/// Classify `value` against `thresholds`.
///
/// # Errors
///
/// `ChartError::OutOfRange` when `value` is NaN or infinite.
pub fn classify(value: f64, thresholds: &ZoneThresholds) -> Result<&str> {
    thresholds.classify(value)
}

/// Axis ticks for the domain `[min, max]`.
///
/// Returns `min`, every zone boundary strictly inside the domain, and `max`,
/// strictly increasing. A flat domain yields a single tick. A reversed
/// domain is treated as `[max, min]`.
///
/// # Errors
///
/// `ChartError::OutOfRange` when either end is not finite.
pub fn compute_ticks(min: f64, max: f64, thresholds: &ZoneThresholds) -> Result<Vec<f64>> {
    for value in [min, max] {
        if !value.is_finite() {
            return Err(ChartError::OutOfRange { value });
        }
    }
    let (min, max) = if min <= max { (min, max) } else { (max, min) };
    if min == max {
        return Ok(vec![min]);
    }

    let mut ticks = vec![min];
    ticks.extend(thresholds.boundaries().filter(|b| *b > min && *b < max));
    ticks.push(max);
    Ok(ticks)
}

/// Format a value for axis and annotation labels: at most two decimals,
/// trailing zeros dropped.
pub fn format_decimal(value: f64) -> String {
    let fixed = format!("{:.2}", value);
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Zone tables for each chart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ZoneTables {
    pub rt: ZoneThresholds,
    pub positive_tests: ZoneThresholds,
    pub icu_utilization: ZoneThresholds,
}

impl ZoneTables {
    /// Builtin tables.
    pub fn standard() -> Self {
        Self {
            rt: ZoneThresholds {
                zones: vec![
                    Zone::new(0.0, "low"),
                    Zone::new(0.9, "medium"),
                    Zone::new(1.2, "high"),
                ],
            },
            positive_tests: ZoneThresholds {
                zones: vec![
                    Zone::new(0.0, "low"),
                    Zone::new(0.03, "medium"),
                    Zone::new(0.10, "high"),
                ],
            },
            icu_utilization: ZoneThresholds {
                zones: vec![
                    Zone::new(0.0, "low"),
                    Zone::new(0.5, "medium"),
                    Zone::new(0.7, "high"),
                ],
            },
        }
    }
}

impl Default for ZoneTables {
    fn default() -> Self {
        Self::standard()
    }
}
