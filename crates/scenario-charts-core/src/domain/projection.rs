//! Raw per-day projection records as delivered by the data fetch layer.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::error::{ChartError, Result};

/// Metric names read by the core.
///
/// Raw records may carry other names; those are kept and reachable through
/// [`RawRecord::value`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Rt,
    RtLow,
    RtHigh,
    TestPositiveRate,
    IcuOccupancy,
    IcuCapacity,
    IcuUtilization,
    CumulativeInfected,
    CumulativeDeaths,
}

impl Metric {
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Rt => "rt",
            Metric::RtLow => "rt_low",
            Metric::RtHigh => "rt_high",
            Metric::TestPositiveRate => "test_positive_rate",
            Metric::IcuOccupancy => "icu_occupancy",
            Metric::IcuCapacity => "icu_capacity",
            Metric::IcuUtilization => "icu_utilization",
            Metric::CumulativeInfected => "cumulative_infected",
            Metric::CumulativeDeaths => "cumulative_deaths",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One day of a projection.
///
/// Metrics are flattened next to the date in JSON:
/// `{"date": "2020-04-01", "rt": 1.4, "icu_occupancy": null}`.
/// A `null` or missing metric is a gap.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawRecord {
    pub date: NaiveDate,

    #[serde(flatten)]
    pub metrics: BTreeMap<String, Option<f64>>,
}

impl RawRecord {
    /// Create a record with no metrics.
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            metrics: BTreeMap::new(),
        }
    }

    /// Set a metric value (builder pattern).
    pub fn with(mut self, metric: Metric, value: f64) -> Self {
        self.metrics.insert(metric.as_str().to_string(), Some(value));
        self
    }

    /// Look up a metric by its raw name.
    pub fn value(&self, name: &str) -> Option<f64> {
        self.metrics.get(name).copied().flatten()
    }

    pub fn metric(&self, metric: Metric) -> Option<f64> {
        self.value(metric.as_str())
    }
}

/// An ordered sequence of daily records. Read-only to the core.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RawProjection {
    pub records: Vec<RawRecord>,
}

impl RawProjection {
    pub fn new(records: Vec<RawRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn first(&self) -> Option<&RawRecord> {
        self.records.first()
    }

    pub fn last(&self) -> Option<&RawRecord> {
        self.records.last()
    }

    /// Check the shape every derivation relies on.
    ///
    /// # Errors
    ///
    /// `ChartError::InvalidProjection` when there are fewer than two records,
    /// dates are not strictly increasing, or a present value is not finite.
    pub fn validate(&self) -> Result<()> {
        if self.records.len() < 2 {
            return Err(ChartError::InvalidProjection(format!(
                "need at least 2 records, got {}",
                self.records.len()
            )));
        }

        for pair in self.records.windows(2) {
            if pair[1].date <= pair[0].date {
                return Err(ChartError::InvalidProjection(format!(
                    "dates must be strictly increasing: {} follows {}",
                    pair[1].date, pair[0].date
                )));
            }
        }

        for record in &self.records {
            for (name, value) in &record.metrics {
                if let Some(v) = value {
                    if !v.is_finite() {
                        return Err(ChartError::InvalidProjection(format!(
                            "metric '{}' on {} is not finite",
                            name, record.date
                        )));
                    }
                }
            }
        }

        Ok(())
    }
}
