//! Scenario model: a validated projection paired with its intervention.
//!
//! A [`ScenarioModel`] is immutable once built. Derived values are pure
//! functions of the projection and parameters, so two models built from the
//! same input always agree.

use std::collections::BTreeMap;

use chrono::{NaiveDate, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::digest::projection_digest;
use crate::domain::error::{ChartError, Result};
use crate::domain::{InterventionParams, Metric, RawProjection, RawRecord};

/// Outcome snapshot at a time horizon.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutcomeSummary {
    /// Date of the record the summary was taken from.
    pub date: NaiveDate,

    /// Days between the projection start and `date`.
    pub days_from_start: i64,

    /// True when the requested horizon lay beyond the projection and the
    /// last record was used instead.
    pub clamped: bool,

    /// Metrics defined on the record.
    pub metrics: BTreeMap<String, f64>,
}

impl OutcomeSummary {
    fn from_record(record: &RawRecord, start: NaiveDate, clamped: bool) -> Self {
        let metrics = record
            .metrics
            .iter()
            .filter_map(|(name, value)| value.map(|v| (name.clone(), v)))
            .collect();
        Self {
            date: record.date,
            days_from_start: (record.date - start).num_days(),
            clamped,
            metrics,
        }
    }

    pub fn get(&self, metric: Metric) -> Option<f64> {
        self.metrics.get(metric.as_str()).copied()
    }
}

/// A raw projection together with the intervention it models.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioModel {
    params: InterventionParams,
    projection: RawProjection,
    start_date: NaiveDate,
    end_date: NaiveDate,
    date_overwhelmed: Option<NaiveDate>,
}

impl ScenarioModel {
    /// Validate the projection and compute derived values.
    ///
    /// # Errors
    ///
    /// - `ChartError::InvalidProjection` for an empty, single-record,
    ///   unordered, or non-finite projection.
    /// - `ChartError::InvalidPolicy` for out-of-range parameters.
    pub fn new(projection: RawProjection, params: InterventionParams) -> Result<Self> {
        projection.validate()?;
        params.validate()?;

        let (start_date, end_date) = match (projection.first(), projection.last()) {
            (Some(first), Some(last)) => (first.date, last.date),
            _ => {
                return Err(ChartError::InvalidProjection(
                    "projection has no records".to_string(),
                ))
            }
        };
        let date_overwhelmed = first_overwhelmed(&projection);

        Ok(Self {
            params,
            projection,
            start_date,
            end_date,
            date_overwhelmed,
        })
    }

    pub fn params(&self) -> &InterventionParams {
        &self.params
    }

    pub fn projection(&self) -> &RawProjection {
        &self.projection
    }

    pub fn records(&self) -> &[RawRecord] {
        &self.projection.records
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    /// First date ICU occupancy exceeds ICU capacity, if ever.
    ///
    /// Records missing either metric are skipped.
    pub fn date_overwhelmed(&self) -> Option<NaiveDate> {
        self.date_overwhelmed
    }

    /// Outcome at `start_date + days`.
    ///
    /// When no record falls exactly on the target date the latest record
    /// before it is used. A horizon past the end of the projection clamps to
    /// the last record.
    ///
    /// # Errors
    ///
    /// `ChartError::HorizonUnreachable` when no record is on or before the
    /// target date (a negative horizon).
    pub fn outcomes_at_horizon(&self, days: i64) -> Result<OutcomeSummary> {
        let unreachable = ChartError::HorizonUnreachable {
            days,
            start: self.start_date,
        };
        if days < 0 {
            return Err(unreachable);
        }

        // Overflowing targets lie past any real projection.
        let target = TimeDelta::try_days(days).and_then(|d| self.start_date.checked_add_signed(d));
        let (record, clamped) = match target {
            Some(target) => (
                self.records().iter().take_while(|r| r.date <= target).last(),
                target > self.end_date,
            ),
            None => (self.projection.last(), true),
        };

        record
            .map(|r| OutcomeSummary::from_record(r, self.start_date, clamped))
            .ok_or(unreachable)
    }

    /// Content digest of the underlying projection.
    pub fn projection_digest(&self) -> Result<String> {
        projection_digest(&self.projection)
    }
}

fn first_overwhelmed(projection: &RawProjection) -> Option<NaiveDate> {
    projection.records.iter().find_map(|record| {
        match (
            record.metric(Metric::IcuOccupancy),
            record.metric(Metric::IcuCapacity),
        ) {
            (Some(occupancy), Some(capacity)) if occupancy > capacity => Some(record.date),
            _ => None,
        }
    })
}
