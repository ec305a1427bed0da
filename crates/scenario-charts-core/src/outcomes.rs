//! Predicted outcomes per scenario at a fixed horizon.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::error::Result;
use crate::domain::{InterventionKind, ScenarioSlot};
use crate::model::OutcomeSummary;
use crate::scenario_set::InterventionScenarioSet;

/// One row of the outcomes table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutcomeRow {
    pub slot: ScenarioSlot,
    pub intervention: InterventionKind,
    pub r0: f64,
    pub duration_days: Option<u32>,
    pub date_overwhelmed: Option<NaiveDate>,
    pub outcome: OutcomeSummary,

    /// The location's current policy matches this row's intervention.
    pub is_current: bool,
}

/// Outcome rows in display order: baseline, weak distancing, strict
/// distancing, contain.
///
/// # Errors
///
/// Propagates `ChartError::HorizonUnreachable` for a negative horizon.
pub fn outcomes_table(
    set: &InterventionScenarioSet,
    horizon_days: i64,
    current: Option<InterventionKind>,
) -> Result<Vec<OutcomeRow>> {
    set.iter()
        .map(|(slot, model)| {
            let params = model.params();
            Ok(OutcomeRow {
                slot,
                intervention: params.kind,
                r0: params.r0,
                duration_days: params.duration_days,
                date_overwhelmed: model.date_overwhelmed(),
                outcome: model.outcomes_at_horizon(horizon_days)?,
                is_current: current == Some(params.kind),
            })
        })
        .collect()
}
