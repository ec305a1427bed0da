//! Intervention policies and the fixed policy table.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::{ChartError, Result};

/// A public-health policy affecting transmission.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum InterventionKind {
    LimitedAction,
    SocialDistancing,
    ShelterInPlace,
    Lockdown,
}

impl InterventionKind {
    pub fn label(&self) -> &'static str {
        match self {
            InterventionKind::LimitedAction => "Limited Action",
            InterventionKind::SocialDistancing => "Social Distancing",
            InterventionKind::ShelterInPlace => "Shelter in Place",
            InterventionKind::Lockdown => "Lockdown",
        }
    }
}

impl fmt::Display for InterventionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Parameters a projection was run under.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct InterventionParams {
    pub kind: InterventionKind,

    /// Reproduction number under this intervention.
    pub r0: f64,

    /// How long the intervention is held, if bounded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_days: Option<u32>,
}

impl InterventionParams {
    pub fn new(kind: InterventionKind, r0: f64, duration_days: Option<u32>) -> Self {
        Self {
            kind,
            r0,
            duration_days,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.r0.is_finite() || self.r0 < 0.0 {
            return Err(ChartError::InvalidPolicy(format!(
                "{}: r0 must be a finite non-negative number, got {}",
                self.kind, self.r0
            )));
        }
        if self.duration_days == Some(0) {
            return Err(ChartError::InvalidPolicy(format!(
                "{}: duration must be positive when set",
                self.kind
            )));
        }
        Ok(())
    }
}

/// The four positions of an intervention scenario set, in display order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioSlot {
    Baseline,
    WeakDistancing,
    StrictDistancing,
    Contain,
}

impl ScenarioSlot {
    pub const ALL: [ScenarioSlot; 4] = [
        ScenarioSlot::Baseline,
        ScenarioSlot::WeakDistancing,
        ScenarioSlot::StrictDistancing,
        ScenarioSlot::Contain,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ScenarioSlot::Baseline => "baseline",
            ScenarioSlot::WeakDistancing => "weak_distancing",
            ScenarioSlot::StrictDistancing => "strict_distancing",
            ScenarioSlot::Contain => "contain",
        }
    }

    /// Field name of this slot in the raw bundle.
    pub fn bundle_key(&self) -> &'static str {
        match self {
            ScenarioSlot::Baseline => "baseline",
            ScenarioSlot::WeakDistancing => "weakDistancingNow",
            ScenarioSlot::StrictDistancing => "strictDistancingNow",
            ScenarioSlot::Contain => "containNow",
        }
    }
}

impl fmt::Display for ScenarioSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Intervention parameters per scenario slot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PolicyTable {
    pub baseline: InterventionParams,
    pub strict_distancing: InterventionParams,
    pub weak_distancing: InterventionParams,
    pub contain: InterventionParams,
}

impl PolicyTable {
    /// The product's fixed policy definitions.
    pub fn standard() -> Self {
        Self {
            baseline: InterventionParams::new(InterventionKind::LimitedAction, 2.4, None),
            strict_distancing: InterventionParams::new(
                InterventionKind::ShelterInPlace,
                1.2,
                Some(90),
            ),
            weak_distancing: InterventionParams::new(
                InterventionKind::SocialDistancing,
                1.7,
                Some(90),
            ),
            contain: InterventionParams::new(InterventionKind::Lockdown, 0.3, Some(90)),
        }
    }

    pub fn params(&self, slot: ScenarioSlot) -> InterventionParams {
        match slot {
            ScenarioSlot::Baseline => self.baseline,
            ScenarioSlot::WeakDistancing => self.weak_distancing,
            ScenarioSlot::StrictDistancing => self.strict_distancing,
            ScenarioSlot::Contain => self.contain,
        }
    }

    pub fn validate(&self) -> Result<()> {
        for slot in ScenarioSlot::ALL {
            self.params(slot).validate()?;
        }
        Ok(())
    }
}

impl Default for PolicyTable {
    fn default() -> Self {
        Self::standard()
    }
}
