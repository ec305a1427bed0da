//! Static chart configuration: policy table, zone tables, horizons.
//!
//! Configuration is JSON and every field is optional; missing fields fall
//! back to the builtin tables. Tables are validated on load.

use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::error::{ChartError, Result};
use crate::domain::PolicyTable;
use crate::series::ChartKind;
use crate::zones::{ZoneTables, ZoneThresholds};

/// Default outcome horizon, in days from the projection start.
pub const DEFAULT_HORIZON_DAYS: i64 = 100;

fn default_horizon_days() -> i64 {
    DEFAULT_HORIZON_DAYS
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChartConfig {
    #[serde(default)]
    pub policies: PolicyTable,

    #[serde(default)]
    pub zones: ZoneTables,

    #[serde(default = "default_horizon_days")]
    pub horizon_days: i64,

    /// Caps the right end of every chart's x-domain.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            policies: PolicyTable::standard(),
            zones: ZoneTables::standard(),
            horizon_days: DEFAULT_HORIZON_DAYS,
            end_date: None,
        }
    }
}

impl ChartConfig {
    /// Parse and validate configuration from a JSON string.
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let config: ChartConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Read configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<()> {
        self.policies.validate()?;
        if self.horizon_days < 0 {
            return Err(ChartError::Config(format!(
                "horizon_days must not be negative, got {}",
                self.horizon_days
            )));
        }
        Ok(())
    }

    pub fn zones_for(&self, kind: ChartKind) -> &ZoneThresholds {
        match kind {
            ChartKind::Rt => &self.zones.rt,
            ChartKind::PositiveTests => &self.zones.positive_tests,
            ChartKind::IcuUtilization => &self.zones.icu_utilization,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::InterventionKind;

    #[test]
    fn test_empty_json_is_default() {
        let config = ChartConfig::from_json_str("{}").expect("parse");
        assert_eq!(config, ChartConfig::default());
        assert_eq!(config.horizon_days, 100);
    }

    #[test]
    fn test_partial_override() {
        let raw = r#"{
            "horizon_days": 30,
            "end_date": "2020-05-15",
            "zones": {
                "rt": [
                    { "lower_bound": 0.0, "label": "low" },
                    { "lower_bound": 1.0, "label": "high" }
                ],
                "positive_tests": [{ "lower_bound": 0.0, "label": "any" }],
                "icu_utilization": [{ "lower_bound": 0.0, "label": "any" }]
            }
        }"#;
        let config = ChartConfig::from_json_str(raw).expect("parse");

        assert_eq!(config.horizon_days, 30);
        assert_eq!(config.end_date, NaiveDate::from_ymd_opt(2020, 5, 15));
        assert_eq!(config.zones_for(ChartKind::Rt).zones().len(), 2);
        assert_eq!(config.policies.contain.kind, InterventionKind::Lockdown);
    }

    #[test]
    fn test_invalid_zone_table_rejected() {
        let raw = r#"{ "zones": {
            "rt": [],
            "positive_tests": [{ "lower_bound": 0.0, "label": "any" }],
            "icu_utilization": [{ "lower_bound": 0.0, "label": "any" }]
        } }"#;
        assert!(matches!(
            ChartConfig::from_json_str(raw).unwrap_err(),
            ChartError::Serialization(_)
        ));
    }

    #[test]
    fn test_invalid_policy_rejected() {
        let raw = r#"{ "policies": {
            "baseline": { "kind": "limited_action", "r0": -2.4 },
            "strict_distancing": { "kind": "shelter_in_place", "r0": 1.2, "duration_days": 90 },
            "weak_distancing": { "kind": "social_distancing", "r0": 1.7, "duration_days": 90 },
            "contain": { "kind": "lockdown", "r0": 0.3, "duration_days": 90 }
        } }"#;
        assert!(matches!(
            ChartConfig::from_json_str(raw).unwrap_err(),
            ChartError::InvalidPolicy(_)
        ));
    }

    #[test]
    fn test_negative_horizon_rejected() {
        let err = ChartConfig::from_json_str(r#"{ "horizon_days": -1 }"#).unwrap_err();
        assert!(matches!(err, ChartError::Config(_)));
    }
}
