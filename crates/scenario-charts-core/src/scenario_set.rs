//! Intervention scenario set construction.
//!
//! Builds the four named scenarios (baseline, weak distancing, strict
//! distancing, contain) from a raw bundle. The set is all-or-nothing: any
//! missing, error-flagged, malformed, or invalid slot makes the whole set
//! [`Availability::Unavailable`].

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::domain::{Availability, PolicyTable, RawProjection, ScenarioSlot};
use crate::model::ScenarioModel;
use crate::obs;

/// The `{"error": true}` marker the fetch layer sends for failed datasets.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorMarker {
    pub error: bool,
}

/// One scenario's raw data, the marker for a failed fetch, or an entry
/// that does not parse as either.
///
/// Deserializing a `BundleEntry` never fails: a truthy `error` field makes
/// it `Failed`, a parseable projection makes it `Projection`, and anything
/// else is kept verbatim as `Malformed`.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum BundleEntry {
    Failed(ErrorMarker),
    Projection(RawProjection),
    Malformed(Value),
}

impl BundleEntry {
    pub fn from_value(value: Value) -> Self {
        if value.get("error").is_some_and(is_truthy) {
            return BundleEntry::Failed(ErrorMarker { error: true });
        }
        match RawProjection::deserialize(&value) {
            Ok(projection) => BundleEntry::Projection(projection),
            Err(_) => BundleEntry::Malformed(value),
        }
    }
}

impl<'de> Deserialize<'de> for BundleEntry {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(BundleEntry::from_value)
    }
}

/// Truthiness of the fetch layer's `error` flag.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn malformed_reason(raw: &Value) -> String {
    match RawProjection::deserialize(raw) {
        Ok(_) => "malformed".to_string(),
        Err(e) => format!("malformed: {}", e),
    }
}

/// Raw datasets for one location, keyed by scenario.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RawBundle {
    #[serde(default)]
    pub baseline: Option<BundleEntry>,
    #[serde(default)]
    pub strict_distancing_now: Option<BundleEntry>,
    #[serde(default)]
    pub weak_distancing_now: Option<BundleEntry>,
    #[serde(default)]
    pub contain_now: Option<BundleEntry>,
}

impl RawBundle {
    pub fn entry(&self, slot: ScenarioSlot) -> Option<&BundleEntry> {
        match slot {
            ScenarioSlot::Baseline => self.baseline.as_ref(),
            ScenarioSlot::WeakDistancing => self.weak_distancing_now.as_ref(),
            ScenarioSlot::StrictDistancing => self.strict_distancing_now.as_ref(),
            ScenarioSlot::Contain => self.contain_now.as_ref(),
        }
    }
}

/// A scenario with a current-policy ("now") variant.
#[derive(Debug, Clone, PartialEq)]
pub struct TimedScenario {
    pub now: ScenarioModel,
}

/// The fully populated set of intervention scenarios.
#[derive(Debug, Clone, PartialEq)]
pub struct InterventionScenarioSet {
    pub baseline: ScenarioModel,
    pub distancing: TimedScenario,
    pub distancing_poor_enforcement: TimedScenario,
    pub contain: TimedScenario,
}

impl InterventionScenarioSet {
    /// Build the set with the fixed policy table.
    pub fn build(bundle: Option<&RawBundle>) -> Availability<Self> {
        Self::build_with_policy(bundle, &PolicyTable::standard())
    }

    /// Build the set with an explicit (versioned) policy table.
    pub fn build_with_policy(bundle: Option<&RawBundle>, policy: &PolicyTable) -> Availability<Self> {
        let Some(bundle) = bundle else {
            obs::emit_scenario_set_unavailable(None, "bundle absent");
            return Availability::Unavailable;
        };

        let set = assemble(bundle, policy);
        if let Some(set) = &set {
            obs::emit_scenario_set_built(set.baseline.start_date(), set.baseline.records().len());
        }
        set.into()
    }

    pub fn model(&self, slot: ScenarioSlot) -> &ScenarioModel {
        match slot {
            ScenarioSlot::Baseline => &self.baseline,
            ScenarioSlot::WeakDistancing => &self.distancing_poor_enforcement.now,
            ScenarioSlot::StrictDistancing => &self.distancing.now,
            ScenarioSlot::Contain => &self.contain.now,
        }
    }

    /// Scenarios in display order.
    pub fn iter(&self) -> impl Iterator<Item = (ScenarioSlot, &ScenarioModel)> {
        ScenarioSlot::ALL
            .into_iter()
            .map(move |slot| (slot, self.model(slot)))
    }
}

fn assemble(bundle: &RawBundle, policy: &PolicyTable) -> Option<InterventionScenarioSet> {
    Some(InterventionScenarioSet {
        baseline: slot_model(bundle, policy, ScenarioSlot::Baseline)?,
        distancing: TimedScenario {
            now: slot_model(bundle, policy, ScenarioSlot::StrictDistancing)?,
        },
        distancing_poor_enforcement: TimedScenario {
            now: slot_model(bundle, policy, ScenarioSlot::WeakDistancing)?,
        },
        contain: TimedScenario {
            now: slot_model(bundle, policy, ScenarioSlot::Contain)?,
        },
    })
}

fn slot_model(bundle: &RawBundle, policy: &PolicyTable, slot: ScenarioSlot) -> Option<ScenarioModel> {
    match bundle.entry(slot) {
        None => {
            obs::emit_scenario_set_unavailable(Some(slot), "missing");
            None
        }
        Some(BundleEntry::Failed(_)) => {
            obs::emit_scenario_set_unavailable(Some(slot), "error-flagged");
            None
        }
        Some(BundleEntry::Malformed(raw)) => {
            obs::emit_scenario_set_unavailable(Some(slot), &malformed_reason(raw));
            None
        }
        Some(BundleEntry::Projection(projection)) => {
            match ScenarioModel::new(projection.clone(), policy.params(slot)) {
                Ok(model) => Some(model),
                Err(e) => {
                    obs::emit_scenario_set_unavailable(Some(slot), &e.to_string());
                    None
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{InterventionKind, Metric, RawRecord};
    use chrono::NaiveDate;
    use serde_json::json;

    fn projection() -> RawProjection {
        let day = |d| NaiveDate::from_ymd_opt(2020, 4, d).expect("valid date");
        RawProjection::new(vec![
            RawRecord::new(day(1)).with(Metric::Rt, 2.0),
            RawRecord::new(day(2)).with(Metric::Rt, 1.5),
        ])
    }

    fn full_bundle() -> RawBundle {
        RawBundle {
            baseline: Some(BundleEntry::Projection(projection())),
            strict_distancing_now: Some(BundleEntry::Projection(projection())),
            weak_distancing_now: Some(BundleEntry::Projection(projection())),
            contain_now: Some(BundleEntry::Projection(projection())),
        }
    }

    #[test]
    fn test_full_bundle_builds_all_slots() {
        let set = InterventionScenarioSet::build(Some(&full_bundle()))
            .available()
            .expect("set available");

        assert_eq!(set.baseline.params().kind, InterventionKind::LimitedAction);
        assert_eq!(set.distancing.now.params().kind, InterventionKind::ShelterInPlace);
        assert_eq!(
            set.distancing_poor_enforcement.now.params().kind,
            InterventionKind::SocialDistancing
        );
        assert_eq!(set.contain.now.params().kind, InterventionKind::Lockdown);
        assert_eq!(set.contain.now.params().r0, 0.3);
    }

    #[test]
    fn test_absent_bundle_unavailable() {
        assert_eq!(InterventionScenarioSet::build(None), Availability::Unavailable);
    }

    #[test]
    fn test_missing_contain_unavailable() {
        let mut bundle = full_bundle();
        bundle.contain_now = None;
        assert_eq!(
            InterventionScenarioSet::build(Some(&bundle)),
            Availability::Unavailable
        );
    }

    #[test]
    fn test_error_flag_in_any_slot_unavailable() {
        for slot in ScenarioSlot::ALL {
            let mut bundle = full_bundle();
            let marker = Some(BundleEntry::Failed(ErrorMarker { error: true }));
            match slot {
                ScenarioSlot::Baseline => bundle.baseline = marker,
                ScenarioSlot::WeakDistancing => bundle.weak_distancing_now = marker,
                ScenarioSlot::StrictDistancing => bundle.strict_distancing_now = marker,
                ScenarioSlot::Contain => bundle.contain_now = marker,
            }
            assert!(
                !InterventionScenarioSet::build(Some(&bundle)).is_available(),
                "slot {} should make the set unavailable",
                slot
            );
        }
    }

    #[test]
    fn test_invalid_projection_slot_unavailable() {
        let mut bundle = full_bundle();
        bundle.weak_distancing_now = Some(BundleEntry::Projection(RawProjection::default()));
        assert!(!InterventionScenarioSet::build(Some(&bundle)).is_available());
    }

    #[test]
    fn test_bundle_json_shape() {
        let records = json!({ "records": [
            { "date": "2020-04-01", "rt": 2.0 },
            { "date": "2020-04-02", "rt": 1.5 }
        ]});
        let raw = json!({
            "baseline": records,
            "strictDistancingNow": records,
            "weakDistancingNow": { "error": true },
            "containNow": records
        });
        let bundle: RawBundle = serde_json::from_value(raw).expect("deserialize bundle");

        assert!(matches!(bundle.baseline, Some(BundleEntry::Projection(_))));
        assert!(matches!(
            bundle.weak_distancing_now,
            Some(BundleEntry::Failed(ErrorMarker { error: true }))
        ));
        assert!(!InterventionScenarioSet::build(Some(&bundle)).is_available());
    }

    #[test]
    fn test_malformed_slot_parses_and_rejects_set() {
        let records = json!({ "records": [
            { "date": "2020-04-01", "rt": 2.0 },
            { "date": "2020-04-02", "rt": 1.5 }
        ]});
        let raw = json!({
            "baseline": records,
            "strictDistancingNow": records,
            "weakDistancingNow": records,
            "containNow": { "records": [
                { "date": "2020-04-01", "rt": "n/a" },
                { "date": "2020-04-02", "rt": 1.5 }
            ]}
        });
        let bundle: RawBundle = serde_json::from_value(raw).expect("deserialize bundle");

        assert!(matches!(bundle.baseline, Some(BundleEntry::Projection(_))));
        assert!(matches!(bundle.contain_now, Some(BundleEntry::Malformed(_))));
        assert_eq!(
            InterventionScenarioSet::build(Some(&bundle)),
            Availability::Unavailable
        );
    }

    #[test]
    fn test_error_false_with_records_is_projection() {
        let records = json!({
            "error": false,
            "records": [
                { "date": "2020-04-01", "rt": 2.0 },
                { "date": "2020-04-02", "rt": 1.5 }
            ]
        });
        let raw = json!({
            "baseline": records,
            "strictDistancingNow": records,
            "weakDistancingNow": records,
            "containNow": records
        });
        let bundle: RawBundle = serde_json::from_value(raw).expect("deserialize bundle");

        assert!(matches!(bundle.contain_now, Some(BundleEntry::Projection(_))));
        assert!(InterventionScenarioSet::build(Some(&bundle)).is_available());
    }

    #[test]
    fn test_truthy_error_flag_wins_over_records() {
        let entry = BundleEntry::from_value(json!({
            "error": 1,
            "records": [
                { "date": "2020-04-01", "rt": 2.0 },
                { "date": "2020-04-02", "rt": 1.5 }
            ]
        }));
        assert_eq!(entry, BundleEntry::Failed(ErrorMarker { error: true }));

        let entry = BundleEntry::from_value(json!({ "error": false }));
        assert!(matches!(entry, BundleEntry::Malformed(_)));
    }

    #[test]
    fn test_missing_json_field_is_absent() {
        let bundle: RawBundle = serde_json::from_value(json!({})).expect("deserialize");
        assert!(bundle.entry(ScenarioSlot::Contain).is_none());
    }

    #[test]
    fn test_iter_display_order() {
        let set = InterventionScenarioSet::build(Some(&full_bundle()))
            .available()
            .expect("set available");
        let kinds: Vec<_> = set.iter().map(|(_, m)| m.params().kind).collect();
        assert_eq!(
            kinds,
            vec![
                InterventionKind::LimitedAction,
                InterventionKind::SocialDistancing,
                InterventionKind::ShelterInPlace,
                InterventionKind::Lockdown,
            ]
        );
    }
}
