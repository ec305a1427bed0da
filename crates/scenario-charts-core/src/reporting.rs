use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::chart::ChartSet;
use crate::domain::{Metric, ScenarioSlot};
use crate::outcomes::OutcomeRow;
use crate::zones::format_decimal;

pub const CHART_REPORT_SCHEMA_VERSION: &str = "1.0";

/// Chart payloads for one scenario, as written for the rendering layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChartReport {
    pub schema_version: String,
    pub generated_at: DateTime<Utc>,
    pub scenario: ScenarioSlot,
    pub projection_digest: Option<String>,
    pub charts: ChartSet,
}

impl ChartReport {
    pub fn new(scenario: ScenarioSlot, projection_digest: Option<String>, charts: ChartSet) -> Self {
        Self {
            schema_version: CHART_REPORT_SCHEMA_VERSION.to_string(),
            generated_at: Utc::now(),
            scenario,
            projection_digest,
            charts,
        }
    }
}

/// Write the chart report in pretty JSON format.
pub fn write_charts_json(path: &Path, report: &ChartReport) -> Result<()> {
    let content = serde_json::to_string_pretty(report).context("serialize chart report")?;
    std::fs::write(path, content).with_context(|| format!("write {:?}", path))?;
    Ok(())
}

fn metric_cell(row: &OutcomeRow, metric: Metric) -> String {
    row.outcome
        .get(metric)
        .map(|v| format!("{:.0}", v))
        .unwrap_or_else(|| "-".to_string())
}

/// Render the outcomes table as markdown.
///
/// `horizon_days` is the requested horizon. Each row shows the date its
/// outcome was read from, marked when the projection ended before the
/// horizon.
pub fn render_outcomes_md(rows: &[OutcomeRow], horizon_days: i64) -> String {
    let mut out = String::new();
    out.push_str("# Predicted Outcomes\n\n");
    out.push_str(&format!(
        "Outcomes {} days after the start of each projection.\n\n",
        horizon_days
    ));

    out.push_str(
        "| Scenario | R0 | Duration | Hospitals overwhelmed | As of | Infected | Deaths |\n",
    );
    out.push_str("|---|---|---|---|---|---|---|\n");
    for row in rows {
        let name = if row.is_current {
            format!("{} (current)", row.intervention)
        } else {
            row.intervention.to_string()
        };
        let duration = row
            .duration_days
            .map(|d| format!("{} days", d))
            .unwrap_or_else(|| "-".to_string());
        let overwhelmed = row
            .date_overwhelmed
            .map(|d| d.to_string())
            .unwrap_or_else(|| "never".to_string());
        let as_of = if row.outcome.clamped {
            format!("{} (end of projection)", row.outcome.date)
        } else {
            row.outcome.date.to_string()
        };
        out.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} | {} |\n",
            name,
            format_decimal(row.r0),
            duration,
            overwhelmed,
            as_of,
            metric_cell(row, Metric::CumulativeInfected),
            metric_cell(row, Metric::CumulativeDeaths),
        ));
    }
    out
}

/// Write the outcomes markdown table.
pub fn write_outcomes_md(path: &Path, rows: &[OutcomeRow], horizon_days: i64) -> Result<()> {
    let md = render_outcomes_md(rows, horizon_days);
    std::fs::write(path, md).with_context(|| format!("write {:?}", path))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::InterventionKind;
    use crate::model::OutcomeSummary;
    use chrono::NaiveDate;
    use std::collections::BTreeMap;

    fn row(kind: InterventionKind, is_current: bool, clamped: bool) -> OutcomeRow {
        let mut metrics = BTreeMap::new();
        metrics.insert("cumulative_deaths".to_string(), 120.4);
        OutcomeRow {
            slot: ScenarioSlot::Baseline,
            intervention: kind,
            r0: 2.4,
            duration_days: None,
            date_overwhelmed: NaiveDate::from_ymd_opt(2020, 4, 20),
            outcome: OutcomeSummary {
                date: NaiveDate::from_ymd_opt(2020, 7, 10).expect("valid date"),
                days_from_start: 100,
                clamped,
                metrics,
            },
            is_current,
        }
    }

    #[test]
    fn chart_report_schema_has_expected_keys() {
        let report = ChartReport::new(ScenarioSlot::Baseline, None, ChartSet::unavailable());
        let raw = serde_json::to_value(&report).expect("serialize report");
        let obj = raw.as_object().expect("report object");

        for key in ["schema_version", "generated_at", "scenario", "projection_digest", "charts"] {
            assert!(obj.contains_key(key), "missing key: {}", key);
        }
        assert_eq!(raw["charts"]["rt"]["status"], "unavailable");
        assert_eq!(raw["scenario"], "baseline");
    }

    #[test]
    fn write_charts_json_roundtrip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("charts.json");
        let report = ChartReport::new(
            ScenarioSlot::Contain,
            Some("abc".to_string()),
            ChartSet::unavailable(),
        );

        write_charts_json(&path, &report).expect("write report");
        let raw = std::fs::read_to_string(&path).expect("read report");
        let parsed: ChartReport = serde_json::from_str(&raw).expect("parse report");
        assert_eq!(parsed, report);
    }

    #[test]
    fn outcomes_md_contains_rows() {
        let md = render_outcomes_md(
            &[
                row(InterventionKind::LimitedAction, false, false),
                row(InterventionKind::Lockdown, true, false),
            ],
            100,
        );

        assert!(md.contains("# Predicted Outcomes"));
        assert!(md.contains("Outcomes 100 days after the start"));
        assert!(md.contains("| Limited Action | 2.4 | - | 2020-04-20 | 2020-07-10 | - | 120 |"));
        assert!(md.contains("Lockdown (current)"));
    }

    #[test]
    fn outcomes_md_reports_requested_horizon_and_clamped_rows() {
        let md = render_outcomes_md(
            &[
                row(InterventionKind::LimitedAction, false, true),
                row(InterventionKind::Lockdown, false, false),
            ],
            365,
        );

        assert!(md.contains("Outcomes 365 days after the start"));
        assert!(md.contains("| Limited Action | 2.4 | - | 2020-04-20 | 2020-07-10 (end of projection) |"));
        assert!(md.contains("| Lockdown | 2.4 | - | 2020-04-20 | 2020-07-10 | - | 120 |"));
    }

    #[test]
    fn write_outcomes_md_creates_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("outcomes.md");
        write_outcomes_md(&path, &[row(InterventionKind::LimitedAction, false, false)], 100)
            .expect("write outcomes");
        assert!(std::fs::read_to_string(&path)
            .expect("read outcomes")
            .contains("Limited Action"));
    }
}
