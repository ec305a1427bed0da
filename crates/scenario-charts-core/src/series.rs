//! Chart-ready series derived from a scenario's records.
//!
//! Every derived series has exactly one point per input record, in input
//! order. A record missing a metric yields a point with that side `None`;
//! points are never dropped or interpolated, so series for different charts
//! stay aligned on the x-axis.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{Availability, Metric};
use crate::model::ScenarioModel;

/// A point of a range (band) series.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RangePoint {
    pub date: NaiveDate,
    pub low: Option<f64>,
    pub high: Option<f64>,
}

/// A point of a line series.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LinePoint {
    pub date: NaiveDate,
    pub value: Option<f64>,
}

/// A derived series in range or line form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "form", content = "points", rename_all = "snake_case")]
pub enum DerivedSeries {
    Range(Vec<RangePoint>),
    Line(Vec<LinePoint>),
}

impl DerivedSeries {
    pub fn len(&self) -> usize {
        match self {
            DerivedSeries::Range(points) => points.len(),
            DerivedSeries::Line(points) => points.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        match self {
            DerivedSeries::Range(points) => points.iter().map(|p| p.date).collect(),
            DerivedSeries::Line(points) => points.iter().map(|p| p.date).collect(),
        }
    }

    /// Every defined value, both sides for ranges.
    fn defined_values(&self) -> Vec<f64> {
        match self {
            DerivedSeries::Range(points) => points
                .iter()
                .flat_map(|p| [p.low, p.high])
                .flatten()
                .collect(),
            DerivedSeries::Line(points) => points.iter().filter_map(|p| p.value).collect(),
        }
    }

    /// `(min, max)` over the defined values; `None` when all are gaps.
    pub fn extent(&self) -> Option<(f64, f64)> {
        self.defined_values()
            .into_iter()
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    /// Latest defined point: the value for lines, the band midpoint for
    /// ranges with both sides present.
    pub fn last_defined(&self) -> Option<(NaiveDate, f64)> {
        match self {
            DerivedSeries::Range(points) => points.iter().rev().find_map(|p| match (p.low, p.high) {
                (Some(low), Some(high)) => Some((p.date, (low + high) / 2.0)),
                _ => None,
            }),
            DerivedSeries::Line(points) => points
                .iter()
                .rev()
                .find_map(|p| p.value.map(|v| (p.date, v))),
        }
    }
}

/// Which metrics feed a series.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "form", rename_all = "snake_case")]
pub enum SeriesSpec {
    Range { low: Metric, high: Metric },
    Line { value: Metric },
}

/// The three product charts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Rt,
    PositiveTests,
    IcuUtilization,
}

impl ChartKind {
    pub const ALL: [ChartKind; 3] = [
        ChartKind::Rt,
        ChartKind::PositiveTests,
        ChartKind::IcuUtilization,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ChartKind::Rt => "rt",
            ChartKind::PositiveTests => "positive_tests",
            ChartKind::IcuUtilization => "icu_utilization",
        }
    }

    pub fn spec(&self) -> SeriesSpec {
        match self {
            ChartKind::Rt => SeriesSpec::Range {
                low: Metric::RtLow,
                high: Metric::RtHigh,
            },
            ChartKind::PositiveTests => SeriesSpec::Line {
                value: Metric::TestPositiveRate,
            },
            ChartKind::IcuUtilization => SeriesSpec::Line {
                value: Metric::IcuUtilization,
            },
        }
    }
}

impl std::fmt::Display for ChartKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Range series from two metrics.
///
/// When a record has both sides but `low > high`, the sides are swapped so
/// that `low <= high` holds for every complete point.
pub fn derive_range(model: &ScenarioModel, low: Metric, high: Metric) -> Vec<RangePoint> {
    model
        .records()
        .iter()
        .map(|record| {
            let (lo, hi) = match (record.metric(low), record.metric(high)) {
                (Some(l), Some(h)) if l > h => (Some(h), Some(l)),
                sides => sides,
            };
            RangePoint {
                date: record.date,
                low: lo,
                high: hi,
            }
        })
        .collect()
}

/// Line series from one metric.
pub fn derive_line(model: &ScenarioModel, metric: Metric) -> Vec<LinePoint> {
    model
        .records()
        .iter()
        .map(|record| LinePoint {
            date: record.date,
            value: record.metric(metric),
        })
        .collect()
}

pub fn derive(model: &ScenarioModel, spec: SeriesSpec) -> DerivedSeries {
    match spec {
        SeriesSpec::Range { low, high } => DerivedSeries::Range(derive_range(model, low, high)),
        SeriesSpec::Line { value } => DerivedSeries::Line(derive_line(model, value)),
    }
}

/// The three product series for one scenario.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScenarioSeries {
    pub rt: Availability<DerivedSeries>,
    pub positive_tests: Availability<DerivedSeries>,
    pub icu_utilization: Availability<DerivedSeries>,
}

impl ScenarioSeries {
    pub fn get(&self, kind: ChartKind) -> &Availability<DerivedSeries> {
        match kind {
            ChartKind::Rt => &self.rt,
            ChartKind::PositiveTests => &self.positive_tests,
            ChartKind::IcuUtilization => &self.icu_utilization,
        }
    }
}

/// Derive all three product series. An unavailable scenario yields
/// unavailable series, not empty ones.
pub fn derive_scenario_series(model: Availability<&ScenarioModel>) -> ScenarioSeries {
    let series = |kind: ChartKind| model.as_ref().map(|m| derive(m, kind.spec()));
    ScenarioSeries {
        rt: series(ChartKind::Rt),
        positive_tests: series(ChartKind::PositiveTests),
        icu_utilization: series(ChartKind::IcuUtilization),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PolicyTable, RawProjection, RawRecord};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 4, d).expect("valid date")
    }

    fn line(d: u32, value: Option<f64>) -> LinePoint {
        LinePoint {
            date: day(d),
            value,
        }
    }

    fn range(d: u32, low: Option<f64>, high: Option<f64>) -> RangePoint {
        RangePoint {
            date: day(d),
            low,
            high,
        }
    }

    fn model(records: Vec<RawRecord>) -> ScenarioModel {
        ScenarioModel::new(RawProjection::new(records), PolicyTable::standard().baseline)
            .expect("model")
    }

    #[test]
    fn test_derive_line_scenario() {
        let m = model(vec![
            RawRecord::new(day(1)).with(Metric::Rt, 2.0),
            RawRecord::new(day(2)).with(Metric::Rt, 1.5),
        ]);
        assert_eq!(
            derive_line(&m, Metric::Rt),
            vec![line(1, Some(2.0)), line(2, Some(1.5))]
        );
    }

    #[test]
    fn test_derive_range_propagates_gaps() {
        let m = model(vec![
            RawRecord::new(day(1)).with(Metric::RtLow, 0.8).with(Metric::RtHigh, 1.2),
            RawRecord::new(day(2)).with(Metric::RtLow, 0.9),
            RawRecord::new(day(3)),
        ]);
        let points = derive_range(&m, Metric::RtLow, Metric::RtHigh);

        assert_eq!(points.len(), 3);
        assert_eq!(points[1], range(2, Some(0.9), None));
        assert_eq!(points[2], range(3, None, None));
    }

    #[test]
    fn test_derive_range_orders_sides() {
        let m = model(vec![
            RawRecord::new(day(1)).with(Metric::RtLow, 1.4).with(Metric::RtHigh, 1.1),
            RawRecord::new(day(2)),
        ]);
        let points = derive_range(&m, Metric::RtLow, Metric::RtHigh);
        assert_eq!(points[0].low, Some(1.1));
        assert_eq!(points[0].high, Some(1.4));
    }

    #[test]
    fn test_positional_alignment() {
        let m = model(vec![
            RawRecord::new(day(1)).with(Metric::TestPositiveRate, 0.1),
            RawRecord::new(day(4)),
            RawRecord::new(day(9)).with(Metric::IcuUtilization, 0.4),
        ]);
        let input_dates: Vec<_> = m.records().iter().map(|r| r.date).collect();
        for kind in ChartKind::ALL {
            let series = derive(&m, kind.spec());
            assert_eq!(series.len(), 3);
            assert_eq!(series.dates(), input_dates);
        }
    }

    #[test]
    fn test_unavailable_model_propagates() {
        let series = derive_scenario_series(Availability::Unavailable);
        for kind in ChartKind::ALL {
            assert_eq!(series.get(kind), &Availability::Unavailable);
        }
    }

    #[test]
    fn test_extent_and_last_defined() {
        let series = DerivedSeries::Range(vec![
            range(1, Some(0.5), Some(1.5)),
            range(2, Some(0.25), None),
            range(3, None, None),
        ]);
        assert_eq!(series.extent(), Some((0.25, 1.5)));
        assert_eq!(series.last_defined(), Some((day(1), 1.0)));

        let empty = DerivedSeries::Line(vec![line(1, None)]);
        assert_eq!(empty.extent(), None);
        assert_eq!(empty.last_defined(), None);
    }

    #[test]
    fn test_chart_kind_specs() {
        assert_eq!(
            ChartKind::Rt.spec(),
            SeriesSpec::Range { low: Metric::RtLow, high: Metric::RtHigh }
        );
        assert_eq!(
            ChartKind::IcuUtilization.spec(),
            SeriesSpec::Line { value: Metric::IcuUtilization }
        );
    }
}
