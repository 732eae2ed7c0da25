use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::signals::{CustomerSignal, SignalDataset};

const TREND_WEEKS: usize = 12;
const SUMMARY_PERCENTILE: f64 = 0.90;

/// Aggregate pressure statistics over a date window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PressureSummary {
    pub records: usize,
    pub avg_cpi: Option<f64>,
    pub p90_cpi: Option<u8>,
    pub latest_week: Option<NaiveDate>,
    pub trend: Vec<WeeklyPressure>,
}

impl PressureSummary {
    fn empty() -> Self {
        Self {
            records: 0,
            avg_cpi: None,
            p90_cpi: None,
            latest_week: None,
            trend: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyPressure {
    pub date: NaiveDate,
    pub avg_cpi: f64,
}

/// Filters accepted by [`pressure_summary`].
#[derive(Debug, Clone, Default)]
pub struct SummaryFilter<'a> {
    pub region: Option<&'a str>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl SummaryFilter<'_> {
    fn admits(&self, row: &CustomerSignal) -> bool {
        self.region.map_or(true, |region| row.region == region)
            && self.start.map_or(true, |start| row.week >= start)
            && self.end.map_or(true, |end| row.week <= end)
    }
}

/// Latest-week rows with the highest pressure index first.
pub fn top_pressure<'a>(
    dataset: &'a SignalDataset,
    region: Option<&str>,
    limit: usize,
) -> Vec<&'a CustomerSignal> {
    let mut rows = dataset.latest_week_rows(region);
    rows.sort_by(|a, b| {
        b.competitive_pressure_index
            .cmp(&a.competitive_pressure_index)
    });
    rows.truncate(limit);
    rows
}

/// Record count, mean, 90th percentile, and weekly trend of the pressure index.
///
/// An empty window is not an error: it reports zero records and no aggregates.
pub fn pressure_summary(dataset: &SignalDataset, filter: &SummaryFilter<'_>) -> PressureSummary {
    let rows: Vec<&CustomerSignal> = dataset
        .rows()
        .iter()
        .filter(|row| filter.admits(row))
        .collect();

    if rows.is_empty() {
        return PressureSummary::empty();
    }

    let mut values: Vec<f64> = rows
        .iter()
        .map(|row| f64::from(row.competitive_pressure_index))
        .collect();
    let avg_cpi = values.iter().sum::<f64>() / values.len() as f64;
    values.sort_by(f64::total_cmp);
    let p90_cpi = percentile(&values, SUMMARY_PERCENTILE).trunc() as u8;

    let mut weekly: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();
    for row in &rows {
        let entry = weekly.entry(row.week).or_insert((0.0, 0));
        entry.0 += f64::from(row.competitive_pressure_index);
        entry.1 += 1;
    }
    let latest_week = weekly.keys().next_back().copied();
    let skip = weekly.len().saturating_sub(TREND_WEEKS);
    let trend = weekly
        .into_iter()
        .skip(skip)
        .map(|(date, (sum, count))| WeeklyPressure {
            date,
            avg_cpi: sum / count as f64,
        })
        .collect();

    PressureSummary {
        records: rows.len(),
        avg_cpi: Some(avg_cpi),
        p90_cpi: Some(p90_cpi),
        latest_week,
        trend,
    }
}

/// Latest-week row for one customer.
pub fn customer_snapshot<'a>(
    dataset: &'a SignalDataset,
    customer_id: &str,
) -> Option<&'a CustomerSignal> {
    let week = dataset.latest_week()?;
    dataset
        .rows()
        .iter()
        .find(|row| row.week == week && row.customer_id == customer_id)
}

/// Linear interpolation between closest ranks over sorted values.
fn percentile(sorted: &[f64], quantile: f64) -> f64 {
    match sorted.len() {
        0 => 0.0,
        1 => sorted[0],
        len => {
            let position = (len - 1) as f64 * quantile;
            let lower = position.floor() as usize;
            let upper = position.ceil() as usize;
            let weight = position - lower as f64;
            sorted[lower] + (sorted[upper] - sorted[lower]) * weight
        }
    }
}
