//! Weekly risk insights: blended ranking, pressure analytics, CSV export, and
//! the HTTP surface that serves them.

pub mod export;
pub mod pressure;
pub mod ranking;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use export::{export_ranked_csv, write_ranked_csv, EXPORT_HEADER};
pub use pressure::{
    customer_snapshot, pressure_summary, top_pressure, PressureSummary, SummaryFilter,
    WeeklyPressure,
};
pub use ranking::{assess, compute_ranked_risk, rank_with_guardrail, RiskAssessment};
pub use router::insights_router;
pub use service::{InsightsError, InsightsService, RiskQuery};
