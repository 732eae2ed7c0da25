//! Deterministic risk scoring and outreach routing.

mod blend;
pub mod generator;
mod router;

pub use blend::{final_risk, RiskInputs};
pub use generator::{churn_risk_score, pseudo_uniform, region_bias, seed_from_id, severity_score};
pub use router::{route_action, ActionPlan, OutreachAction};

/// Error raised when scoring inputs fall outside their documented domains.
#[derive(Debug, thiserror::Error)]
pub enum ScoringError {
    #[error("{field} value {value} is outside its allowed range")]
    InvalidRange { field: &'static str, value: f64 },
}
