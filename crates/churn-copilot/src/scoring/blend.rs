use serde::{Deserialize, Serialize};

use super::generator::{round_to_cents, CHURN_RISK_CAP};
use super::router::{route_action, ActionPlan};
use super::ScoringError;

const PRESSURE_WEIGHT: f64 = 0.5;
const SEVERITY_WEIGHT: f64 = 0.3;
const CHURN_RISK_WEIGHT: f64 = 0.2;

/// Weighted blend of the three risk drivers, rounded to two decimals.
///
/// With every input inside its domain the result stays within `0..=100`.
pub fn final_risk(pressure_index: u8, severity: u8, churn_risk: f64) -> f64 {
    round_to_cents(
        PRESSURE_WEIGHT * f64::from(pressure_index)
            + SEVERITY_WEIGHT * f64::from(severity)
            + CHURN_RISK_WEIGHT * (churn_risk * 100.0),
    )
}

/// Validated scoring inputs for one customer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskInputs {
    pressure_index: u8,
    severity: u8,
    churn_risk: f64,
}

impl RiskInputs {
    pub fn new(pressure_index: u8, severity: u8, churn_risk: f64) -> Result<Self, ScoringError> {
        if pressure_index > 100 {
            return Err(ScoringError::InvalidRange {
                field: "pressure_index",
                value: f64::from(pressure_index),
            });
        }
        if severity > 100 {
            return Err(ScoringError::InvalidRange {
                field: "severity",
                value: f64::from(severity),
            });
        }
        if !churn_risk.is_finite() || !(0.0..=CHURN_RISK_CAP).contains(&churn_risk) {
            return Err(ScoringError::InvalidRange {
                field: "churn_risk",
                value: churn_risk,
            });
        }

        Ok(Self {
            pressure_index,
            severity,
            churn_risk,
        })
    }

    pub fn pressure_index(&self) -> u8 {
        self.pressure_index
    }

    pub fn severity(&self) -> u8 {
        self.severity
    }

    pub fn churn_risk(&self) -> f64 {
        self.churn_risk
    }

    pub fn final_score(&self) -> f64 {
        final_risk(self.pressure_index, self.severity, self.churn_risk)
    }

    pub fn route(&self) -> ActionPlan {
        route_action(self.pressure_index, self.severity, self.churn_risk)
    }
}
