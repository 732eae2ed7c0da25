use serde::{Deserialize, Serialize};

use crate::guardrails::{ComplianceResult, MessageGuardrail};
use crate::scoring::{churn_risk_score, final_risk, route_action, severity_score, OutreachAction};
use crate::signals::CustomerSignal;

/// Scored, routed, and guardrail-checked recommendation for one customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub customer_id: String,
    pub region: String,
    #[serde(rename = "cpi")]
    pub competitive_pressure_index: u8,
    pub severity: u8,
    #[serde(rename = "crs")]
    pub churn_risk_score: f64,
    pub final_score: f64,
    pub action: OutreachAction,
    pub reason: String,
    pub proposed_text: String,
    pub compliance: ComplianceResult,
    pub estimated_action_cost_usd: u32,
}

/// Score a single signal row.
pub fn assess(
    signal: &CustomerSignal,
    guardrail: &MessageGuardrail,
    auto_fix: bool,
) -> RiskAssessment {
    let pressure = signal.competitive_pressure_index;
    let severity = severity_score(&signal.customer_id, &signal.region);
    let churn_risk = churn_risk_score(&signal.customer_id);
    let plan = route_action(pressure, severity, churn_risk);
    let (proposed_text, compliance) = guardrail.check_and_repair(plan.proposed_text, auto_fix);

    RiskAssessment {
        customer_id: signal.customer_id.clone(),
        region: signal.region.clone(),
        competitive_pressure_index: pressure,
        severity,
        churn_risk_score: churn_risk,
        final_score: final_risk(pressure, severity, churn_risk),
        action: plan.action,
        reason: plan.reason.to_string(),
        proposed_text,
        compliance,
        estimated_action_cost_usd: plan.estimated_cost_usd,
    }
}

/// Rank one week of signals by blended risk, highest first.
///
/// Ties keep their input order. `region` narrows the rows before scoring and
/// `limit` truncates the sorted list.
pub fn compute_ranked_risk<'a, I>(
    signals: I,
    region: Option<&str>,
    limit: usize,
    auto_fix: bool,
) -> Vec<RiskAssessment>
where
    I: IntoIterator<Item = &'a CustomerSignal>,
{
    rank_with_guardrail(signals, region, limit, auto_fix, MessageGuardrail::standard())
}

pub fn rank_with_guardrail<'a, I>(
    signals: I,
    region: Option<&str>,
    limit: usize,
    auto_fix: bool,
    guardrail: &MessageGuardrail,
) -> Vec<RiskAssessment>
where
    I: IntoIterator<Item = &'a CustomerSignal>,
{
    let mut assessments: Vec<RiskAssessment> = signals
        .into_iter()
        .filter(|signal| region.map_or(true, |region| signal.region == region))
        .map(|signal| assess(signal, guardrail, auto_fix))
        .collect();

    // stable: equal scores keep input order
    assessments.sort_by(|a, b| b.final_score.total_cmp(&a.final_score));
    assessments.truncate(limit);
    assessments
}
