use serde::{Deserialize, Serialize};
use std::fmt;

const COMPETITIVE_PRESSURE_THRESHOLD: u8 = 80;
const COMPETITIVE_SEVERITY_CEILING: u8 = 60;
const SERVICE_SEVERITY_THRESHOLD: u8 = 70;
const SERVICE_CHURN_RISK_THRESHOLD: f64 = 0.8;
const TECH_VISIT_SEVERITY_THRESHOLD: u8 = 80;

const DATA_BOOST_TEXT: &str = "We'd like to add a data boost to your line while we review your plan \
together. Would you like us to schedule a callback? \
Credits, if any, are a one-time credit, subject to account review; \
availability can vary by account and region.";

const SERVICE_CALLBACK_TEXT: &str = "We can review your plan and check your line where needed. \
Would you like us to schedule a priority callback? \
Credits, if any, are a one-time credit, subject to account review; \
availability can vary by account and region.";

const TECH_VISIT_TEXT: &str = "We can check your line and arrange a technician visit if the issue \
persists. Would you like us to schedule a priority callback first? \
Credits, if any, are a one-time credit, subject to account review; \
availability can vary by account and region.";

const PLAN_REVIEW_TEXT: &str = "We can review your plan and check your line where needed. \
Would you like us to schedule a callback? \
Credits, if any, are a one-time credit, subject to account review; \
availability can vary by account and region.";

/// Retention playbook step recommended for a customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutreachAction {
    DataBoost,
    PriorityCallback,
    TechVisit,
    PlanReview,
}

impl OutreachAction {
    pub fn label(&self) -> &'static str {
        match self {
            OutreachAction::DataBoost => "data_boost",
            OutreachAction::PriorityCallback => "priority_callback",
            OutreachAction::TechVisit => "tech_visit",
            OutreachAction::PlanReview => "plan_review",
        }
    }

    /// Estimated cost in USD of carrying out the action.
    pub fn estimated_cost_usd(&self) -> u32 {
        match self {
            OutreachAction::DataBoost => 3,
            OutreachAction::PriorityCallback => 2,
            OutreachAction::TechVisit => 25,
            OutreachAction::PlanReview => 0,
        }
    }

    pub fn reason(&self) -> &'static str {
        match self {
            OutreachAction::DataBoost => {
                "High competitive pressure; provide low-cost, high perceived value."
            }
            OutreachAction::PriorityCallback | OutreachAction::TechVisit => {
                "Service factors likely; review line or schedule investigation."
            }
            OutreachAction::PlanReview => {
                "Moderate risk; review options before committing credits."
            }
        }
    }

    /// Outreach template sent with the action before guardrail checks.
    pub fn message_template(&self) -> &'static str {
        match self {
            OutreachAction::DataBoost => DATA_BOOST_TEXT,
            OutreachAction::PriorityCallback => SERVICE_CALLBACK_TEXT,
            OutreachAction::TechVisit => TECH_VISIT_TEXT,
            OutreachAction::PlanReview => PLAN_REVIEW_TEXT,
        }
    }
}

impl fmt::Display for OutreachAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Routed action with the rationale and draft message attached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionPlan {
    pub action: OutreachAction,
    pub reason: &'static str,
    pub proposed_text: &'static str,
    pub estimated_cost_usd: u32,
}

impl From<OutreachAction> for ActionPlan {
    fn from(action: OutreachAction) -> Self {
        Self {
            action,
            reason: action.reason(),
            proposed_text: action.message_template(),
            estimated_cost_usd: action.estimated_cost_usd(),
        }
    }
}

/// Pick the cheapest policy-safe playbook for the given risk drivers.
///
/// Rules are evaluated in order:
/// - pressure >= 80 with severity < 60: competitive playbook (data boost)
/// - severity >= 70 or churn risk >= 0.8: service playbook, escalating to a
///   technician visit from severity 80
/// - otherwise a plan review with no credit committed
pub fn route_action(pressure_index: u8, severity: u8, churn_risk: f64) -> ActionPlan {
    let action = if pressure_index >= COMPETITIVE_PRESSURE_THRESHOLD
        && severity < COMPETITIVE_SEVERITY_CEILING
    {
        OutreachAction::DataBoost
    } else if severity >= SERVICE_SEVERITY_THRESHOLD || churn_risk >= SERVICE_CHURN_RISK_THRESHOLD
    {
        if severity < TECH_VISIT_SEVERITY_THRESHOLD {
            OutreachAction::PriorityCallback
        } else {
            OutreachAction::TechVisit
        }
    } else {
        OutreachAction::PlanReview
    };

    ActionPlan::from(action)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guardrails::check_message;

    #[test]
    fn competitive_pressure_takes_priority() {
        let plan = route_action(85, 50, 0.9);
        assert_eq!(plan.action, OutreachAction::DataBoost);
        assert_eq!(plan.estimated_cost_usd, 3);
        assert!(plan.reason.contains("competitive pressure"));
    }

    #[test]
    fn high_severity_routes_to_service_playbook() {
        assert_eq!(route_action(85, 75, 0.1).action, OutreachAction::PriorityCallback);
        assert_eq!(route_action(40, 75, 0.1).action, OutreachAction::PriorityCallback);
        assert_eq!(route_action(90, 85, 0.1).action, OutreachAction::TechVisit);
        assert_eq!(route_action(10, 85, 0.0).estimated_cost_usd, 25);
    }

    #[test]
    fn churn_risk_alone_triggers_callback() {
        let plan = route_action(50, 40, 0.8);
        assert_eq!(plan.action, OutreachAction::PriorityCallback);
        assert_eq!(plan.estimated_cost_usd, 2);
        assert!(plan.reason.starts_with("Service factors"));
    }

    #[test]
    fn moderate_risk_falls_back_to_plan_review() {
        let plan = route_action(40, 30, 0.3);
        assert_eq!(plan.action, OutreachAction::PlanReview);
        assert_eq!(plan.estimated_cost_usd, 0);
        assert!(plan.reason.contains("before committing credits"));
    }

    #[test]
    fn boundaries_are_inclusive_where_documented() {
        assert_eq!(route_action(80, 59, 0.0).action, OutreachAction::DataBoost);
        assert_eq!(route_action(79, 59, 0.0).action, OutreachAction::PlanReview);
        assert_eq!(route_action(80, 60, 0.0).action, OutreachAction::PlanReview);
        assert_eq!(route_action(0, 70, 0.0).action, OutreachAction::PriorityCallback);
        assert_eq!(route_action(0, 80, 0.0).action, OutreachAction::TechVisit);
        assert_eq!(route_action(0, 69, 0.79).action, OutreachAction::PlanReview);
    }

    #[test]
    fn every_template_passes_the_guardrail() {
        for action in [
            OutreachAction::DataBoost,
            OutreachAction::PriorityCallback,
            OutreachAction::TechVisit,
            OutreachAction::PlanReview,
        ] {
            let result = check_message(action.message_template());
            assert!(result.pass, "{action}: {result:?}");
            assert!(action.message_template().contains("callback"), "{action}");
        }
    }

    #[test]
    fn action_serializes_as_snake_case_label() {
        let json = serde_json::to_string(&OutreachAction::PriorityCallback).expect("serialize");
        assert_eq!(json, "\"priority_callback\"");
        assert_eq!(OutreachAction::TechVisit.to_string(), "tech_visit");
    }
}
