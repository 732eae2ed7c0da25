//! Keyword triage for inbound support tickets.

use serde::{Deserialize, Serialize};

use crate::scoring::generator::round_to_cents;
use crate::scoring::OutreachAction;

const MIN_TEXT_CHARS: usize = 3;
const MAX_FACTORS: usize = 3;
const BASE_SCORE: f64 = 0.2;
const PER_FACTOR: f64 = 0.2;
const SCORE_CAP: f64 = 0.95;

const BILLING_FACTOR: &str = "last_bill_delta>=+10%";
const SPEED_FACTOR: &str = "avg_down_mbps<10";
const FALLBACK_FACTOR: &str = "recent_ticket_activity";

const TRIAGE_REASON: &str = "Billing change + speed concerns";
const TRIAGE_MESSAGE: &str = "We noticed a recent billing change and possible line/speed issues. \
We can review your plan and check your line. Would you like us to schedule a callback?";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub ticket_id: String,
    pub customer_id: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposedAction {
    #[serde(rename = "type")]
    pub action: OutreachAction,
    pub reason: String,
    pub customer_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketTriage {
    pub ticket_id: String,
    pub churn_score: f64,
    pub top_factors: Vec<String>,
    pub proposed_action: ProposedAction,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TicketError {
    #[error("ticket text must be at least 3 characters")]
    TextTooShort,
}

/// Derive churn factors from ticket keywords and propose a plan review.
pub fn triage_ticket(ticket: &Ticket) -> Result<TicketTriage, TicketError> {
    if ticket.text.chars().count() < MIN_TEXT_CHARS {
        return Err(TicketError::TextTooShort);
    }

    let text = ticket.text.to_lowercase();
    let mentions = |words: &[&str]| words.iter().any(|word| text.contains(word));

    let mut factors = Vec::new();
    if mentions(&["bill", "charge"]) {
        factors.push(BILLING_FACTOR.to_string());
    }
    if mentions(&["speed", "slow"]) {
        factors.push(SPEED_FACTOR.to_string());
    }
    if factors.is_empty() {
        factors.push(FALLBACK_FACTOR.to_string());
    }

    let churn_score = (BASE_SCORE + PER_FACTOR * factors.len() as f64).min(SCORE_CAP);
    factors.truncate(MAX_FACTORS);

    Ok(TicketTriage {
        ticket_id: ticket.ticket_id.clone(),
        churn_score: round_to_cents(churn_score),
        top_factors: factors,
        proposed_action: ProposedAction {
            action: OutreachAction::PlanReview,
            reason: TRIAGE_REASON.to_string(),
            customer_message: TRIAGE_MESSAGE.to_string(),
        },
    })
}
