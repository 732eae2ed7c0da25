use std::sync::Arc;

use tracing::debug;

use super::pressure::{self, PressureSummary, SummaryFilter};
use super::ranking::{rank_with_guardrail, RiskAssessment};
use crate::action_log::{append_accepted_actions, AcceptedAction, ActionLog, ActionLogError};
use crate::guardrails::{ComplianceResult, MessageGuardrail};
use crate::signals::{CustomerSignal, SignalLoadError, SignalStore};
use crate::tickets::{triage_ticket, Ticket, TicketError, TicketTriage};

/// Parameters for a risk ranking request.
#[derive(Debug, Clone, Default)]
pub struct RiskQuery {
    pub limit: Option<usize>,
    pub region: Option<String>,
    pub auto_fix: bool,
}

/// Service composing the signal store, guardrail, and action log behind the
/// insight endpoints.
pub struct InsightsService<L> {
    store: Arc<SignalStore>,
    log: Arc<L>,
    guardrail: &'static MessageGuardrail,
    default_limit: usize,
}

impl<L> InsightsService<L>
where
    L: ActionLog + 'static,
{
    pub fn new(store: Arc<SignalStore>, log: Arc<L>, default_limit: usize) -> Self {
        Self {
            store,
            log,
            guardrail: MessageGuardrail::standard(),
            default_limit,
        }
    }

    pub fn store(&self) -> &SignalStore {
        &self.store
    }

    pub fn default_limit(&self) -> usize {
        self.default_limit
    }

    /// Rank the latest week of signals by blended risk.
    pub fn top_risk(&self, query: &RiskQuery) -> Result<Vec<RiskAssessment>, InsightsError> {
        let dataset = self.store.snapshot()?;
        let region = query.region.as_deref();
        let limit = query.limit.unwrap_or(self.default_limit);
        let rows = dataset.latest_week_rows(region);

        let ranked = rank_with_guardrail(rows, None, limit, query.auto_fix, self.guardrail);
        debug!(
            region = region.unwrap_or("all"),
            limit,
            returned = ranked.len(),
            "risk ranking computed"
        );
        Ok(ranked)
    }

    pub fn pressure_top(
        &self,
        region: Option<&str>,
        limit: Option<usize>,
    ) -> Result<Vec<CustomerSignal>, InsightsError> {
        let dataset = self.store.snapshot()?;
        let limit = limit.unwrap_or(self.default_limit);
        Ok(pressure::top_pressure(&dataset, region, limit)
            .into_iter()
            .cloned()
            .collect())
    }

    pub fn pressure_summary(
        &self,
        filter: &SummaryFilter<'_>,
    ) -> Result<PressureSummary, InsightsError> {
        let dataset = self.store.snapshot()?;
        Ok(pressure::pressure_summary(&dataset, filter))
    }

    pub fn customer(&self, customer_id: &str) -> Result<Option<CustomerSignal>, InsightsError> {
        let dataset = self.store.snapshot()?;
        Ok(pressure::customer_snapshot(&dataset, customer_id).cloned())
    }

    pub fn check_text(&self, text: &str, auto_fix: bool) -> (String, ComplianceResult) {
        self.guardrail.check_and_repair(text, auto_fix)
    }

    pub fn log_actions(&self, entries: &[AcceptedAction]) -> Result<usize, InsightsError> {
        Ok(append_accepted_actions(self.log.as_ref(), entries)?)
    }

    pub fn triage(&self, ticket: &Ticket) -> Result<TicketTriage, InsightsError> {
        Ok(triage_ticket(ticket)?)
    }
}

/// Error raised by the insights service.
#[derive(Debug, thiserror::Error)]
pub enum InsightsError {
    #[error(transparent)]
    Data(#[from] SignalLoadError),
    #[error(transparent)]
    Log(#[from] ActionLogError),
    #[error(transparent)]
    Ticket(#[from] TicketError),
}
