//! Append-only CSV record of outreach actions an operator accepted.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::guardrails::ComplianceResult;
use crate::insights::RiskAssessment;
use crate::scoring::OutreachAction;

pub const LOG_HEADER: [&str; 9] = [
    "ts",
    "customer_id",
    "region",
    "final_score",
    "action",
    "proposed_text",
    "pass",
    "violations",
    "missing_disclaimers",
];

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
const LIST_SEPARATOR: &str = "|";

/// Accepted recommendation as posted back by the operator console.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcceptedAction {
    pub customer_id: String,
    pub region: String,
    pub final_score: f64,
    pub action: OutreachAction,
    pub proposed_text: String,
    pub compliance: ComplianceResult,
}

impl From<&RiskAssessment> for AcceptedAction {
    fn from(assessment: &RiskAssessment) -> Self {
        Self {
            customer_id: assessment.customer_id.clone(),
            region: assessment.region.clone(),
            final_score: assessment.final_score,
            action: assessment.action,
            proposed_text: assessment.proposed_text.clone(),
            compliance: assessment.compliance.clone(),
        }
    }
}

/// Sink for accepted actions so the service can be exercised without disk.
pub trait ActionLog: Send + Sync {
    fn append(&self, entry: &AcceptedAction) -> Result<(), ActionLogError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ActionLogError {
    #[error("failed to write action log {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to encode action log record: {0}")]
    Encode(#[from] csv::Error),
}

/// Append every entry in order, stopping at the first failure.
///
/// Entries written before a failure stay in the log.
pub fn append_accepted_actions<L>(
    log: &L,
    entries: &[AcceptedAction],
) -> Result<usize, ActionLogError>
where
    L: ActionLog + ?Sized,
{
    for entry in entries {
        append_accepted_action(log, entry)?;
    }
    Ok(entries.len())
}

pub fn append_accepted_action<L>(log: &L, entry: &AcceptedAction) -> Result<(), ActionLogError>
where
    L: ActionLog + ?Sized,
{
    log.append(entry)?;
    info!(
        customer_id = %entry.customer_id,
        action = entry.action.label(),
        pass = entry.compliance.pass,
        "accepted action logged"
    );
    Ok(())
}

/// File-backed log. One instance should own a given path.
#[derive(Debug)]
pub struct CsvActionLog {
    path: PathBuf,
    lock: Mutex<()>,
}

impl CsvActionLog {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append_at(
        &self,
        entry: &AcceptedAction,
        timestamp: DateTime<Utc>,
    ) -> Result<(), ActionLogError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| self.io_error(source))?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| self.io_error(source))?;
        let needs_header = file
            .metadata()
            .map_err(|source| self.io_error(source))?
            .len()
            == 0;

        let buffer = encode_record(entry, timestamp, needs_header)?;
        file.write_all(&buffer)
            .map_err(|source| self.io_error(source))?;

        debug!(
            path = %self.path.display(),
            bytes = buffer.len(),
            header = needs_header,
            "action log record appended"
        );
        Ok(())
    }

    fn io_error(&self, source: std::io::Error) -> ActionLogError {
        ActionLogError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl ActionLog for CsvActionLog {
    fn append(&self, entry: &AcceptedAction) -> Result<(), ActionLogError> {
        self.append_at(entry, Utc::now())
    }
}

fn encode_record(
    entry: &AcceptedAction,
    timestamp: DateTime<Utc>,
    with_header: bool,
) -> Result<Vec<u8>, ActionLogError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    if with_header {
        writer.write_record(LOG_HEADER)?;
    }

    let ts = timestamp.format(TIMESTAMP_FORMAT).to_string();
    // `{:?}` keeps the fractional part on whole scores (`40.0`)
    let final_score = format!("{:?}", entry.final_score);
    let pass = if entry.compliance.pass { "True" } else { "False" };
    let violations = entry.compliance.violations.join(LIST_SEPARATOR);
    let missing = entry.compliance.missing_disclaimers.join(LIST_SEPARATOR);

    writer.write_record([
        ts.as_str(),
        entry.customer_id.as_str(),
        entry.region.as_str(),
        final_score.as_str(),
        entry.action.label(),
        entry.proposed_text.as_str(),
        pass,
        violations.as_str(),
        missing.as_str(),
    ])?;

    writer
        .into_inner()
        .map_err(|err| ActionLogError::Encode(csv::Error::from(err.into_error())))
}

/// Log kept in memory, for tests and dry runs.
#[derive(Debug, Default)]
pub struct InMemoryActionLog {
    entries: Mutex<Vec<AcceptedAction>>,
}

impl InMemoryActionLog {
    pub fn entries(&self) -> Vec<AcceptedAction> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ActionLog for InMemoryActionLog {
    fn append(&self, entry: &AcceptedAction) -> Result<(), ActionLogError> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry.clone());
        Ok(())
    }
}
