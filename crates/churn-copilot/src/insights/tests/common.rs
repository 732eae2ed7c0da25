use std::io::Cursor;
use std::sync::Arc;

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::action_log::{AcceptedAction, ActionLog, ActionLogError, InMemoryActionLog};
use crate::insights::{insights_router, InsightsService};
use crate::signals::{SignalDataset, SignalStore};

pub(super) const SIGNALS: &str = "date,customer_id,region,cpi\n\
2025-01-06,C000001,metro_north,61\n\
2025-01-13,C000001,metro_north,82\n\
2025-01-13,C000002,metro_north,40\n\
2025-01-13,C000003,rural_south,55\n";

pub(super) fn dataset() -> SignalDataset {
    let today = NaiveDate::from_ymd_opt(2025, 6, 30).expect("valid date");
    SignalDataset::from_reader(Cursor::new(SIGNALS), today).expect("fixture parses")
}

pub(super) fn build_service() -> (
    InsightsService<InMemoryActionLog>,
    Arc<InMemoryActionLog>,
) {
    let log = Arc::new(InMemoryActionLog::default());
    let store = Arc::new(SignalStore::preloaded(dataset()));
    (InsightsService::new(store, log.clone(), 20), log)
}

/// Service whose dataset path does not exist.
pub(super) fn unavailable_service() -> InsightsService<InMemoryActionLog> {
    let store = Arc::new(SignalStore::new("./missing/competitive_signals.csv"));
    InsightsService::new(store, Arc::new(InMemoryActionLog::default()), 20)
}

pub(super) fn router_with_service(service: InsightsService<InMemoryActionLog>) -> axum::Router {
    insights_router(Arc::new(service))
}

pub(super) struct FailingLog;

impl ActionLog for FailingLog {
    fn append(&self, _entry: &AcceptedAction) -> Result<(), ActionLogError> {
        Err(ActionLogError::Io {
            path: "action_log.csv".into(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
        })
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
