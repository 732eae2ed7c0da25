use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use super::pressure::SummaryFilter;
use super::service::{InsightsError, InsightsService, RiskQuery};
use crate::action_log::{AcceptedAction, ActionLog};
use crate::signals::SignalLoadError;
use crate::tickets::Ticket;

/// Router builder exposing the ranking, pressure, messaging, and triage endpoints.
pub fn insights_router<L>(service: Arc<InsightsService<L>>) -> Router
where
    L: ActionLog + 'static,
{
    Router::new()
        .route("/api/v1/insights/top_risk", get(top_risk_handler::<L>))
        .route("/api/v1/insights/log", post(log_handler::<L>))
        .route("/api/v1/utils/check_text", post(check_text_handler::<L>))
        .route("/api/v1/cpi/top", get(pressure_top_handler::<L>))
        .route("/api/v1/cpi/summary", get(pressure_summary_handler::<L>))
        .route(
            "/api/v1/cpi/customer/:customer_id",
            get(customer_handler::<L>),
        )
        .route("/api/v1/tickets/triage", post(triage_handler::<L>))
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct TopRiskParams {
    limit: Option<usize>,
    region: Option<String>,
    auto_fix: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct PressureTopParams {
    limit: Option<usize>,
    region: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SummaryParams {
    region: Option<String>,
    start: Option<String>,
    end: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CheckTextRequest {
    #[serde(default)]
    text: String,
    #[serde(default = "default_auto_fix")]
    auto_fix: bool,
}

fn default_auto_fix() -> bool {
    true
}

/// Blank query values behave as if the parameter were absent.
fn present(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

fn parse_bound(name: &str, value: &Option<String>) -> Result<Option<NaiveDate>, Response> {
    present(value)
        .map(|raw| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
                let payload = json!({
                    "error": format!("{name} must be a YYYY-MM-DD date"),
                });
                (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
            })
        })
        .transpose()
}

pub(crate) async fn top_risk_handler<L>(
    State(service): State<Arc<InsightsService<L>>>,
    Query(params): Query<TopRiskParams>,
) -> Response
where
    L: ActionLog + 'static,
{
    let query = RiskQuery {
        limit: params.limit,
        region: present(&params.region).map(str::to_string),
        auto_fix: params.auto_fix.unwrap_or(true),
    };

    match service.top_risk(&query) {
        Ok(ranked) => (StatusCode::OK, axum::Json(ranked)).into_response(),
        Err(error) => failure_response(error),
    }
}

pub(crate) async fn log_handler<L>(
    State(service): State<Arc<InsightsService<L>>>,
    axum::Json(entries): axum::Json<Vec<AcceptedAction>>,
) -> Response
where
    L: ActionLog + 'static,
{
    match service.log_actions(&entries) {
        Ok(logged) => {
            let payload = json!({ "ok": true, "logged": logged });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => failure_response(error),
    }
}

pub(crate) async fn check_text_handler<L>(
    State(service): State<Arc<InsightsService<L>>>,
    axum::Json(request): axum::Json<CheckTextRequest>,
) -> Response
where
    L: ActionLog + 'static,
{
    let (text, compliance) = service.check_text(&request.text, request.auto_fix);
    let payload = json!({
        "text": text,
        "compliance": compliance,
    });
    (StatusCode::OK, axum::Json(payload)).into_response()
}

pub(crate) async fn pressure_top_handler<L>(
    State(service): State<Arc<InsightsService<L>>>,
    Query(params): Query<PressureTopParams>,
) -> Response
where
    L: ActionLog + 'static,
{
    match service.pressure_top(present(&params.region), params.limit) {
        Ok(rows) => (StatusCode::OK, axum::Json(rows)).into_response(),
        Err(error) => failure_response(error),
    }
}

pub(crate) async fn pressure_summary_handler<L>(
    State(service): State<Arc<InsightsService<L>>>,
    Query(params): Query<SummaryParams>,
) -> Response
where
    L: ActionLog + 'static,
{
    let start = match parse_bound("start", &params.start) {
        Ok(start) => start,
        Err(response) => return response,
    };
    let end = match parse_bound("end", &params.end) {
        Ok(end) => end,
        Err(response) => return response,
    };
    let filter = SummaryFilter {
        region: present(&params.region),
        start,
        end,
    };

    match service.pressure_summary(&filter) {
        Ok(summary) => (StatusCode::OK, axum::Json(summary)).into_response(),
        Err(error) => failure_response(error),
    }
}

pub(crate) async fn customer_handler<L>(
    State(service): State<Arc<InsightsService<L>>>,
    Path(customer_id): Path<String>,
) -> Response
where
    L: ActionLog + 'static,
{
    match service.customer(&customer_id) {
        Ok(Some(row)) => {
            let mut payload = json!(row);
            if let Some(fields) = payload.as_object_mut() {
                fields.insert("found".to_string(), json!(true));
            }
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Ok(None) => (StatusCode::OK, axum::Json(json!({ "found": false }))).into_response(),
        Err(error) => failure_response(error),
    }
}

pub(crate) async fn triage_handler<L>(
    State(service): State<Arc<InsightsService<L>>>,
    axum::Json(ticket): axum::Json<Ticket>,
) -> Response
where
    L: ActionLog + 'static,
{
    match service.triage(&ticket) {
        Ok(triage) => (StatusCode::OK, axum::Json(triage)).into_response(),
        Err(error) => failure_response(error),
    }
}

fn failure_response(error: InsightsError) -> Response {
    let status = match &error {
        InsightsError::Data(SignalLoadError::MissingDataSource { .. }) => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        InsightsError::Ticket(_) => StatusCode::UNPROCESSABLE_ENTITY,
        InsightsError::Data(_) | InsightsError::Log(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        warn!(error = %error, status = status.as_u16(), "insights request failed");
    }

    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
