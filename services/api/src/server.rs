use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_insights_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use churn_copilot::action_log::CsvActionLog;
use churn_copilot::config::AppConfig;
use churn_copilot::error::AppError;
use churn_copilot::insights::InsightsService;
use churn_copilot::signals::SignalStore;
use churn_copilot::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = Arc::new(SignalStore::new(config.data.signals_path.clone()));
    // scoring requests retry the load, so a missing file only degrades those routes
    if let Err(err) = store.snapshot() {
        warn!(error = %err, "starting without signal data");
    }
    let action_log = Arc::new(CsvActionLog::new(config.data.action_log_path.clone()));
    let insights_service = Arc::new(InsightsService::new(
        store,
        action_log,
        config.ranking.default_limit,
    ));

    let app = with_insights_routes(insights_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "churn copilot ready");

    axum::serve(listener, app).await?;
    Ok(())
}
