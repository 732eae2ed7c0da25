use crate::action_log::ActionLogError;
use crate::config::ConfigError;
use crate::insights::InsightsError;
use crate::signals::SignalLoadError;
use crate::telemetry::TelemetryError;
use crate::tickets::TicketError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Data(SignalLoadError),
    Log(ActionLogError),
    Export(csv::Error),
    Ticket(TicketError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Data(err) => write!(f, "signal data error: {}", err),
            AppError::Log(err) => write!(f, "action log error: {}", err),
            AppError::Export(err) => write!(f, "export error: {}", err),
            AppError::Ticket(err) => write!(f, "ticket error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Data(err) => Some(err),
            AppError::Log(err) => Some(err),
            AppError::Export(err) => Some(err),
            AppError::Ticket(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Data(SignalLoadError::MissingDataSource { .. }) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            AppError::Data(SignalLoadError::InvalidValue { .. })
            | AppError::Data(SignalLoadError::InvalidRange { .. }) => StatusCode::BAD_REQUEST,
            AppError::Ticket(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_)
            | AppError::Data(_)
            | AppError::Log(_)
            | AppError::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<SignalLoadError> for AppError {
    fn from(value: SignalLoadError) -> Self {
        Self::Data(value)
    }
}

impl From<ActionLogError> for AppError {
    fn from(value: ActionLogError) -> Self {
        Self::Log(value)
    }
}

impl From<csv::Error> for AppError {
    fn from(value: csv::Error) -> Self {
        Self::Export(value)
    }
}

impl From<InsightsError> for AppError {
    fn from(value: InsightsError) -> Self {
        match value {
            InsightsError::Data(err) => Self::Data(err),
            InsightsError::Log(err) => Self::Log(err),
            InsightsError::Ticket(err) => Self::Ticket(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;
    use std::path::PathBuf;

    #[test]
    fn missing_data_maps_to_service_unavailable() {
        let error = AppError::from(SignalLoadError::MissingDataSource {
            path: PathBuf::from("data/competitive_signals.csv"),
        });
        assert!(error.source().is_some());
        assert_eq!(
            error.into_response().status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn bad_rows_map_to_bad_request() {
        let error = AppError::from(SignalLoadError::InvalidRange {
            line: 4,
            column: "cpi",
            value: "140".to_string(),
            expected: "0..=100",
        });
        assert!(error.to_string().starts_with("signal data error: line 4"));
        assert_eq!(error.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
