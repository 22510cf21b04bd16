// HTTP + WebSocket routes

mod http;
mod panels;
mod ws;

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};

use crate::dashboard::Dashboard;
use crate::error::{ActionError, ApiError, PolicyError};
use crate::shell::Loaded;

pub(crate) type AppState = Dashboard;

pub fn app(dashboard: Dashboard) -> Router {
    Router::new()
        .route("/", get(|| async { "billing-dashboard: hello" })) // GET /
        .route("/version", get(http::version_handler)) // GET /version
        .route("/api/health", get(http::health_handler)) // GET /api/health
        .route(
            "/api/selection",
            get(http::get_selection).put(http::put_selection),
        ) // GET|PUT /api/selection
        .route("/api/prices", get(http::prices_handler)) // GET /api/prices
        .route("/api/prices/history", get(http::price_history_handler)) // GET /api/prices/history
        .route(
            "/api/prices/currency/{currency}",
            get(http::prices_for_currency_handler),
        ) // GET /api/prices/currency/{currency}
        .route(
            "/api/prices/version/{version}",
            get(http::price_version_handler),
        ) // GET /api/prices/version/{version}
        .route(
            "/api/computes",
            get(panels::list_computes).post(panels::create_compute),
        ) // GET|POST /api/computes
        .route("/api/computes/{id}/actions", post(panels::compute_action)) // POST /api/computes/{id}/actions
        .route(
            "/api/disks",
            get(panels::list_disks).post(panels::create_disk),
        ) // GET|POST /api/disks
        .route("/api/disks/{id}/actions", post(panels::disk_action)) // POST /api/disks/{id}/actions
        .route(
            "/api/floating-ips",
            get(panels::list_floating_ips).post(panels::create_floating_ip),
        ) // GET|POST /api/floating-ips
        .route(
            "/api/floating-ips/{id}/actions",
            post(panels::floating_ip_action),
        ) // POST /api/floating-ips/{id}/actions
        .route("/api/sidebar", get(http::sidebar_handler)) // GET /api/sidebar
        .route("/api/sidebar/credit", post(http::credit_handler)) // POST /api/sidebar/credit
        .route("/api/sidebar/bills", post(http::compute_bill_handler)) // POST /api/sidebar/bills
        .route("/api/sidebar/bills/{bill_id}", get(http::get_bill_handler)) // GET /api/sidebar/bills/{bill_id}
        .route(
            "/api/sidebar/bills/{bill_id}/retry",
            post(http::retry_bill_handler),
        ) // POST /api/sidebar/bills/{bill_id}/retry
        .route("/ws/refresh", get(ws::ws_refresh)) // WS /ws/refresh
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(dashboard)
}

/// `{"error": message}` with a status chosen from the failure.
#[derive(Debug)]
pub(crate) struct ErrorResponse {
    status: StatusCode,
    message: String,
}

impl ErrorResponse {
    pub(crate) fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    fn superseded() -> Self {
        Self::new(
            StatusCode::CONFLICT,
            "the selected user changed while loading; reload",
        )
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(serde_json::json!({ "error": self.message })),
        )
            .into_response()
    }
}

impl From<ApiError> for ErrorResponse {
    fn from(e: ApiError) -> Self {
        let status = match &e {
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            // Client-side rejections (validation, conflicts) keep their status.
            ApiError::Rejected { status, .. } if (400..500).contains(status) => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            _ => StatusCode::BAD_GATEWAY,
        };
        Self::new(status, e.user_message())
    }
}

impl From<ActionError> for ErrorResponse {
    fn from(e: ActionError) -> Self {
        match e {
            ActionError::Policy(p @ PolicyError::UnknownResource { .. }) => {
                Self::new(StatusCode::NOT_FOUND, p.to_string())
            }
            ActionError::Policy(p) => Self::new(StatusCode::BAD_REQUEST, p.to_string()),
            ActionError::Api(a) => a.into(),
        }
    }
}

/// A mutation the billing API accepted. `view` is null when the selection
/// moved on before the reload finished; the mutation itself still landed.
#[derive(Debug, Serialize)]
pub(crate) struct Applied<V> {
    applied: &'static str,
    view: Option<V>,
}

pub(crate) fn applied<V: Serialize>(
    operation: &'static str,
    view: Loaded<V>,
) -> Json<Applied<V>> {
    Json(Applied {
        applied: operation,
        view: view.current(),
    })
}

/// Current views become 200 JSON; superseded reads become 409.
pub(crate) fn loaded<T: Serialize>(view: Loaded<T>) -> Result<Json<T>, ErrorResponse> {
    match view {
        Loaded::Current(v) => Ok(Json(v)),
        Loaded::Superseded => Err(ErrorResponse::superseded()),
    }
}
