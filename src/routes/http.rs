// Shell, price and sidebar handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{AppState, Applied, ErrorResponse, applied, loaded};
use crate::shell::{Loaded, UserContext};
use crate::sidebar::{BillRun, SidebarView};
use crate::version::{NAME, VERSION};

/// GET /version: returns service name and version (from Cargo.toml at build time).
pub(super) async fn version_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "name": NAME,
        "version": VERSION,
    }))
}

/// GET /api/health: 503 while the billing API does not answer its health check.
pub(super) async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let up = state.api.health_check().await;
    let status = if up {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (
        status,
        Json(serde_json::json!({
            "billing_api": if up { "ok" } else { "unreachable" },
            "api_root": state.api.api_root(),
        })),
    )
}

#[derive(Debug, Deserialize)]
pub(super) struct SelectUser {
    user_id: String,
}

pub(super) async fn get_selection(State(state): State<AppState>) -> Json<UserContext> {
    Json(state.shell.context().await)
}

pub(super) async fn put_selection(
    State(state): State<AppState>,
    Json(req): Json<SelectUser>,
) -> Result<Json<UserContext>, ErrorResponse> {
    let user_id = req.user_id.trim();
    if user_id.is_empty() {
        return Err(ErrorResponse::new(
            StatusCode::BAD_REQUEST,
            "user_id must not be empty",
        ));
    }
    Ok(Json(state.shell.select(user_id).await))
}

/// GET /api/prices: latest catalog plus the flavors priced in the dashboard currency.
pub(super) async fn prices_handler(State(state): State<AppState>) -> impl IntoResponse {
    let catalog = state.prices.latest().await;
    let currency = state.config.dashboard.currency.as_str();
    Json(serde_json::json!({
        "currency": currency,
        "price_version": catalog.price_version,
        "flavors": catalog.flavors(currency),
        "catalog": catalog.as_ref(),
    }))
}

pub(super) async fn price_history_handler(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ErrorResponse> {
    Ok(Json(state.prices.history().await?))
}

pub(super) async fn prices_for_currency_handler(
    State(state): State<AppState>,
    Path(currency): Path<String>,
) -> Result<impl IntoResponse, ErrorResponse> {
    Ok(Json(state.prices.for_currency(&currency).await?))
}

pub(super) async fn price_version_handler(
    State(state): State<AppState>,
    Path(version): Path<String>,
) -> Result<impl IntoResponse, ErrorResponse> {
    Ok(Json(state.prices.version(&version).await?))
}

pub(super) async fn sidebar_handler(
    State(state): State<AppState>,
) -> Result<Json<SidebarView>, ErrorResponse> {
    let ctx = state.shell.context().await;
    loaded(state.sidebar.load(&ctx).await)
}

#[derive(Debug, Deserialize)]
pub(super) struct CreditBody {
    amount: Decimal,
    reason: String,
}

pub(super) async fn credit_handler(
    State(state): State<AppState>,
    Json(req): Json<CreditBody>,
) -> Result<Json<Applied<SidebarView>>, ErrorResponse> {
    let ctx = state.shell.context().await;
    let view = state
        .sidebar
        .add_credit(&ctx, req.amount, &req.reason)
        .await?;
    Ok(applied("add_credit", view))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct ComputeBillBody {
    period_end: Option<DateTime<Utc>>,
}

/// The run's result plus the reloaded sidebar (null if the selection moved on).
#[derive(Debug, Serialize)]
pub(super) struct BillRunBody<T> {
    result: T,
    sidebar: Option<SidebarView>,
}

impl<T> From<BillRun<T>> for BillRunBody<T> {
    fn from(run: BillRun<T>) -> Self {
        Self {
            result: run.result,
            sidebar: match run.sidebar {
                Loaded::Current(view) => Some(view),
                Loaded::Superseded => None,
            },
        }
    }
}

pub(super) async fn compute_bill_handler(
    State(state): State<AppState>,
    Json(req): Json<ComputeBillBody>,
) -> Result<impl IntoResponse, ErrorResponse> {
    let ctx = state.shell.context().await;
    let run = state.sidebar.compute_bill(&ctx, req.period_end).await?;
    Ok(Json(BillRunBody::from(run)))
}

pub(super) async fn get_bill_handler(
    State(state): State<AppState>,
    Path(bill_id): Path<String>,
) -> Result<impl IntoResponse, ErrorResponse> {
    Ok(Json(state.api.get_bill(&bill_id).await?))
}

pub(super) async fn retry_bill_handler(
    State(state): State<AppState>,
    Path(bill_id): Path<String>,
) -> Result<impl IntoResponse, ErrorResponse> {
    let ctx = state.shell.context().await;
    let run = state.sidebar.retry_bill(&ctx, &bill_id).await?;
    Ok(Json(BillRunBody::from(run)))
}
