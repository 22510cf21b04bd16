// Resource panel handlers: list, create, act

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;

use super::{AppState, Applied, ErrorResponse, applied, loaded};
use crate::models::{Compute, Disk, FloatingIp};
use crate::panels::PanelView;
use crate::policy::{Action, ActionArgs};

type PanelResult<R> = Result<Json<PanelView<R>>, ErrorResponse>;
type MutationResult<R> = Result<Json<Applied<PanelView<R>>>, ErrorResponse>;

#[derive(Debug, Deserialize)]
pub(super) struct ActionRequest {
    action: Action,
    #[serde(flatten)]
    args: ActionArgs,
}

#[derive(Debug, Deserialize)]
pub(super) struct CreateCompute {
    flavor: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct CreateDisk {
    size_gb: u64,
    #[serde(default)]
    attached_to: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct CreateFloatingIp {
    ip_address: String,
    #[serde(default)]
    attached_to: Option<String>,
}

pub(super) async fn list_computes(State(state): State<AppState>) -> PanelResult<Compute> {
    let ctx = state.shell.context().await;
    loaded(state.computes.load(&ctx).await)
}

pub(super) async fn create_compute(
    State(state): State<AppState>,
    Json(req): Json<CreateCompute>,
) -> MutationResult<Compute> {
    let ctx = state.shell.context().await;
    Ok(applied("create", state.computes.create(&ctx, &req.flavor).await?))
}

pub(super) async fn compute_action(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ActionRequest>,
) -> MutationResult<Compute> {
    let ctx = state.shell.context().await;
    let view = state
        .computes
        .apply(&ctx, &id, req.action, &req.args)
        .await?;
    Ok(applied(req.action.as_str(), view))
}

pub(super) async fn list_disks(State(state): State<AppState>) -> PanelResult<Disk> {
    let ctx = state.shell.context().await;
    loaded(state.disks.load(&ctx).await)
}

pub(super) async fn create_disk(
    State(state): State<AppState>,
    Json(req): Json<CreateDisk>,
) -> MutationResult<Disk> {
    let ctx = state.shell.context().await;
    let view = state
        .disks
        .create(&ctx, req.size_gb, req.attached_to.as_deref())
        .await?;
    Ok(applied("create", view))
}

pub(super) async fn disk_action(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ActionRequest>,
) -> MutationResult<Disk> {
    let ctx = state.shell.context().await;
    let view = state.disks.apply(&ctx, &id, req.action, &req.args).await?;
    Ok(applied(req.action.as_str(), view))
}

pub(super) async fn list_floating_ips(State(state): State<AppState>) -> PanelResult<FloatingIp> {
    let ctx = state.shell.context().await;
    loaded(state.floating_ips.load(&ctx).await)
}

pub(super) async fn create_floating_ip(
    State(state): State<AppState>,
    Json(req): Json<CreateFloatingIp>,
) -> MutationResult<FloatingIp> {
    let ctx = state.shell.context().await;
    let view = state
        .floating_ips
        .create(&ctx, &req.ip_address, req.attached_to.as_deref())
        .await?;
    Ok(applied("create", view))
}

pub(super) async fn floating_ip_action(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ActionRequest>,
) -> MutationResult<FloatingIp> {
    let ctx = state.shell.context().await;
    let view = state
        .floating_ips
        .apply(&ctx, &id, req.action, &req.args)
        .await?;
    Ok(applied(req.action.as_str(), view))
}
