// Resource panels: list the user's resources as cards, apply checked actions

mod compute;
mod disk;
mod floating_ip;

use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use serde::Serialize;

use crate::api::BillingApi;
use crate::cost::{self, CostEstimate, HourlyCost};
use crate::error::{ActionError, ApiError, PolicyError};
use crate::models::{Compute, Disk, Event, FloatingIp, PriceCatalog, ResourceKind};
use crate::policy::{Action, ActionArgs, ActionPolicy, LegalAction, Mutation};
use crate::prices::PriceCatalogReader;
use crate::shell::{Loaded, Shell, UserContext};
use crate::timeline;

pub type ComputePanel = Panel<Compute>;
pub type DiskPanel = Panel<Disk>;
pub type FloatingIpPanel = Panel<FloatingIp>;

/// A resource kind a panel can list. Listings include deleted/released rows
/// so terminal resources still render, as cards with no actions.
pub trait PanelResource:
    ActionPolicy + HourlyCost + Clone + Serialize + Send + Sync + 'static
{
    fn list(
        api: &BillingApi,
        user_id: &str,
    ) -> impl Future<Output = Result<Vec<Self>, ApiError>> + Send;
}

#[derive(Debug, Clone, Serialize)]
pub struct ResourceCard<R> {
    pub resource: R,
    pub status: String,
    /// Absent when the catalog has no rate for this resource.
    pub cost: Option<CostEstimate>,
    pub actions: Vec<LegalAction>,
    /// Newest first, capped.
    pub timeline: Vec<Event>,
}

impl<R: PanelResource> ResourceCard<R> {
    pub fn build(resource: &R, catalog: &PriceCatalog, currency: &str) -> Self {
        Self {
            status: resource.status_label(),
            cost: cost::estimate(resource, catalog, currency),
            actions: resource.legal_actions(),
            timeline: timeline::recent_events_owned(resource.events()),
            resource: resource.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PanelView<R> {
    pub kind: ResourceKind,
    pub user_id: String,
    pub generation: u64,
    pub currency: String,
    pub price_version: Option<String>,
    /// Flavors priced in `currency` (compute panel only).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub flavors: Vec<String>,
    pub cards: Vec<ResourceCard<R>>,
    /// Set when the listing failed; `cards` is then empty.
    pub error: Option<String>,
}

pub struct Panel<R> {
    api: Arc<BillingApi>,
    prices: PriceCatalogReader,
    shell: Arc<Shell>,
    currency: String,
    _kind: PhantomData<fn() -> R>,
}

impl<R: PanelResource> Panel<R> {
    pub fn new(
        api: Arc<BillingApi>,
        prices: PriceCatalogReader,
        shell: Arc<Shell>,
        currency: &str,
    ) -> Self {
        Self {
            api,
            prices,
            shell,
            currency: currency.to_uppercase(),
            _kind: PhantomData,
        }
    }

    /// Fetch the listing and the catalog together and build the cards.
    /// A failed listing renders an empty panel; a failed catalog only drops costs.
    pub async fn load(&self, ctx: &UserContext) -> Loaded<PanelView<R>> {
        let (listing, catalog) = futures_util::future::join(
            R::list(&self.api, &ctx.user_id),
            self.prices.latest(),
        )
        .await;
        let view = self.build_view(ctx, listing, &catalog);
        self.shell.settle(ctx, view).await
    }

    fn build_view(
        &self,
        ctx: &UserContext,
        listing: Result<Vec<R>, ApiError>,
        catalog: &PriceCatalog,
    ) -> PanelView<R> {
        let (cards, error) = match listing {
            Ok(resources) => (
                resources
                    .iter()
                    .map(|r| ResourceCard::build(r, catalog, &self.currency))
                    .collect(),
                None,
            ),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    operation = "list_resources",
                    kind = R::KIND.label(),
                    user_id = %ctx.user_id,
                    "listing failed, rendering empty panel"
                );
                (Vec::new(), Some(e.user_message()))
            }
        };
        let flavors = match R::KIND {
            ResourceKind::Compute => catalog.flavors(&self.currency),
            _ => Vec::new(),
        };
        PanelView {
            kind: R::KIND,
            user_id: ctx.user_id.clone(),
            generation: ctx.generation,
            currency: self.currency.clone(),
            price_version: catalog.price_version.clone(),
            flavors,
            cards,
            error,
        }
    }

    /// Run `action` on one of the user's resources, judged against a fresh listing.
    pub async fn apply(
        &self,
        ctx: &UserContext,
        resource_id: &str,
        action: Action,
        args: &ActionArgs,
    ) -> Result<Loaded<PanelView<R>>, ActionError> {
        let resources = R::list(&self.api, &ctx.user_id).await?;
        let resource = resources
            .iter()
            .find(|r| r.resource_id() == resource_id)
            .ok_or_else(|| PolicyError::UnknownResource {
                kind: R::KIND.label(),
                resource_id: resource_id.to_string(),
                user_id: ctx.user_id.clone(),
            })?;
        let mutation = resource.plan(action, args)?;
        self.commit(ctx, mutation.execute(&self.api), action.as_str())
            .await
    }

    /// Await a mutation, then bump the refresh counter and reload.
    async fn commit(
        &self,
        ctx: &UserContext,
        call: impl Future<Output = Result<(), ApiError>>,
        operation: &str,
    ) -> Result<Loaded<PanelView<R>>, ActionError> {
        if let Err(e) = call.await {
            tracing::warn!(
                error = %e,
                operation,
                kind = R::KIND.label(),
                user_id = %ctx.user_id,
                "mutation rejected"
            );
            return Err(e.into());
        }
        let counter = self.shell.refresh().bump(&ctx.user_id);
        tracing::info!(operation, kind = R::KIND.label(), user_id = %ctx.user_id, counter, "mutation applied");
        Ok(self.load(ctx).await)
    }
}

impl Mutation {
    pub async fn execute(&self, api: &BillingApi) -> Result<(), ApiError> {
        match self {
            Mutation::UpdateCompute { resource_id, body } => {
                api.update_compute(resource_id, body).await
            }
            Mutation::DeleteCompute { resource_id } => api.delete_compute(resource_id).await,
            Mutation::UpdateDisk { resource_id, body } => api.update_disk(resource_id, body).await,
            Mutation::DeleteDisk { resource_id } => api.delete_disk(resource_id).await,
            Mutation::ReleaseFloatingIp { resource_id } => {
                api.release_floating_ip(resource_id).await
            }
        }
    }
}

static LAST_ID_TOKEN: AtomicI64 = AtomicI64::new(0);

/// `{prefix}_{token}` where token is a millisecond timestamp, forced to be
/// strictly increasing within this process.
pub fn mint_resource_id(kind: ResourceKind) -> String {
    let now = chrono::Utc::now().timestamp_millis();
    let previous = LAST_ID_TOKEN
        .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |last| {
            Some(now.max(last + 1))
        })
        .unwrap_or(now);
    let token = now.max(previous + 1);
    format!("{}_{}", kind.id_prefix(), token)
}
