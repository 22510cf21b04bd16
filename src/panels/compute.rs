// Compute panel: list, create with a flavor, start/stop/resize/delete.

use std::future::Future;

use super::{Panel, PanelResource, PanelView, mint_resource_id};
use crate::api::{BillingApi, ComputeCreate};
use crate::error::{ActionError, ApiError, PolicyError};
use crate::models::{Compute, Resource};
use crate::shell::{Loaded, UserContext};

impl PanelResource for Compute {
    fn list(
        api: &BillingApi,
        user_id: &str,
    ) -> impl Future<Output = Result<Vec<Self>, ApiError>> + Send {
        api.list_computes(user_id, true)
    }
}

impl Panel<Compute> {
    pub async fn create(
        &self,
        ctx: &UserContext,
        flavor: &str,
    ) -> Result<Loaded<PanelView<Compute>>, ActionError> {
        let flavor = flavor.trim();
        if flavor.is_empty() {
            return Err(PolicyError::MissingFlavor.into());
        }
        let body = ComputeCreate {
            resource_id: mint_resource_id(Compute::KIND),
            user_id: ctx.user_id.clone(),
            flavor: flavor.to_string(),
        };
        tracing::debug!(resource_id = %body.resource_id, flavor, "creating compute");
        self.commit(ctx, self.api.create_compute(&body), "create")
            .await
    }
}
