// Disk panel: list, create with a size, resize/delete.

use std::future::Future;

use super::{Panel, PanelResource, PanelView, mint_resource_id};
use crate::api::{BillingApi, DiskCreate};
use crate::error::{ActionError, ApiError, PolicyError};
use crate::models::{Disk, Resource};
use crate::shell::{Loaded, UserContext};

impl PanelResource for Disk {
    fn list(
        api: &BillingApi,
        user_id: &str,
    ) -> impl Future<Output = Result<Vec<Self>, ApiError>> + Send {
        api.list_disks(user_id, true)
    }
}

impl Panel<Disk> {
    /// `attached_to` names the compute the new disk is attached to; blank means detached.
    pub async fn create(
        &self,
        ctx: &UserContext,
        size_gb: u64,
        attached_to: Option<&str>,
    ) -> Result<Loaded<PanelView<Disk>>, ActionError> {
        if size_gb == 0 {
            return Err(PolicyError::InvalidSize.into());
        }
        let body = DiskCreate {
            resource_id: mint_resource_id(Disk::KIND),
            user_id: ctx.user_id.clone(),
            size_gb,
            attached_to: attached_to
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string),
        };
        tracing::debug!(resource_id = %body.resource_id, size_gb, "creating disk");
        self.commit(ctx, self.api.create_disk(&body), "create").await
    }
}
