// Floating IP panel: list, allocate, release.

use std::future::Future;
use std::net::IpAddr;

use super::{Panel, PanelResource, PanelView, mint_resource_id};
use crate::api::{BillingApi, FloatingIpCreate};
use crate::error::{ActionError, ApiError, PolicyError};
use crate::models::{FloatingIp, Resource};
use crate::shell::{Loaded, UserContext};

impl PanelResource for FloatingIp {
    fn list(
        api: &BillingApi,
        user_id: &str,
    ) -> impl Future<Output = Result<Vec<Self>, ApiError>> + Send {
        api.list_floating_ips(user_id, true)
    }
}

impl Panel<FloatingIp> {
    pub async fn create(
        &self,
        ctx: &UserContext,
        ip_address: &str,
        attached_to: Option<&str>,
    ) -> Result<Loaded<PanelView<FloatingIp>>, ActionError> {
        let ip: IpAddr = ip_address.trim().parse().map_err(|_| {
            PolicyError::InvalidInput(format!("{:?} is not a valid IP address", ip_address))
        })?;
        let body = FloatingIpCreate {
            resource_id: mint_resource_id(FloatingIp::KIND),
            user_id: ctx.user_id.clone(),
            ip_address: ip.to_string(),
            attached_to: attached_to
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string),
        };
        tracing::debug!(resource_id = %body.resource_id, ip = %ip, "allocating floating IP");
        self.commit(ctx, self.api.create_floating_ip(&body), "create")
            .await
    }
}
