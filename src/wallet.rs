// Wallet provisioning fallback: the only self-healing path in the dashboard.
// Absent (GET 404) -> create with configured defaults -> GET again to confirm Present.

use std::sync::Arc;

use serde::Serialize;
use tracing::instrument;

use crate::api::BillingApi;
use crate::config::WalletDefaults;
use crate::error::ApiError;
use crate::models::{Wallet, WalletCreate};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WalletLookup {
    pub wallet: Wallet,
    /// True when this lookup had to create the wallet.
    pub provisioned: bool,
}

#[derive(Clone)]
pub struct WalletProvisioner {
    api: Arc<BillingApi>,
    defaults: WalletDefaults,
}

impl WalletProvisioner {
    pub fn new(api: Arc<BillingApi>, defaults: WalletDefaults) -> Self {
        Self { api, defaults }
    }

    /// Fetch the user's wallet, creating it first if the API reports none.
    /// Failures other than 404 are returned as-is. Two concurrent calls for
    /// the same user may both try to create; the server keeps the first and
    /// answers the other with 409, after which both re-fetch the same wallet.
    #[instrument(skip(self), fields(operation = "get_or_provision"))]
    pub async fn get_or_provision(&self, user_id: &str) -> Result<WalletLookup, ApiError> {
        match self.api.get_wallet(user_id).await {
            Ok(wallet) => Ok(WalletLookup {
                wallet,
                provisioned: false,
            }),
            Err(e) if e.is_not_found() => {
                tracing::info!(user_id, "no wallet found, provisioning one");
                match self.api.create_wallet(&self.create_body(user_id)).await {
                    Ok(()) => {}
                    Err(ApiError::Rejected { status: 409, detail }) => {
                        tracing::debug!(user_id, %detail, "wallet created concurrently");
                    }
                    Err(e) => return Err(e),
                }
                let wallet = self.api.get_wallet(user_id).await?;
                Ok(WalletLookup {
                    wallet,
                    provisioned: true,
                })
            }
            Err(e) => Err(e),
        }
    }

    fn create_body(&self, user_id: &str) -> WalletCreate {
        WalletCreate {
            user_id: user_id.to_string(),
            balance: self.defaults.default_balance,
            currency: self.defaults.currency.clone(),
            auto_recharge: self.defaults.auto_recharge,
            allow_negative: self.defaults.allow_negative,
        }
    }
}
