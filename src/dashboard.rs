// Wires the shell, panels and sidebar around one shared billing API client.

use std::sync::Arc;

use crate::api::BillingApi;
use crate::config::AppConfig;
use crate::error::ApiError;
use crate::panels::{ComputePanel, DiskPanel, FloatingIpPanel};
use crate::prices::PriceCatalogReader;
use crate::shell::Shell;
use crate::sidebar::Sidebar;
use crate::wallet::WalletProvisioner;

#[derive(Clone)]
pub struct Dashboard {
    pub shell: Arc<Shell>,
    pub api: Arc<BillingApi>,
    pub prices: PriceCatalogReader,
    pub computes: Arc<ComputePanel>,
    pub disks: Arc<DiskPanel>,
    pub floating_ips: Arc<FloatingIpPanel>,
    pub sidebar: Arc<Sidebar>,
    pub config: AppConfig,
}

impl Dashboard {
    pub fn new(config: AppConfig) -> Result<Self, ApiError> {
        let api = Arc::new(BillingApi::new(&config)?);
        Ok(Self::with_api(config, api))
    }

    pub fn with_api(config: AppConfig, api: Arc<BillingApi>) -> Self {
        let shell = Arc::new(Shell::new(
            &config.dashboard.default_user_id,
            config.dashboard.refresh_broadcast_capacity,
        ));
        let prices = PriceCatalogReader::new(api.clone());
        let currency = config.dashboard.currency.as_str();
        let provisioner = WalletProvisioner::new(api.clone(), config.wallet.clone());
        Self {
            computes: Arc::new(ComputePanel::new(
                api.clone(),
                prices.clone(),
                shell.clone(),
                currency,
            )),
            disks: Arc::new(DiskPanel::new(
                api.clone(),
                prices.clone(),
                shell.clone(),
                currency,
            )),
            floating_ips: Arc::new(FloatingIpPanel::new(
                api.clone(),
                prices.clone(),
                shell.clone(),
                currency,
            )),
            sidebar: Arc::new(Sidebar::new(api.clone(), provisioner, shell.clone())),
            prices,
            shell,
            api,
            config,
        }
    }
}
