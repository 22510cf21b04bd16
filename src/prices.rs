// Price catalog reader: fetches the latest rate table and hands it to panels read-only.

use std::sync::Arc;

use tracing::instrument;

use crate::api::BillingApi;
use crate::error::ApiError;
use crate::models::{CurrencyPricing, PriceCatalog, PriceHistory, PriceVersionEntry};

#[derive(Clone)]
pub struct PriceCatalogReader {
    api: Arc<BillingApi>,
}

impl PriceCatalogReader {
    pub fn new(api: Arc<BillingApi>) -> Self {
        Self { api }
    }

    /// Latest catalog for all currencies. Cost display is best-effort, so any
    /// failure (including "no pricing configured") yields an empty catalog.
    #[instrument(skip(self), fields(operation = "latest_prices"))]
    pub async fn latest(&self) -> Arc<PriceCatalog> {
        match self.api.latest_prices().await {
            Ok(latest) => {
                let catalog = PriceCatalog::from(latest);
                if catalog.is_empty() {
                    tracing::warn!(
                        operation = "latest_prices",
                        price_version = ?catalog.price_version,
                        "price catalog has no currencies, costs will be hidden"
                    );
                }
                Arc::new(catalog)
            }
            Err(e) => {
                tracing::warn!(error = %e, operation = "latest_prices", "price catalog unavailable");
                Arc::new(PriceCatalog::empty())
            }
        }
    }

    pub async fn for_currency(&self, currency: &str) -> Result<CurrencyPricing, ApiError> {
        self.api.prices_for_currency(currency).await
    }

    pub async fn history(&self) -> Result<PriceHistory, ApiError> {
        self.api.price_history().await
    }

    pub async fn version(&self, version: &str) -> Result<PriceVersionEntry, ApiError> {
        self.api.price_version(version).await
    }
}
