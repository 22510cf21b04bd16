// Price endpoints (read-only)

use super::BillingApi;
use crate::error::ApiError;
use crate::models::{CurrencyPricing, LatestPrices, PriceHistory, PriceVersionEntry};

impl BillingApi {
    /// `GET /prices/`: latest rates for every currency.
    pub async fn latest_prices(&self) -> Result<LatestPrices, ApiError> {
        self.get_json("/prices/").await
    }

    /// `GET /prices/currency/{currency}`
    pub async fn prices_for_currency(&self, currency: &str) -> Result<CurrencyPricing, ApiError> {
        self.get_json(&format!("/prices/currency/{}", currency.to_uppercase()))
            .await
    }

    /// `GET /prices/history`
    pub async fn price_history(&self) -> Result<PriceHistory, ApiError> {
        self.get_json("/prices/history").await
    }

    /// `GET /prices/version/{version}`
    pub async fn price_version(&self, version: &str) -> Result<PriceVersionEntry, ApiError> {
        self.get_json(&format!("/prices/version/{}", version)).await
    }
}
