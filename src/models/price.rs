// Price catalog: per-currency hourly rates, versioned by the billing API

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerHourRate {
    pub per_hour: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerGbHourRate {
    pub per_gb_hour: Decimal,
}

/// Rates for one currency. `compute` is keyed by flavor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyPricing {
    pub currency: String,
    #[serde(default)]
    pub price_version: Option<String>,
    #[serde(default)]
    pub compute: BTreeMap<String, PerHourRate>,
    pub disk: PerGbHourRate,
    pub floating_ip: PerHourRate,
}

/// Body of `GET /prices/`.
#[derive(Debug, Clone, Deserialize)]
pub struct LatestPrices {
    pub price_version: String,
    #[serde(default)]
    pub pricing: Vec<CurrencyPricing>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceVersionEntry {
    pub price_version: String,
    #[serde(default)]
    pub pricing: Vec<CurrencyPricing>,
}

/// Body of `GET /prices/history`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceHistory {
    pub latest: String,
    #[serde(default)]
    pub price_history: Vec<PriceVersionEntry>,
}

/// The rate table the panels price against, keyed by upper-case currency code.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceCatalog {
    pub price_version: Option<String>,
    pub currencies: BTreeMap<String, CurrencyPricing>,
}

impl PriceCatalog {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.currencies.is_empty()
    }

    pub fn currency(&self, code: &str) -> Option<&CurrencyPricing> {
        self.currencies.get(&code.to_uppercase())
    }

    /// Flavors priced in `currency`, sorted by name.
    pub fn flavors(&self, currency: &str) -> Vec<String> {
        self.currency(currency)
            .map(|p| p.compute.keys().cloned().collect())
            .unwrap_or_default()
    }
}

impl From<LatestPrices> for PriceCatalog {
    fn from(latest: LatestPrices) -> Self {
        let currencies = latest
            .pricing
            .into_iter()
            .map(|p| (p.currency.to_uppercase(), p))
            .collect();
        Self {
            price_version: Some(latest.price_version),
            currencies,
        }
    }
}
