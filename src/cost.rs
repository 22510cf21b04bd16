// Live per-hour estimate for a resource, priced against the currently fetched catalog.
// This is a display hint, not the accrued bill (the billing API owns that arithmetic).

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{Compute, CurrencyPricing, Disk, FloatingIp, PriceCatalog};

pub trait HourlyCost {
    /// `None` when the catalog has no rate for this resource (e.g. unpriced flavor).
    fn hourly_cost(&self, pricing: &CurrencyPricing) -> Option<Decimal>;
}

impl HourlyCost for Compute {
    fn hourly_cost(&self, pricing: &CurrencyPricing) -> Option<Decimal> {
        pricing.compute.get(&self.flavor).map(|r| r.per_hour)
    }
}

impl HourlyCost for Disk {
    fn hourly_cost(&self, pricing: &CurrencyPricing) -> Option<Decimal> {
        Some(Decimal::from(self.size_gb) * pricing.disk.per_gb_hour)
    }
}

impl HourlyCost for FloatingIp {
    fn hourly_cost(&self, pricing: &CurrencyPricing) -> Option<Decimal> {
        Some(pricing.floating_ip.per_hour)
    }
}

/// Estimate plus its display string, e.g. `$0.05/hr`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostEstimate {
    pub currency: String,
    pub per_hour: Decimal,
    pub display: String,
}

/// Price `resource` in `currency`; absent when the currency or rate is missing.
pub fn estimate<R: HourlyCost>(
    resource: &R,
    catalog: &PriceCatalog,
    currency: &str,
) -> Option<CostEstimate> {
    let pricing = catalog.currency(currency)?;
    let per_hour = resource.hourly_cost(pricing)?;
    Some(CostEstimate {
        currency: pricing.currency.to_uppercase(),
        display: format_hourly(per_hour, &pricing.currency),
        per_hour,
    })
}

/// Currency-prefixed amount with at least two decimals and a `/hr` suffix.
pub fn format_hourly(amount: Decimal, currency: &str) -> String {
    format!("{}/hr", format_money(amount, currency))
}

pub fn format_money(amount: Decimal, currency: &str) -> String {
    let mut value = amount.normalize();
    if value.scale() < 2 {
        value.rescale(2);
    }
    let code = currency.to_uppercase();
    match currency_symbol(&code) {
        Some(symbol) => format!("{}{}", symbol, value),
        None => format!("{} {}", code, value),
    }
}

fn currency_symbol(code: &str) -> Option<&'static str> {
    match code {
        "USD" => Some("$"),
        "EUR" => Some("€"),
        "GBP" => Some("£"),
        "INR" => Some("₹"),
        _ => None,
    }
}
