// Bills produced by the billing API (read-only from the dashboard)

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillItem {
    #[serde(alias = "type")]
    pub resource_type: String,
    pub amount: Decimal,
    #[serde(default)]
    pub resource_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bill {
    #[serde(alias = "bill_id")]
    pub id: String,
    #[serde(default)]
    pub user_id: Option<String>,
    pub status: String,
    #[serde(alias = "total")]
    pub total_amount: Decimal,
    pub period_start: DateTime<Utc>,
    pub period_end: DateTime<Utc>,
    #[serde(default, alias = "charges")]
    pub items: Vec<BillItem>,
    #[serde(default)]
    pub paid: bool,
    #[serde(default)]
    pub price_version: Option<String>,
    #[serde(default)]
    pub generated_at: Option<DateTime<Utc>>,
}

/// Body of `POST /billing/compute`.
#[derive(Debug, Clone, Serialize)]
pub struct ComputeBillRequest {
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period_end: Option<DateTime<Utc>>,
}

/// The API answers a bill request with either a bill or a "nothing to bill" message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ComputeBillOutcome {
    Billed(Bill),
    NoUsage {
        message: String,
        #[serde(default)]
        period_start: Option<DateTime<Utc>>,
        #[serde(default)]
        period_end: Option<DateTime<Utc>>,
    },
}
