// Wallet and ledger models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WalletSettings {
    #[serde(default)]
    pub auto_recharge: bool,
    #[serde(default)]
    pub allow_negative: bool,
    #[serde(default)]
    pub last_deducted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wallet {
    pub user_id: String,
    pub balance: Decimal,
    pub currency: String,
    /// The API nests the flags under `wallet`.
    #[serde(rename = "wallet", default)]
    pub settings: WalletSettings,
}

/// Body of `POST /wallets/`.
#[derive(Debug, Clone, Serialize)]
pub struct WalletCreate {
    pub user_id: String,
    pub balance: f64,
    pub currency: String,
    pub auto_recharge: bool,
    pub allow_negative: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Credit,
    Debit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub tx_id: String,
    #[serde(rename = "type")]
    pub tx_type: TransactionType,
    pub amount: Decimal,
    #[serde(default)]
    pub reason: String,
    pub time: DateTime<Utc>,
    /// Balance right after this transaction, as computed by the server.
    pub balance_after: Decimal,
    #[serde(default, alias = "billing_cycle.price_version")]
    pub price_version: Option<String>,
}

/// Body of `GET /wallets/{user_id}/transactions`.
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionHistory {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

/// Body of `POST /wallets/{user_id}/credit`.
#[derive(Debug, Clone, Serialize)]
pub struct CreditRequest {
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub reason: String,
}
