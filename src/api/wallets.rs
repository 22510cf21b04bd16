// Wallet and ledger endpoints

use reqwest::Method;

use super::BillingApi;
use crate::error::ApiError;
use crate::models::{CreditRequest, Transaction, TransactionHistory, Wallet, WalletCreate};

impl BillingApi {
    /// `GET /wallets/{user_id}`; [`ApiError::NotFound`] when the user has no wallet.
    pub async fn get_wallet(&self, user_id: &str) -> Result<Wallet, ApiError> {
        self.get_json(&format!("/wallets/{}", user_id)).await
    }

    /// `POST /wallets/`
    pub async fn create_wallet(&self, body: &WalletCreate) -> Result<(), ApiError> {
        self.send_without_result(Method::POST, "/wallets/", Some(body))
            .await
    }

    /// `GET /wallets/{user_id}/transactions`, oldest first as stored.
    pub async fn list_transactions(&self, user_id: &str) -> Result<Vec<Transaction>, ApiError> {
        let history: TransactionHistory = self
            .get_json(&format!("/wallets/{}/transactions", user_id))
            .await?;
        Ok(history.transactions)
    }

    /// `POST /wallets/{user_id}/credit`
    pub async fn add_credit(&self, user_id: &str, body: &CreditRequest) -> Result<(), ApiError> {
        self.send_without_result(
            Method::POST,
            &format!("/wallets/{}/credit", user_id),
            Some(body),
        )
        .await
    }
}
