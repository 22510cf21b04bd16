// Billing endpoints: bill history, on-demand computation, retry

use reqwest::Method;

use super::BillingApi;
use crate::error::ApiError;
use crate::models::{Bill, ComputeBillOutcome, ComputeBillRequest};

impl BillingApi {
    /// `GET /billing/user/{user_id}`
    pub async fn list_bills(&self, user_id: &str) -> Result<Vec<Bill>, ApiError> {
        self.get_json(&format!("/billing/user/{}", user_id)).await
    }

    /// `GET /billing/{bill_id}`
    pub async fn get_bill(&self, bill_id: &str) -> Result<Bill, ApiError> {
        self.get_json(&format!("/billing/{}", bill_id)).await
    }

    /// `POST /billing/compute`
    pub async fn compute_bill(
        &self,
        body: &ComputeBillRequest,
    ) -> Result<ComputeBillOutcome, ApiError> {
        self.send_json(Method::POST, "/billing/compute", body).await
    }

    /// `POST /billing/{bill_id}/retry`; the server refuses bills that are already paid.
    pub async fn retry_bill(&self, bill_id: &str) -> Result<Bill, ApiError> {
        self.send_json(
            Method::POST,
            &format!("/billing/{}/retry", bill_id),
            &serde_json::json!({}),
        )
        .await
    }
}
