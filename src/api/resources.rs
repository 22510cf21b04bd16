// Compute, disk and floating IP endpoints

use reqwest::Method;
use serde::Serialize;

use super::BillingApi;
use crate::error::ApiError;
use crate::models::{Compute, ComputeState, Disk, DiskState, FloatingIp};

#[derive(Debug, Clone, Serialize)]
pub struct ComputeCreate {
    pub resource_id: String,
    pub user_id: String,
    pub flavor: String,
}

/// PATCH body for a compute. Fields left `None` are omitted from the JSON
/// so the server keeps whatever value it currently has.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ComputeUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<ComputeState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flavor: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DiskCreate {
    pub resource_id: String,
    pub user_id: String,
    pub size_gb: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attached_to: Option<String>,
}

/// PATCH body for a disk; same omission rule as [`ComputeUpdate`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DiskUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<DiskState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_gb: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attached_to: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FloatingIpCreate {
    pub resource_id: String,
    pub user_id: String,
    pub ip_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attached_to: Option<String>,
}

impl BillingApi {
    /// `GET /resources/computes/user/{user_id}?include_deleted=...`
    pub async fn list_computes(
        &self,
        user_id: &str,
        include_deleted: bool,
    ) -> Result<Vec<Compute>, ApiError> {
        self.get_json_with_query(
            &format!("/resources/computes/user/{}", user_id),
            &[("include_deleted", include_deleted)],
        )
        .await
    }

    /// `POST /resources/computes`
    pub async fn create_compute(&self, body: &ComputeCreate) -> Result<(), ApiError> {
        self.send_without_result(Method::POST, "/resources/computes", Some(body))
            .await
    }

    /// `PATCH /resources/computes/{id}`
    pub async fn update_compute(
        &self,
        resource_id: &str,
        body: &ComputeUpdate,
    ) -> Result<(), ApiError> {
        self.send_without_result(
            Method::PATCH,
            &format!("/resources/computes/{}", resource_id),
            Some(body),
        )
        .await
    }

    /// `DELETE /resources/computes/{id}`
    pub async fn delete_compute(&self, resource_id: &str) -> Result<(), ApiError> {
        self.send_without_result::<()>(
            Method::DELETE,
            &format!("/resources/computes/{}", resource_id),
            None,
        )
        .await
    }

    /// `GET /resources/disks/user/{user_id}?include_deleted=...`
    pub async fn list_disks(
        &self,
        user_id: &str,
        include_deleted: bool,
    ) -> Result<Vec<Disk>, ApiError> {
        self.get_json_with_query(
            &format!("/resources/disks/user/{}", user_id),
            &[("include_deleted", include_deleted)],
        )
        .await
    }

    /// `POST /resources/disks`
    pub async fn create_disk(&self, body: &DiskCreate) -> Result<(), ApiError> {
        self.send_without_result(Method::POST, "/resources/disks", Some(body))
            .await
    }

    /// `PATCH /resources/disks/{id}`
    pub async fn update_disk(&self, resource_id: &str, body: &DiskUpdate) -> Result<(), ApiError> {
        self.send_without_result(
            Method::PATCH,
            &format!("/resources/disks/{}", resource_id),
            Some(body),
        )
        .await
    }

    /// `DELETE /resources/disks/{id}`
    pub async fn delete_disk(&self, resource_id: &str) -> Result<(), ApiError> {
        self.send_without_result::<()>(
            Method::DELETE,
            &format!("/resources/disks/{}", resource_id),
            None,
        )
        .await
    }

    /// `GET /resources/floating-ips/user/{user_id}?include_released=...`
    pub async fn list_floating_ips(
        &self,
        user_id: &str,
        include_released: bool,
    ) -> Result<Vec<FloatingIp>, ApiError> {
        self.get_json_with_query(
            &format!("/resources/floating-ips/user/{}", user_id),
            &[("include_released", include_released)],
        )
        .await
    }

    /// `POST /resources/floating-ips`
    pub async fn create_floating_ip(&self, body: &FloatingIpCreate) -> Result<(), ApiError> {
        self.send_without_result(Method::POST, "/resources/floating-ips", Some(body))
            .await
    }

    /// `DELETE /resources/floating-ips/{id}` (release)
    pub async fn release_floating_ip(&self, resource_id: &str) -> Result<(), ApiError> {
        self.send_without_result::<()>(
            Method::DELETE,
            &format!("/resources/floating-ips/{}", resource_id),
            None,
        )
        .await
    }
}
