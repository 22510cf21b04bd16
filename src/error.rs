// Error taxonomy: billing API failures, policy refusals, panel actions

use crate::models::ResourceKind;
use crate::policy::Action;

/// Errors from the billing API layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The HTTP request itself failed (connect, timeout, TLS, undecodable body).
    #[error("billing API request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// HTTP 404; for a wallet this is what triggers provisioning.
    #[error("not found: {detail}")]
    NotFound { detail: String },

    /// Any other non-2xx status.
    #[error("billing API rejected the request ({status}): {detail}")]
    Rejected { status: u16, detail: String },
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound { .. })
    }

    /// What the operator sees: the server's detail text when there is one,
    /// else the raw error description.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::NotFound { detail } | ApiError::Rejected { detail, .. } => detail.clone(),
            ApiError::Transport(e) => e.to_string(),
        }
    }
}

/// Refusals raised before anything is sent to the billing API.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PolicyError {
    #[error("{action} is not allowed on {kind} {resource_id} in its current state")]
    NotPermitted {
        kind: &'static str,
        resource_id: String,
        action: Action,
    },

    #[error("resize needs a flavor")]
    MissingFlavor,

    #[error("resize needs a size in GB greater than zero")]
    InvalidSize,

    #[error("no {kind} {resource_id} is listed for user {user_id}")]
    UnknownResource {
        kind: &'static str,
        resource_id: String,
        user_id: String,
    },

    #[error("{0}")]
    InvalidInput(String),
}

impl PolicyError {
    pub(crate) fn not_permitted(kind: ResourceKind, resource_id: &str, action: Action) -> Self {
        PolicyError::NotPermitted {
            kind: kind.label(),
            resource_id: resource_id.to_string(),
            action,
        }
    }
}

/// Failure of a panel or sidebar mutation.
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error(transparent)]
    Policy(#[from] PolicyError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl ActionError {
    pub fn user_message(&self) -> String {
        match self {
            ActionError::Policy(e) => e.to_string(),
            ActionError::Api(e) => e.user_message(),
        }
    }
}
