// Compute, disk and floating IP resources as served by the billing API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Compute,
    Disk,
    FloatingIp,
}

impl ResourceKind {
    /// Prefix used when minting resource ids on create.
    pub fn id_prefix(self) -> &'static str {
        match self {
            ResourceKind::Compute => "compute",
            ResourceKind::Disk => "disk",
            ResourceKind::FloatingIp => "ip",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ResourceKind::Compute => "compute",
            ResourceKind::Disk => "disk",
            ResourceKind::FloatingIp => "floating IP",
        }
    }
}

/// Compute instance state; serializes to lowercase JSON (e.g. "running").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComputeState {
    Running,
    Stopped,
    Deleted,
    #[serde(other)]
    Unknown,
}

impl ComputeState {
    pub fn as_str(self) -> &'static str {
        match self {
            ComputeState::Running => "running",
            ComputeState::Stopped => "stopped",
            ComputeState::Deleted => "deleted",
            ComputeState::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiskState {
    Attached,
    Detached,
    Deleted,
    #[serde(other)]
    Unknown,
}

impl DiskState {
    pub fn as_str(self) -> &'static str {
        match self {
            DiskState::Attached => "attached",
            DiskState::Detached => "detached",
            DiskState::Deleted => "deleted",
            DiskState::Unknown => "unknown",
        }
    }
}

/// One entry of a resource's history. `type` is a free-form action tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(default)]
    pub event_id: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    pub time: DateTime<Utc>,
    #[serde(default)]
    pub meta: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Compute {
    pub resource_id: String,
    pub user_id: String,
    pub state: ComputeState,
    #[serde(alias = "current_flavor")]
    pub flavor: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_state_change: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_billed_until: Option<DateTime<Utc>>,
    /// Chronological, oldest first.
    #[serde(default)]
    pub events: Vec<Event>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Disk {
    pub resource_id: String,
    pub user_id: String,
    pub state: DiskState,
    pub size_gb: u64,
    #[serde(default)]
    pub attached_to: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_state_change: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_billed_until: Option<DateTime<Utc>>,
    #[serde(default)]
    pub events: Vec<Event>,
}

/// Floating IPs carry no state field; `released_at` marks the end of life.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FloatingIp {
    pub resource_id: String,
    pub user_id: String,
    pub ip_address: String,
    #[serde(default)]
    pub port_id: Option<String>,
    #[serde(default)]
    pub attached_to: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub released_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_state_change: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_billed_until: Option<DateTime<Utc>>,
    #[serde(default)]
    pub events: Vec<Event>,
}

/// Common view over the three resource kinds.
pub trait Resource {
    const KIND: ResourceKind;

    fn resource_id(&self) -> &str;

    fn events(&self) -> &[Event];

    /// Deleted or released; nothing may change it any more.
    fn is_terminal(&self) -> bool;

    /// Short status shown on the card.
    fn status_label(&self) -> String;
}

impl Resource for Compute {
    const KIND: ResourceKind = ResourceKind::Compute;

    fn resource_id(&self) -> &str {
        &self.resource_id
    }

    fn events(&self) -> &[Event] {
        &self.events
    }

    fn is_terminal(&self) -> bool {
        self.deleted_at.is_some()
    }

    fn status_label(&self) -> String {
        if self.is_terminal() {
            "deleted".into()
        } else {
            self.state.as_str().into()
        }
    }
}

impl Resource for Disk {
    const KIND: ResourceKind = ResourceKind::Disk;

    fn resource_id(&self) -> &str {
        &self.resource_id
    }

    fn events(&self) -> &[Event] {
        &self.events
    }

    fn is_terminal(&self) -> bool {
        self.deleted_at.is_some()
    }

    fn status_label(&self) -> String {
        if self.is_terminal() {
            return "deleted".into();
        }
        match (&self.state, &self.attached_to) {
            (DiskState::Attached, Some(target)) => format!("attached to {}", target),
            (state, _) => state.as_str().into(),
        }
    }
}

impl Resource for FloatingIp {
    const KIND: ResourceKind = ResourceKind::FloatingIp;

    fn resource_id(&self) -> &str {
        &self.resource_id
    }

    fn events(&self) -> &[Event] {
        &self.events
    }

    fn is_terminal(&self) -> bool {
        self.released_at.is_some()
    }

    fn status_label(&self) -> String {
        if self.is_terminal() {
            "released".into()
        } else if let Some(target) = &self.attached_to {
            format!("attached to {}", target)
        } else {
            "allocated".into()
        }
    }
}
