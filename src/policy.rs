// Which actions a resource admits right now, and what each one asks the API to do.
// Pure: no I/O, decided only from the last fetched state of the resource.

use serde::{Deserialize, Serialize};

use crate::api::{ComputeUpdate, DiskUpdate};
use crate::error::PolicyError;
use crate::models::{Compute, ComputeState, Disk, DiskState, FloatingIp, Resource};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Start,
    Stop,
    Resize,
    Delete,
    Release,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Start => "start",
            Action::Stop => "stop",
            Action::Resize => "resize",
            Action::Delete => "delete",
            Action::Release => "release",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a legal action will request from the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    /// New lifecycle state, e.g. "stopped".
    State(&'static str),
    /// New flavor, chosen by the operator.
    Flavor,
    /// New size in GB, chosen by the operator.
    SizeGb,
    Deleted,
    Released,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LegalAction {
    pub action: Action,
    pub target: Target,
}

impl LegalAction {
    fn new(action: Action, target: Target) -> Self {
        Self { action, target }
    }
}

/// Operator input for actions that need one (resize).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ActionArgs {
    #[serde(default)]
    pub flavor: Option<String>,
    #[serde(default)]
    pub size_gb: Option<u64>,
}

/// A planned call against the billing API.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    UpdateCompute {
        resource_id: String,
        body: ComputeUpdate,
    },
    DeleteCompute {
        resource_id: String,
    },
    UpdateDisk {
        resource_id: String,
        body: DiskUpdate,
    },
    DeleteDisk {
        resource_id: String,
    },
    ReleaseFloatingIp {
        resource_id: String,
    },
}

pub trait ActionPolicy: Resource {
    /// Empty for terminal resources.
    fn legal_actions(&self) -> Vec<LegalAction>;

    /// Turn `action` into the request to send, or refuse it.
    fn plan(&self, action: Action, args: &ActionArgs) -> Result<Mutation, PolicyError>;

    fn permits(&self, action: Action) -> bool {
        self.legal_actions().iter().any(|a| a.action == action)
    }

    fn ensure_permitted(&self, action: Action) -> Result<(), PolicyError> {
        if self.permits(action) {
            Ok(())
        } else {
            Err(PolicyError::not_permitted(
                Self::KIND,
                self.resource_id(),
                action,
            ))
        }
    }
}

impl ActionPolicy for Compute {
    fn legal_actions(&self) -> Vec<LegalAction> {
        if self.is_terminal() {
            return Vec::new();
        }
        match self.state {
            ComputeState::Running => vec![
                LegalAction::new(Action::Stop, Target::State(ComputeState::Stopped.as_str())),
                LegalAction::new(Action::Resize, Target::Flavor),
                LegalAction::new(Action::Delete, Target::Deleted),
            ],
            ComputeState::Stopped => vec![
                LegalAction::new(Action::Start, Target::State(ComputeState::Running.as_str())),
                LegalAction::new(Action::Resize, Target::Flavor),
                LegalAction::new(Action::Delete, Target::Deleted),
            ],
            ComputeState::Deleted | ComputeState::Unknown => Vec::new(),
        }
    }

    fn plan(&self, action: Action, args: &ActionArgs) -> Result<Mutation, PolicyError> {
        self.ensure_permitted(action)?;
        let resource_id = self.resource_id.clone();
        let update = |body| Mutation::UpdateCompute {
            resource_id: resource_id.clone(),
            body,
        };
        Ok(match action {
            Action::Start => update(ComputeUpdate {
                state: Some(ComputeState::Running),
                flavor: None,
            }),
            Action::Stop => update(ComputeUpdate {
                state: Some(ComputeState::Stopped),
                flavor: None,
            }),
            Action::Resize => {
                let flavor = args
                    .flavor
                    .as_deref()
                    .map(str::trim)
                    .filter(|f| !f.is_empty())
                    .ok_or(PolicyError::MissingFlavor)?;
                update(ComputeUpdate {
                    state: None,
                    flavor: Some(flavor.to_string()),
                })
            }
            Action::Delete => Mutation::DeleteCompute {
                resource_id: resource_id.clone(),
            },
            other => return Err(PolicyError::not_permitted(Self::KIND, &self.resource_id, other)),
        })
    }
}

impl ActionPolicy for Disk {
    fn legal_actions(&self) -> Vec<LegalAction> {
        if self.is_terminal() {
            return Vec::new();
        }
        match self.state {
            DiskState::Attached | DiskState::Detached => vec![
                LegalAction::new(Action::Resize, Target::SizeGb),
                LegalAction::new(Action::Delete, Target::Deleted),
            ],
            DiskState::Deleted | DiskState::Unknown => Vec::new(),
        }
    }

    fn plan(&self, action: Action, args: &ActionArgs) -> Result<Mutation, PolicyError> {
        self.ensure_permitted(action)?;
        Ok(match action {
            Action::Resize => {
                let size_gb = args
                    .size_gb
                    .filter(|s| *s > 0)
                    .ok_or(PolicyError::InvalidSize)?;
                Mutation::UpdateDisk {
                    resource_id: self.resource_id.clone(),
                    body: DiskUpdate {
                        size_gb: Some(size_gb),
                        ..DiskUpdate::default()
                    },
                }
            }
            Action::Delete => Mutation::DeleteDisk {
                resource_id: self.resource_id.clone(),
            },
            other => return Err(PolicyError::not_permitted(Self::KIND, &self.resource_id, other)),
        })
    }
}

impl ActionPolicy for FloatingIp {
    fn legal_actions(&self) -> Vec<LegalAction> {
        if self.is_terminal() {
            Vec::new()
        } else {
            vec![LegalAction::new(Action::Release, Target::Released)]
        }
    }

    fn plan(&self, action: Action, _args: &ActionArgs) -> Result<Mutation, PolicyError> {
        self.ensure_permitted(action)?;
        Ok(Mutation::ReleaseFloatingIp {
            resource_id: self.resource_id.clone(),
        })
    }
}
