//! In-flight deployment records.

use alloc::string::String;
use alloc::vec::Vec;

/// A deployment the orchestrator is currently executing.
///
/// Beyond `id` the record is informational; unknown fields in the
/// orchestrator response are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Deployment {
    /// Deployment identifier.
    pub id: String,

    /// When the deployment started, as an ISO-8601 timestamp.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub version: Option<String>,

    /// Ids of the applications this deployment changes.
    #[cfg_attr(feature = "serde", serde(default))]
    pub affected_apps: Vec<String>,

    /// One-based index of the step being executed.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub current_step: Option<u32>,

    /// Total number of steps in the plan.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub total_steps: Option<u32>,

    /// Actions of the current step.
    #[cfg_attr(feature = "serde", serde(default))]
    pub current_actions: Vec<DeploymentAction>,
}

impl Deployment {
    /// Create a deployment with only an id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// The deployment identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Whether the deployment touches the given application.
    pub fn affects(&self, app_id: &str) -> bool {
        self.affected_apps.iter().any(|a| a == app_id)
    }
}

/// A single action within a deployment step.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DeploymentAction {
    /// Action kind, e.g. `StartApplication` or `ScaleApplication`.
    pub action: String,
    /// Application the action applies to.
    pub app: String,
}
