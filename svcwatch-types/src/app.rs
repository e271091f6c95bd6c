//! Application records as reported inside a group snapshot.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

/// A single application (service) in the orchestrator's workload tree.
///
/// Task counters are whatever the orchestrator last reported. They are only
/// meaningful when at least one health check is configured.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct AppRecord {
    /// Absolute application path, e.g. `/prod/web`.
    pub id: String,

    /// Number of tasks currently running.
    #[cfg_attr(feature = "serde", serde(default))]
    pub tasks_running: u64,

    /// Number of running tasks passing all health checks.
    #[cfg_attr(feature = "serde", serde(default))]
    pub tasks_healthy: u64,

    /// Number of running tasks failing at least one health check.
    #[cfg_attr(feature = "serde", serde(default))]
    pub tasks_unhealthy: u64,

    /// Configured health checks. Only their presence matters for classification.
    #[cfg_attr(feature = "serde", serde(default))]
    pub health_checks: Vec<HealthCheck>,

    /// Free-form labels. Package installs store their metadata here.
    #[cfg_attr(feature = "serde", serde(default))]
    pub labels: BTreeMap<String, String>,

    /// Configuration version. Marathon reports an ISO-8601 timestamp.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub version: Option<String>,

    /// Timestamps of the last scaling and configuration changes.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub version_info: Option<VersionInfo>,

    /// Desired number of instances.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub instances: Option<u64>,
}

impl AppRecord {
    /// Create an application with the given id and no tasks.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Create a builder for an application record.
    pub fn builder(id: impl Into<String>) -> AppRecordBuilder {
        AppRecordBuilder::new(id)
    }

    /// Whether any health check is configured.
    pub fn has_health_checks(&self) -> bool {
        !self.health_checks.is_empty()
    }

    /// Look up a label value.
    pub fn label(&self, key: &str) -> Option<&str> {
        self.labels.get(key).map(String::as_str)
    }
}

/// Health check definition.
///
/// Only the presence of a check affects classification.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct HealthCheck {
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub protocol: Option<String>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub path: Option<String>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub port_index: Option<u32>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub grace_period_seconds: Option<u64>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub interval_seconds: Option<u64>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub timeout_seconds: Option<u64>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub max_consecutive_failures: Option<u32>,
}

impl HealthCheck {
    /// An HTTP health check against `path` on the first port.
    pub fn http(path: impl Into<String>) -> Self {
        Self {
            protocol: Some("HTTP".into()),
            path: Some(path.into()),
            port_index: Some(0),
            ..Default::default()
        }
    }

    /// A TCP health check on the first port.
    pub fn tcp() -> Self {
        Self {
            protocol: Some("TCP".into()),
            port_index: Some(0),
            ..Default::default()
        }
    }
}

/// Change timestamps reported alongside an application's version.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct VersionInfo {
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub last_scaling_at: Option<String>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub last_config_change_at: Option<String>,
}

/// Builder for `AppRecord`.
#[derive(Debug)]
pub struct AppRecordBuilder {
    app: AppRecord,
}

impl AppRecordBuilder {
    /// Create a new builder for the given application id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            app: AppRecord::new(id),
        }
    }

    /// Set running, healthy and unhealthy task counts.
    pub fn tasks(mut self, running: u64, healthy: u64, unhealthy: u64) -> Self {
        self.app.tasks_running = running;
        self.app.tasks_healthy = healthy;
        self.app.tasks_unhealthy = unhealthy;
        self
    }

    /// Add a health check.
    pub fn health_check(mut self, check: HealthCheck) -> Self {
        self.app.health_checks.push(check);
        self
    }

    /// Add a label.
    pub fn label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.app.labels.insert(key.into(), value.into());
        self
    }

    /// Set the configuration version.
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.app.version = Some(version.into());
        self
    }

    /// Set the last configuration change timestamp.
    pub fn last_config_change_at(mut self, at: impl Into<String>) -> Self {
        self.app
            .version_info
            .get_or_insert_with(VersionInfo::default)
            .last_config_change_at = Some(at.into());
        self
    }

    /// Set the desired instance count.
    pub fn instances(mut self, instances: u64) -> Self {
        self.app.instances = Some(instances);
        self
    }

    /// Build the application record.
    pub fn build(self) -> AppRecord {
        self.app
    }
}
