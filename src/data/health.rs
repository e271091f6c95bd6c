//! Health classification for applications and the platform entry.

use std::fmt;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use svcwatch_types::AppRecord;

/// Discrete health state of a service.
///
/// Each variant carries a fixed numeric code (see [`HealthStatus::value`])
/// and a display label. Ordered by severity so the worst state sorts last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum HealthStatus {
    Healthy,
    Idle,
    #[default]
    NotAvailable,
    Unhealthy,
}

impl HealthStatus {
    pub const ALL: [HealthStatus; 4] = [
        HealthStatus::Healthy,
        HealthStatus::Unhealthy,
        HealthStatus::Idle,
        HealthStatus::NotAvailable,
    ];

    /// Returns the enumeration key.
    pub fn key(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "HEALTHY",
            HealthStatus::Unhealthy => "UNHEALTHY",
            HealthStatus::Idle => "IDLE",
            HealthStatus::NotAvailable => "NA",
        }
    }

    /// Returns the numeric health code.
    pub fn value(&self) -> u8 {
        match self {
            HealthStatus::Healthy => 0,
            HealthStatus::Unhealthy => 1,
            HealthStatus::Idle => 2,
            HealthStatus::NotAvailable => 3,
        }
    }

    /// Returns a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "Healthy",
            HealthStatus::Unhealthy => "Unhealthy",
            HealthStatus::Idle => "Idle",
            HealthStatus::NotAvailable => "N/A",
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl Serialize for HealthStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("HealthStatus", 2)?;
        state.serialize_field("key", self.key())?;
        state.serialize_field("value", &self.value())?;
        state.end()
    }
}

/// Classify an application from its task counters.
///
/// Counters are only considered once a health check is configured, and
/// unhealthy tasks outweigh healthy ones.
pub fn classify(app: &AppRecord) -> HealthStatus {
    if !app.has_health_checks() {
        HealthStatus::NotAvailable
    } else if app.tasks_running == 0 {
        HealthStatus::Idle
    } else if app.tasks_unhealthy > 0 {
        HealthStatus::Unhealthy
    } else if app.tasks_healthy > 0 {
        HealthStatus::Healthy
    } else {
        HealthStatus::NotAvailable
    }
}

/// Health of the platform entry.
///
/// The platform is idle with no applications and healthy otherwise,
/// whatever the applications' own health.
pub fn platform_health(app_count: usize) -> HealthStatus {
    if app_count == 0 {
        HealthStatus::Idle
    } else {
        HealthStatus::Healthy
    }
}
