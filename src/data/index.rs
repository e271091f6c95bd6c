//! Queryable index of per-service health and metadata.

use std::collections::BTreeMap;

use serde::Serialize;
use svcwatch_types::{AppRecord, GroupNode};

use super::flatten::{flatten, platform_record, service_key};
use super::health::{classify, platform_health, HealthStatus};
use super::metadata::{self, ServiceImages};
use crate::config::EngineConfig;
use crate::error::IngestError;

/// An indexed service: the application as reported plus its health.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceEntry {
    pub app: AppRecord,
    pub health: HealthStatus,
}

/// Per-service health built from one group snapshot.
///
/// Always contains the platform entry. Lookups are case-insensitive and
/// unknown services report `HealthStatus::NotAvailable` or `None`.
#[derive(Debug, Clone)]
pub struct ServiceHealthIndex {
    entries: BTreeMap<String, ServiceEntry>,
    config: EngineConfig,
}

impl ServiceHealthIndex {
    /// Index with no applications, only an idle platform entry.
    pub fn empty(config: &EngineConfig) -> Self {
        let platform = ServiceEntry {
            app: platform_record(&config.platform_id, 0),
            health: platform_health(0),
        };
        Self {
            entries: BTreeMap::from([(service_key(&config.platform_id), platform)]),
            config: config.clone(),
        }
    }

    /// Flatten a group tree and classify every service in it.
    pub fn build(root: &GroupNode, config: &EngineConfig) -> Result<Self, IngestError> {
        let platform_key = service_key(&config.platform_id);

        let entries = flatten(root, config)?
            .into_iter()
            .map(|(name, app)| {
                let health = if name == platform_key {
                    platform_health(app.tasks_running as usize)
                } else {
                    classify(&app)
                };
                (name, ServiceEntry { app, health })
            })
            .collect();

        Ok(Self {
            entries,
            config: config.clone(),
        })
    }

    /// Look up a service entry by name.
    pub fn get(&self, name: &str) -> Option<&ServiceEntry> {
        self.entries.get(&service_key(name))
    }

    /// The synthetic platform entry.
    pub fn platform(&self) -> Option<&ServiceEntry> {
        self.get(&self.config.platform_id)
    }

    /// Health of a service, `NotAvailable` when unknown.
    pub fn health(&self, name: &str) -> HealthStatus {
        self.get(name).map(|e| e.health).unwrap_or_default()
    }

    /// Installed package version of a service.
    pub fn version(&self, name: &str) -> Option<String> {
        let entry = self.get(name)?;
        metadata::service_version(&entry.app, &self.config.labels)
    }

    /// When a service's current configuration was installed (RFC 3339).
    pub fn installed_time(&self, name: &str) -> Option<String> {
        metadata::installed_time(&self.get(name)?.app)
    }

    /// Icon set of a service.
    pub fn images(&self, name: &str) -> Option<ServiceImages> {
        let key = service_key(name);
        let entry = self.entries.get(&key)?;
        if key == service_key(&self.config.platform_id) {
            return Some(self.config.platform_images.clone());
        }
        metadata::service_images(&entry.app, &self.config.labels)
    }

    /// Number of entries, including the platform entry.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the index has no entries at all.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &ServiceEntry)> {
        self.entries.iter()
    }

    /// Count of ordinary services per health status.
    pub fn summary(&self) -> BTreeMap<HealthStatus, usize> {
        let platform_key = service_key(&self.config.platform_id);
        let mut counts = BTreeMap::new();
        for (name, entry) in &self.entries {
            if *name != platform_key {
                *counts.entry(entry.health).or_insert(0) += 1;
            }
        }
        counts
    }
}
