//! The reconciliation store: current service index, deployments and
//! change notifications.
//!
//! The store owns its state; construct one per orchestrator and share it
//! behind an `Arc`. Both ingest operations replace their half of the state
//! wholesale and then publish exactly one [`StoreEvent`].

use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;
use svcwatch_types::{Deployment, GroupNode};
use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::data::{DeploymentsList, HealthStatus, ServiceHealthIndex, ServiceImages};
use crate::error::IngestError;

/// Change notification published after each successful ingest.
#[derive(Debug, Clone)]
pub enum StoreEvent {
    /// A new group snapshot was indexed.
    AppsChanged(Arc<ServiceHealthIndex>),
    /// A new deployment list was stored.
    DeploymentsChanged(Arc<DeploymentsList>),
}

/// A consistent view of the store at one point in time.
#[derive(Debug, Clone)]
pub struct StoreState {
    pub apps: Arc<ServiceHealthIndex>,
    pub deployments: Arc<DeploymentsList>,
}

/// Service health and deployment store.
///
/// # Example
///
/// ```
/// use svcwatch::{EngineConfig, HealthStatus, ServiceStore};
/// use serde_json::json;
///
/// let store = ServiceStore::new(EngineConfig::default());
/// let mut events = store.subscribe();
///
/// store.process_groups_json(json!({"apps": []})).unwrap();
/// assert_eq!(store.service_health("marathon"), HealthStatus::Idle);
/// assert!(events.try_recv().is_ok());
/// ```
#[derive(Debug)]
pub struct ServiceStore {
    config: EngineConfig,
    state: RwLock<StoreState>,
    events: broadcast::Sender<StoreEvent>,
}

impl ServiceStore {
    /// Create an empty store.
    pub fn new(config: EngineConfig) -> Self {
        let (events, _) = broadcast::channel(config.event_capacity.max(1));
        let state = StoreState {
            apps: Arc::new(ServiceHealthIndex::empty(&config)),
            deployments: Arc::new(DeploymentsList::default()),
        };
        Self {
            config,
            state: RwLock::new(state),
            events,
        }
    }

    /// The configuration this store was built with.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Subscribe to change notifications.
    ///
    /// Only events published after subscribing are received.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> StoreState {
        self.state.read().clone()
    }

    /// The current service index.
    pub fn apps(&self) -> Arc<ServiceHealthIndex> {
        self.state.read().apps.clone()
    }

    /// The current deployments.
    pub fn deployments(&self) -> Arc<DeploymentsList> {
        self.state.read().deployments.clone()
    }

    /// Index a group snapshot and publish `AppsChanged`.
    ///
    /// On error the previous index stays in place and nothing is published.
    pub fn process_groups(&self, root: &GroupNode) -> Result<Arc<ServiceHealthIndex>, IngestError> {
        let index = Arc::new(ServiceHealthIndex::build(root, &self.config)?);
        self.state.write().apps = index.clone();

        info!(services = index.len(), "Indexed group snapshot");
        self.publish(StoreEvent::AppsChanged(index.clone()));
        Ok(index)
    }

    /// Validate a raw group snapshot and index it.
    pub fn process_groups_json(&self, snapshot: Value) -> Result<Arc<ServiceHealthIndex>, IngestError> {
        let root: GroupNode = serde_json::from_value(snapshot)?;
        self.process_groups(&root)
    }

    /// Store a deployment list and publish `DeploymentsChanged`.
    ///
    /// Publishes on every call, including empty or unchanged lists.
    pub fn process_deployments(&self, deployments: Vec<Deployment>) -> Arc<DeploymentsList> {
        let list = Arc::new(DeploymentsList::new(deployments));
        self.state.write().deployments = list.clone();

        info!(deployments = list.len(), "Stored deployments");
        self.publish(StoreEvent::DeploymentsChanged(list.clone()));
        list
    }

    /// Validate a raw deployment array and store it.
    pub fn process_deployments_json(&self, snapshot: Value) -> Result<Arc<DeploymentsList>, IngestError> {
        let deployments: Vec<Deployment> = serde_json::from_value(snapshot)?;
        Ok(self.process_deployments(deployments))
    }

    /// Health of a service, `NotAvailable` when unknown.
    pub fn service_health(&self, name: &str) -> HealthStatus {
        self.apps().health(name)
    }

    /// Installed package version of a service.
    pub fn service_version(&self, name: &str) -> Option<String> {
        self.apps().version(name)
    }

    /// Install time of a service as an RFC 3339 timestamp.
    pub fn service_installed_time(&self, name: &str) -> Option<String> {
        self.apps().installed_time(name)
    }

    /// Icon set of a service.
    pub fn service_images(&self, name: &str) -> Option<ServiceImages> {
        self.apps().images(name)
    }

    fn publish(&self, event: StoreEvent) {
        // Sending only fails when nobody is subscribed
        if self.events.send(event).is_err() {
            debug!("No subscribers for store event");
        }
    }
}

impl Default for ServiceStore {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures;
    use chrono::DateTime;
    use serde_json::json;
    use tokio::sync::broadcast::error::TryRecvError;

    #[test]
    fn test_unknown_service_before_ingest() {
        let store = ServiceStore::default();
        assert_eq!(store.service_health("foo"), HealthStatus::NotAvailable);
        assert_eq!(store.service_version("foo"), None);
        assert_eq!(store.service_installed_time("foo"), None);
        assert_eq!(store.service_images("foo"), None);
    }

    #[test]
    fn test_unknown_service_after_ingest() {
        let store = ServiceStore::default();
        store.process_groups_json(fixtures::healthy()).unwrap();
        assert_eq!(store.service_health("foo"), HealthStatus::NotAvailable);
        assert_eq!(store.service_images("foo"), None);
    }

    #[test]
    fn test_health_for_service() {
        let store = ServiceStore::default();
        store.process_groups_json(fixtures::healthy()).unwrap();
        assert_eq!(store.service_health("Framework 1"), HealthStatus::Healthy);
    }

    #[test]
    fn test_platform_idle_with_no_apps() {
        let store = ServiceStore::default();
        store.process_groups_json(json!({"apps": []})).unwrap();
        let apps = store.state().apps;
        assert_eq!(apps.get("marathon").unwrap().health.key(), "IDLE");
    }

    #[test]
    fn test_platform_healthy_with_unhealthy_apps() {
        let store = ServiceStore::default();
        store.process_groups_json(fixtures::only_unhealthy()).unwrap();
        assert_eq!(store.service_health("marathon"), HealthStatus::Healthy);
        assert_eq!(store.service_health("Framework 1"), HealthStatus::Unhealthy);
    }

    #[test]
    fn test_platform_healthy_with_unchecked_apps() {
        let store = ServiceStore::default();
        store.process_groups_json(fixtures::no_health_checks()).unwrap();
        for (name, entry) in store.apps().iter() {
            if name == "marathon" {
                assert_eq!(entry.health, HealthStatus::Healthy);
            } else {
                assert_eq!(entry.health, HealthStatus::NotAvailable);
            }
        }
    }

    #[test]
    fn test_version_round_trip() {
        let store = ServiceStore::default();
        store.process_groups_json(fixtures::with_version()).unwrap();
        assert_eq!(store.service_version("Framework 1").as_deref(), Some("0.1.0"));

        let installed = store.service_installed_time("Framework 1").unwrap();
        assert!(DateTime::parse_from_rfc3339(&installed).is_ok());
        assert_eq!(store.service_installed_time("bloop"), None);

        store.process_groups_json(fixtures::without_version()).unwrap();
        assert_eq!(store.service_version("Framework 1"), None);
        assert_eq!(store.service_installed_time("Framework 1"), None);
    }

    #[test]
    fn test_images_round_trip() {
        let store = ServiceStore::default();
        store.process_groups_json(fixtures::with_metadata()).unwrap();

        let images = serde_json::to_value(store.service_images("Framework 1").unwrap()).unwrap();
        let keys: Vec<&str> = images.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys.len(), 3);
        assert!(keys.contains(&"icon-large"));
        assert!(keys.contains(&"icon-medium"));
        assert!(keys.contains(&"icon-small"));
    }

    #[test]
    fn test_apps_changed_published_once() {
        let store = ServiceStore::default();
        let mut events = store.subscribe();

        store.process_groups_json(fixtures::healthy()).unwrap();

        match events.try_recv().unwrap() {
            StoreEvent::AppsChanged(index) => {
                assert_eq!(index.health("Framework 1"), HealthStatus::Healthy);
            }
            other => panic!("unexpected event {:?}", other),
        }
        assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
    }

    #[test]
    fn test_invalid_snapshot_keeps_previous_state() {
        let store = ServiceStore::default();
        store.process_groups_json(fixtures::healthy()).unwrap();
        let mut events = store.subscribe();

        let result = store.process_groups_json(json!({"groups": []}));
        assert!(matches!(result, Err(IngestError::Schema(_))));

        assert_eq!(store.service_health("Framework 1"), HealthStatus::Healthy);
        assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
    }

    #[test]
    fn test_duplicate_services_rejected() {
        let store = ServiceStore::default();
        let snapshot = json!({
            "apps": [
                {"id": "/a", "labels": {"DCOS_PACKAGE_FRAMEWORK_NAME": "kafka"}},
                {"id": "/b", "labels": {"DCOS_PACKAGE_FRAMEWORK_NAME": "kafka"}}
            ]
        });
        assert!(matches!(
            store.process_groups_json(snapshot),
            Err(IngestError::DuplicateService { .. })
        ));
        assert_eq!(store.apps().len(), 1);
    }

    #[test]
    fn test_deployments_stored_and_published() {
        let store = ServiceStore::default();
        let mut events = store.subscribe();

        store
            .process_deployments_json(json!([{"id": "deployment-id"}]))
            .unwrap();

        let deployments = store.state().deployments;
        assert_eq!(deployments.last().unwrap().id(), "deployment-id");

        match events.try_recv().unwrap() {
            StoreEvent::DeploymentsChanged(list) => {
                assert_eq!(list.last().unwrap().id(), "deployment-id");
            }
            other => panic!("unexpected event {:?}", other),
        }
        assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
    }

    #[test]
    fn test_deployments_published_even_when_unchanged() {
        let store = ServiceStore::default();
        let mut events = store.subscribe();

        store.process_deployments(Vec::new());
        store.process_deployments(Vec::new());

        let mut received = 0;
        while let Ok(StoreEvent::DeploymentsChanged(list)) = events.try_recv() {
            assert!(list.is_empty());
            received += 1;
        }
        assert_eq!(received, 2);
    }

    #[test]
    fn test_invalid_deployments_rejected() {
        let store = ServiceStore::default();
        let result = store.process_deployments_json(json!({"id": "not-an-array"}));
        assert!(matches!(result, Err(IngestError::Schema(_))));
        assert!(store.deployments().is_empty());
    }

    #[test]
    fn test_state_snapshot_is_stable_across_ingest() {
        let store = ServiceStore::default();
        store.process_groups_json(fixtures::healthy()).unwrap();
        let before = store.state();

        store.process_groups_json(json!({"apps": []})).unwrap();

        // The earlier snapshot is untouched by the replacement
        assert_eq!(before.apps.health("Framework 1"), HealthStatus::Healthy);
        assert_eq!(store.service_health("Framework 1"), HealthStatus::NotAvailable);
    }

    #[test]
    fn test_concurrent_readers_see_whole_snapshots() {
        use std::thread;

        let store = Arc::new(ServiceStore::default());
        let writer = {
            let store = store.clone();
            thread::spawn(move || {
                for i in 0..200 {
                    let snapshot = if i % 2 == 0 {
                        fixtures::healthy()
                    } else {
                        json!({"apps": []})
                    };
                    store.process_groups_json(snapshot).unwrap();
                }
            })
        };

        for _ in 0..200 {
            let apps = store.apps();
            let platform = apps.platform().unwrap().health;
            let service = apps.health("Framework 1");
            // Platform and services always come from the same snapshot
            match platform {
                HealthStatus::Idle => assert_eq!(service, HealthStatus::NotAvailable),
                HealthStatus::Healthy => assert_eq!(service, HealthStatus::Healthy),
                other => panic!("unexpected platform health {:?}", other),
            }
        }

        writer.join().unwrap();
    }
}
