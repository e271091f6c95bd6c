//! Polling glue between data sources and the store.

use std::sync::Arc;

use svcwatch_types::{Deployment, GroupNode};
use tracing::warn;

use crate::source::DataSource;
use crate::store::ServiceStore;

/// What a single [`Watcher::tick`] ingested.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickOutcome {
    pub groups: bool,
    pub deployments: bool,
}

impl TickOutcome {
    /// True if anything was ingested.
    pub fn changed(&self) -> bool {
        self.groups || self.deployments
    }
}

/// Feeds snapshots from a groups source and a deployments source into a
/// store.
///
/// Errors never abort the loop; the most recent one is kept in
/// `load_error` until a later tick succeeds.
#[derive(Debug)]
pub struct Watcher {
    store: Arc<ServiceStore>,
    groups: Box<dyn DataSource<GroupNode>>,
    deployments: Option<Box<dyn DataSource<Vec<Deployment>>>>,
    pub load_error: Option<String>,
}

impl Watcher {
    /// Create a watcher for a groups source. Deployments are optional.
    pub fn new(
        store: Arc<ServiceStore>,
        groups: Box<dyn DataSource<GroupNode>>,
        deployments: Option<Box<dyn DataSource<Vec<Deployment>>>>,
    ) -> Self {
        Self {
            store,
            groups,
            deployments,
            load_error: None,
        }
    }

    /// The store snapshots are ingested into.
    pub fn store(&self) -> &Arc<ServiceStore> {
        &self.store
    }

    /// Descriptions of the configured sources.
    pub fn source_descriptions(&self) -> Vec<&str> {
        let mut descriptions = vec![self.groups.description()];
        if let Some(deployments) = &self.deployments {
            descriptions.push(deployments.description());
        }
        descriptions
    }

    /// Poll every source once and ingest whatever arrived.
    pub fn tick(&mut self) -> TickOutcome {
        let mut outcome = TickOutcome::default();
        let mut error = None;

        if let Some(root) = self.groups.poll() {
            match self.store.process_groups(&root) {
                Ok(_) => outcome.groups = true,
                Err(e) => {
                    warn!(source = %self.groups.description(), error = %e, "Rejected group snapshot");
                    error = Some(e.to_string());
                }
            }
        } else if let Some(err) = self.groups.error() {
            error = Some(err.to_string());
        }

        if let Some(source) = self.deployments.as_mut() {
            if let Some(deployments) = source.poll() {
                self.store.process_deployments(deployments);
                outcome.deployments = true;
            } else if let Some(err) = source.error() {
                error.get_or_insert_with(|| err.to_string());
            }
        }

        if error.is_some() || outcome.changed() {
            self.load_error = error;
        }
        outcome
    }
}
