//! Ordered collection of in-flight deployments.

use chrono::{DateTime, Utc};
use serde::Serialize;
use svcwatch_types::Deployment;

use super::metadata::parse_timestamp;

/// Deployments in the order the orchestrator reported them.
///
/// "Last" means last in that order; nothing is re-sorted by time.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DeploymentsList {
    items: Vec<Deployment>,
}

impl DeploymentsList {
    /// Wrap an ordered sequence of deployments.
    pub fn new(items: Vec<Deployment>) -> Self {
        Self { items }
    }

    /// The most recently added deployment.
    pub fn last(&self) -> Option<&Deployment> {
        self.items.last()
    }

    /// Find a deployment by id.
    pub fn get(&self, id: &str) -> Option<&Deployment> {
        self.items.iter().find(|d| d.id == id)
    }

    /// Deployments that change the given application.
    pub fn affecting<'a>(&'a self, app_id: &'a str) -> impl Iterator<Item = &'a Deployment> + 'a {
        self.items.iter().filter(move |d| d.affects(app_id))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Deployment> {
        self.items.iter()
    }
}

impl From<Vec<Deployment>> for DeploymentsList {
    fn from(items: Vec<Deployment>) -> Self {
        Self::new(items)
    }
}

impl FromIterator<Deployment> for DeploymentsList {
    fn from_iter<I: IntoIterator<Item = Deployment>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Derived views over a single deployment record.
pub trait DeploymentExt {
    /// Fraction of steps completed, when the plan size is known.
    fn progress(&self) -> Option<f64>;

    /// When the deployment started.
    fn started_at(&self) -> Option<DateTime<Utc>>;
}

impl DeploymentExt for Deployment {
    fn progress(&self) -> Option<f64> {
        match (self.current_step, self.total_steps) {
            (Some(current), Some(total)) if total > 0 => {
                // current_step is the step in flight, so it is not done yet
                Some(f64::from(current.saturating_sub(1).min(total)) / f64::from(total))
            }
            _ => None,
        }
    }

    fn started_at(&self) -> Option<DateTime<Utc>> {
        self.version.as_deref().and_then(parse_timestamp)
    }
}
