//! Data models and processing for orchestrator snapshots.
//!
//! This module turns raw group and deployment snapshots into a normalized,
//! queryable model.
//!
//! ## Submodules
//!
//! - [`health`]: Health classification ([`HealthStatus`], [`classify`], [`platform_health`])
//! - [`flatten`]: Flattening of the nested group tree into a service map
//! - [`index`]: The queryable [`ServiceHealthIndex`]
//! - [`metadata`]: Version, install time and icon extraction from labels
//! - [`deployments`]: The ordered [`DeploymentsList`]
//!
//! ## Data Flow
//!
//! ```text
//! GroupNode (raw JSON)
//!        │
//!        ▼
//! flatten()  ──▶ service name → AppRecord (+ platform record)
//!        │
//!        ▼
//! ServiceHealthIndex::build()
//!        │
//!        ├──▶ classify() for every service
//!        ├──▶ platform_health() for the platform entry
//!        └──▶ metadata::* on query
//!
//! [Deployment] (raw JSON) ──▶ DeploymentsList
//! ```

pub mod deployments;
pub mod flatten;
pub mod health;
pub mod index;
pub mod metadata;

#[cfg(test)]
pub(crate) mod fixtures;

pub use deployments::{DeploymentExt, DeploymentsList};
pub use flatten::{flatten, service_key, service_name};
pub use health::{classify, platform_health, HealthStatus};
pub use index::{ServiceEntry, ServiceHealthIndex};
pub use metadata::ServiceImages;
