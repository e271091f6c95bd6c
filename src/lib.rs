//! # svcwatch
//!
//! Service health and deployment reconciliation for Marathon.
//!
//! Given a snapshot of the orchestrator's nested group tree and its list of
//! in-flight deployments, this crate builds a normalized, queryable model of
//! per-service health, package version and install time, package icons, and
//! the ordered deployment history.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  ┌─────────┐    ┌──────────┐    ┌──────────┐    ┌─────────┐  │
//! │  │ source  │───▶│ watcher  │───▶│  store   │───▶│ events  │  │
//! │  │ (input) │    │ (polling)│    │ (state)  │    │(observer│  │
//! │  └─────────┘    └──────────┘    └────┬─────┘    └─────────┘  │
//! │                                      │                       │
//! │                                      ▼                       │
//! │                                 ┌──────────┐                 │
//! │                                 │   data   │                 │
//! │                                 │(classify,│                 │
//! │                                 │ flatten, │                 │
//! │                                 │ metadata)│                 │
//! │                                 └──────────┘                 │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`data`]**: Pure transformations - health classification, group tree
//!   flattening, the [`ServiceHealthIndex`], metadata decoding and the
//!   [`DeploymentsList`]
//! - **[`store`]**: [`ServiceStore`], the owned state with atomic snapshot
//!   replacement and [`StoreEvent`] change notifications
//! - **[`source`]**: [`DataSource`] trait with file and channel implementations
//! - **[`watcher`]**: [`Watcher`], which polls sources and feeds the store
//! - **[`config`]**: [`EngineConfig`], label keys and platform settings
//!
//! ## Usage
//!
//! ```
//! use serde_json::json;
//! use svcwatch::{HealthStatus, ServiceStore, StoreEvent};
//!
//! let store = ServiceStore::default();
//! let mut events = store.subscribe();
//!
//! store
//!     .process_groups_json(json!({
//!         "apps": [{
//!             "id": "/cassandra",
//!             "tasksRunning": 3,
//!             "tasksHealthy": 3,
//!             "tasksUnhealthy": 0,
//!             "healthChecks": [{"protocol": "HTTP", "path": "/"}],
//!             "labels": {"DCOS_PACKAGE_FRAMEWORK_NAME": "cassandra"}
//!         }]
//!     }))
//!     .unwrap();
//!
//! assert_eq!(store.service_health("cassandra"), HealthStatus::Healthy);
//! assert_eq!(store.service_health("marathon"), HealthStatus::Healthy);
//! assert_eq!(store.service_health("unknown"), HealthStatus::NotAvailable);
//! assert!(matches!(events.try_recv(), Ok(StoreEvent::AppsChanged(_))));
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod source;
pub mod store;
pub mod watcher;

// Re-export main types for convenience
pub use config::{EngineConfig, LabelKeys};
pub use data::{
    classify, platform_health, DeploymentExt, DeploymentsList, HealthStatus, ServiceEntry,
    ServiceHealthIndex, ServiceImages,
};
pub use error::{ConfigError, IngestError};
pub use source::{ChannelSource, DataSource, FileSource};
pub use store::{ServiceStore, StoreEvent, StoreState};
pub use watcher::{TickOutcome, Watcher};
