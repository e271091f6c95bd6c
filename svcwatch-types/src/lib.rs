//! # svcwatch-types
//!
//! Schema types for the snapshots svcwatch consumes: the nested group tree
//! returned by Marathon's `/v2/groups` endpoint and the in-flight deployment
//! list returned by `/v2/deployments`.
//!
//! ## Features
//!
//! - `std` (default): Standard library support
//! - `serde`: JSON deserialization of orchestrator responses via serde
//!
//! ## Example
//!
//! ```rust
//! use svcwatch_types::{GroupNode, HealthCheck};
//!
//! let root = GroupNode::builder()
//!     .app("/web", |a| {
//!         a.tasks(3, 3, 0)
//!          .health_check(HealthCheck::http("/health"))
//!     })
//!     .group("/infra", |g| g.app("/infra/cache", |a| a.tasks(1, 0, 0)))
//!     .build();
//!
//! assert_eq!(root.app_count(), 2);
//! ```
//!
//! The field names follow Marathon's camelCase JSON when the `serde` feature
//! is enabled, so responses can be deserialized directly.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod app;
mod deployment;
mod group;

pub use app::*;
pub use deployment::*;
pub use group::*;
