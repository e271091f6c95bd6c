//! Group tree - the nested container structure of a group snapshot.

use alloc::string::String;
use alloc::vec::Vec;

use crate::{AppRecord, AppRecordBuilder};

/// A group in the orchestrator's workload tree.
///
/// Groups nest arbitrarily and each level may hold applications. The tree is
/// acyclic by construction.
///
/// # Example
///
/// ```rust
/// use svcwatch_types::GroupNode;
///
/// let root = GroupNode::builder()
///     .group("/prod", |g| {
///         g.app("/prod/api", |a| a.tasks(2, 2, 0))
///          .app("/prod/worker", |a| a.tasks(1, 0, 0))
///     })
///     .build();
///
/// assert_eq!(root.app_count(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GroupNode {
    /// Group path. The root group is `/`.
    #[cfg_attr(feature = "serde", serde(default = "root_id"))]
    pub id: String,

    /// Nested sub-groups, in the order reported.
    #[cfg_attr(feature = "serde", serde(default))]
    pub groups: Vec<GroupNode>,

    /// Applications directly inside this group. Required at every level.
    pub apps: Vec<AppRecord>,
}

fn root_id() -> String {
    String::from("/")
}

impl GroupNode {
    /// Create an empty group with the given id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            groups: Vec::new(),
            apps: Vec::new(),
        }
    }

    /// Create an empty root group.
    pub fn root() -> Self {
        Self::new(root_id())
    }

    /// Create a builder rooted at `/`.
    pub fn builder() -> GroupNodeBuilder {
        GroupNodeBuilder::new(root_id())
    }

    /// Check if the tree holds no applications at any depth.
    pub fn is_empty(&self) -> bool {
        self.app_count() == 0
    }

    /// Total number of applications at every depth.
    pub fn app_count(&self) -> usize {
        self.apps.len() + self.groups.iter().map(GroupNode::app_count).sum::<usize>()
    }

    /// Depth of the deepest group, the root being depth 1.
    pub fn depth(&self) -> usize {
        1 + self.groups.iter().map(GroupNode::depth).max().unwrap_or(0)
    }
}

impl Default for GroupNode {
    fn default() -> Self {
        Self::root()
    }
}

/// Builder for `GroupNode` trees.
#[derive(Debug)]
pub struct GroupNodeBuilder {
    node: GroupNode,
}

impl GroupNodeBuilder {
    /// Create a builder for a group with the given id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            node: GroupNode::new(id),
        }
    }

    /// Add an application built using a closure.
    pub fn app<F>(mut self, id: impl Into<String>, f: F) -> Self
    where
        F: FnOnce(AppRecordBuilder) -> AppRecordBuilder,
    {
        self.node.apps.push(f(AppRecordBuilder::new(id)).build());
        self
    }

    /// Add a pre-built application.
    pub fn app_record(mut self, app: AppRecord) -> Self {
        self.node.apps.push(app);
        self
    }

    /// Add a nested group built using a closure.
    pub fn group<F>(mut self, id: impl Into<String>, f: F) -> Self
    where
        F: FnOnce(GroupNodeBuilder) -> GroupNodeBuilder,
    {
        self.node.groups.push(f(GroupNodeBuilder::new(id)).build());
        self
    }

    /// Build the group.
    pub fn build(self) -> GroupNode {
        self.node
    }
}
