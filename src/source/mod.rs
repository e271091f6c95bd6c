//! Data source abstraction for receiving orchestrator snapshots.
//!
//! Fetching snapshots from the orchestrator API is left to the caller. This
//! module provides the seam where those snapshots arrive: a file polled for
//! changes, or an in-memory channel fed by an external poller.

mod channel;
mod file;

pub use channel::ChannelSource;
pub use file::FileSource;

use std::fmt::Debug;

/// Trait for receiving snapshots of type `T` from various sources.
///
/// # Example
///
/// ```
/// use svcwatch::{DataSource, FileSource};
/// use svcwatch_types::GroupNode;
///
/// let mut source: FileSource<GroupNode> = FileSource::new("groups.json");
/// if let Some(root) = source.poll() {
///     println!("Got {} apps", root.app_count());
/// }
/// ```
pub trait DataSource<T>: Send + Debug {
    /// Poll for the latest snapshot.
    ///
    /// Returns `Some(snapshot)` if new data is available, `None` otherwise.
    /// This method should be non-blocking.
    fn poll(&mut self) -> Option<T>;

    /// Returns a human-readable description of the source.
    fn description(&self) -> &str;

    /// Check if the source has encountered an error.
    ///
    /// Returns the error message if an error occurred during the last poll.
    fn error(&self) -> Option<&str>;
}
