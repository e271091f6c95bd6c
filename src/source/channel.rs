//! Channel-based data source.
//!
//! Receives snapshots via a tokio watch channel. The orchestrator poller
//! pushes each response it fetches and the watcher picks up the latest one.

use std::fmt::Debug;

use tokio::sync::watch;

use super::DataSource;

/// A data source that receives snapshots via a channel.
///
/// Only the most recent value is kept; intermediate snapshots pushed between
/// two polls are skipped.
///
/// # Example
///
/// ```
/// use svcwatch::ChannelSource;
/// use svcwatch_types::GroupNode;
///
/// let (tx, source) = ChannelSource::create(GroupNode::root(), "http://marathon:8080/v2/groups");
/// ```
#[derive(Debug)]
pub struct ChannelSource<T> {
    receiver: watch::Receiver<T>,
    description: String,
    /// Track if we've returned the initial value yet
    initial_returned: bool,
}

impl<T> ChannelSource<T> {
    /// Create a new channel source from the receiving end of a watch channel.
    pub fn new(receiver: watch::Receiver<T>, source_description: &str) -> Self {
        let description = format!("channel: {}", source_description);
        Self {
            receiver,
            description,
            initial_returned: false,
        }
    }

    /// Create a channel pair seeded with `initial`.
    ///
    /// Returns (sender, source) where the sender is handed to whatever
    /// fetches snapshots from the orchestrator.
    pub fn create(initial: T, source_description: &str) -> (watch::Sender<T>, Self) {
        let (tx, rx) = watch::channel(initial);
        let source = Self::new(rx, source_description);
        (tx, source)
    }
}

impl<T> DataSource<T> for ChannelSource<T>
where
    T: Clone + Send + Sync + Debug,
{
    fn poll(&mut self) -> Option<T> {
        // Return the initial value on first poll
        if !self.initial_returned {
            self.initial_returned = true;
            self.receiver.mark_changed();
        }

        // A value sent right before the sender dropped is still delivered
        let latest = self.receiver.borrow_and_update();
        if latest.has_changed() {
            Some((*latest).clone())
        } else {
            None
        }
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<&str> {
        // Fetch errors belong to the producer on the other end
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use svcwatch_types::{Deployment, GroupNode};

    #[test]
    fn test_channel_source_poll() {
        let (tx, mut source) = ChannelSource::create(GroupNode::root(), "test");

        // Initially returns the seeded (empty) tree
        let root = source.poll();
        assert!(root.is_some());
        assert!(root.unwrap().is_empty());

        // No change, so poll returns None
        assert!(source.poll().is_none());

        tx.send(GroupNode::builder().app("/web", |a| a).build()).unwrap();

        let root = source.poll();
        assert_eq!(root.unwrap().app_count(), 1);
    }

    #[test]
    fn test_channel_source_keeps_latest_only() {
        let (tx, mut source) = ChannelSource::create(Vec::<Deployment>::new(), "test");
        let _ = source.poll();

        tx.send(vec![Deployment::new("d1")]).unwrap();
        tx.send(vec![Deployment::new("d1"), Deployment::new("d2")]).unwrap();

        let deployments = source.poll().unwrap();
        assert_eq!(deployments.len(), 2);
        assert!(source.poll().is_none());
    }

    #[test]
    fn test_channel_source_delivers_final_value_after_sender_drops() {
        let (tx, mut source) = ChannelSource::create(GroupNode::root(), "test");
        let _ = source.poll();

        tx.send(GroupNode::builder().app("/last", |a| a).build()).unwrap();
        drop(tx);

        let root = source.poll().unwrap();
        assert_eq!(root.app_count(), 1);
        assert!(source.poll().is_none());
    }

    #[test]
    fn test_channel_source_description() {
        let (_tx, source) = ChannelSource::create(GroupNode::root(), "marathon");
        assert_eq!(source.description(), "channel: marathon");
        assert!(source.error().is_none());
    }
}
