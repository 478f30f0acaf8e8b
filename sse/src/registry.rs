use crate::subscription::{SubscriberHandle, Subscription, SubscriptionId};
use dashmap::DashMap;
use log::*;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Default number of messages a subscriber may have pending before further
/// broadcasts are dropped for it.
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

/// Process-wide set of live subscriptions.
///
/// Only the owning stream mutates membership: it registers on connect and its
/// [`Subscription`] unregisters itself on drop. Broadcasters only read, through
/// [`SubscriberRegistry::snapshot`].
pub struct SubscriberRegistry {
    /// Lookup by subscription id for registration/cleanup - O(1)
    subscribers: DashMap<SubscriptionId, SubscriberHandle>,

    /// Registration counter, used to order snapshots
    next_sequence: AtomicU64,

    queue_capacity: usize,
}

impl SubscriberRegistry {
    pub fn new() -> Arc<Self> {
        Self::with_queue_capacity(DEFAULT_QUEUE_CAPACITY)
    }

    /// A zero capacity is raised to one; every queue holds at least a message.
    pub fn with_queue_capacity(queue_capacity: usize) -> Arc<Self> {
        Arc::new(Self {
            subscribers: DashMap::new(),
            next_sequence: AtomicU64::new(0),
            queue_capacity: queue_capacity.max(1),
        })
    }

    pub fn queue_capacity(&self) -> usize {
        self.queue_capacity
    }

    /// Register a new, empty subscription - O(1)
    pub fn register(self: &Arc<Self>) -> Subscription {
        let (sender, receiver) = mpsc::channel(self.queue_capacity);
        let id = SubscriptionId::new();
        let sequence = self.next_sequence.fetch_add(1, Ordering::Relaxed);
        let handle = SubscriberHandle::new(id.clone(), sequence, sender);

        self.subscribers.insert(id.clone(), handle.clone());
        trace!("Registered subscription {id} (#{sequence})");

        Subscription::new(handle, receiver, Arc::clone(self))
    }

    /// Unregister a subscription - O(1). Unknown or already removed ids are a
    /// no-op; returns whether anything was removed.
    pub fn unregister(&self, id: &SubscriptionId) -> bool {
        match self.subscribers.remove(id) {
            Some(_) => {
                trace!("Unregistered subscription {id}");
                true
            }
            None => false,
        }
    }

    /// Point-in-time copy of the current members, in registration order - O(n)
    ///
    /// Subscriptions registered or removed while the copy is taken may or may
    /// not appear in it.
    pub fn snapshot(&self) -> Vec<SubscriberHandle> {
        let mut handles: Vec<SubscriberHandle> = self
            .subscribers
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        handles.sort_unstable_by_key(SubscriberHandle::sequence);
        handles
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}
