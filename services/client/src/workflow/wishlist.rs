//! services/client/src/workflow/wishlist.rs
//!
//! Optimistic wishlist membership: the local cache and every subscriber see
//! a toggle immediately, a confirming network call follows, and a failure
//! rolls the value back and fans the correction out again.

use std::collections::HashMap;
use std::sync::Arc;
use studysync_client_core::ports::{CatalogService, PortResult};
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Direction of an in-flight wishlist call for one course.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingDelta {
    Adding,
    Removing,
}

#[derive(Debug, Clone, Copy, Default)]
struct MembershipEntry {
    member: bool,
    pending: Option<PendingDelta>,
}

type Subscriber = Box<dyn Fn(i64, bool) + Send>;

/// Process-local cache of wishlist membership plus its subscriber list.
///
/// Entries are created lazily on first observation or first toggle and never
/// removed: a course taken off the wishlist is stored as `false`, not dropped.
#[derive(Default)]
pub struct WishlistCache {
    entries: HashMap<i64, MembershipEntry>,
    subscribers: Vec<(usize, Subscriber)>,
    next_subscriber_id: usize,
}

impl WishlistCache {
    pub fn is_member(&self, course_id: i64) -> bool {
        self.entries
            .get(&course_id)
            .map(|entry| entry.member)
            .unwrap_or(false)
    }

    pub fn pending(&self, course_id: i64) -> Option<PendingDelta> {
        self.entries.get(&course_id).and_then(|entry| entry.pending)
    }

    /// Registers a change observer and returns a token for [`unsubscribe`].
    ///
    /// Every subscriber registered at the moment of a cache write receives
    /// `(course_id, member)` synchronously within that write; there is no
    /// batching window in which two surfaces can disagree.
    ///
    /// [`unsubscribe`]: WishlistCache::unsubscribe
    pub fn subscribe(&mut self, subscriber: impl Fn(i64, bool) + Send + 'static) -> usize {
        let token = self.next_subscriber_id;
        self.next_subscriber_id += 1;
        self.subscribers.push((token, Box::new(subscriber)));
        token
    }

    pub fn unsubscribe(&mut self, token: usize) {
        self.subscribers.retain(|(id, _)| *id != token);
    }

    /// Seeds membership from a fetched wishlist. Hydration does not notify;
    /// it runs before any surface has rendered a value worth correcting.
    pub fn hydrate(&mut self, members: impl IntoIterator<Item = i64>) {
        for course_id in members {
            self.entries.entry(course_id).or_default().member = true;
        }
    }

    fn set_member(&mut self, course_id: i64, member: bool) {
        self.entries.entry(course_id).or_default().member = member;
        for (_, subscriber) in &self.subscribers {
            subscriber(course_id, member);
        }
    }

    fn set_pending(&mut self, course_id: i64, delta: PendingDelta) {
        self.entries.entry(course_id).or_default().pending = Some(delta);
    }

    fn clear_pending(&mut self, course_id: i64) {
        if let Some(entry) = self.entries.get_mut(&course_id) {
            entry.pending = None;
        }
    }
}

/// Performs optimistic membership toggles against a shared [`WishlistCache`].
#[derive(Clone)]
pub struct WishlistSynchronizer {
    catalog: Arc<dyn CatalogService>,
    cache: Arc<Mutex<WishlistCache>>,
}

impl WishlistSynchronizer {
    pub fn new(catalog: Arc<dyn CatalogService>) -> Self {
        Self {
            catalog,
            cache: Arc::new(Mutex::new(WishlistCache::default())),
        }
    }

    /// The shared cache, for surfaces that subscribe or read directly.
    pub fn cache(&self) -> &Arc<Mutex<WishlistCache>> {
        &self.cache
    }

    /// Flips membership for one course.
    ///
    /// The cache and every subscriber see the new value before the network
    /// call is issued. On failure the previous value is written back and
    /// fanned out again; the visible flicker is intended behavior. A toggle
    /// for a course that already has a call in flight is ignored, not queued.
    pub async fn toggle(&self, course_id: i64) {
        let next = {
            let mut cache = self.cache.lock().await;
            if let Some(delta) = cache.pending(course_id) {
                debug!(course_id, ?delta, "toggle ignored, a call is already in flight");
                return;
            }
            let next = !cache.is_member(course_id);
            cache.set_pending(
                course_id,
                if next {
                    PendingDelta::Adding
                } else {
                    PendingDelta::Removing
                },
            );
            // Optimistic write and fan-out, before the request goes out.
            cache.set_member(course_id, next);
            next
        };

        let outcome = if next {
            self.catalog.add_to_wishlist(course_id).await
        } else {
            self.catalog.remove_from_wishlist(course_id).await
        };

        let mut cache = self.cache.lock().await;
        match outcome {
            Ok(()) => {
                // The cache already holds `next`; only the guard is cleared.
                cache.clear_pending(course_id);
            }
            Err(err) => {
                warn!(course_id, error = %err, "wishlist toggle failed, reverting");
                cache.set_member(course_id, !next);
                cache.clear_pending(course_id);
            }
        }
    }

    /// Convenience read for surfaces that render straight from the cache.
    pub async fn is_member(&self, course_id: i64) -> bool {
        self.cache.lock().await.is_member(course_id)
    }

    /// Replaces local knowledge with the server's current wishlist.
    pub async fn refresh(&self) -> PortResult<()> {
        let members = self.catalog.get_wishlist().await?;
        self.cache.lock().await.hydrate(members);
        Ok(())
    }
}
