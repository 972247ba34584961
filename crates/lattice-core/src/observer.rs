//! Persistence-hook observation point
//!
//! The store notifies a [`ChangeObserver`] once after every successful
//! mutation. The observer is the seam where the snapshotting collaborator
//! plugs in; from the store's perspective the call is fire-and-forget, so
//! implementations own their retry and error policy and must not panic back
//! into the store.

use std::sync::Arc;

/// Observer notified after every successful store mutation
///
/// Called outside the store's write lock, so an implementation may take its
/// own locks or schedule I/O without stalling readers. Implementations must
/// tolerate being called more often than strictly necessary.
pub trait ChangeObserver: Send + Sync {
    /// The entity set changed (node or edge created, updated, or deleted,
    /// including cascades and bulk restores)
    fn store_changed(&self);
}

/// Blanket implementation so `Arc<dyn ChangeObserver>` works everywhere an
/// observer is expected
impl<T: ChangeObserver + ?Sized> ChangeObserver for Arc<T> {
    fn store_changed(&self) {
        (**self).store_changed()
    }
}

/// Observer that ignores every notification
///
/// Default when no persistence collaborator is attached.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl ChangeObserver for NoopObserver {
    fn store_changed(&self) {}
}
