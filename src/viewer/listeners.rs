// SPDX-License-Identifier: MPL-2.0
//! Exclusive ownership of the page view's pointer and wheel listeners.
//!
//! The application only subscribes to raw pointer events while some viewer
//! holds a live [`ListenerGuard`]. Acquiring a new guard detaches the previous
//! owner; dropping a guard releases the slot only if it still owns it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

const DETACHED: u64 = 0;

#[derive(Debug, Default)]
struct Slot {
    owner: AtomicU64,
    next_token: AtomicU64,
}

/// The single listener slot of the page view.
#[derive(Debug, Clone, Default)]
pub struct ListenerRegistry {
    slot: Arc<Slot>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes the slot, detaching any previous owner first.
    pub fn acquire(&self) -> ListenerGuard {
        let token = self.slot.next_token.fetch_add(1, Ordering::Relaxed) + 1;
        let previous = self.slot.owner.swap(token, Ordering::AcqRel);
        if previous != DETACHED {
            log::debug!("viewport listeners {previous} detached by {token}");
        }
        ListenerGuard {
            slot: Arc::clone(&self.slot),
            token,
        }
    }

    /// True while some guard owns the slot.
    pub fn is_attached(&self) -> bool {
        self.slot.owner.load(Ordering::Acquire) != DETACHED
    }
}

/// Proof of listener ownership; releases the slot on drop.
#[derive(Debug)]
pub struct ListenerGuard {
    slot: Arc<Slot>,
    token: u64,
}

impl ListenerGuard {
    /// False once a newer guard has taken over.
    pub fn is_active(&self) -> bool {
        self.slot.owner.load(Ordering::Acquire) == self.token
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        // A guard that was already detached leaves the new owner alone.
        let _ = self.slot.owner.compare_exchange(
            self.token,
            DETACHED,
            Ordering::AcqRel,
            Ordering::Acquire,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_attaches_and_drop_detaches() {
        let registry = ListenerRegistry::new();
        assert!(!registry.is_attached());

        let guard = registry.acquire();
        assert!(guard.is_active());
        assert!(registry.is_attached());

        drop(guard);
        assert!(!registry.is_attached());
    }

    #[test]
    fn remount_detaches_previous_owner() {
        let registry = ListenerRegistry::new();
        let old = registry.acquire();
        let new = registry.acquire();

        assert!(!old.is_active());
        assert!(new.is_active());

        // Dropping the stale guard must not release the new owner's slot.
        drop(old);
        assert!(registry.is_attached());
        assert!(new.is_active());

        drop(new);
        assert!(!registry.is_attached());
    }

    #[test]
    fn clones_share_the_slot() {
        let registry = ListenerRegistry::new();
        let clone = registry.clone();
        let _guard = clone.acquire();
        assert!(registry.is_attached());
    }
}
