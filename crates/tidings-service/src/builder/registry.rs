//! Request-code allocation and the table of pending callback bindings.

use std::sync::atomic::{AtomicI32, Ordering};

use dashmap::DashMap;
use tracing::debug;

use tidings_core::types::{NotificationId, RequestCode};
use tidings_entity::descriptor::{CallbackBinding, NotificationDescriptor, Origin};

/// Pending bindings keyed by request code.
///
/// Codes come from a process-wide counter that skips `0` and any code
/// still registered, so a pending binding is never shadowed.
#[derive(Debug)]
pub struct CallbackRegistry {
    bindings: DashMap<RequestCode, CallbackBinding>,
    next: AtomicI32,
}

impl CallbackRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            bindings: DashMap::new(),
            next: AtomicI32::new(1),
        }
    }

    /// Allocate a request code not currently in use.
    pub fn allocate(&self) -> RequestCode {
        loop {
            let raw = self.next.fetch_add(1, Ordering::Relaxed);
            let code = RequestCode(raw);
            if raw != 0 && !self.bindings.contains_key(&code) {
                return code;
            }
        }
    }

    /// Register every binding carried by a descriptor.
    pub fn register(&self, descriptor: &NotificationDescriptor) {
        for binding in descriptor.bindings() {
            self.bindings.insert(binding.request_code, binding.clone());
        }
        debug!(
            id = %descriptor.id,
            origin = ?descriptor.origin,
            count = descriptor.bindings().count(),
            "Callback bindings registered"
        );
    }

    /// Look up a pending binding.
    pub fn resolve(&self, code: RequestCode) -> Option<CallbackBinding> {
        self.bindings.get(&code).map(|entry| entry.value().clone())
    }

    /// Drop every binding targeting the given notification.
    pub fn drop_for(&self, origin: Origin, id: NotificationId) -> usize {
        let before = self.bindings.len();
        self.bindings
            .retain(|_, binding| !(binding.target.origin() == origin && binding.target.id() == id));
        let dropped = before.saturating_sub(self.bindings.len());
        if dropped > 0 {
            debug!(id = %id, origin = ?origin, dropped, "Callback bindings dropped");
        }
        dropped
    }

    /// Number of pending bindings.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether no binding is pending.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl Default for CallbackRegistry {
    fn default() -> Self {
        Self::new()
    }
}
