//! Hook registry for gate events.

use crate::error::StoreError;
use parking_lot::RwLock;
use std::sync::Arc;

type HookFn = Arc<dyn Fn() + Send + Sync + 'static>;
type StoreHookFn = Arc<dyn Fn(&StoreError) + Send + Sync + 'static>;

/// A registry for gate event hooks.
///
/// Hooks run synchronously on the thread that made the call.
pub struct HookRegistry {
    on_rejected: RwLock<Option<HookFn>>,
    on_success: RwLock<Option<HookFn>>,
    on_failure: RwLock<Option<HookFn>>,
    on_ignored: RwLock<Option<HookFn>>,
    on_store_error: RwLock<Option<StoreHookFn>>,
}

impl Default for HookRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl HookRegistry {
    /// Creates a new empty hook registry.
    pub fn new() -> Self {
        Self {
            on_rejected: RwLock::new(None),
            on_success: RwLock::new(None),
            on_failure: RwLock::new(None),
            on_ignored: RwLock::new(None),
            on_store_error: RwLock::new(None),
        }
    }

    /// Sets the hook to call when an open breaker rejects a call.
    pub fn set_on_rejected<F>(&self, f: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        *self.on_rejected.write() = Some(Arc::new(f));
    }

    /// Sets the hook to call when a guarded operation succeeds.
    pub fn set_on_success<F>(&self, f: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        *self.on_success.write() = Some(Arc::new(f));
    }

    /// Sets the hook to call when a failure is recorded against the strategy.
    pub fn set_on_failure<F>(&self, f: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        *self.on_failure.write() = Some(Arc::new(f));
    }

    /// Sets the hook to call when a failure of an ignored kind passes through.
    pub fn set_on_ignored<F>(&self, f: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        *self.on_ignored.write() = Some(Arc::new(f));
    }

    /// Sets the hook to call when a strategy call fails.
    pub fn set_on_store_error<F>(&self, f: F)
    where
        F: Fn(&StoreError) + Send + Sync + 'static,
    {
        *self.on_store_error.write() = Some(Arc::new(f));
    }

    /// Executes the rejection hook.
    pub fn execute_rejected_hook(&self) {
        if let Some(hook) = self.on_rejected.read().as_ref() {
            hook();
        }
    }

    /// Executes the success hook.
    pub fn execute_success_hook(&self) {
        if let Some(hook) = self.on_success.read().as_ref() {
            hook();
        }
    }

    /// Executes the failure hook.
    pub fn execute_failure_hook(&self) {
        if let Some(hook) = self.on_failure.read().as_ref() {
            hook();
        }
    }

    /// Executes the ignored-failure hook.
    pub fn execute_ignored_hook(&self) {
        if let Some(hook) = self.on_ignored.read().as_ref() {
            hook();
        }
    }

    /// Executes the store error hook.
    pub fn execute_store_error_hook(&self, error: &StoreError) {
        if let Some(hook) = self.on_store_error.read().as_ref() {
            hook(error);
        }
    }
}
