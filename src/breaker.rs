//! Core gate implementation.

use ahash::AHashSet;
use parking_lot::RwLock;
use std::sync::Arc;

use crate::classify::{ErrorHandler, Kinded, Proceed};
use crate::config::BreakerBuilder;
use crate::error::{BreakerError, BreakerResult, StoreError};
use crate::hook::HookRegistry;
use crate::strategy::Strategy;

/// Inner state of the breaker, shared between clones.
struct BreakerInner<T, E>
where
    E: Kinded,
{
    service: String,
    strategy: RwLock<Arc<dyn Strategy>>,
    ignore: AHashSet<E::Kind>,
    handler: Arc<dyn ErrorHandler<T, E>>,
    hooks: Arc<HookRegistry>,
}

/// A named gate that wraps calls to one logical service.
///
/// The breaker keeps no call statistics of its own. Whether it is open is
/// answered by the attached [`Strategy`], and failures are routed through the
/// configured [`ErrorHandler`].
pub struct Breaker<T, E>
where
    T: 'static,
    E: Kinded + 'static,
{
    inner: Arc<BreakerInner<T, E>>,
}

impl<T, E> Breaker<T, E>
where
    T: 'static,
    E: Kinded + 'static,
{
    pub(crate) fn new(
        service: String,
        strategy: Arc<dyn Strategy>,
        ignore: AHashSet<E::Kind>,
        handler: Arc<dyn ErrorHandler<T, E>>,
        hooks: Arc<HookRegistry>,
    ) -> Self {
        let inner = BreakerInner {
            service,
            strategy: RwLock::new(strategy),
            ignore,
            handler,
            hooks,
        };

        Self {
            inner: Arc::new(inner),
        }
    }

    /// Creates a new builder for customizing a breaker.
    pub fn builder() -> BreakerBuilder<T, E> {
        BreakerBuilder::new()
    }

    /// Name of the guarded service.
    pub fn service(&self) -> &str {
        &self.inner.service
    }

    /// Returns the attached strategy.
    pub fn strategy(&self) -> Arc<dyn Strategy> {
        self.inner.strategy.read().clone()
    }

    /// Replaces the attached strategy. Calls already in flight keep using the
    /// strategy they started with.
    pub fn set_strategy(&self, strategy: Arc<dyn Strategy>) {
        *self.inner.strategy.write() = strategy;
    }

    /// Returns true if the error kind is exempt from failure recording.
    pub fn ignores(&self, kind: &E::Kind) -> bool {
        self.inner.ignore.contains(kind)
    }

    /// Asks the strategy whether the breaker is open.
    ///
    /// A strategy that cannot reach its store is treated as closed.
    pub fn is_open(&self) -> bool {
        self.query_open(&*self.strategy())
    }

    /// Executes a function wrapped by the breaker.
    pub fn run<F>(&self, operation: F) -> BreakerResult<T, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        let strategy = self.strategy();
        self.pre_call(&*strategy)?;

        match operation() {
            Ok(value) => {
                self.on_success(&*strategy);
                Ok(value)
            }
            Err(error) => self.on_error(&*strategy, error),
        }
    }

    fn query_open(&self, strategy: &dyn Strategy) -> bool {
        match strategy.is_open() {
            Ok(open) => open,
            Err(error) => {
                report_store_error(&self.inner.service, &self.inner.hooks, "is_open", &error);
                false
            }
        }
    }

    /// Rejects the call if the breaker is open, otherwise reports the attempt.
    fn pre_call(&self, strategy: &dyn Strategy) -> Result<(), BreakerError<E>> {
        if self.query_open(strategy) {
            tracing::debug!(service = %self.inner.service, "breaker open, rejecting call");
            self.inner.hooks.execute_rejected_hook();
            return Err(BreakerError::Open);
        }

        if strategy.capabilities().count {
            swallow_store_error(&self.inner.service, &self.inner.hooks, "count", strategy.count());
        }

        Ok(())
    }

    fn on_success(&self, strategy: &dyn Strategy) {
        if strategy.capabilities().success {
            swallow_store_error(
                &self.inner.service,
                &self.inner.hooks,
                "success",
                strategy.success(),
            );
        }

        self.inner.hooks.execute_success_hook();
    }

    /// Hands the error to the configured handler together with the default policy.
    fn on_error(&self, strategy: &dyn Strategy, error: E) -> BreakerResult<T, E> {
        let proceed = Proceed::new(
            &self.inner.service,
            strategy,
            &self.inner.ignore,
            &self.inner.hooks,
        );

        self.inner
            .handler
            .handle(error, proceed)
            .map_err(BreakerError::Operation)
    }
}

/// Logs and reports a failed strategy call, then drops it.
pub(crate) fn swallow_store_error(
    service: &str,
    hooks: &HookRegistry,
    call: &'static str,
    result: Result<(), StoreError>,
) {
    if let Err(error) = result {
        report_store_error(service, hooks, call, &error);
    }
}

fn report_store_error(service: &str, hooks: &HookRegistry, call: &'static str, error: &StoreError) {
    tracing::warn!(service, call, %error, "strategy call failed, continuing");
    hooks.execute_store_error_hook(error);
}

// Allow cloning of breakers - cheap because inner state is Arc'd
impl<T, E> Clone for Breaker<T, E>
where
    T: 'static,
    E: Kinded + 'static,
{
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[cfg(feature = "async")]
impl<T, E> Breaker<T, E>
where
    T: 'static,
    E: Kinded + 'static,
{
    /// Executes an async function wrapped by the breaker.
    ///
    /// The error handler still runs synchronously once the future resolves.
    pub async fn run_async<F, Fut>(&self, operation: F) -> BreakerResult<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Result<T, E>>,
    {
        let strategy = self.strategy();
        self.pre_call(&*strategy)?;

        match operation().await {
            Ok(value) => {
                self.on_success(&*strategy);
                Ok(value)
            }
            Err(error) => self.on_error(&*strategy, error),
        }
    }
}
