//! Configuration for breakers.

use ahash::AHashSet;
use std::sync::Arc;
use std::time::Duration;

use crate::breaker::Breaker;
use crate::classify::{DefaultErrorHandler, ErrorHandler, Kinded, Proceed};
use crate::hook::HookRegistry;
use crate::strategy::{StrategyConfig, StrategyKind};

/// Builder for creating breakers with custom configurations.
///
/// Options that only matter to the strategy (`duration`, `threshold`,
/// `reenable_after` and free-form `option`s) are collected into a
/// [`StrategyConfig`] and passed to it untouched.
pub struct BreakerBuilder<T, E>
where
    T: 'static,
    E: Kinded + 'static,
{
    service: String,
    strategy: StrategyKind,
    strategy_config: StrategyConfig,
    ignore: AHashSet<E::Kind>,
    handler: Arc<dyn ErrorHandler<T, E>>,
    hook_registry: Arc<HookRegistry>,
}

impl<T, E> Default for BreakerBuilder<T, E>
where
    T: 'static,
    E: Kinded + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, E> BreakerBuilder<T, E>
where
    T: 'static,
    E: Kinded + 'static,
{
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            service: "default".to_string(),
            strategy: StrategyKind::default(),
            strategy_config: StrategyConfig::default(),
            ignore: AHashSet::new(),
            handler: Arc::new(DefaultErrorHandler),
            hook_registry: Arc::new(HookRegistry::new()),
        }
    }

    /// Sets the name of the guarded service.
    pub fn service(mut self, service: impl Into<String>) -> Self {
        self.service = service.into();
        self
    }

    /// Selects the strategy that decides when the breaker is open.
    pub fn strategy(mut self, strategy: StrategyKind) -> Self {
        self.strategy = strategy;
        self
    }

    /// Sets the window in which the strategy counts failures.
    pub fn duration(mut self, duration: Duration) -> Self {
        self.strategy_config.duration = duration;
        self
    }

    /// Sets the number of failures that trips the breaker.
    pub fn threshold(mut self, threshold: u64) -> Self {
        self.strategy_config.threshold = threshold;
        self
    }

    /// Sets how long a tripped breaker stays open.
    pub fn reenable_after(mut self, duration: Duration) -> Self {
        self.strategy_config.reenable_after = duration;
        self
    }

    /// Adds a free-form option for custom strategies.
    pub fn option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.strategy_config.options.insert(key.into(), value.into());
        self
    }

    /// Exempts an error kind from failure recording. Such errors still
    /// propagate to the caller.
    pub fn ignore(mut self, kind: E::Kind) -> Self {
        self.ignore.insert(kind);
        self
    }

    /// Exempts several error kinds from failure recording.
    pub fn ignore_all<I>(mut self, kinds: I) -> Self
    where
        I: IntoIterator<Item = E::Kind>,
    {
        self.ignore.extend(kinds);
        self
    }

    /// Sets a closure as the error handler.
    pub fn error_handler<F>(mut self, f: F) -> Self
    where
        F: Fn(E, Proceed<'_, E>) -> Result<T, E> + Send + Sync + 'static,
    {
        self.handler = Arc::new(f);
        self
    }

    /// Sets a type implementing [`ErrorHandler`] as the error handler.
    pub fn handler<H: ErrorHandler<T, E>>(mut self, handler: H) -> Self {
        self.handler = Arc::new(handler);
        self
    }

    /// Sets a hook registry for the breaker.
    pub fn hooks(mut self, hooks: HookRegistry) -> Self {
        self.hook_registry = Arc::new(hooks);
        self
    }

    /// Builds the breaker, constructing its strategy from the collected config.
    pub fn build(self) -> Breaker<T, E> {
        let mut strategy_config = self.strategy_config;
        strategy_config.service = self.service.clone();

        let strategy = self.strategy.build(&strategy_config);

        Breaker::new(
            self.service,
            strategy,
            self.ignore,
            self.handler,
            self.hook_registry,
        )
    }
}
