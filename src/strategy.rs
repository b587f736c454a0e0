//! Strategy contract consulted by the gate for open/closed decisions.

use ahash::AHashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::error::{StoreError, UnknownStrategy};
use crate::window::RollingWindow;

/// Optional calls a strategy supports beyond [`Strategy::is_open`].
///
/// The gate only invokes a call whose flag is set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    /// The strategy wants to observe every attempted call.
    pub count: bool,
    /// The strategy wants to observe successful calls.
    pub success: bool,
    /// The strategy wants to observe recorded failures.
    pub error: bool,
}

impl Capabilities {
    /// Only `is_open` is supported.
    pub const NONE: Capabilities = Capabilities {
        count: false,
        success: false,
        error: false,
    };

    /// Every optional call is supported.
    pub const ALL: Capabilities = Capabilities {
        count: true,
        success: true,
        error: true,
    };

    /// Enables the `count` call.
    pub const fn with_count(mut self) -> Self {
        self.count = true;
        self
    }

    /// Enables the `success` call.
    pub const fn with_success(mut self) -> Self {
        self.success = true;
        self
    }

    /// Enables the `error` call.
    pub const fn with_error(mut self) -> Self {
        self.error = true;
        self
    }
}

/// Decides whether a breaker is open, and optionally observes call outcomes.
///
/// Implementations own whatever state they need, usually in a backing store,
/// and must tolerate concurrent calls from many threads. Any call may fail
/// with a [`StoreError`]; the gate treats a failing `is_open` as closed and
/// ignores failures of the observation calls.
pub trait Strategy: Send + Sync + 'static {
    /// Declares which optional calls the gate should make.
    ///
    /// There is no default: an overridden `count`, `success` or `error` is
    /// only ever called when its flag is set here.
    fn capabilities(&self) -> Capabilities;

    /// Reports whether the breaker is currently open.
    fn is_open(&self) -> Result<bool, StoreError>;

    /// Observes that a call is about to be attempted.
    fn count(&self) -> Result<(), StoreError> {
        Ok(())
    }

    /// Observes that a call succeeded.
    fn success(&self) -> Result<(), StoreError> {
        Ok(())
    }

    /// Records a failure that counts toward tripping the breaker.
    fn error(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

impl<S: Strategy + ?Sized> Strategy for Arc<S> {
    fn capabilities(&self) -> Capabilities {
        (**self).capabilities()
    }

    fn is_open(&self) -> Result<bool, StoreError> {
        (**self).is_open()
    }

    fn count(&self) -> Result<(), StoreError> {
        (**self).count()
    }

    fn success(&self) -> Result<(), StoreError> {
        (**self).success()
    }

    fn error(&self) -> Result<(), StoreError> {
        (**self).error()
    }
}

/// Settings handed to a strategy when a breaker is built.
///
/// The gate does not interpret any of these; `options` carries extra
/// key/value pairs for user-defined strategies.
#[derive(Debug, Clone)]
pub struct StrategyConfig {
    /// Name of the guarded service.
    pub service: String,
    /// Window in which failures are counted.
    pub duration: Duration,
    /// Failures within `duration` that trip the breaker.
    pub threshold: u64,
    /// How long a tripped breaker stays open.
    pub reenable_after: Duration,
    /// Free-form options for custom strategies.
    pub options: AHashMap<String, String>,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            service: "default".to_string(),
            duration: Duration::from_secs(60),
            threshold: 5,
            reenable_after: Duration::from_secs(600),
            options: AHashMap::new(),
        }
    }
}

impl StrategyConfig {
    /// Looks up a free-form option.
    pub fn option(&self, key: &str) -> Option<&str> {
        self.options.get(key).map(String::as_str)
    }
}

type StrategyFactory = Arc<dyn Fn(&StrategyConfig) -> Arc<dyn Strategy> + Send + Sync>;

/// Selects the strategy a breaker is built with.
#[derive(Clone)]
pub enum StrategyKind {
    /// A [`Stub`] with a fixed initial answer.
    Stub {
        /// Whether calls are allowed through.
        allow: bool,
    },

    /// An in-memory [`RollingWindow`] built from the strategy config.
    RollingWindow,

    /// A ready-made strategy instance.
    Custom(Arc<dyn Strategy>),

    /// A constructor invoked with the strategy config.
    Factory(StrategyFactory),
}

impl StrategyKind {
    /// Wraps a strategy instance.
    pub fn custom<S: Strategy>(strategy: S) -> Self {
        StrategyKind::Custom(Arc::new(strategy))
    }

    /// Wraps a constructor that receives the breaker's strategy config.
    pub fn factory<F, S>(f: F) -> Self
    where
        F: Fn(&StrategyConfig) -> S + Send + Sync + 'static,
        S: Strategy,
    {
        StrategyKind::Factory(Arc::new(move |config: &StrategyConfig| {
            Arc::new(f(config)) as Arc<dyn Strategy>
        }))
    }

    pub(crate) fn build(self, config: &StrategyConfig) -> Arc<dyn Strategy> {
        match self {
            StrategyKind::Stub { allow } => Arc::new(Stub::new(allow)),
            StrategyKind::RollingWindow => Arc::new(RollingWindow::from_config(config)),
            StrategyKind::Custom(strategy) => strategy,
            StrategyKind::Factory(factory) => factory(config),
        }
    }
}

impl Default for StrategyKind {
    fn default() -> Self {
        StrategyKind::RollingWindow
    }
}

impl fmt::Debug for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyKind::Stub { allow } => f.debug_struct("Stub").field("allow", allow).finish(),
            StrategyKind::RollingWindow => f.write_str("RollingWindow"),
            StrategyKind::Custom(_) => f.write_str("Custom(..)"),
            StrategyKind::Factory(_) => f.write_str("Factory(..)"),
        }
    }
}

impl FromStr for StrategyKind {
    type Err = UnknownStrategy;

    /// Parses a built-in strategy name. An empty name selects the default.
    ///
    /// Only `"stub"` and `"rolling_window"` are built in. Percentage or
    /// store-backed strategies such as `"percentage"` are not, and must be
    /// plugged in with [`StrategyKind::Custom`] or [`StrategyKind::factory`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "rolling_window" => Ok(StrategyKind::RollingWindow),
            "stub" => Ok(StrategyKind::Stub { allow: true }),
            other => Err(UnknownStrategy(other.to_string())),
        }
    }
}

/// A strategy whose answer is set by hand. Meant for tests.
#[derive(Debug)]
pub struct Stub {
    allow: AtomicBool,
}

impl Stub {
    /// Creates a stub that allows calls when `allow` is true.
    pub fn new(allow: bool) -> Self {
        Self {
            allow: AtomicBool::new(allow),
        }
    }

    /// Changes whether calls are allowed through.
    pub fn set_allow(&self, allow: bool) {
        self.allow.store(allow, Ordering::Release);
    }

    /// Whether calls are currently allowed through.
    pub fn allows(&self) -> bool {
        self.allow.load(Ordering::Acquire)
    }
}

impl Default for Stub {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Strategy for Stub {
    fn capabilities(&self) -> Capabilities {
        Capabilities::NONE
    }

    fn is_open(&self) -> Result<bool, StoreError> {
        Ok(!self.allows())
    }
}
