//! Error types for the circuit gate.

use std::error::Error;
use std::fmt::{self, Display, Formatter};

/// Result type for gated operations.
pub type BreakerResult<T, E> = Result<T, BreakerError<E>>;

/// Error returned by [`Breaker::run`](crate::Breaker::run).
#[derive(Debug)]
pub enum BreakerError<E> {
    /// The circuit is open, the operation was not invoked.
    Open,

    /// The operation failed and the error handler chose to propagate this error.
    Operation(E),
}

impl<E> BreakerError<E> {
    /// Returns true if the call was short-circuited by an open breaker.
    pub fn is_open(&self) -> bool {
        matches!(self, BreakerError::Open)
    }

    /// Returns the propagated operation error, if any.
    pub fn into_operation(self) -> Option<E> {
        match self {
            BreakerError::Open => None,
            BreakerError::Operation(e) => Some(e),
        }
    }
}

impl<E> Display for BreakerError<E>
where
    E: Display,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            BreakerError::Open => write!(f, "Circuit breaker is open"),
            BreakerError::Operation(e) => write!(f, "Operation error: {}", e),
        }
    }
}

impl<E: Error + 'static> Error for BreakerError<E> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            BreakerError::Open => None,
            BreakerError::Operation(e) => Some(e),
        }
    }
}

/// Failure reported by a strategy while reaching its backing store.
///
/// The gate never surfaces these to callers of `run`.
#[derive(Debug)]
pub struct StoreError {
    message: String,
    source: Option<Box<dyn Error + Send + Sync + 'static>>,
}

impl StoreError {
    /// Creates a store error with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a store error wrapping an underlying cause.
    pub fn with_source<S>(message: impl Into<String>, source: S) -> Self
    where
        S: Error + Send + Sync + 'static,
    {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// The error message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Backing store error: {}", self.message)
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn Error + 'static))
    }
}

/// A strategy name that does not match any built-in strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStrategy(pub String);

impl Display for UnknownStrategy {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Unknown strategy: {:?} (built-in strategies are \"stub\" and \"rolling_window\"; \
             supply others with StrategyKind::Custom or StrategyKind::factory)",
            self.0
        )
    }
}

impl Error for UnknownStrategy {}
