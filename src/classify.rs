//! Failure classification: decides whether a failed call is recorded,
//! suppressed, or propagated.

use ahash::AHashSet;
use std::fmt::Debug;
use std::hash::Hash;
use std::io;

use crate::breaker::swallow_store_error;
use crate::hook::HookRegistry;
use crate::strategy::Strategy;

/// An error that can be sorted into kinds for the breaker's ignore set.
pub trait Kinded {
    /// The classification key.
    type Kind: Eq + Hash + Debug + Send + Sync + 'static;

    /// Returns the kind of this error.
    fn kind(&self) -> Self::Kind;
}

impl Kinded for io::Error {
    type Kind = io::ErrorKind;

    fn kind(&self) -> io::ErrorKind {
        io::Error::kind(self)
    }
}

/// The default ignore-aware policy, handed to an [`ErrorHandler`].
///
/// Applying it records a failure against the strategy unless the error's kind
/// is ignored, and always yields the error back for propagation. It is
/// consumed on use, so a handler records a given failure at most once.
pub struct Proceed<'a, E: Kinded> {
    service: &'a str,
    strategy: &'a dyn Strategy,
    ignore: &'a AHashSet<E::Kind>,
    hooks: &'a HookRegistry,
}

impl<'a, E: Kinded> Proceed<'a, E> {
    pub(crate) fn new(
        service: &'a str,
        strategy: &'a dyn Strategy,
        ignore: &'a AHashSet<E::Kind>,
        hooks: &'a HookRegistry,
    ) -> Self {
        Self {
            service,
            strategy,
            ignore,
            hooks,
        }
    }

    /// Returns true if `error` belongs to the breaker's ignore set.
    pub fn is_ignored(&self, error: &E) -> bool {
        self.ignore.contains(&error.kind())
    }

    /// Records `error` unless its kind is ignored, then re-raises it.
    pub fn apply<T>(self, error: E) -> Result<T, E> {
        let kind = error.kind();

        if self.ignore.contains(&kind) {
            tracing::debug!(service = self.service, ?kind, "ignored failure");
            self.hooks.execute_ignored_hook();
        } else if self.strategy.capabilities().error {
            tracing::debug!(service = self.service, ?kind, "recording failure");
            swallow_store_error(self.service, self.hooks, "error", self.strategy.error());
            self.hooks.execute_failure_hook();
        } else {
            tracing::debug!(service = self.service, ?kind, "strategy does not record failures");
        }

        Err(error)
    }
}

/// Decides what happens to an error raised by a guarded operation.
///
/// A handler can:
/// - call [`Proceed::apply`] to record (unless ignored) and re-raise,
/// - return `Err` directly to propagate an error without recording it,
/// - return `Ok` to suppress the error and make `run` succeed with that value.
///
/// Closures of the shape `Fn(E, Proceed<'_, E>) -> Result<T, E>` implement
/// this trait.
pub trait ErrorHandler<T, E: Kinded>: Send + Sync + 'static {
    /// Handles one error.
    fn handle(&self, error: E, proceed: Proceed<'_, E>) -> Result<T, E>;
}

impl<T, E, F> ErrorHandler<T, E> for F
where
    E: Kinded,
    F: for<'a> Fn(E, Proceed<'a, E>) -> Result<T, E> + Send + Sync + 'static,
{
    fn handle(&self, error: E, proceed: Proceed<'_, E>) -> Result<T, E> {
        self(error, proceed)
    }
}

/// Always applies the default policy: record unless ignored, then re-raise.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultErrorHandler;

impl<T, E: Kinded> ErrorHandler<T, E> for DefaultErrorHandler {
    fn handle(&self, error: E, proceed: Proceed<'_, E>) -> Result<T, E> {
        proceed.apply(error)
    }
}
