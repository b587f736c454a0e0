//! # circuit-gate
//!
//! A circuit breaker gate that wraps calls to a service, asks a pluggable
//! strategy whether the circuit is open, and classifies every failure before
//! deciding whether it is recorded, suppressed, or propagated.
//!
//! The gate itself keeps no statistics. A [`Strategy`] answers "is the
//! breaker open?" and may observe attempts, successes and failures. Failures
//! go through an [`ErrorHandler`], which receives the error together with a
//! [`Proceed`] continuation implementing the default policy: record the
//! failure unless its kind is ignored, then re-raise it.
//!
//! ## States
//!
//! - **Closed**: calls pass through to the guarded operation.
//! - **Open**: calls are rejected with [`BreakerError::Open`] without running.
//!
//! How and when a breaker moves between them is up to the strategy.
//!
//! ## Basic Usage
//!
//! ```rust
//! use circuit_gate::{Breaker, BreakerError, Kinded};
//! use std::error::Error;
//! use std::fmt;
//! use std::time::Duration;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
//! enum Kind {
//!     Unavailable,
//!     NotFound,
//! }
//!
//! #[derive(Debug)]
//! struct ServiceError(Kind);
//!
//! impl fmt::Display for ServiceError {
//!     fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
//!         write!(f, "Service error: {:?}", self.0)
//!     }
//! }
//!
//! impl Error for ServiceError {}
//!
//! impl Kinded for ServiceError {
//!     type Kind = Kind;
//!
//!     fn kind(&self) -> Kind {
//!         self.0
//!     }
//! }
//!
//! // Trip after 5 failures within a minute, stay open for ten minutes.
//! // Lookups of missing records are expected and never trip the breaker.
//! let breaker = Breaker::<String, ServiceError>::builder()
//!     .service("search")
//!     .threshold(5)
//!     .duration(Duration::from_secs(60))
//!     .reenable_after(Duration::from_secs(600))
//!     .ignore(Kind::NotFound)
//!     .build();
//!
//! match breaker.run(|| Err(ServiceError(Kind::NotFound))) {
//!     Ok(body) => println!("Call succeeded: {}", body),
//!     Err(BreakerError::Open) => println!("Circuit is open, call was prevented"),
//!     Err(BreakerError::Operation(err)) => println!("Call failed: {}", err),
//! }
//!
//! assert!(!breaker.is_open());
//! ```
//!
//! ## Error Handlers
//!
//! A custom handler can substitute a value, propagate without recording, or
//! fall back to the default policy:
//!
//! ```rust
//! use circuit_gate::{Breaker, Kinded};
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
//! enum CacheError {
//!     Miss,
//!     Down,
//! }
//!
//! impl Kinded for CacheError {
//!     type Kind = CacheError;
//!
//!     fn kind(&self) -> CacheError {
//!         *self
//!     }
//! }
//!
//! let breaker = Breaker::<Option<String>, CacheError>::builder()
//!     .error_handler(|err, proceed| match err {
//!         // A miss is an answer, not a failure.
//!         CacheError::Miss => Ok(None),
//!         other => proceed.apply(other),
//!     })
//!     .build();
//!
//! assert_eq!(breaker.run(|| Err(CacheError::Miss)).ok(), Some(None));
//! assert!(breaker.run(|| Err(CacheError::Down)).is_err());
//! ```
//!
//! ## Features
//!
//! - `std` - Standard library support (default)
//! - `async` - `Breaker::run_async` for future-returning operations

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod breaker;
mod classify;
mod config;
mod error;
mod hook;
pub mod prelude;
mod strategy;
mod window;

// Re-exports
pub use breaker::Breaker;
pub use classify::{DefaultErrorHandler, ErrorHandler, Kinded, Proceed};
pub use config::BreakerBuilder;
pub use error::{BreakerError, BreakerResult, StoreError, UnknownStrategy};
pub use hook::HookRegistry;
pub use strategy::{Capabilities, Strategy, StrategyConfig, StrategyKind, Stub};
pub use window::RollingWindow;
