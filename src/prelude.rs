//! Re-exports common types for convenient usage.
//!
//! # Example
//! ```rust,no_run
//! use circuit_gate::prelude::*;
//! ```

pub use crate::breaker::Breaker;
pub use crate::classify::{ErrorHandler, Kinded, Proceed};
pub use crate::error::{BreakerError, BreakerResult, StoreError};
pub use crate::strategy::{Capabilities, Strategy, StrategyKind};
