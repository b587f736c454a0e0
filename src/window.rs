//! In-memory rolling-window strategy.

use parking_lot::Mutex;
use smallvec::SmallVec;
use std::time::{Duration, Instant};

use crate::error::StoreError;
use crate::strategy::{Capabilities, Strategy, StrategyConfig};

/// Trips after `threshold` recorded failures within `duration`, then stays
/// open for `reenable_after` before closing with an empty window.
///
/// State is process-local. Breakers in different processes guarding the same
/// service need a strategy backed by a shared store instead.
pub struct RollingWindow {
    state: Mutex<WindowState>,
    threshold: u64,
    duration: Duration,
    reenable_after: Duration,
}

struct WindowState {
    failures: SmallVec<[Instant; 16]>,
    tripped_at: Option<Instant>,
}

impl RollingWindow {
    /// Creates a new rolling window.
    pub fn new(threshold: u64, duration: Duration, reenable_after: Duration) -> Self {
        Self {
            state: Mutex::new(WindowState {
                failures: SmallVec::new(),
                tripped_at: None,
            }),
            threshold: threshold.max(1),
            duration,
            reenable_after,
        }
    }

    /// Creates a rolling window from a breaker's strategy config.
    pub fn from_config(config: &StrategyConfig) -> Self {
        Self::new(config.threshold, config.duration, config.reenable_after)
    }

    /// Number of failures currently inside the window.
    pub fn failures_in_window(&self) -> usize {
        let mut state = self.state.lock();
        self.clean_old_failures(&mut state.failures, Instant::now());
        state.failures.len()
    }

    fn clean_old_failures(&self, failures: &mut SmallVec<[Instant; 16]>, now: Instant) {
        let Some(cutoff) = now.checked_sub(self.duration) else {
            return;
        };

        let expired = failures.iter().take_while(|at| **at < cutoff).count();
        failures.drain(..expired);
    }
}

impl Strategy for RollingWindow {
    fn capabilities(&self) -> Capabilities {
        Capabilities::NONE.with_error()
    }

    fn is_open(&self) -> Result<bool, StoreError> {
        let mut state = self.state.lock();

        match state.tripped_at {
            Some(at) if at.elapsed() < self.reenable_after => Ok(true),
            Some(_) => {
                state.tripped_at = None;
                state.failures.clear();
                Ok(false)
            }
            None => Ok(false),
        }
    }

    fn error(&self) -> Result<(), StoreError> {
        let now = Instant::now();
        let mut state = self.state.lock();
        self.clean_old_failures(&mut state.failures, now);

        state.failures.push(now);

        // Only the newest `threshold` timestamps can ever matter.
        let threshold = usize::try_from(self.threshold).unwrap_or(usize::MAX);
        if state.failures.len() > threshold {
            let excess = state.failures.len() - threshold;
            state.failures.drain(..excess);
        }

        if state.failures.len() >= threshold && state.tripped_at.is_none() {
            state.tripped_at = Some(now);
        }

        Ok(())
    }
}
