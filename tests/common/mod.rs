#![allow(dead_code)]

use circuit_gate::{Capabilities, Kinded, StoreError, Strategy};
use std::error::Error;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Runtime,
    Standard,
    Timeout,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestError {
    kind: Kind,
    message: String,
}

impl TestError {
    pub fn new(kind: Kind, msg: &str) -> Self {
        TestError {
            kind,
            message: msg.to_string(),
        }
    }

    pub fn runtime(msg: &str) -> Self {
        Self::new(Kind::Runtime, msg)
    }

    pub fn standard(msg: &str) -> Self {
        Self::new(Kind::Standard, msg)
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for TestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Test error ({:?}): {}", self.kind, self.message)
    }
}

impl Error for TestError {}

impl Kinded for TestError {
    type Kind = Kind;

    fn kind(&self) -> Kind {
        self.kind
    }
}

/// Strategy double that counts every call it receives and can simulate an
/// unreachable backing store.
pub struct RecordingStrategy {
    capabilities: Capabilities,
    open: AtomicBool,
    store_down: AtomicBool,
    open_queries: AtomicUsize,
    counts: AtomicUsize,
    successes: AtomicUsize,
    errors: AtomicUsize,
}

impl RecordingStrategy {
    pub fn new(capabilities: Capabilities) -> Self {
        Self {
            capabilities,
            open: AtomicBool::new(false),
            store_down: AtomicBool::new(false),
            open_queries: AtomicUsize::new(0),
            counts: AtomicUsize::new(0),
            successes: AtomicUsize::new(0),
            errors: AtomicUsize::new(0),
        }
    }

    pub fn full() -> Self {
        Self::new(Capabilities::ALL)
    }

    pub fn set_open(&self, open: bool) {
        self.open.store(open, Ordering::SeqCst);
    }

    pub fn set_store_down(&self, down: bool) {
        self.store_down.store(down, Ordering::SeqCst);
    }

    pub fn open_queries(&self) -> usize {
        self.open_queries.load(Ordering::SeqCst)
    }

    pub fn count_calls(&self) -> usize {
        self.counts.load(Ordering::SeqCst)
    }

    pub fn success_calls(&self) -> usize {
        self.successes.load(Ordering::SeqCst)
    }

    pub fn error_calls(&self) -> usize {
        self.errors.load(Ordering::SeqCst)
    }

    fn store(&self) -> Result<(), StoreError> {
        if self.store_down.load(Ordering::SeqCst) {
            Err(StoreError::new("connection refused"))
        } else {
            Ok(())
        }
    }
}

impl Strategy for RecordingStrategy {
    fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    fn is_open(&self) -> Result<bool, StoreError> {
        self.open_queries.fetch_add(1, Ordering::SeqCst);
        self.store()?;
        Ok(self.open.load(Ordering::SeqCst))
    }

    fn count(&self) -> Result<(), StoreError> {
        self.counts.fetch_add(1, Ordering::SeqCst);
        self.store()
    }

    fn success(&self) -> Result<(), StoreError> {
        self.successes.fetch_add(1, Ordering::SeqCst);
        self.store()
    }

    fn error(&self) -> Result<(), StoreError> {
        self.errors.fetch_add(1, Ordering::SeqCst);
        self.store()
    }
}
