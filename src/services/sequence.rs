//! Request sequencing for views fed by overlapping fetches
//!
//! Every fetch takes a token from the view's sequence before it starts. When
//! the response arrives it is applied only if no newer request was issued in
//! the meantime, so request order wins over arrival order.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use crate::types::Result;

/// Monotonic ticket identifying one fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Issues request tokens in strictly increasing order
#[derive(Debug, Default)]
pub struct RequestSequence {
    latest: AtomicU64,
}

impl RequestSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a new token; it supersedes every earlier one
    pub fn issue(&self) -> RequestToken {
        RequestToken(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// True if no token newer than `token` has been issued
    pub fn is_current(&self, token: RequestToken) -> bool {
        self.latest.load(Ordering::SeqCst) == token.0
    }
}

/// What happened to a completed response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Stored as the view's data
    Applied,
    /// Current request failed; the view fell back to empty
    Failed,
    /// A newer request was issued; the response was dropped
    Stale,
}

#[derive(Debug)]
struct Current<T> {
    data: Option<T>,
    error: Option<String>,
    applied: Option<RequestToken>,
}

/// Latest accepted state of one view
#[derive(Debug)]
pub struct ViewState<T> {
    name: String,
    sequence: RequestSequence,
    current: Mutex<Current<T>>,
}

impl<T> ViewState<T> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sequence: RequestSequence::new(),
            current: Mutex::new(Current {
                data: None,
                error: None,
                applied: None,
            }),
        }
    }

    /// Start a fetch for this view
    pub fn begin(&self) -> RequestToken {
        self.sequence.issue()
    }

    /// Record the outcome of the fetch identified by `token`
    pub fn complete(&self, token: RequestToken, result: Result<T>) -> Completion {
        let mut current = self.lock();

        if !self.sequence.is_current(token) {
            log::debug!("{}: discarding stale response #{}", self.name, token.value());
            return Completion::Stale;
        }

        match result {
            Ok(data) => {
                current.data = Some(data);
                current.error = None;
                current.applied = Some(token);
                Completion::Applied
            }
            Err(e) => {
                log::error!("{}: fetch #{} failed: {}", self.name, token.value(), e);
                current.data = None;
                current.error = Some(format!("Failed to load {}: {}", self.name, e));
                current.applied = Some(token);
                Completion::Failed
            }
        }
    }

    /// User-visible error from the most recent applied request
    pub fn error(&self) -> Option<String> {
        self.lock().error.clone()
    }

    /// Token of the most recent applied request
    pub fn applied_token(&self) -> Option<RequestToken> {
        self.lock().applied
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn lock(&self) -> MutexGuard<'_, Current<T>> {
        self.current.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl<T: Clone> ViewState<T> {
    /// Clone of the current data, if any
    pub fn data(&self) -> Option<T> {
        self.lock().data.clone()
    }
}
