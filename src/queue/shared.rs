//! Thread-safe wrapper around the matchmaking engine
//!
//! Merges and pairing scans mutate multiple queue positions and must be
//! observed atomically, so every public operation takes one lock for its
//! full duration. Policy calls therefore run inside the lock; policies that
//! may block should be kept fast or evaluated from copied group facts
//! outside the critical section by the caller.

use crate::queue::engine::Matchmaker;
use crate::error::{MatchmakingError, Result};
use crate::types::{Group, PairedMatch, PushOutcome};
use std::sync::{Arc, Mutex, MutexGuard};

/// Clonable handle sharing one engine behind a single mutual-exclusion
/// boundary
#[derive(Clone)]
pub struct SharedMatchmaker {
    inner: Arc<Mutex<Matchmaker>>,
}

impl SharedMatchmaker {
    pub fn new(engine: Matchmaker) -> Self {
        Self {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Matchmaker>> {
        self.inner.lock().map_err(|_| {
            MatchmakingError::InternalError {
                message: "engine lock poisoned by a panicking holder".to_string(),
            }
            .into()
        })
    }

    /// See [`Matchmaker::push`]
    pub fn push(&self, group: Group) -> Result<PushOutcome> {
        self.lock()?.push(group)
    }

    /// See [`Matchmaker::pop`]
    pub fn pop(&self) -> Result<Group> {
        self.lock()?.pop()
    }

    /// See [`Matchmaker::is_empty`]
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.lock()?.is_empty())
    }

    /// See [`Matchmaker::find_match`]
    pub fn find_match(&self) -> Result<Option<PairedMatch>> {
        self.lock()?.find_match()
    }

    /// See [`Matchmaker::ready_len`]
    pub fn ready_len(&self) -> Result<usize> {
        Ok(self.lock()?.ready_len())
    }
}
