//! In-process advisory locks serializing runs with identical parameters

use std::collections::HashMap;
use std::sync::{Arc, LockResult, Mutex, MutexGuard, PoisonError};

use mq_core::{ExperimentParams, SessionId};

type LockKey = (SessionId, u64, String);

/// One mutex per `(session, LOD threshold bits, MapQTL session)` in use.
///
/// Only callers inside the same process are serialized. Runs with different
/// keys never wait on each other.
#[derive(Debug, Default)]
pub struct ParamLocks {
    locks: Mutex<HashMap<LockKey, Arc<Mutex<()>>>>,
}

fn recover<'a, T>(result: LockResult<MutexGuard<'a, T>>) -> MutexGuard<'a, T> {
    result.unwrap_or_else(PoisonError::into_inner)
}

/// Drops the map entry of a key once no other caller holds or awaits it.
struct Release<'a> {
    locks: &'a ParamLocks,
    key: LockKey,
    entry: Arc<Mutex<()>>,
}

impl Drop for Release<'_> {
    fn drop(&mut self) {
        let mut locks = recover(self.locks.locks.lock());
        // The map, the caller and this guard hold the only references.
        if Arc::strong_count(&self.entry) == 3 {
            locks.remove(&self.key);
        }
    }
}

impl ParamLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(session: &SessionId, params: &ExperimentParams) -> LockKey {
        let (bits, label) = params.lock_key();
        (session.clone(), bits, label.to_string())
    }

    /// Run `f` while holding the lock of `(session, params)`.
    ///
    /// The key is released even if `f` panics.
    pub fn with_lock<R>(
        &self,
        session: &SessionId,
        params: &ExperimentParams,
        f: impl FnOnce() -> R,
    ) -> R {
        let key = Self::key(session, params);
        let entry = {
            let mut locks = recover(self.locks.lock());
            Arc::clone(locks.entry(key.clone()).or_default())
        };

        let _release = Release {
            locks: self,
            key,
            entry: Arc::clone(&entry),
        };
        let _guard = recover(entry.lock());
        f()
    }

    /// Number of keys currently tracked.
    pub fn len(&self) -> usize {
        recover(self.locks.lock()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
