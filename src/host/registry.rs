//! Bidirectional index between event codes and pending waiters.
//!
//! The forward side maps a code to the keys of the waiters registered under
//! it; the reverse side is each waiter's own [`EventSet`]. Both are only
//! ever changed together, by [`Registry::register`] and
//! [`Registry::retract`], so for every `(code, waiter)` pair on one side the
//! mirror pair exists on the other.

use crate::event::{EventCode, EventSet, Payload};
use crate::host::slab::{Slab, SlabKey};
use crate::host::wait::WaitSlot;
use crate::runtime::Continuation;

use std::collections::{HashMap, HashSet};
use std::rc::Rc;

pub(crate) type WaiterKey = SlabKey;

/// One outstanding suspension.
pub(crate) struct Waiter {
    codes: EventSet,
    slot: Rc<WaitSlot>,
    continuation: Rc<dyn Continuation>,
}

impl Waiter {
    pub(crate) fn new(
        codes: EventSet,
        slot: Rc<WaitSlot>,
        continuation: Rc<dyn Continuation>,
    ) -> Self {
        Self {
            codes,
            slot,
            continuation,
        }
    }

    /// Delivers the fired event and resumes the suspended task.
    ///
    /// Must be called with the waiter already retracted and without any
    /// registry borrow held: the resumed task may re-enter the host.
    pub(crate) fn fulfill(self, code: EventCode, payload: Payload) {
        self.slot.fulfill(code, payload);
        self.continuation.resume();
    }

    /// Destroys the suspended task without resuming it.
    pub(crate) fn abort(self) {
        self.slot.abort();
        self.continuation.destroy();
    }
}

pub(crate) struct Registry {
    waiters: Slab<Waiter>,
    pending: HashMap<EventCode, HashSet<WaiterKey>>,
}

impl Registry {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            waiters: Slab::new(capacity),
            pending: HashMap::with_capacity(capacity),
        }
    }

    /// Adds the waiter under every code of its set.
    pub(crate) fn register(&mut self, waiter: Waiter) -> WaiterKey {
        debug_assert!(!waiter.codes.is_empty(), "waiter registered with no codes");

        let codes = waiter.codes.clone();
        let key = self.waiters.insert(waiter);

        for code in codes.iter() {
            self.pending.entry(code).or_default().insert(key);
        }

        key
    }

    /// Removes every registration of the waiter behind `key`.
    ///
    /// Runs in time proportional to the waiter's own code set. Returns
    /// `None` if the waiter was already retracted.
    pub(crate) fn retract(&mut self, key: WaiterKey) -> Option<Waiter> {
        let waiter = self.waiters.remove(key)?;

        for code in waiter.codes.iter() {
            if let Some(keys) = self.pending.get_mut(&code) {
                keys.remove(&key);
                if keys.is_empty() {
                    self.pending.remove(&code);
                }
            }
        }

        Some(waiter)
    }

    /// Snapshot of the waiters currently registered under `code`.
    pub(crate) fn waiters_for(&self, code: EventCode) -> Vec<WaiterKey> {
        self.pending
            .get(&code)
            .map(|keys| keys.iter().copied().collect())
            .unwrap_or_default()
    }

    #[cfg(test)]
    pub(crate) fn is_registered(&self, key: WaiterKey) -> bool {
        self.waiters.contains(key)
    }

    pub(crate) fn len(&self) -> usize {
        self.waiters.len()
    }

    pub(crate) fn waiting_on(&self, code: EventCode) -> usize {
        self.pending.get(&code).map_or(0, HashSet::len)
    }

    /// Retracts every waiter at once.
    pub(crate) fn drain(&mut self) -> Vec<Waiter> {
        self.pending.clear();
        self.waiters.drain()
    }

    /// Verifies that both sides of the index mirror each other.
    #[cfg(test)]
    pub(crate) fn check_consistency(&self) -> Result<(), String> {
        let mut mirrored = 0;

        for (key, waiter) in self.waiters.iter() {
            for code in waiter.codes.iter() {
                let present = self.pending.get(&code).is_some_and(|keys| keys.contains(&key));
                if !present {
                    return Err(format!("waiter {key} missing under {code}"));
                }
                mirrored += 1;
            }
        }

        for (code, keys) in &self.pending {
            if keys.is_empty() {
                return Err(format!("empty bucket left for {code}"));
            }
            for key in keys {
                match self.waiters.get(*key) {
                    Some(waiter) if waiter.codes.contains(*code) => {}
                    Some(_) => return Err(format!("waiter {key} indexed under foreign {code}")),
                    None => return Err(format!("stale waiter {key} under {code}")),
                }
            }
        }

        let forward: usize = self.pending.values().map(HashSet::len).sum();
        if forward != mirrored {
            return Err(format!("{forward} forward entries for {mirrored} registrations"));
        }

        Ok(())
    }
}
