//! Continuation backed by a standard [`Waker`].
//!
//! Used when a wait future is polled by an executor that does not install a
//! continuation (see [`enter`](super::enter)). Resuming is then no longer
//! synchronous: waking only schedules the awaiting task with its executor,
//! which polls the wait future again later and finds the payload in place.

use crate::runtime::Continuation;

use std::cell::RefCell;
use std::rc::Rc;
use std::task::Waker;

/// Adapts a [`Waker`] to the [`Continuation`] contract.
///
/// Destroying it drops the waker, so the awaiting future is never woken
/// again and stays pending until its executor drops it.
pub struct WakerContinuation {
    waker: RefCell<Option<Waker>>,
}

impl WakerContinuation {
    pub fn new(waker: Waker) -> Rc<Self> {
        Rc::new(Self {
            waker: RefCell::new(Some(waker)),
        })
    }

    /// Replaces the stored waker if the executor handed out a different one
    /// on a later poll.
    pub(crate) fn update(&self, waker: &Waker) {
        let mut slot = self.waker.borrow_mut();

        match slot.as_ref() {
            Some(current) if current.will_wake(waker) => {}
            Some(_) => *slot = Some(waker.clone()),
            // Already resumed or destroyed.
            None => {}
        }
    }
}

impl Continuation for WakerContinuation {
    fn resume(self: Rc<Self>) {
        let waker = self.waker.borrow_mut().take();

        if let Some(waker) = waker {
            waker.wake();
        }
    }

    fn destroy(self: Rc<Self>) {
        self.waker.borrow_mut().take();
    }
}
