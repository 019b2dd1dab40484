//! The suspension point: a future that registers the current task with a
//! host and resolves when one of its codes is emitted.

use crate::event::{EventCode, EventSet, Fired, Payload};
use crate::host::Shared;
use crate::host::registry::WaiterKey;
use crate::runtime::{self, Continuation, WakerContinuation};

use std::cell::{Cell, RefCell};
use std::future::Future;
use std::pin::Pin;
use std::rc::{Rc, Weak};
use std::task::{Context, Poll};
use tracing::trace;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum WaitState {
    /// Created but not yet polled.
    Idle,
    Pending,
    Fulfilled,
    Aborted,
}

/// Payload slot shared between a [`Wait`] and its registry entry.
pub(crate) struct WaitSlot {
    state: Cell<WaitState>,
    fired: RefCell<Option<Fired>>,
}

impl WaitSlot {
    pub(crate) fn new() -> Self {
        Self {
            state: Cell::new(WaitState::Idle),
            fired: RefCell::new(None),
        }
    }

    pub(crate) fn fulfill(&self, code: EventCode, payload: Payload) {
        debug_assert_eq!(self.state.get(), WaitState::Pending, "waiter fulfilled twice");

        *self.fired.borrow_mut() = Some(Fired::new(code, payload));
        self.state.set(WaitState::Fulfilled);
    }

    pub(crate) fn abort(&self) {
        self.state.set(WaitState::Aborted);
    }

    fn take(&self) -> Option<Fired> {
        self.fired.borrow_mut().take()
    }
}

/// Future returned by [`Host::wait`](crate::Host::wait) and
/// [`HostHandle::wait`](crate::HostHandle::wait).
///
/// On first poll it captures the continuation of the running task and
/// registers it under every code of its set. It resolves to the [`Fired`]
/// event of whichever code is emitted first.
///
/// If the host is torn down first, or is already gone when the wait starts,
/// the task is destroyed instead and this future never completes. Dropping
/// a wait that has not fired retracts its registration.
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct Wait {
    host: Weak<Shared>,
    codes: Option<EventSet>,
    slot: Rc<WaitSlot>,
    key: Option<WaiterKey>,
    waker: Option<Rc<WakerContinuation>>,
}

impl Wait {
    pub(crate) fn new(host: Weak<Shared>, codes: EventSet) -> Self {
        Self {
            host,
            codes: Some(codes),
            slot: Rc::new(WaitSlot::new()),
            key: None,
            waker: None,
        }
    }

    fn register(&mut self, cx: &Context<'_>) {
        let continuation: Rc<dyn Continuation> = match runtime::current() {
            Some(continuation) => continuation,
            None => {
                let waker = WakerContinuation::new(cx.waker().clone());
                self.waker = Some(waker.clone());
                waker
            }
        };

        let host = match self.host.upgrade() {
            Some(host) if host.is_closed() => {
                trace!(host = %host.name, "wait on a closed host; destroying the task");
                None
            }
            Some(host) => Some(host),
            None => {
                trace!("wait on a dropped host; destroying the task");
                None
            }
        };

        let (Some(host), Some(codes)) = (host, self.codes.take()) else {
            self.slot.abort();
            continuation.destroy();
            return;
        };

        self.slot.state.set(WaitState::Pending);
        self.key = Some(host.register(codes, self.slot.clone(), continuation));
    }
}

impl Future for Wait {
    type Output = Fired;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();

        match this.slot.state.get() {
            WaitState::Idle => {
                this.register(cx);
                Poll::Pending
            }
            WaitState::Pending => {
                if let Some(waker) = &this.waker {
                    waker.update(cx.waker());
                }
                Poll::Pending
            }
            WaitState::Fulfilled => {
                this.key = None;
                match this.slot.take() {
                    Some(fired) => Poll::Ready(fired),
                    None => panic!("`Wait` polled after completion"),
                }
            }
            WaitState::Aborted => Poll::Pending,
        }
    }
}

impl Drop for Wait {
    fn drop(&mut self) {
        if self.slot.state.get() != WaitState::Pending {
            return;
        }

        let (Some(key), Some(host)) = (self.key.take(), self.host.upgrade()) else {
            return;
        };

        host.retract(key);
    }
}
