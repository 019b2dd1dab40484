//! The selective-wait host.
//!
//! A [`Host`] owns the registry of pending waiters. Tasks suspend on it with
//! [`HostHandle::wait`] and producers resume them with [`Emit::emit`]:
//!
//! ```
//! use cohost::basic::{BasicEvents, KeyChange, Tick};
//! use cohost::{Host, Task, events};
//!
//! let host = Host::new();
//! let handle = host.handle();
//!
//! let task = Task::spawn(async move {
//!     let fired = handle.wait(events![KeyChange, Tick]).await;
//!     fired.extract::<Tick>()
//! });
//!
//! host.emit_tick(1.0, 0.5);
//! assert_eq!(task.try_take(), Some((1.0, 0.5)));
//! assert_eq!(host.pending(), 0);
//! ```
//!
//! # Teardown
//!
//! Dropping the [`Host`] destroys every task still suspended on it without
//! resuming it: no payload is delivered and no code after the `wait` runs.

mod builder;
mod dispatch;
mod registry;
mod slab;
mod wait;

pub use builder::HostBuilder;
pub use wait::Wait;

use crate::error::HostError;
use crate::event::{EventCode, EventKind, EventSet, Fired, Payload};
use crate::runtime::Continuation;
use registry::{Registry, Waiter, WaiterKey};
use wait::WaitSlot;

use std::cell::{Cell, RefCell};
use std::future::Future;
use std::rc::{Rc, Weak};
use tracing::{debug, trace};

/// State shared between a host and the handles and waits derived from it.
pub(crate) struct Shared {
    name: String,
    registry: RefCell<Registry>,
    closed: Cell<bool>,
}

impl Shared {
    fn new(name: String, capacity: usize) -> Self {
        Self {
            name,
            registry: RefCell::new(Registry::with_capacity(capacity)),
            closed: Cell::new(false),
        }
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.closed.get()
    }

    pub(crate) fn register(
        &self,
        codes: EventSet,
        slot: Rc<WaitSlot>,
        continuation: Rc<dyn Continuation>,
    ) -> WaiterKey {
        trace!(host = %self.name, %codes, "registering waiter");

        let waiter = Waiter::new(codes, slot, continuation);
        let key = self.registry.borrow_mut().register(waiter);

        trace!(host = %self.name, waiter = %key, "waiter registered");
        key
    }

    pub(crate) fn retract(&self, key: WaiterKey) -> Option<Waiter> {
        let waiter = self.registry.borrow_mut().retract(key);

        if waiter.is_some() {
            trace!(host = %self.name, waiter = %key, "waiter retracted");
        }
        waiter
    }

    /// Aborts every pending waiter and refuses new registrations.
    fn shutdown(&self) {
        if self.closed.replace(true) {
            return;
        }

        let waiters = self.registry.borrow_mut().drain();
        debug!(host = %self.name, aborted = waiters.len(), "host torn down");

        for waiter in waiters {
            waiter.abort();
        }
    }
}

fn checked(codes: EventSet) -> EventSet {
    if codes.is_empty() {
        panic!("{}", HostError::EmptyEventSet);
    }
    codes
}

/// Producer side of a host.
///
/// Every emit fulfills all waiters pending on the code when the call starts
/// and resumes them before returning. Emitting a code nobody waits on does
/// nothing.
pub trait Emit {
    /// Emits `code` with an already packaged payload.
    ///
    /// Every waiter registered under `code` when the call starts is
    /// retracted from all of its codes and resumed before this returns.
    /// Waiters registered by the resumed tasks are left for the next emit.
    ///
    /// # Arguments
    /// * `code` - The code to fire
    /// * `payload` - Data delivered to every fulfilled waiter
    ///
    /// # Returns
    /// The number of waiters fulfilled, zero if nobody waited on `code`
    ///
    /// # Example
    /// ```
    /// use cohost::{Emit, EventCode, Host, Payload, Task};
    ///
    /// let host = Host::new();
    /// let handle = host.handle();
    /// let code = EventCode::new(7);
    ///
    /// let task = Task::spawn(async move { handle.wait(code).await.code() });
    ///
    /// assert_eq!(host.emit_code(code, Payload::empty(code)), 1);
    /// assert_eq!(task.try_take(), Some(code));
    /// ```
    fn emit_code(&self, code: EventCode, payload: Payload) -> usize;

    /// Emits kind `K` carrying `payload`.
    ///
    /// # Returns
    /// The number of waiters fulfilled
    fn emit<K: EventKind>(&self, payload: K::Payload) -> usize {
        self.emit_code(K::CODE, Payload::of::<K>(payload))
    }
}

/// Owner of a waiter registry.
///
/// Not clonable; tasks receive a [`HostHandle`] instead so that the tasks
/// stored in the registry do not keep their own host alive.
pub struct Host {
    shared: Rc<Shared>,
}

impl Host {
    /// Creates a host with the default configuration.
    pub fn new() -> Self {
        HostBuilder::new().build()
    }

    /// Returns a [`HostBuilder`] for configuring a host.
    pub fn builder() -> HostBuilder {
        HostBuilder::new()
    }

    pub(crate) fn with_config(name: String, capacity: usize) -> Self {
        debug!(host = %name, capacity, "host created");

        Self {
            shared: Rc::new(Shared::new(name, capacity)),
        }
    }

    /// Creates a handle for tasks that wait on or emit into this host.
    ///
    /// The handle does not keep the host alive. Hand it to spawned tasks
    /// instead of a reference to the host itself.
    ///
    /// # Returns
    /// A clonable [`HostHandle`]
    ///
    /// # Example
    /// ```
    /// use cohost::Host;
    ///
    /// let host = Host::new();
    /// let handle = host.handle();
    /// assert!(!handle.is_closed());
    ///
    /// drop(host);
    /// assert!(handle.is_closed());
    /// ```
    pub fn handle(&self) -> HostHandle {
        HostHandle {
            shared: Rc::downgrade(&self.shared),
        }
    }

    /// Suspends the calling task until any code in `codes` is emitted.
    ///
    /// # Arguments
    /// * `codes` - A single [`EventCode`], an array of codes or an [`EventSet`]
    ///
    /// # Returns
    /// A [`Wait`] future resolving to the [`Fired`] event
    ///
    /// # Panics
    /// Panics immediately if `codes` is empty.
    pub fn wait(&self, codes: impl Into<EventSet>) -> Wait {
        Wait::new(Rc::downgrade(&self.shared), checked(codes.into()))
    }

    /// Name given by [`HostBuilder::name`], attached to every log record.
    pub fn name(&self) -> &str {
        &self.shared.name
    }

    /// Number of waiters currently suspended on this host.
    ///
    /// A task waiting on several codes counts once.
    pub fn pending(&self) -> usize {
        self.shared.registry.borrow().len()
    }

    /// Number of waiters currently registered under `code`.
    pub fn waiting_on(&self, code: EventCode) -> usize {
        self.shared.registry.borrow().waiting_on(code)
    }
}

impl Default for Host {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Host {
    fn drop(&mut self) {
        self.shared.shutdown();
    }
}

impl Emit for Host {
    fn emit_code(&self, code: EventCode, payload: Payload) -> usize {
        dispatch::dispatch(&self.shared, code, payload)
    }
}

/// Non-owning handle to a [`Host`], given to the tasks that wait on it.
///
/// Once the host is dropped, emitting through a handle does nothing and
/// a task waiting through it is destroyed.
#[derive(Clone)]
pub struct HostHandle {
    shared: Weak<Shared>,
}

impl HostHandle {
    /// Suspends the calling task until any code in `codes` is emitted.
    ///
    /// # Panics
    /// Panics immediately if `codes` is empty.
    pub fn wait(&self, codes: impl Into<EventSet>) -> Wait {
        Wait::new(self.shared.clone(), checked(codes.into()))
    }

    /// Waits on `codes` repeatedly until `accept` returns true for the
    /// fired event, and returns that event.
    ///
    /// Rejected events are consumed: the task re-registers after each one
    /// and only sees events emitted after that.
    ///
    /// # Arguments
    /// * `codes` - The codes to wait on every round
    /// * `accept` - Predicate deciding whether a fired event ends the wait
    ///
    /// # Example
    /// ```
    /// use cohost::basic::{BasicEvents, Tick};
    /// use cohost::{Host, Task, events};
    ///
    /// let host = Host::new();
    /// let handle = host.handle();
    ///
    /// let task = Task::spawn(async move {
    ///     let late = |fired: &cohost::Fired| fired.payload().extract_ref::<Tick>().0 >= 1.0;
    ///     handle.wait_until(events![Tick], late).await.extract::<Tick>()
    /// });
    ///
    /// host.emit_tick(0.5, 0.0);
    /// assert!(!task.is_finished());
    /// host.emit_tick(1.0, 0.5);
    /// assert_eq!(task.try_take(), Some((1.0, 0.5)));
    /// ```
    ///
    /// # Panics
    /// Panics immediately if `codes` is empty.
    pub fn wait_until<C, F>(
        &self,
        codes: C,
        mut accept: F,
    ) -> impl Future<Output = Fired> + use<C, F>
    where
        C: Into<EventSet>,
        F: FnMut(&Fired) -> bool,
    {
        let codes = checked(codes.into());
        let handle = self.clone();

        async move {
            loop {
                let fired = handle.wait(codes.clone()).await;
                if accept(&fired) {
                    return fired;
                }
            }
        }
    }

    /// Returns true once the host has been dropped.
    pub fn is_closed(&self) -> bool {
        self.shared.upgrade().is_none_or(|shared| shared.is_closed())
    }

    /// Number of waiters suspended on the host.
    ///
    /// # Returns
    /// The same count as [`Host::pending`], or zero once the host is closed
    pub fn pending(&self) -> usize {
        self.shared
            .upgrade()
            .map_or(0, |shared| shared.registry.borrow().len())
    }
}

impl Emit for HostHandle {
    fn emit_code(&self, code: EventCode, payload: Payload) -> usize {
        match self.shared.upgrade() {
            Some(shared) => dispatch::dispatch(&shared, code, payload),
            None => {
                trace!(%code, "emit on a closed host ignored");
                0
            }
        }
    }
}
