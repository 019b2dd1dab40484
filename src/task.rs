//! Minimal cooperative task runtime.
//!
//! A [`Task`] wraps a future and acts as its own [`Continuation`]: it is
//! polled synchronously whenever it is resumed and dropped without being
//! polled when it is destroyed. There is no queue and no executor loop; a
//! task runs only inside [`Task::spawn`] or inside whatever call resumes it,
//! typically an emit on a [`Host`](crate::Host).
//!
//! # Task Spawning
//!
//! ```
//! use cohost::basic::{BasicEvents, KeySignal};
//! use cohost::{Host, Task, events};
//!
//! let host = Host::new();
//! let handle = host.handle();
//!
//! let task = Task::spawn(async move {
//!     let fired = handle.wait(events![KeySignal]).await;
//!     fired.code()
//! });
//!
//! // Suspended on its first wait.
//! assert!(!task.is_finished());
//!
//! host.emit_key_signal();
//! assert!(task.is_finished());
//! ```
//!
//! # Join Handles
//!
//! [`Task::spawn`] returns a [`JoinHandle`]. Awaiting it from another task
//! suspends that task until the joined one completes. If the joined task is
//! destroyed instead, every task awaiting it is destroyed too.
//!
//! # How Tasks Work
//!
//! 1. The future is boxed into a [`Task`] and polled immediately
//! 2. Before every poll the task installs itself as the current continuation
//! 3. A wait future captures that continuation and registers it with a host
//! 4. The poll returns `Poll::Pending`; the future is stored for later
//! 5. When a matching event is emitted the host resumes the continuation,
//!    which polls the future again inline

use crate::runtime::{self, Continuation, WakerContinuation};

use futures::task::noop_waker_ref;
use std::cell::{Cell, RefCell};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};
use tracing::trace;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum TaskState {
    /// Stored and waiting to be resumed.
    Suspended,
    /// Being polled somewhere up the stack.
    Running,
    Finished,
    Destroyed,
}

/// A spawned task that wraps a future and supports generic output.
///
/// Tasks are created via [`Task::spawn`] and only reachable through the
/// continuations captured from them and their [`JoinHandle`].
///
/// # Internals
///
/// - `future`: The wrapped future; taken out while it is being polled
/// - `result`: Stores the output value once the task completes
/// - `state`: Lifecycle of the task
/// - `notified`: Set when the task is resumed while already running
/// - `joiners`: Continuations of tasks awaiting this one
pub struct Task<T> {
    future: RefCell<Option<Pin<Box<dyn Future<Output = T>>>>>,
    result: RefCell<Option<T>>,
    state: Cell<TaskState>,
    notified: Cell<bool>,
    joiners: RefCell<Vec<Rc<dyn Continuation>>>,
}

impl<T: 'static> Task<T> {
    fn new<F>(future: F) -> Rc<Self>
    where
        F: Future<Output = T> + 'static,
    {
        Rc::new(Task {
            future: RefCell::new(Some(Box::pin(future))),
            result: RefCell::new(None),
            state: Cell::new(TaskState::Suspended),
            notified: Cell::new(false),
            joiners: RefCell::new(Vec::new()),
        })
    }

    /// Starts a task and runs it until its first suspension point.
    ///
    /// Unlike a queued executor this does not defer anything: when `spawn`
    /// returns, the future has either completed or is suspended on a wait.
    ///
    /// # Example
    /// ```
    /// use cohost::Task;
    ///
    /// let handle = Task::spawn(async { 40 + 2 });
    /// assert!(handle.is_finished());
    /// ```
    pub fn spawn<F>(future: F) -> JoinHandle<T>
    where
        F: Future<Output = T> + 'static,
    {
        let task = Task::new(future);
        task.run();

        JoinHandle { task, waker: None }
    }

    /// Polls the future until it no longer asks to be polled again.
    ///
    /// If the task is already running higher up the stack this only records
    /// the request; the outer call polls once more before returning.
    fn run(self: &Rc<Self>) {
        match self.state.get() {
            TaskState::Suspended => {}
            TaskState::Running => {
                self.notified.set(true);
                return;
            }
            TaskState::Finished | TaskState::Destroyed => return,
        }

        let Some(mut future) = self.future.borrow_mut().take() else {
            return;
        };
        self.state.set(TaskState::Running);

        let continuation: Rc<dyn Continuation> = self.clone();
        let mut context = Context::from_waker(noop_waker_ref());

        loop {
            self.notified.set(false);

            let poll = runtime::enter(continuation.clone(), || future.as_mut().poll(&mut context));

            match poll {
                Poll::Ready(value) => {
                    *self.result.borrow_mut() = Some(value);
                    self.state.set(TaskState::Finished);
                    drop(future);

                    let joiners = std::mem::take(&mut *self.joiners.borrow_mut());
                    for joiner in joiners {
                        joiner.resume();
                    }

                    return;
                }
                Poll::Pending if self.state.get() == TaskState::Destroyed => {
                    trace!("task destroyed while running");
                    drop(future);
                    self.destroy_joiners();

                    return;
                }
                Poll::Pending if self.notified.get() => continue,
                Poll::Pending => break,
            }
        }

        *self.future.borrow_mut() = Some(future);
        self.state.set(TaskState::Suspended);
    }

    fn destroy_joiners(&self) {
        let joiners = std::mem::take(&mut *self.joiners.borrow_mut());
        for joiner in joiners {
            joiner.destroy();
        }
    }
}

impl<T: 'static> Continuation for Task<T> {
    fn resume(self: Rc<Self>) {
        self.run();
    }

    fn destroy(self: Rc<Self>) {
        match self.state.get() {
            TaskState::Suspended => {
                self.state.set(TaskState::Destroyed);
                // Dropping the future may drop other waits of this task; the
                // borrow is released first so they can run their own cleanup.
                let future = self.future.borrow_mut().take();
                drop(future);
                trace!("task destroyed");

                self.destroy_joiners();
            }
            // The running poll drops the future once it returns.
            TaskState::Running => self.state.set(TaskState::Destroyed),
            TaskState::Finished | TaskState::Destroyed => {}
        }
    }
}

/// A future that resolves when the associated task completes, returning the
/// output value.
///
/// Awaited from a [`Task`], it registers that task as a joiner and the joined
/// task resumes it inline on completion. Awaited under any other executor,
/// it registers one [`WakerContinuation`] per handle and keeps its waker up
/// to date across polls.
///
/// # Panics
/// Awaiting a handle whose output was already taken with
/// [`try_take`](JoinHandle::try_take) panics once the task has finished.
///
/// # Example
/// ```
/// use cohost::Task;
///
/// let inner = Task::spawn(async { 7 });
/// let outer = Task::spawn(async move { inner.await * 6 });
/// assert_eq!(outer.try_take(), Some(42));
/// ```
pub struct JoinHandle<T> {
    task: Rc<Task<T>>,
    waker: Option<Rc<WakerContinuation>>,
}

impl<T> JoinHandle<T> {
    /// Returns true once the task has run to completion.
    pub fn is_finished(&self) -> bool {
        self.task.state.get() == TaskState::Finished
    }

    /// Returns true if the task was destroyed before completing.
    pub fn is_destroyed(&self) -> bool {
        self.task.state.get() == TaskState::Destroyed
    }

    /// Takes the output of a finished task.
    ///
    /// # Returns
    /// The output, or `None` while the task is suspended, if it was
    /// destroyed, or if the output was already taken
    ///
    /// # Example
    /// ```
    /// use cohost::Task;
    ///
    /// let handle = Task::spawn(async { "done" });
    /// assert_eq!(handle.try_take(), Some("done"));
    /// assert_eq!(handle.try_take(), None);
    /// ```
    pub fn try_take(&self) -> Option<T> {
        self.task.result.borrow_mut().take()
    }

    /// Joiner to register for the current poll.
    ///
    /// Outside a task the same waker continuation is reused, so polling a
    /// pending handle again never registers a second joiner.
    fn joiner(&mut self, cx: &Context<'_>) -> Option<Rc<dyn Continuation>> {
        if let Some(continuation) = runtime::current() {
            return Some(continuation);
        }

        match &self.waker {
            Some(waker) => {
                waker.update(cx.waker());
                None
            }
            None => {
                let waker = WakerContinuation::new(cx.waker().clone());
                self.waker = Some(waker.clone());
                Some(waker)
            }
        }
    }
}

impl<T: 'static> Future for JoinHandle<T> {
    type Output = T;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();

        if this.task.state.get() == TaskState::Finished {
            let result = this
                .task
                .result
                .borrow_mut()
                .take()
                .expect("task completed but result missing");

            return Poll::Ready(result);
        }

        let Some(joiner) = this.joiner(cx) else {
            return Poll::Pending;
        };

        if this.task.state.get() == TaskState::Destroyed {
            // Nothing will ever complete this join.
            joiner.destroy();
            return Poll::Pending;
        }

        let mut joiners = this.task.joiners.borrow_mut();
        if !joiners.iter().any(|known| Rc::ptr_eq(known, &joiner)) {
            joiners.push(joiner);
        }

        Poll::Pending
    }
}
