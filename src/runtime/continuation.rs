//! The continuation contract between the host and a task runtime.
//!
//! The host never schedules anything itself. It only decides *when* a
//! suspended task is resumed or destroyed; how that happens is up to the
//! runtime that captured the continuation. [`Task`](crate::Task) is the
//! bundled implementation. [`WakerContinuation`](super::WakerContinuation)
//! adapts plain [`Waker`](std::task::Waker)s for foreign executors.

use std::rc::Rc;

/// A suspended task that can be resumed or destroyed exactly once per
/// suspension.
///
/// Implementations must tolerate both calls arriving while the task is
/// already running higher up the stack: a reentrant `resume` means "poll
/// again after the current poll", a reentrant `destroy` means "drop the
/// task once the current poll returns".
pub trait Continuation {
    /// Synchronously continues the task past its suspension point.
    fn resume(self: Rc<Self>);

    /// Drops the task without running any code past its suspension point.
    fn destroy(self: Rc<Self>);
}
