//! Thread-local continuation context.
//!
//! A task runtime installs the continuation of the task it is about to poll
//! with [`enter`]; a future that wants to suspend the task reads it back with
//! [`current`]. Nesting is allowed: resuming another task from inside a poll
//! installs that task's continuation for the duration of the inner poll and
//! restores the outer one afterwards.
//!
//! # Example
//!
//! ```
//! use cohost::runtime::{self, Continuation};
//! use std::rc::Rc;
//!
//! struct Noop;
//!
//! impl Continuation for Noop {
//!     fn resume(self: Rc<Self>) {}
//!     fn destroy(self: Rc<Self>) {}
//! }
//!
//! assert!(runtime::current().is_none());
//! runtime::enter(Rc::new(Noop), || assert!(runtime::current().is_some()));
//! assert!(runtime::current().is_none());
//! ```

use crate::runtime::Continuation;

use std::cell::RefCell;
use std::rc::Rc;

thread_local! {
    /// Continuation of the task currently being polled on this thread.
    ///
    /// Set by [`enter`] around every poll of a task.
    static CURRENT_CONTINUATION: RefCell<Option<Rc<dyn Continuation>>> = const { RefCell::new(None) };
}

/// Runs `function` with `continuation` installed as the current one.
///
/// The previous continuation is restored on exit, including when
/// `function` unwinds.
pub fn enter<F, R>(continuation: Rc<dyn Continuation>, function: F) -> R
where
    F: FnOnce() -> R,
{
    struct Restore(Option<Rc<dyn Continuation>>);

    impl Drop for Restore {
        fn drop(&mut self) {
            let previous = self.0.take();
            CURRENT_CONTINUATION.with(|current| *current.borrow_mut() = previous);
        }
    }

    let previous = CURRENT_CONTINUATION.with(|current| current.borrow_mut().replace(continuation));
    let _restore = Restore(previous);

    function()
}

/// Returns the continuation of the task being polled, if any.
pub fn current() -> Option<Rc<dyn Continuation>> {
    CURRENT_CONTINUATION.with(|current| current.borrow().clone())
}
