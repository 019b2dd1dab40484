//! Selective-wait host for single-threaded cooperative tasks.
//!
//! A task suspends until the *first* of several named events is emitted,
//! then resumes with that event's payload; its registrations under the other
//! events are retracted automatically. Producers (input handlers, timers)
//! emit events and the matching tasks run inline, before the emit returns.
//!
//! # Architecture
//!
//! - **Event**: codes, kind descriptors, event sets and type-erased payloads
//! - **Registry**: bidirectional code/waiter index, the only mutable state
//! - **Dispatcher**: resolves one emit against a snapshot of the registry
//! - **Host**: owns the registry; `wait`, `emit`, and abort-all teardown
//! - **Runtime**: the continuation contract the host relies on
//! - **Task**: a minimal runtime providing that contract
//!
//! # Example
//!
//! ```
//! use cohost::basic::{BasicEvents, KeyChange, KeySignal};
//! use cohost::{Host, Task, events};
//!
//! let host = Host::new();
//! let handle = host.handle();
//!
//! let task = Task::spawn(async move {
//!     let fired = handle.wait(events![KeyChange, KeySignal]).await;
//!     assert!(fired.is::<KeySignal>());
//!     // The registration under KeyChange is gone.
//!     assert_eq!(handle.pending(), 0);
//! });
//!
//! host.emit_key_signal();
//! assert!(task.is_finished());
//! assert_eq!(host.emit_key_change(), 0);
//! ```

pub mod basic;
mod error;
mod event;
mod host;
pub mod runtime;
mod task;

pub use error::HostError;
pub use event::{EventCode, EventKind, EventSet, Fired, Payload};
pub use host::{Emit, Host, HostBuilder, HostHandle, Wait};
pub use task::{JoinHandle, Task};
