//! Task runtime seam.
//!
//! The host depends only on the three primitives described by
//! [`Continuation`]: capture (via [`current`]), resume and destroy. Anything
//! that can provide them can drive tasks suspended on a host.

mod context;
mod continuation;
mod waker;

pub use context::{current, enter};
pub use continuation::Continuation;
pub use waker::WakerContinuation;
