//! Event codes, kind descriptors and payloads.
//!
//! - [`EventCode`]: opaque identifier of a kind
//! - [`EventKind`]: static pairing of a code with a payload type
//! - [`EventSet`]: the codes one wait races against
//! - [`Payload`] / [`Fired`]: type-erased emission data and wait results

mod code;
mod kind;
mod payload;
mod set;

pub use code::EventCode;
pub use kind::EventKind;
pub use payload::{Fired, Payload};
pub use set::EventSet;
