//! Type-erased payloads and wait results.
//!
//! A single wait may race kinds carrying different payload types, so the
//! result of a wait stores its payload behind `dyn Any` and the caller
//! recovers the concrete type with [`Fired::extract`] once it has looked at
//! which code fired:
//!
//! ```ignore
//! let fired = host.wait(events![KeyChange, Tick]).await;
//! if fired.is::<Tick>() {
//!     let (now, last) = fired.extract::<Tick>();
//! }
//! ```
//!
//! Extracting under the wrong kind is a contract violation and panics.

use crate::error::HostError;
use crate::event::{EventCode, EventKind};

use std::any::{Any, type_name};
use std::fmt;
use std::rc::Rc;

/// Payload of one emission, tagged with the code of the kind that built it.
#[derive(Clone)]
pub struct Payload {
    origin: EventCode,
    type_name: &'static str,
    value: Rc<dyn Any>,
}

impl Payload {
    /// Packages `value` as a payload of kind `K`.
    pub fn of<K: EventKind>(value: K::Payload) -> Self {
        Self::new(K::CODE, value)
    }

    /// Packages `value` under a raw code, for kinds declared at runtime.
    pub fn new<T: Any>(origin: EventCode, value: T) -> Self {
        Self {
            origin,
            type_name: type_name::<T>(),
            value: Rc::new(value),
        }
    }

    /// The "no payload" value for `origin`.
    pub fn empty(origin: EventCode) -> Self {
        Self::new(origin, ())
    }

    pub fn origin(&self) -> EventCode {
        self.origin
    }

    /// Returns true if this payload was produced for kind `K`.
    pub fn is<K: EventKind>(&self) -> bool {
        self.origin == K::CODE && self.value.is::<K::Payload>()
    }

    /// Borrows the payload as kind `K`.
    ///
    /// # Panics
    /// Panics if the payload was not produced for `K`.
    pub fn extract_ref<K: EventKind>(&self) -> &K::Payload {
        if self.origin != K::CODE {
            self.mismatch::<K>()
        }

        match self.value.downcast_ref::<K::Payload>() {
            Some(value) => value,
            None => self.mismatch::<K>(),
        }
    }

    /// Takes the payload as kind `K`, cloning only if the emission is still
    /// shared with another waiter.
    ///
    /// # Panics
    /// Panics if the payload was not produced for `K`.
    pub fn extract<K: EventKind>(self) -> K::Payload {
        if !self.is::<K>() {
            self.mismatch::<K>()
        }

        match self.value.downcast::<K::Payload>() {
            Ok(value) => Rc::try_unwrap(value).unwrap_or_else(|shared| (*shared).clone()),
            Err(_) => unreachable!("payload type checked above"),
        }
    }

    fn mismatch<K: EventKind>(&self) -> ! {
        let error = HostError::PayloadMismatch {
            expected: K::NAME,
            expected_code: K::CODE,
            found_code: self.origin,
            found_type: self.type_name,
        };

        panic!("{error}")
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Payload")
            .field("origin", &self.origin)
            .field("type", &self.type_name)
            .finish()
    }
}

/// Outcome of a wait: which code fired first and what it carried.
#[derive(Clone, Debug)]
pub struct Fired {
    code: EventCode,
    payload: Payload,
}

impl Fired {
    pub(crate) fn new(code: EventCode, payload: Payload) -> Self {
        Self { code, payload }
    }

    pub fn code(&self) -> EventCode {
        self.code
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Returns true if the event that fired was of kind `K`.
    pub fn is<K: EventKind>(&self) -> bool {
        self.code == K::CODE
    }

    /// Takes the payload as kind `K`. See [`Payload::extract`].
    pub fn extract<K: EventKind>(self) -> K::Payload {
        self.payload.extract::<K>()
    }

    pub fn into_parts(self) -> (EventCode, Payload) {
        (self.code, self.payload)
    }
}
