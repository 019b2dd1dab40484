//! Static event kind descriptors.
//!
//! A kind pairs an [`EventCode`] with the type of payload carried by every
//! emission of that kind. Kinds are plain unit structs; they are never
//! instantiated, only named as type parameters at emit and extract sites:
//!
//! ```
//! use cohost::{EventKind, event_kinds};
//!
//! event_kinds! {
//!     /// The selection moved.
//!     pub CursorMoved = 10;
//!     /// A frame elapsed, carrying the frame index.
//!     pub Frame: u64 = 11;
//! }
//!
//! assert_eq!(CursorMoved::CODE.get(), 10);
//! assert_eq!(Frame::NAME, "Frame");
//! ```

use crate::event::EventCode;

/// Declaration of one event kind: its code and payload shape.
///
/// "No payload" is spelled `()`. One emission is shared by every waiter it
/// fulfills; a waiter extracting by value clones it unless it is the last
/// holder.
pub trait EventKind: 'static {
    const CODE: EventCode;
    const NAME: &'static str;
    type Payload: Clone + 'static;
}

/// Declares unit structs implementing [`EventKind`].
///
/// Each entry is `vis Name = code;` for a kind without payload, or
/// `vis Name: Type = code;` for a kind carrying `Type`.
#[macro_export]
macro_rules! event_kinds {
    () => {};

    (@kind $(#[$meta:meta])* $vis:vis $name:ident, $payload:ty, $code:expr) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
        $vis struct $name;

        impl $crate::EventKind for $name {
            const CODE: $crate::EventCode = $crate::EventCode::new($code);
            const NAME: &'static str = stringify!($name);
            type Payload = $payload;
        }
    };

    ($(#[$meta:meta])* $vis:vis $name:ident = $code:expr; $($rest:tt)*) => {
        $crate::event_kinds!(@kind $(#[$meta])* $vis $name, (), $code);
        $crate::event_kinds!($($rest)*);
    };

    ($(#[$meta:meta])* $vis:vis $name:ident : $payload:ty = $code:expr; $($rest:tt)*) => {
        $crate::event_kinds!(@kind $(#[$meta])* $vis $name, $payload, $code);
        $crate::event_kinds!($($rest)*);
    };
}
