//! Stock event kinds for input-driven consumers.
//!
//! A window or terminal front end typically forwards three things into a
//! host: "the set of held keys changed", "some key event happened" (repeats
//! included) and a frame tick carrying the current and previous timestamps.

use crate::event_kinds;
use crate::host::Emit;

event_kinds! {
    /// The set of held inputs changed.
    pub KeyChange = 0;
    /// An input event arrived, auto-repeats included.
    pub KeySignal = 1;
    /// A frame elapsed: `(this_time, last_time)` in seconds.
    pub Tick: (f64, f64) = 2;
}

/// Emit wrappers for the stock kinds, available on anything that can emit.
pub trait BasicEvents: Emit {
    fn emit_key_change(&self) -> usize {
        self.emit::<KeyChange>(())
    }

    fn emit_key_signal(&self) -> usize {
        self.emit::<KeySignal>(())
    }

    fn emit_tick(&self, this_time: f64, last_time: f64) -> usize {
        self.emit::<Tick>((this_time, last_time))
    }
}

impl<T: Emit + ?Sized> BasicEvents for T {}
