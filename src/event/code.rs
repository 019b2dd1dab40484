use std::fmt::{self, Display, Formatter};

/// Opaque identifier naming one event kind.
///
/// Codes carry no meaning for the host beyond equality: applications pick
/// them when they declare their kinds (see [`event_kinds!`](crate::event_kinds)).
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EventCode(u32);

impl EventCode {
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u32 {
        self.0
    }
}

impl From<u32> for EventCode {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl Display for EventCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
