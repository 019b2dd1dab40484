//! Contract violations reported by the host.
//!
//! Both variants describe programmer errors. The host never returns them as
//! `Err`; it panics with their `Display` text at the offending call site.
//! They are public so tests and embedders can match on the message.

use crate::event::EventCode;

use thiserror::Error;

#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    /// A wait was started with no codes, so nothing could ever fulfill it.
    #[error("wait called with an empty event set")]
    EmptyEventSet,

    /// A payload was extracted under a kind that did not produce it.
    #[error(
        "payload mismatch: expected {expected} ({expected_code}), found payload of {found_code} holding {found_type}"
    )]
    PayloadMismatch {
        expected: &'static str,
        expected_code: EventCode,
        found_code: EventCode,
        found_type: &'static str,
    },
}

impl HostError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            HostError::EmptyEventSet => "host_empty_event_set",
            HostError::PayloadMismatch { .. } => "host_payload_mismatch",
        }
    }
}
