use crate::event::{EventCode, Payload};
use crate::host::Shared;

use tracing::trace;

/// Fulfills every waiter pending on `code` at the moment of the call.
///
/// Resuming a waiter runs consumer code inline, which may emit, register new
/// waiters or tear the host down. The loop therefore walks a snapshot of
/// keys taken before the first resume and re-checks the registry for each
/// one: waiters retracted in the meantime are skipped, and waiters that
/// registered during this pass are not in the snapshot at all. Generational
/// keys keep a reused slot from being mistaken for a snapshotted waiter.
///
/// Returns the number of waiters fulfilled.
pub(crate) fn dispatch(host: &Shared, code: EventCode, payload: Payload) -> usize {
    let targets = host.registry.borrow().waiters_for(code);
    if targets.is_empty() {
        return 0;
    }

    trace!(host = %host.name, %code, targets = targets.len(), "dispatching");

    let mut fulfilled = 0;
    for key in targets {
        // Retract before resuming so no later emit can fulfill it again.
        let Some(waiter) = host.retract(key) else {
            continue;
        };

        waiter.fulfill(code, payload.clone());
        fulfilled += 1;
    }

    trace!(host = %host.name, %code, fulfilled, "dispatched");

    fulfilled
}
