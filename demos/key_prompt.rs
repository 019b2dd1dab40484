//! A prompt driven by simulated key input.
//!
//! Run with `RUST_LOG=cohost=trace cargo run --example key_prompt` to see
//! registrations, dispatches and the final teardown.

use cohost::basic::{BasicEvents, KeyChange, KeySignal, Tick};
use cohost::{Host, HostHandle, Task, events};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::info;
use tracing_subscriber::EnvFilter;

type Screen = Rc<RefCell<Vec<String>>>;

/// Blinks a cursor on every tick until a key is pressed, then waits at most
/// one second for a confirming key before giving up.
async fn prompt(handle: HostHandle, screen: Screen) -> bool {
    let mut blinks = 0;
    loop {
        let fired = handle.wait(events![KeySignal, Tick]).await;
        if fired.is::<KeySignal>() {
            break;
        }
        blinks += 1;
        screen.borrow_mut().push(format!("blink {blinks}"));
    }
    screen.borrow_mut().push("press again to confirm".to_string());

    let mut deadline = None;
    let fired = handle
        .wait_until(events![KeyChange, Tick], |fired| {
            if !fired.is::<Tick>() {
                return true;
            }
            let (this_time, _) = *fired.payload().extract_ref::<Tick>();
            let end = *deadline.get_or_insert(this_time + 1.0);
            this_time >= end
        })
        .await;

    let confirmed = fired.is::<KeyChange>();
    screen
        .borrow_mut()
        .push(if confirmed { "confirmed" } else { "timed out" }.to_string());

    // Waits for a key that never comes: the host is dropped first.
    handle.wait(events![KeySignal]).await;
    screen.borrow_mut().push("unreachable".to_string());
    confirmed
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    let host = Host::builder().name("prompt").build();
    let screen = Screen::default();

    let task = Task::spawn(prompt(host.handle(), screen.clone()));

    let mut last_time = 0.0;
    for frame in 1..=3 {
        let this_time = frame as f64 * 0.25;
        host.emit_tick(this_time, last_time);
        last_time = this_time;
    }

    host.emit_key_signal();
    host.emit_tick(1.0, last_time);
    host.emit_key_change();

    info!(pending = host.pending(), "prompt answered");
    drop(host);

    for line in screen.borrow().iter() {
        info!("{line}");
    }
    info!(destroyed = task.is_destroyed(), "prompt task");
}
