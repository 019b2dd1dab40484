use cohost::basic::{BasicEvents, KeyChange, KeySignal, Tick};
use cohost::{Host, Task, events};
use std::cell::RefCell;
use std::rc::Rc;

/// Records when it is dropped, to observe destroyed task state.
struct DropFlag(Rc<RefCell<usize>>);

impl Drop for DropFlag {
    fn drop(&mut self) {
        *self.0.borrow_mut() += 1;
    }
}

#[test]
fn test_teardown_destroys_every_pending_task() {
    let host = Host::new();
    let resumed = Rc::new(RefCell::new(0));
    let dropped = Rc::new(RefCell::new(0));

    let tasks: Vec<_> = (0..5)
        .map(|i| {
            let handle = host.handle();
            let resumed = resumed.clone();
            let flag = DropFlag(dropped.clone());
            Task::spawn(async move {
                let _flag = flag;
                let codes = if i % 2 == 0 {
                    events![KeyChange]
                } else {
                    events![KeySignal, Tick]
                };
                handle.wait(codes).await;
                *resumed.borrow_mut() += 1;
            })
        })
        .collect();

    assert_eq!(host.pending(), 5);
    drop(host);

    assert_eq!(*resumed.borrow(), 0, "no code past the wait should run");
    assert_eq!(*dropped.borrow(), 5, "every task state should be released");
    assert!(tasks.iter().all(|task| task.is_destroyed()));
    assert!(tasks.iter().all(|task| task.try_take().is_none()));
}

#[test]
fn test_teardown_skips_finished_tasks() {
    let host = Host::new();
    let handle = host.handle();

    let done = Task::spawn({
        let handle = handle.clone();
        async move {
            handle.wait(events![Tick]).await;
        }
    });
    let pending = Task::spawn(async move {
        handle.wait(events![KeyChange]).await;
    });

    host.emit_tick(1.0, 0.0);
    drop(host);

    assert!(done.is_finished());
    assert!(!done.is_destroyed());
    assert!(pending.is_destroyed());
}

#[test]
fn test_handle_outlives_host() {
    let host = Host::new();
    let handle = host.handle();
    assert!(!handle.is_closed());

    drop(host);

    assert!(handle.is_closed());
    assert_eq!(handle.pending(), 0);
    assert_eq!(handle.emit_key_change(), 0, "emit on a closed host is a no-op");
}

#[test]
fn test_wait_on_closed_host_destroys_the_task() {
    let host = Host::new();
    let handle = host.handle();
    drop(host);

    let reached = Rc::new(RefCell::new(false));
    let flag = reached.clone();
    let task = Task::spawn(async move {
        handle.wait(events![KeyChange]).await;
        *flag.borrow_mut() = true;
    });

    assert!(task.is_destroyed());
    assert!(!*reached.borrow());
}

#[test]
fn test_joiners_of_destroyed_task_are_destroyed() {
    let host = Host::new();
    let handle = host.handle();
    let after_join = Rc::new(RefCell::new(false));

    let inner = Task::spawn(async move {
        handle.wait(events![KeyChange]).await;
    });

    let flag = after_join.clone();
    let outer = Task::spawn(async move {
        inner.await;
        *flag.borrow_mut() = true;
    });

    assert!(!outer.is_finished());
    drop(host);

    assert!(outer.is_destroyed());
    assert!(!*after_join.borrow());
}

#[test]
fn test_task_waiting_twice_is_destroyed_once() {
    let host = Host::new();
    let handle = host.handle();
    let dropped = Rc::new(RefCell::new(0));
    let flag = DropFlag(dropped.clone());

    let task = Task::spawn(async move {
        let _flag = flag;
        futures::join!(handle.wait(events![KeyChange]), handle.wait(events![Tick]));
    });

    assert_eq!(host.pending(), 2);
    drop(host);

    assert!(task.is_destroyed());
    assert_eq!(*dropped.borrow(), 1);
}
