use cohost::basic::{BasicEvents, KeyChange, Tick};
use cohost::{Host, Task, events};
use futures::executor::LocalPool;
use futures::task::{ArcWake, LocalSpawnExt, waker};
use std::cell::RefCell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::task::Context;

struct CountingWaker(AtomicUsize);

impl ArcWake for CountingWaker {
    fn wake_by_ref(arc_self: &Arc<Self>) {
        arc_self.0.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn test_spawn_runs_to_completion_immediately() {
    let completed = Rc::new(RefCell::new(false));
    let flag = completed.clone();

    let task = Task::spawn(async move {
        *flag.borrow_mut() = true;
    });

    assert!(*completed.borrow(), "spawned task should have completed");
    assert!(task.is_finished());
}

#[test]
fn test_spawn_nested() {
    let values = Rc::new(RefCell::new(Vec::new()));

    let v1 = values.clone();
    let v2 = values.clone();
    let v3 = values.clone();

    Task::spawn(async move {
        v1.borrow_mut().push(1);

        Task::spawn(async move {
            v2.borrow_mut().push(2);
        });

        v1.borrow_mut().push(3);
    });
    Task::spawn(async move {
        v3.borrow_mut().push(4);
    });

    // No queue: a nested spawn runs before its parent continues.
    assert_eq!(*values.borrow(), vec![1, 2, 3, 4]);
}

#[test]
fn test_spawn_from_separate_async_function() {
    let counter = Rc::new(RefCell::new(0));

    Task::spawn(do_work_with_spawn(counter.clone()));

    assert_eq!(*counter.borrow(), 42);
}

async fn do_work_with_spawn(counter: Rc<RefCell<i32>>) {
    let c1 = counter.clone();
    let c2 = counter.clone();

    Task::spawn(async move {
        *c1.borrow_mut() += 10;
    });

    Task::spawn(async move {
        *c2.borrow_mut() += 32;
    });
}

#[test]
fn test_join_handle_returns_output() {
    let inner = Task::spawn(async { compute_value(5) });
    let outer = Task::spawn(async move { inner.await + compute_value(10) });

    assert_eq!(outer.try_take(), Some(125));
    assert_eq!(outer.try_take(), None, "output can only be taken once");
}

fn compute_value(x: i32) -> i32 {
    x * x
}

#[test]
fn test_join_waits_for_suspended_task() {
    let host = Host::new();
    let handle = host.handle();

    let inner = Task::spawn(async move { handle.wait(events![Tick]).await.extract::<Tick>() });
    let outer = Task::spawn(async move {
        let (this_time, last_time) = inner.await;
        this_time - last_time
    });

    assert!(!outer.is_finished());

    host.emit_tick(1.5, 1.0);
    assert_eq!(outer.try_take(), Some(0.5));
}

#[test]
fn test_many_tasks_share_one_host() {
    let host = Host::new();
    let state = Rc::new(RefCell::new(Vec::new()));

    for i in 0..3 {
        let handle = host.handle();
        let state = state.clone();
        Task::spawn(async move {
            handle.wait(events![KeyChange]).await;
            state.borrow_mut().push(i);
        });
    }

    assert_eq!(host.emit_key_change(), 3);

    let mut values = state.borrow().clone();
    values.sort();
    assert_eq!(values, vec![0, 1, 2]);
}

#[test]
fn test_wait_under_foreign_executor() {
    let host = Host::new();
    let handle = host.handle();
    let received = Rc::new(RefCell::new(None));

    let mut pool = LocalPool::new();
    let slot = received.clone();
    pool.spawner()
        .spawn_local(async move {
            let fired = handle.wait(events![Tick]).await;
            *slot.borrow_mut() = Some(fired.extract::<Tick>());
        })
        .expect("spawn on local pool");

    pool.run_until_stalled();
    assert_eq!(host.pending(), 1);

    // The waker is woken inline; the pool polls on its next run.
    assert_eq!(host.emit_tick(2.0, 1.0), 1);
    assert!(received.borrow().is_none());

    pool.run_until_stalled();
    assert_eq!(*received.borrow(), Some((2.0, 1.0)));
}

#[test]
fn test_foreign_executor_future_is_dropped_on_teardown() {
    let host = Host::new();
    let handle = host.handle();
    let reached = Rc::new(RefCell::new(false));

    let mut pool = LocalPool::new();
    let flag = reached.clone();
    pool.spawner()
        .spawn_local(async move {
            handle.wait(events![KeyChange]).await;
            *flag.borrow_mut() = true;
        })
        .expect("spawn on local pool");

    pool.run_until_stalled();
    drop(host);
    pool.run_until_stalled();

    assert!(!*reached.borrow());
}

#[test]
fn test_join_handle_under_foreign_executor() {
    let host = Host::new();
    let handle = host.handle();

    let task = Task::spawn(async move {
        handle.wait(events![KeyChange]).await;
        "done"
    });

    let mut pool = LocalPool::new();
    let result = Rc::new(RefCell::new(None));
    let slot = result.clone();
    pool.spawner()
        .spawn_local(async move {
            *slot.borrow_mut() = Some(task.await);
        })
        .expect("spawn on local pool");

    pool.run_until_stalled();
    host.emit_key_change();
    pool.run_until_stalled();

    assert_eq!(*result.borrow(), Some("done"));
}

#[test]
fn test_repolled_join_handle_wakes_once() {
    let host = Host::new();
    let handle = host.handle();

    let mut task = Task::spawn(async move {
        handle.wait(events![KeyChange]).await;
    });

    let counter = Arc::new(CountingWaker(AtomicUsize::new(0)));
    let waker = waker(counter.clone());
    let mut context = Context::from_waker(&waker);

    for _ in 0..1000 {
        assert!(Pin::new(&mut task).poll(&mut context).is_pending());
    }

    host.emit_key_change();
    assert_eq!(counter.0.load(Ordering::SeqCst), 1, "one wake per waker");
    assert!(Pin::new(&mut task).poll(&mut context).is_ready());
}

#[test]
#[should_panic(expected = "task completed but result missing")]
fn test_awaiting_after_try_take_panics() {
    let first = Task::spawn(async { 1 });
    assert_eq!(first.try_take(), Some(1));

    Task::spawn(async move { first.await });
}
