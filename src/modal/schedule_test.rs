use std::cell::Cell;
use std::rc::Rc;

use super::manual::ManualScheduler;
use super::*;

fn counter() -> (Rc<Cell<u32>>, Box<dyn FnOnce()>) {
    let hits = Rc::new(Cell::new(0));
    let hits_for_job = Rc::clone(&hits);
    (hits, Box::new(move || hits_for_job.set(hits_for_job.get() + 1)))
}

#[test]
fn job_runs_only_after_delay() {
    let scheduler = ManualScheduler::new();
    let (hits, job) = counter();
    let _task = scheduler.schedule(100, job);

    scheduler.advance(99);
    assert_eq!(hits.get(), 0);
    scheduler.advance(1);
    assert_eq!(hits.get(), 1);
}

#[test]
fn dropping_task_cancels_job() {
    let scheduler = ManualScheduler::new();
    let (hits, job) = counter();
    let task = scheduler.schedule(100, job);
    drop(task);

    scheduler.advance(200);
    assert_eq!(hits.get(), 0);
}

#[test]
fn replace_cancels_previous_task_for_same_key() {
    let scheduler = ManualScheduler::new();
    let mut pending = PendingTasks::default();
    let (first, job) = counter();
    pending.replace("dialog", scheduler.schedule(100, job));
    let (second, job) = counter();
    pending.replace("dialog", scheduler.schedule(100, job));

    assert_eq!(pending.len(), 1);
    scheduler.advance(100);
    assert_eq!(first.get(), 0);
    assert_eq!(second.get(), 1);
}

#[test]
fn keys_are_independent() {
    let scheduler = ManualScheduler::new();
    let mut pending = PendingTasks::default();
    let (a, job) = counter();
    pending.replace("a", scheduler.schedule(50, job));
    let (b, job) = counter();
    pending.replace("b", scheduler.schedule(50, job));

    pending.cancel("a");
    scheduler.advance(50);
    assert_eq!(a.get(), 0);
    assert_eq!(b.get(), 1);
}

#[test]
fn cancel_all_clears_everything() {
    let scheduler = ManualScheduler::new();
    let mut pending = PendingTasks::default();
    let (hits, job) = counter();
    pending.replace("a", scheduler.schedule(10, job));
    pending.cancel_all();

    assert!(pending.is_empty());
    assert_eq!(scheduler.pending(), 0);
    scheduler.advance(10);
    assert_eq!(hits.get(), 0);
}
