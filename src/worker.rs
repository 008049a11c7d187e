//! Offloads blocking inspect/remove/scan calls so an interactive front end
//! stays responsive while they run.

use std::sync::mpsc::{self, Receiver};
use std::thread::{self, JoinHandle};
use tracing::warn;

/// Runs `job` on a background thread and hands its result to `on_complete`
/// on that same thread.
pub fn spawn_task<T, F, C>(job: F, on_complete: C) -> JoinHandle<()>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
    C: FnOnce(T) + Send + 'static,
{
    thread::spawn(move || on_complete(job()))
}

/// Runs `job` on a background thread; the returned receiver yields its result
/// once. If the job panics the receiver reports a disconnect instead.
pub fn run_in_background<T, F>(job: F) -> Receiver<T>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    let (sender, receiver) = mpsc::channel();
    spawn_task(job, move |result| {
        if sender.send(result).is_err() {
            warn!("background result dropped: receiver went away");
        }
    });
    receiver
}
