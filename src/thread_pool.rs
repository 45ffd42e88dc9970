// The MIT License (MIT)

// Copyright (c) 2026 Contributors

// Permission is hereby granted, free of charge, to any person obtaining a copy of
// this software and associated documentation files (the "Software"), to deal in
// the Software without restriction, including without limitation the rights to
// use, copy, modify, merge, publish, distribute, sublicense, and/or sell copies of
// the Software, and to permit persons to whom the Software is furnished to do so,
// subject to the following conditions:

// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.

// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS
// FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR
// COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER
// IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN
// CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! The thread-run bridge (§4.5): dispatches blocking functions onto a worker pool and
//! publishes their results back to the driver over a single cross-thread wake channel.

use std::any::Any;
use std::panic;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use crossbeam_channel::{Receiver, Sender};
use log::{debug, trace};
use thiserror::Error;

use crate::id::CoroutineId;

type ThreadResult = Result<Box<dyn Any + Send>, Box<dyn std::error::Error + Send + Sync>>;

/// Lets a blocking function dispatched via [`run_in_thread`] observe that the scheduler has
/// moved on without it (§4.5, §4.7, §8 scenario 4 "cancellation reaches threads"). Blocking
/// work can't be preempted, so this is advisory: a well-behaved long-running function polls
/// it between chunks of work and returns early.
#[derive(Clone)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// A blocking function boxed up for dispatch, produced by [`run_in_thread`]. Yielding this
/// (wrapped in `Yield::Thread`) is what actually hands it to the pool (§4.5) — constructing
/// it has no side effect on its own.
pub struct ThreadSpawn {
    func: Box<dyn FnOnce(&CancelToken) -> ThreadResult + Send>,
    cancel_flag: Arc<AtomicBool>,
}

/// Dispatch `f` to the worker pool once yielded. Mirrors `run_in_thread(fn, *args, **kwargs)`
/// from §6: `f` already closes over whatever arguments it needs (besides the token), which is
/// the idiomatic Rust equivalent of a variadic blocking call.
pub fn run_in_thread<F, T, E>(f: F) -> ThreadSpawn
where
    F: FnOnce(&CancelToken) -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: std::error::Error + Send + Sync + 'static,
{
    let cancel_flag = Arc::new(AtomicBool::new(false));
    ThreadSpawn {
        func: Box::new(move |tok| f(tok).map(|v| Box::new(v) as Box<dyn Any + Send>).map_err(|e| Box::new(e) as _)),
        cancel_flag,
    }
}

/// The worker-populated result slot and advisory cancel flag shared between a worker thread
/// and the driver for the lifetime of one dispatch (§3 "Thread task"). `cancel_requested` is
/// the very same `Arc` handed to the closure as a `CancelToken`, so `request_cancel` actually
/// reaches the running function rather than just the driver's own bookkeeping.
pub(crate) struct ThreadTask {
    result: Mutex<Option<ThreadResult>>,
    cancel_requested: Arc<AtomicBool>,
}

impl ThreadTask {
    pub(crate) fn request_cancel(&self) {
        self.cancel_requested.store(true, Ordering::Release);
    }

    pub(crate) fn was_cancel_requested(&self) -> bool {
        self.cancel_requested.load(Ordering::Acquire)
    }

    pub(crate) fn take_result(&self) -> ThreadResult {
        self.result
            .lock()
            .unwrap()
            .take()
            .expect("completion signaled before result was published")
    }
}

enum Job {
    Run {
        parent: CoroutineId,
        task: Arc<ThreadTask>,
        func: Box<dyn FnOnce(&CancelToken) -> ThreadResult + Send>,
        cancel_flag: Arc<AtomicBool>,
    },
    Shutdown,
}

/// Fixed-size pool of worker threads backing the thread-run bridge. Workers block on a
/// shared `crossbeam_channel` for jobs and publish completions on a single channel the
/// driver polls with a timeout (§4.1 step 2c, §5 "single wake signal").
pub(crate) struct ThreadPool {
    job_tx: Sender<Job>,
    workers: Vec<thread::JoinHandle<()>>,
}

/// A published completion: which coroutine's awaited thread task finished. The driver looks
/// the `ThreadTask` itself up in its own table to read the result (§5: "sole cross-thread
/// shared state" is the slot and the flag, not the channel payload).
pub(crate) struct Completion {
    pub(crate) parent: CoroutineId,
}

impl ThreadPool {
    pub(crate) fn new(workers: usize, completion_tx: Sender<Completion>) -> ThreadPool {
        let (job_tx, job_rx): (Sender<Job>, Receiver<Job>) = crossbeam_channel::unbounded();
        let mut handles = Vec::with_capacity(workers);
        for idx in 0..workers.max(1) {
            let job_rx = job_rx.clone();
            let completion_tx = completion_tx.clone();
            handles.push(
                thread::Builder::new()
                    .name(format!("corosched-worker-{}", idx))
                    .spawn(move || worker_loop(job_rx, completion_tx))
                    .expect("failed to spawn worker thread"),
            );
        }
        ThreadPool { job_tx, workers: handles }
    }

    /// Hand `spawn` to a worker. Returns the shared task record the driver will poll for a
    /// result once a `Completion` for `parent` arrives.
    pub(crate) fn dispatch(&self, parent: CoroutineId, spawn: ThreadSpawn) -> Arc<ThreadTask> {
        let task = Arc::new(ThreadTask { result: Mutex::new(None), cancel_requested: spawn.cancel_flag.clone() });
        debug!("dispatching thread task for {} to worker pool", parent);
        self.job_tx
            .send(Job::Run { parent, task: task.clone(), func: spawn.func, cancel_flag: spawn.cancel_flag })
            .expect("worker pool shut down while dispatch was still in flight");
        task
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        for _ in &self.workers {
            let _ = self.job_tx.send(Job::Shutdown);
        }
        for handle in self.workers.drain(..) {
            let _ = handle.join();
        }
    }
}

fn worker_loop(job_rx: Receiver<Job>, completion_tx: Sender<Completion>) {
    while let Ok(job) = job_rx.recv() {
        match job {
            Job::Shutdown => break,
            Job::Run { parent, task, func, cancel_flag } => {
                trace!("worker running thread task for {}", parent);
                let token = CancelToken(cancel_flag);
                let outcome = panic::catch_unwind(panic::AssertUnwindSafe(|| func(&token)))
                    .unwrap_or_else(|_| Err(Box::new(ThreadPanicked) as Box<dyn std::error::Error + Send + Sync>));
                *task.result.lock().unwrap() = Some(outcome);
                // Completion is only a wake signal; the payload lives in `task` (§5).
                let _ = completion_tx.send(Completion { parent });
            }
        }
    }
}

#[derive(Debug, Error)]
#[error("thread-dispatched function panicked")]
struct ThreadPanicked;

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn dispatch_runs_and_publishes_a_completion() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let pool = ThreadPool::new(2, tx);
        let parent = CoroutineId::fresh();
        let task = pool.dispatch(parent, run_in_thread(|_tok| -> Result<i32, std::io::Error> { Ok(7) }));
        let completion = rx.recv_timeout(Duration::from_secs(1)).expect("completion");
        assert_eq!(completion.parent, parent);
        let result = task.take_result().expect("ok");
        assert_eq!(*result.downcast::<i32>().unwrap(), 7);
    }

    #[test]
    fn a_panicking_job_publishes_an_error_instead_of_hanging() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let pool = ThreadPool::new(1, tx);
        let parent = CoroutineId::fresh();
        let task = pool.dispatch(
            parent,
            run_in_thread(|_tok| -> Result<i32, std::io::Error> { panic!("boom") }),
        );
        let _ = rx.recv_timeout(Duration::from_secs(1)).expect("completion");
        assert!(task.take_result().is_err());
    }
}
