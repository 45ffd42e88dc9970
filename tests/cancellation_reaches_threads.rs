//! §8 scenario 4: once a sibling fails, a long-running thread-dispatched function observes
//! the advisory cancel flag and returns early instead of running to its full timeout.

use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use corosched::{run_in_thread, sleep, Coroutine, Poll, Resume, RunError, Scheduler, SchedulerError, Spawn, Yield};

#[derive(Debug)]
struct BoomError(String);

impl fmt::Display for BoomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for BoomError {}

enum FailingState {
    Start,
    Sleeping,
}

struct Failing {
    state: FailingState,
}

impl Coroutine for Failing {
    fn resume(&mut self, input: Resume) -> Poll {
        match self.state {
            FailingState::Start => {
                self.state = FailingState::Sleeping;
                Poll::Yielded(Yield::Wait(sleep(Duration::from_millis(30))))
            }
            FailingState::Sleeping => match input {
                Resume::EventWait { .. } => Poll::Failed(Box::new(BoomError("x".to_string()))),
                _ => unreachable!("Failing only ever waits on its own sleep"),
            },
        }
    }
}

enum LoopForeverState {
    Start,
    Waiting,
}

struct LoopForever {
    state: LoopForeverState,
    observed_cancel: Arc<AtomicBool>,
}

impl LoopForever {
    fn new(observed_cancel: Arc<AtomicBool>) -> Self {
        LoopForever { state: LoopForeverState::Start, observed_cancel }
    }
}

impl Coroutine for LoopForever {
    fn resume(&mut self, input: Resume) -> Poll {
        match self.state {
            LoopForeverState::Start => {
                self.state = LoopForeverState::Waiting;
                let observed = self.observed_cancel.clone();
                Poll::Yielded(Yield::Thread(run_in_thread(move |token| -> Result<(), BoomError> {
                    for _ in 0..200 {
                        if token.is_cancelled() {
                            observed.store(true, Ordering::Release);
                            return Ok(());
                        }
                        std::thread::sleep(Duration::from_millis(10));
                    }
                    Ok(())
                })))
            }
            LoopForeverState::Waiting => match input {
                Resume::Cancelled(cause) => Poll::Failed(Box::new(BoomError(format!("loop cancelled: {}", cause)))),
                Resume::ThreadResult(_) => Poll::Done(Rc::new(())),
                _ => unreachable!("LoopForever only ever waits on its own dispatch"),
            },
        }
    }
}

struct Root {
    observed_cancel: Arc<AtomicBool>,
}

impl Coroutine for Root {
    fn resume(&mut self, input: Resume) -> Poll {
        match input {
            Resume::Start => Poll::Yielded(Yield::Gather(vec![
                Spawn::new(Failing { state: FailingState::Start }),
                Spawn::new(LoopForever::new(self.observed_cancel.clone())),
            ])),
            Resume::Cancelled(cause) => Poll::Failed(Box::new(BoomError(format!("root saw: {}", cause)))),
            _ => unreachable!("Root only ever gathers once"),
        }
    }
}

#[test]
fn a_sibling_failure_cancels_a_running_thread_task() {
    let observed_cancel = Arc::new(AtomicBool::new(false));
    let mut scheduler = Scheduler::new();
    let start = Instant::now();
    let err = scheduler.run(Root { observed_cancel: observed_cancel.clone() }).expect_err("Failing always fails");
    let elapsed = start.elapsed();

    match err {
        RunError::Single(SchedulerError::UserRaised { source, .. }) => assert_eq!(source.to_string(), "x"),
        other => panic!("expected Failing's error to be the unwrapped origin, got: {:?}", other),
    }
    assert!(observed_cancel.load(Ordering::Acquire), "the thread-dispatched closure never observed cancellation");
    assert!(elapsed < Duration::from_millis(1500), "the loop ran close to its full 2s budget: {:?}", elapsed);
}
