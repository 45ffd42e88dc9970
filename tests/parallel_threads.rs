//! §8 scenario 2: three blocking calls dispatched via `run_in_thread` run in parallel on the
//! worker pool, not serialized on the driver thread.

use std::convert::Infallible;
use std::rc::Rc;
use std::time::{Duration, Instant};

use corosched::{run_in_thread, Builder, Coroutine, Poll, Resume, Spawn, Yield};

enum ThreadRunnerState {
    Start,
    Waiting,
}

struct ThreadRunner {
    state: ThreadRunnerState,
}

impl ThreadRunner {
    fn new() -> Self {
        ThreadRunner { state: ThreadRunnerState::Start }
    }
}

impl Coroutine for ThreadRunner {
    fn resume(&mut self, input: Resume) -> Poll {
        match self.state {
            ThreadRunnerState::Start => {
                self.state = ThreadRunnerState::Waiting;
                Poll::Yielded(Yield::Thread(run_in_thread(|_tok| -> Result<i64, Infallible> {
                    std::thread::sleep(Duration::from_millis(150));
                    Ok(2)
                })))
            }
            ThreadRunnerState::Waiting => match input {
                Resume::ThreadResult(v) => Poll::Done(v),
                _ => unreachable!("ThreadRunner only ever waits on its own dispatch"),
            },
        }
    }
}

struct GatherRoot;

impl Coroutine for GatherRoot {
    fn resume(&mut self, input: Resume) -> Poll {
        match input {
            Resume::Start => Poll::Yielded(Yield::Gather(vec![
                Spawn::new(ThreadRunner::new()),
                Spawn::new(ThreadRunner::new()),
                Spawn::new(ThreadRunner::new()),
            ])),
            Resume::Values(values) => {
                let out: Vec<i64> = values.iter().map(|v| *v.downcast_ref::<i64>().unwrap()).collect();
                Poll::Done(Rc::new(out))
            }
            _ => unreachable!("GatherRoot only ever gathers once"),
        }
    }
}

#[test]
fn three_blocking_calls_run_concurrently() {
    let mut scheduler = Builder::new().worker_threads(3).build();
    let start = Instant::now();
    let result = scheduler.run(GatherRoot).expect("no coroutine in this tree fails");
    let elapsed = start.elapsed();
    let values = result.downcast_ref::<Vec<i64>>().unwrap();
    assert_eq!(*values, vec![2, 2, 2]);
    assert!(elapsed < Duration::from_millis(280), "blocking calls appear to have run serially: {:?}", elapsed);
}
