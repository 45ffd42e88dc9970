//! A worker pool sized to the detected core count, each worker counting up while polling its
//! `CancelToken` between iterations — the advisory cooperative-cancel contract described in
//! §4.5/§4.7, exercised outside of a failure.

use std::convert::Infallible;
use std::rc::Rc;

use corosched::{run_in_thread, Builder, Coroutine, Poll, Resume, Spawn, Yield};

enum WorkerState {
    Start,
    Waiting,
}

struct Worker {
    id: usize,
    state: WorkerState,
}

impl Worker {
    fn new(id: usize) -> Self {
        Worker { id, state: WorkerState::Start }
    }
}

impl Coroutine for Worker {
    fn resume(&mut self, input: Resume) -> Poll {
        match self.state {
            WorkerState::Start => {
                self.state = WorkerState::Waiting;
                let id = self.id;
                Poll::Yielded(Yield::Thread(run_in_thread(move |token| -> Result<usize, Infallible> {
                    let mut count = 0;
                    while count < 100 {
                        if token.is_cancelled() {
                            break;
                        }
                        println!("Worker {} counting {}", id, count);
                        count += 1;
                        std::thread::yield_now();
                    }
                    Ok(count)
                })))
            }
            WorkerState::Waiting => match input {
                Resume::ThreadResult(v) => Poll::Done(v),
                _ => unreachable!("Worker only ever waits on its own dispatch"),
            },
        }
    }
}

struct Root {
    worker_count: usize,
}

impl Coroutine for Root {
    fn resume(&mut self, input: Resume) -> Poll {
        match input {
            Resume::Start => {
                let workers = (0..self.worker_count).map(|id| Spawn::new(Worker::new(id))).collect();
                Poll::Yielded(Yield::Gather(workers))
            }
            Resume::Values(values) => {
                let total: usize = values.iter().map(|v| *v.downcast_ref::<usize>().unwrap()).sum();
                Poll::Done(Rc::new(total))
            }
            _ => unreachable!("Root only ever gathers once"),
        }
    }
}

fn main() {
    env_logger::init();
    let worker_count = num_cpus::get();
    let mut scheduler = Builder::new().worker_threads(worker_count).build();
    let result = scheduler.run(Root { worker_count }).expect("no worker ever fails");
    println!("Total counted: {}", result.downcast_ref::<usize>().unwrap());
}
