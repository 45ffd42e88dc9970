//! One counting task per detected core, each dispatched to the worker pool and gathered back
//! on the driver thread.

use std::convert::Infallible;
use std::rc::Rc;

use corosched::{run_in_thread, Builder, Coroutine, Poll, Resume, Spawn, Yield};

enum CounterState {
    Start,
    Waiting,
}

struct Counter {
    id: usize,
    state: CounterState,
}

impl Counter {
    fn new(id: usize) -> Self {
        Counter { id, state: CounterState::Start }
    }
}

impl Coroutine for Counter {
    fn resume(&mut self, input: Resume) -> Poll {
        match self.state {
            CounterState::Start => {
                self.state = CounterState::Waiting;
                let id = self.id;
                Poll::Yielded(Yield::Thread(run_in_thread(move |_token| -> Result<(), Infallible> {
                    for count in 0..10 {
                        println!("Coroutine running in thread {}: counting {}", id, count);
                    }
                    Ok(())
                })))
            }
            CounterState::Waiting => match input {
                Resume::ThreadResult(_) => Poll::Done(Rc::new(())),
                _ => unreachable!("Counter only ever waits on its own dispatch"),
            },
        }
    }
}

struct Root {
    thread_count: usize,
}

impl Coroutine for Root {
    fn resume(&mut self, input: Resume) -> Poll {
        match input {
            Resume::Start => {
                let children = (0..self.thread_count).map(|id| Spawn::new(Counter::new(id))).collect();
                Poll::Yielded(Yield::Gather(children))
            }
            Resume::Values(_) => Poll::Done(Rc::new(())),
            _ => unreachable!("Root only ever gathers once"),
        }
    }
}

fn main() {
    env_logger::init();
    let thread_count = num_cpus::get();
    let mut scheduler = Builder::new().worker_threads(thread_count).build();
    scheduler.run(Root { thread_count }).expect("no counter ever fails");
}
