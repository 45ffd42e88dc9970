//! §8 scenario 1: gathering two sleeping children runs them concurrently, not sequentially.

use std::rc::Rc;
use std::time::{Duration, Instant};

use corosched::{sleep, Coroutine, Poll, Resume, Scheduler, Spawn, Yield};

enum AddOneState {
    Start,
    Sleeping,
}

struct AddOne {
    n: i64,
    state: AddOneState,
}

impl AddOne {
    fn new(n: i64) -> Self {
        AddOne { n, state: AddOneState::Start }
    }
}

impl Coroutine for AddOne {
    fn resume(&mut self, input: Resume) -> Poll {
        match self.state {
            AddOneState::Start => {
                self.state = AddOneState::Sleeping;
                Poll::Yielded(Yield::Wait(sleep(Duration::from_millis(150))))
            }
            AddOneState::Sleeping => match input {
                Resume::EventWait { .. } => Poll::Done(Rc::new(self.n + 1)),
                _ => unreachable!("AddOne only ever waits on a sleep"),
            },
        }
    }
}

struct GatherRoot;

impl Coroutine for GatherRoot {
    fn resume(&mut self, input: Resume) -> Poll {
        match input {
            Resume::Start => {
                Poll::Yielded(Yield::Gather(vec![Spawn::new(AddOne::new(3)), Spawn::new(AddOne::new(4))]))
            }
            Resume::Values(values) => {
                let a = *values[0].downcast_ref::<i64>().unwrap();
                let b = *values[1].downcast_ref::<i64>().unwrap();
                Poll::Done(Rc::new((a, b)))
            }
            _ => unreachable!("GatherRoot only ever gathers once"),
        }
    }
}

#[test]
fn gathered_children_sleep_concurrently() {
    let mut scheduler = Scheduler::new();
    let start = Instant::now();
    let result = scheduler.run(GatherRoot).expect("no coroutine in this tree fails");
    let elapsed = start.elapsed();
    let pair = result.downcast_ref::<(i64, i64)>().unwrap();
    assert_eq!(*pair, (4, 5));
    assert!(elapsed < Duration::from_millis(280), "children appear to have run sequentially: {:?}", elapsed);
}
