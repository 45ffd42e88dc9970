//! The simplest possible coroutine: one that never yields, computing its result from state it
//! captured at construction time and returning immediately on its first resumption.

use std::rc::Rc;

use corosched::{Coroutine, Poll, Resume, Scheduler};

struct DoubleIt {
    initial: i64,
}

impl Coroutine for DoubleIt {
    fn resume(&mut self, _input: Resume) -> Poll {
        println!("Initial value: {}", self.initial);
        Poll::Done(Rc::new(self.initial * 2))
    }
}

fn main() {
    env_logger::init();
    let mut scheduler = Scheduler::new();
    let result = scheduler.run(DoubleIt { initial: 1 }).expect("DoubleIt never fails");
    println!("Final value: {}", result.downcast_ref::<i64>().unwrap());
}
