//! Several leaf coroutines that just keep counting, cooperatively interleaved by repeated
//! `Yield::Pending` rather than handed out to worker threads — there is exactly one driver
//! thread running coroutine bodies, by design (§4, blocking work goes through `run_in_thread`
//! instead).

use std::rc::Rc;

use corosched::{Coroutine, Poll, Resume, Scheduler, Spawn, Yield};

const MAX_COUNT: usize = 5;

struct Counting {
    id: usize,
    count: usize,
}

impl Counting {
    fn new(id: usize) -> Self {
        Counting { id, count: 0 }
    }
}

impl Coroutine for Counting {
    fn resume(&mut self, _input: Resume) -> Poll {
        if self.count >= MAX_COUNT {
            return Poll::Done(Rc::new(()));
        }
        println!("Counting {} in leaf {}", self.count, self.id);
        self.count += 1;
        Poll::Yielded(Yield::Pending)
    }
}

struct Root;

impl Coroutine for Root {
    fn resume(&mut self, input: Resume) -> Poll {
        match input {
            Resume::Start => {
                let leaves = (0..4).map(|id| Spawn::new(Counting::new(id))).collect();
                Poll::Yielded(Yield::Gather(leaves))
            }
            Resume::Values(_) => Poll::Done(Rc::new(())),
            _ => unreachable!("Root only ever gathers once"),
        }
    }
}

fn main() {
    env_logger::init();
    let mut scheduler = Scheduler::new();
    scheduler.run(Root).expect("no leaf ever fails");
}
