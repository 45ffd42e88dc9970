//! Two coroutines chained with `Yield::Await`: the child only starts once the parent first
//! yields, then the parent picks back up with the child's result.

use std::rc::Rc;

use corosched::{Coroutine, Poll, Resume, Scheduler, Spawn, Yield};

struct Counting;

impl Coroutine for Counting {
    fn resume(&mut self, _input: Resume) -> Poll {
        println!("4. Begin counting...");
        for i in 0..5 {
            println!("Counting {}", i);
        }
        println!("5. Counting finished");
        Poll::Done(Rc::new(()))
    }
}

enum RootState {
    Start,
    AwaitingCounting,
}

struct Root {
    state: RootState,
}

impl Coroutine for Root {
    fn resume(&mut self, input: Resume) -> Poll {
        match self.state {
            RootState::Start => {
                println!("1. Hello in coroutine!");
                println!("3. We are back!!");
                self.state = RootState::AwaitingCounting;
                Poll::Yielded(Yield::Await(Spawn::new(Counting)))
            }
            RootState::AwaitingCounting => match input {
                Resume::Value(_) => {
                    println!("6. Good bye");
                    Poll::Done(Rc::new(()))
                }
                _ => unreachable!("Root only ever awaits Counting"),
            },
        }
    }
}

fn main() {
    env_logger::init();
    let mut scheduler = Scheduler::new();
    println!("2. We are here!");
    scheduler.run(Root { state: RootState::Start }).expect("neither coroutine here fails");
    println!("7. Back to main.");
}
