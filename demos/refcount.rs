//! `Rc<RefCell<_>>` state shared between two coroutines. Safe because both run on the driver
//! thread one at a time — no `Sync` bound is ever required for a `Coroutine`.

use std::cell::RefCell;
use std::rc::Rc;

use corosched::{Coroutine, Poll, Resume, Scheduler, Spawn, Yield};

struct SetTo {
    shared: Rc<RefCell<i32>>,
    value: i32,
}

impl Coroutine for SetTo {
    fn resume(&mut self, _input: Resume) -> Poll {
        *self.shared.borrow_mut() = self.value;
        let seen = *self.shared.borrow();
        Poll::Done(Rc::new(seen))
    }
}

enum RootState {
    Start,
    AwaitingFirst,
    AwaitingSecond,
}

struct Root {
    shared: Rc<RefCell<i32>>,
    state: RootState,
}

impl Coroutine for Root {
    fn resume(&mut self, input: Resume) -> Poll {
        match self.state {
            RootState::Start => {
                self.state = RootState::AwaitingFirst;
                Poll::Yielded(Yield::Await(Spawn::new(SetTo { shared: self.shared.clone(), value: 1 })))
            }
            RootState::AwaitingFirst => match input {
                Resume::Value(v) => {
                    println!("First: {}", v.downcast_ref::<i32>().unwrap());
                    self.state = RootState::AwaitingSecond;
                    Poll::Yielded(Yield::Await(Spawn::new(SetTo { shared: self.shared.clone(), value: 2 })))
                }
                _ => unreachable!("Root awaits SetTo after Start"),
            },
            RootState::AwaitingSecond => match input {
                Resume::Value(v) => {
                    println!("Second: {}", v.downcast_ref::<i32>().unwrap());
                    Poll::Done(Rc::new(()))
                }
                _ => unreachable!("Root awaits SetTo after AwaitingFirst"),
            },
        }
    }
}

fn main() {
    env_logger::init();
    let shared = Rc::new(RefCell::new(0));
    let mut scheduler = Scheduler::new();
    scheduler.run(Root { shared, state: RootState::Start }).expect("neither SetTo ever fails");
}
