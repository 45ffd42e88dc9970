//! §8 scenario 5: two children gathering the same grandchild resolve it once each, and the
//! grandchild itself only ever runs a single time.

use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use corosched::{Coroutine, Poll, Resume, Scheduler, Spawn, Value, Yield};

struct Grandchild {
    run_count: Arc<AtomicUsize>,
}

impl Coroutine for Grandchild {
    fn resume(&mut self, _input: Resume) -> Poll {
        self.run_count.fetch_add(1, Ordering::SeqCst);
        Poll::Done(Rc::new(7i64))
    }
}

struct Child {
    grandchild: Spawn,
}

impl Coroutine for Child {
    fn resume(&mut self, input: Resume) -> Poll {
        match input {
            Resume::Start => Poll::Yielded(Yield::Gather(vec![self.grandchild.clone()])),
            Resume::Values(values) => Poll::Done(Rc::new(values)),
            _ => unreachable!("Child only ever gathers its one grandchild"),
        }
    }
}

struct Root {
    grandchild: Spawn,
}

impl Coroutine for Root {
    fn resume(&mut self, input: Resume) -> Poll {
        match input {
            Resume::Start => Poll::Yielded(Yield::Gather(vec![
                Spawn::new(Child { grandchild: self.grandchild.clone() }),
                Spawn::new(Child { grandchild: self.grandchild.clone() }),
            ])),
            Resume::Values(values) => {
                let out: Vec<i64> = values
                    .iter()
                    .map(|v| {
                        let inner = v.downcast_ref::<Vec<Value>>().unwrap();
                        *inner[0].downcast_ref::<i64>().unwrap()
                    })
                    .collect();
                Poll::Done(Rc::new(out))
            }
            _ => unreachable!("Root only ever gathers its two children"),
        }
    }
}

#[test]
fn a_shared_grandchild_runs_exactly_once() {
    let run_count = Arc::new(AtomicUsize::new(0));
    let grandchild = Spawn::new(Grandchild { run_count: run_count.clone() });
    let mut scheduler = Scheduler::new();
    let result = scheduler.run(Root { grandchild }).expect("no coroutine in this tree fails");
    let values = result.downcast_ref::<Vec<i64>>().unwrap();
    assert_eq!(*values, vec![7, 7]);
    assert_eq!(run_count.load(Ordering::SeqCst), 1);
}
