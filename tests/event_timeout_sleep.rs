//! §8 scenario 6: waiting on an `Event` with a timeout behaves like a timed sleep — it resumes
//! with `set = false` once the deadline elapses, without the caller ever observing the flag.

use std::rc::Rc;
use std::time::{Duration, Instant};

use corosched::{Coroutine, Event, Poll, Resume, Scheduler, Yield};

struct Root;

impl Coroutine for Root {
    fn resume(&mut self, input: Resume) -> Poll {
        match input {
            Resume::Start => Poll::Yielded(Yield::Wait(Event::new().wait(Some(Duration::from_millis(50))))),
            Resume::EventWait { set } => Poll::Done(Rc::new(set)),
            _ => unreachable!("Root only ever waits once"),
        }
    }
}

#[test]
fn an_unset_event_resumes_false_once_its_timeout_elapses() {
    let mut scheduler = Scheduler::new();
    let start = Instant::now();
    let result = scheduler.run(Root).expect("no coroutine in this tree fails");
    let elapsed = start.elapsed();
    assert_eq!(*result.downcast_ref::<bool>().unwrap(), false);
    assert!(elapsed >= Duration::from_millis(45), "resumed suspiciously early: {:?}", elapsed);
    assert!(elapsed < Duration::from_millis(500), "resumed suspiciously late: {:?}", elapsed);
}
