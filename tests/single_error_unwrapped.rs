//! §8 scenario 3: a child's error surfaces from `Scheduler::run` directly, not wrapped in an
//! aggregate, under the default `ErrorDelivery::Single`.

use std::fmt;

use corosched::{Coroutine, Poll, Resume, RunError, Scheduler, SchedulerError, Spawn, Yield};

#[derive(Debug)]
struct BoomError(String);

impl fmt::Display for BoomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for BoomError {}

struct Failing;

impl Coroutine for Failing {
    fn resume(&mut self, _input: Resume) -> Poll {
        Poll::Failed(Box::new(BoomError("x".to_string())))
    }
}

struct Root;

impl Coroutine for Root {
    fn resume(&mut self, input: Resume) -> Poll {
        match input {
            Resume::Start => Poll::Yielded(Yield::Await(Spawn::new(Failing))),
            Resume::Cancelled(cause) => Poll::Failed(Box::new(BoomError(format!("root saw: {}", cause)))),
            _ => unreachable!("Root only ever awaits once"),
        }
    }
}

#[test]
fn child_error_is_the_origin_raised_by_run() {
    let mut scheduler = Scheduler::new();
    let err = scheduler.run(Root).expect_err("Failing always fails");
    match err {
        RunError::Single(SchedulerError::UserRaised { source, .. }) => {
            assert_eq!(source.to_string(), "x");
        }
        other => panic!("expected an unwrapped UserRaised origin, got: {:?}", other),
    }
}
