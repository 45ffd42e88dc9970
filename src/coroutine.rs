// The MIT License (MIT)

// Copyright (c) 2026 Contributors

// Permission is hereby granted, free of charge, to any person obtaining a copy of
// this software and associated documentation files (the "Software"), to deal in
// the Software without restriction, including without limitation the rights to
// use, copy, modify, merge, publish, distribute, sublicense, and/or sell copies of
// the Software, and to permit persons to whom the Software is furnished to do so,
// subject to the following conditions:

// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.

// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS
// FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR
// COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER
// IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN
// CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! The coroutine authorship contract (§6, §9 of the design doc).
//!
//! Rust has no stable, general-purpose generator facility, so a coroutine here is any type
//! implementing [`Coroutine`] by hand: a resumable state machine with two inputs (a value to
//! send, or an error to inject) and one output (what it yields, or how it finished). This is
//! the "trait suffices, no dynamic type introspection required" option named in §9 — the
//! `dyn Any` boxing below is the mechanical cost of emulating a dynamically typed host
//! language's single yield channel in a statically typed one.

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use crate::error::{SchedulerError, UserError};
use crate::event::WaitHandle;
use crate::id::CoroutineId;
use crate::thread_pool::ThreadSpawn;

/// Type-erased coroutine result value, shared rather than cloned so that diamond joins (§4.6)
/// can deliver the same value to many awaiters without requiring `T: Clone`.
pub type Value = Rc<dyn Any>;

/// What is delivered to [`Coroutine::resume`] at each resumption.
pub enum Resume {
    /// First resumption after registration.
    Start,
    /// Resumption after a plain `Yield::Pending`: no data, just your turn again.
    Tick,
    /// A single awaited coroutine (or event-wait) produced this value.
    Value(Value),
    /// A gathered list of awaited coroutines produced these values, in positional order.
    Values(Vec<Value>),
    /// A `sleep`/`Event::wait` elapsed or observed the flag; carries whether it was set.
    EventWait { set: bool },
    /// A dispatched thread-run function finished with this value.
    ThreadResult(Value),
    /// A dispatched thread-run function raised. Delivered as an input rather than forced onto
    /// the record directly, so the coroutine's own `resume` gets a chance to map or wrap it
    /// before turning it into `Poll::Failed` — the same shape as propagating any other `?`.
    ThreadFailed(UserError),
    /// Injected by the failure controller, or by a failed awaited child.
    Cancelled(SchedulerError),
}

/// What a [`Coroutine`] yields back to the driver. Classified per §4.2.
pub enum Yield {
    /// A pure cooperative yield: reschedule immediately, no dependency recorded.
    Pending,
    /// Await a single subordinate coroutine.
    Await(Spawn),
    /// Await an ordered list of subordinate coroutines (a "gather").
    Gather(Vec<Spawn>),
    /// Await an event, optionally bounded by a timeout.
    Wait(WaitHandle),
    /// Dispatch a blocking function to the worker pool and await its result.
    Thread(ThreadSpawn),
}

/// The result of resuming a coroutine once.
pub enum Poll {
    /// The coroutine suspended at a yield point; the driver should classify `Yield` and
    /// transition the record accordingly.
    Yielded(Yield),
    /// The coroutine ran to completion and produced a value.
    Done(Value),
    /// The coroutine (or the function it was driving) raised.
    Failed(Box<dyn std::error::Error + Send + Sync + 'static>),
}

/// A resumable unit of cooperative work.
///
/// Implementations hold whatever state they need to pick up where they left off; `resume`
/// is called once per scheduling cycle in which this coroutine is runnable. A coroutine that
/// never yields (always returns `Poll::Done`/`Poll::Failed` from its very first `resume`) is
/// valid and completes synchronously within the same `run` call that registered it.
pub trait Coroutine {
    fn resume(&mut self, input: Resume) -> Poll;
}

enum SpawnState {
    Unregistered(Box<dyn Coroutine>),
    Registered,
    Taken,
}

struct SpawnInner {
    id: CoroutineId,
    state: RefCell<SpawnState>,
}

/// A handle to a coroutine, either freshly constructed or already registered with a
/// [`Scheduler`](crate::Scheduler). Cheap to clone: cloning shares identity, which is what
/// makes diamond joins (§4.6) work — yielding the same `Spawn` twice refers to the same
/// underlying coroutine and the same eventual result.
pub struct Spawn {
    inner: Rc<SpawnInner>,
}

impl Clone for Spawn {
    fn clone(&self) -> Self {
        Spawn { inner: self.inner.clone() }
    }
}

impl Spawn {
    /// Wrap a coroutine so it can be yielded as a dependency. Identity is assigned here;
    /// registration (insertion into the scheduler's record table) happens lazily, the first
    /// time the driver classifies a yield that references this handle (§4.2).
    pub fn new<C: Coroutine + 'static>(coroutine: C) -> Spawn {
        Spawn {
            inner: Rc::new(SpawnInner {
                id: CoroutineId::fresh(),
                state: RefCell::new(SpawnState::Unregistered(Box::new(coroutine))),
            }),
        }
    }

    pub fn id(&self) -> CoroutineId {
        self.inner.id
    }

    /// True if this handle has already been registered with some scheduler (possibly by a
    /// sibling clone of this same handle appearing earlier in a gather list).
    pub(crate) fn is_registered(&self) -> bool {
        !matches!(&*self.inner.state.borrow(), SpawnState::Unregistered(_))
    }

    /// Take ownership of the boxed coroutine for insertion into the record table. Panics if
    /// called twice for the same handle; the driver only calls this once, guarded by
    /// `is_registered`.
    pub(crate) fn take(&self) -> Box<dyn Coroutine> {
        let mut state = self.inner.state.borrow_mut();
        match std::mem::replace(&mut *state, SpawnState::Registered) {
            SpawnState::Unregistered(boxed) => boxed,
            _ => unreachable!("Spawn::take called on an already-registered handle"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Immediate(i64);
    impl Coroutine for Immediate {
        fn resume(&mut self, _input: Resume) -> Poll {
            Poll::Done(Rc::new(self.0))
        }
    }

    #[test]
    fn cloning_a_spawn_preserves_identity() {
        let spawn = Spawn::new(Immediate(1));
        let clone = spawn.clone();
        assert_eq!(spawn.id(), clone.id());
    }

    #[test]
    fn take_hands_out_the_boxed_coroutine_once() {
        let spawn = Spawn::new(Immediate(42));
        assert!(!spawn.is_registered());
        let mut boxed = spawn.take();
        assert!(spawn.is_registered());
        match boxed.resume(Resume::Start) {
            Poll::Done(v) => assert_eq!(*v.downcast::<i64>().unwrap(), 42),
            _ => panic!("expected Done"),
        }
    }
}
