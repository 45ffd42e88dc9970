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

//! The event primitive (§4.4): a one-shot/reset wake signal with optional timeout, driver-
//! thread only.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use log::trace;

use crate::id::CoroutineId;

pub(crate) struct EventState {
    pub(crate) flag: bool,
    pub(crate) waiters: VecDeque<CoroutineId>,
}

/// A boolean flag with a FIFO waiter list. Cheap to clone: clones share the same underlying
/// flag, the same way a Python `Event` referenced from two coroutines is the same object.
#[derive(Clone)]
pub struct Event {
    pub(crate) inner: Rc<RefCell<EventState>>,
}

impl Default for Event {
    fn default() -> Self {
        Event::new()
    }
}

impl Event {
    pub fn new() -> Event {
        Event { inner: Rc::new(RefCell::new(EventState { flag: false, waiters: VecDeque::new() })) }
    }

    pub fn is_set(&self) -> bool {
        self.inner.borrow().flag
    }

    /// flag ← false. Does not touch waiter state: anyone already parked in `waiters` stays
    /// parked, per §4.4 ("No waiter state changes").
    pub fn clear(&self) {
        self.inner.borrow_mut().flag = false;
    }

    /// If the flag was false, set it true and move every *current* waiter onto the ready
    /// queue with `set observed = true`, removing their timer entries. Waiters added after
    /// this call do not observe this transition (§4.3 ordering).
    ///
    /// Requires a `Scheduler` to currently be running on this thread; call only from within
    /// a coroutine body (the same constraint the distilled spec places on event operations).
    pub fn set(&self) {
        let woken = {
            let mut state = self.inner.borrow_mut();
            if state.flag {
                return;
            }
            state.flag = true;
            std::mem::take(&mut state.waiters)
        };
        if !woken.is_empty() {
            trace!("event set, waking {} waiter(s)", woken.len());
            crate::scheduler::wake_event_waiters(woken);
        }
    }

    /// Build a timed-wait handle (§4.3). Doesn't suspend anything by itself — yield the
    /// returned `WaitHandle` (wrapped in `Yield::Wait`) from `Coroutine::resume` to actually
    /// await it.
    pub fn wait(&self, timeout: Option<Duration>) -> WaitHandle {
        WaitHandle { event: self.clone(), timeout }
    }
}

/// `sleep(d)` is a wait on an `Event` whose flag is never set, bounded by `d` (§4.3). Always
/// resumes with `set = false`.
pub fn sleep(duration: Duration) -> WaitHandle {
    Event::new().wait(Some(duration))
}

/// A pending `Event::wait`/`sleep`, not yet handed to the driver.
pub struct WaitHandle {
    pub(crate) event: Event,
    pub(crate) timeout: Option<Duration>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_does_not_touch_waiters() {
        let event = Event::new();
        event.inner.borrow_mut().waiters.push_back(CoroutineId::fresh());
        event.inner.borrow_mut().flag = true;
        event.clear();
        assert!(!event.is_set());
        assert_eq!(event.inner.borrow().waiters.len(), 1);
    }

    #[test]
    fn cloned_events_share_state() {
        let event = Event::new();
        let clone = event.clone();
        clone.inner.borrow_mut().flag = true;
        assert!(event.is_set());
    }
}
