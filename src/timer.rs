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

//! Monotonic clock and the min-ordered wakeup queue (§3 "Timer queue", §4.1 step 2b).

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::time::{Duration, Instant};

use crate::id::CoroutineId;

/// Distinguishes a still-live timer entry from one whose wait has since been satisfied or
/// cancelled some other way (event fired, parent cancelled). Bumped on the record each time
/// it starts a fresh timed wait; a popped entry whose generation doesn't match the record's
/// current generation is a tombstone and is skipped.
pub(crate) type Generation = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TimerEntry {
    deadline: Instant,
    coroutine: CoroutineId,
    generation: Generation,
}

impl PartialOrd for TimerEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimerEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.deadline.cmp(&other.deadline)
    }
}

/// Min-ordered by deadline. Wraps a max-heap (`BinaryHeap`) with `Reverse` so the earliest
/// deadline pops first, the standard pattern for a deadline queue in this corpus.
#[derive(Debug, Default)]
pub(crate) struct TimerQueue {
    heap: BinaryHeap<Reverse<TimerEntry>>,
}

impl TimerQueue {
    pub(crate) fn new() -> Self {
        TimerQueue { heap: BinaryHeap::new() }
    }

    pub(crate) fn schedule(&mut self, deadline: Instant, coroutine: CoroutineId, generation: Generation) {
        self.heap.push(Reverse(TimerEntry { deadline, coroutine, generation }));
    }

    /// Deadline of the earliest live entry, ignoring nothing — tombstones are only detected
    /// on pop, so this may slightly overestimate urgency when the head is stale. That's fine:
    /// it only affects how long the driver blocks (§4.1 step 2c), never correctness.
    pub(crate) fn next_deadline(&self) -> Option<Instant> {
        self.heap.peek().map(|Reverse(e)| e.deadline)
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Pop every entry whose deadline has elapsed, returning (coroutine, generation) pairs.
    /// The caller (the scheduler core) is responsible for checking each generation against
    /// the record's current one before acting on it.
    pub(crate) fn pop_elapsed(&mut self, now: Instant) -> Vec<(CoroutineId, Generation)> {
        let mut fired = Vec::new();
        while let Some(Reverse(entry)) = self.heap.peek() {
            if entry.deadline > now {
                break;
            }
            let Reverse(entry) = self.heap.pop().unwrap();
            fired.push((entry.coroutine, entry.generation));
        }
        fired
    }
}

/// How long the driver should block on the cross-thread wake signal (§4.1 step 2c): the gap
/// to the next deadline, zero if one has already elapsed, or `None` to block indefinitely.
pub(crate) fn blocking_budget(next_deadline: Option<Instant>, now: Instant) -> Option<Duration> {
    next_deadline.map(|d| d.saturating_duration_since(now))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_in_deadline_order_regardless_of_insertion_order() {
        let mut q = TimerQueue::new();
        let base = Instant::now();
        let a = CoroutineId::fresh();
        let b = CoroutineId::fresh();
        q.schedule(base + Duration::from_millis(50), a, 0);
        q.schedule(base + Duration::from_millis(10), b, 0);
        let fired = q.pop_elapsed(base + Duration::from_millis(100));
        assert_eq!(fired, vec![(b, 0), (a, 0)]);
    }

    #[test]
    fn stale_generation_is_still_popped_but_caller_can_detect_it() {
        let mut q = TimerQueue::new();
        let now = Instant::now();
        let id = CoroutineId::fresh();
        q.schedule(now, id, 1);
        let fired = q.pop_elapsed(now);
        assert_eq!(fired, vec![(id, 1)]);
        assert!(q.is_empty());
    }
}
