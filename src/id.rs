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

use std::sync::atomic::{AtomicU64, Ordering};

/// Identity of a coroutine, stable for the lifetime of a single [`Scheduler`](crate::Scheduler)
/// invocation. Identities are never reused within one invocation and carry no meaning across
/// invocations (see the reuse diagnostic in `scheduler::Scheduler::run`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CoroutineId(u64);

impl CoroutineId {
    pub(crate) fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for CoroutineId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "coro#{}", self.0)
    }
}

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

impl CoroutineId {
    /// Allocate a fresh identity. Global rather than per-scheduler: `Spawn::new` can be
    /// called before a `Scheduler` exists (to build the root handle passed to `run`), and
    /// identities must stay distinct even across sibling/nested scheduler invocations so
    /// that the reuse diagnostic in §4.8 has something to compare against.
    pub(crate) fn fresh() -> CoroutineId {
        CoroutineId(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}
