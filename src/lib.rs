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

//! A minimal cooperative scheduler: one driver loop, strict failure-atomic cancellation, a
//! thread-run bridge for blocking work, timers and an event primitive.
//!
//! There is no stable, general-purpose generator facility in Rust, so a coroutine is any type
//! implementing [`Coroutine`] by hand — see that trait's documentation for the resumption
//! contract. Everything else in this crate exists to drive a tree of those by hand: run one
//! root coroutine to completion with [`Scheduler::run`], have it `Yield::Await`/`Yield::Gather`
//! others, `Yield::Wait` on an [`Event`], or `Yield::Thread` a blocking closure out to a worker
//! pool via [`run_in_thread`].
//!
//! If any unit anywhere in the tree fails, every other non-completed unit is cancelled before
//! `run` returns — there is no partial, half-cancelled result.

mod coroutine;
mod error;
mod event;
mod id;
mod record;
mod scheduler;
mod thread_pool;
mod timer;

pub use coroutine::{Coroutine, Poll, Resume, Spawn, Value, Yield};
pub use error::{ErrorDelivery, GroupedError, RunError, SchedulerError, UserError};
pub use event::{sleep, Event, WaitHandle};
pub use id::CoroutineId;
pub use scheduler::{Builder, Scheduler, SchedulerConfig};
pub use thread_pool::{run_in_thread, CancelToken, ThreadSpawn};
