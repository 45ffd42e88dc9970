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

//! Per-coroutine bookkeeping (§3 "Coroutine record").

use std::time::Instant;

use crate::coroutine::{Coroutine, Resume, Value};
use crate::error::SchedulerError;
use crate::event::Event;
use crate::id::CoroutineId;
use crate::timer::Generation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Status {
    Runnable,
    AwaitingChildren,
    AwaitingEvent,
    AwaitingThread,
    CompletedOk,
    CompletedErr,
    Cancelled,
}

impl Status {
    pub(crate) fn is_terminal(self) -> bool {
        matches!(self, Status::CompletedOk | Status::CompletedErr | Status::Cancelled)
    }
}

#[derive(Clone)]
pub(crate) enum Outcome {
    Ok(Value),
    Err(SchedulerError),
}

/// Scratch state for an in-progress "gather": the ordered list of children being awaited and
/// the positional slots their results land in as they complete (§4.2, §4.6 diamond joins).
pub(crate) struct Join {
    pub(crate) children: Vec<CoroutineId>,
    pub(crate) slots: Vec<Option<Value>>,
    /// Single-`Await` vs. list-`Gather`: determines whether the eventual `Resume` is
    /// `Resume::Value` or `Resume::Values`.
    pub(crate) is_gather: bool,
}

pub(crate) struct Record {
    pub(crate) coroutine: Box<dyn Coroutine>,
    pub(crate) status: Status,
    pub(crate) result: Option<Outcome>,
    pub(crate) resume_input: Option<Resume>,
    pub(crate) parents: Vec<CoroutineId>,
    pub(crate) join: Option<Join>,
    pub(crate) deadline: Option<Instant>,
    /// Bumped every time this record starts a new timed wait, so a stale `TimerQueue` entry
    /// from a wait that already resolved some other way can be recognized as a tombstone.
    pub(crate) wait_generation: Generation,
    /// The event this record is currently parked on, if `status == AwaitingEvent`. Lets the
    /// driver remove it from that event's waiter list when it's woken some other way (a
    /// deadline firing first, or the failure controller cancelling it).
    pub(crate) waiting_on_event: Option<Event>,
}

impl Record {
    pub(crate) fn new(coroutine: Box<dyn Coroutine>) -> Record {
        Record {
            coroutine,
            status: Status::Runnable,
            result: None,
            resume_input: Some(Resume::Start),
            parents: Vec::new(),
            join: None,
            deadline: None,
            wait_generation: 0,
            waiting_on_event: None,
        }
    }
}
