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

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::id::CoroutineId;

/// A boxed, thread-safe user error: whatever a coroutine body or a thread-dispatched
/// function raised.
pub type UserError = Arc<dyn std::error::Error + Send + Sync + 'static>;

/// The single error type the public API ever returns from [`Scheduler::run`](crate::Scheduler::run).
///
/// Kinds follow the distilled error model: a coroutine or thread-run function can raise
/// (`UserRaised`), the failure controller can inject a cancellation (`Cancelled`), a
/// coroutine can yield something the driver doesn't recognize (`BadYield`), or a completed
/// coroutine identity can be referenced from a later, unrelated invocation (`Reuse`).
///
/// `BadYield` exists for completeness with that model but is unreachable by construction in
/// this trait-based adaptation: the host language's bad-yield diagnostic covers a coroutine
/// handing the driver an object it can't classify, and here `Yield` is a closed Rust enum the
/// driver matches exhaustively, so there is no value `Coroutine::resume` can return that isn't
/// one of its five variants. Kept (rather than removed) so the error model stays a complete,
/// stable `match` target for callers, the same reasoning that keeps `Reuse` around as a named,
/// diagnosable kind even though it can only ever be non-fatal.
#[derive(Debug, Clone)]
pub enum SchedulerError {
    /// A coroutine body or a `run_in_thread` function raised directly.
    UserRaised { origin: CoroutineId, source: UserError },
    /// Injected by the failure controller once some other unit became the origin of a
    /// shutdown. `cause` is the error that triggered cancellation in the first place;
    /// it may itself be a `Cancelled` when this is a re-raise further down the chain.
    Cancelled { cause: Arc<SchedulerError> },
    /// A coroutine yielded an object the driver could not classify (§4.2 of the spec).
    /// Never constructed by this crate's driver; see the type-level doc comment above.
    BadYield { origin: CoroutineId },
    /// A coroutine identity from a previous, already-completed `Scheduler` invocation was
    /// yielded again. Non-fatal: documented as producing an absent value, but surfaced here
    /// so callers who construct `SchedulerError` values directly for diagnostics can name it.
    Reuse { id: CoroutineId },
}

impl SchedulerError {
    /// The coroutine identity that was resumed when this error was first produced, if any.
    /// Cancellation errors report the origin's identity, transitively.
    pub fn origin_id(&self) -> Option<CoroutineId> {
        match self {
            SchedulerError::UserRaised { origin, .. } => Some(*origin),
            SchedulerError::BadYield { origin } => Some(*origin),
            SchedulerError::Cancelled { cause } => cause.origin_id(),
            SchedulerError::Reuse { id } => Some(*id),
        }
    }

    /// Walk the cancellation chain down to the root `UserRaised`/`BadYield`/`Reuse` error.
    pub fn origin(&self) -> &SchedulerError {
        match self {
            SchedulerError::Cancelled { cause } => cause.origin(),
            other => other,
        }
    }

    /// Iterate the chain from this error down to its origin, inclusive.
    pub fn chain(&self) -> impl Iterator<Item = &SchedulerError> {
        std::iter::successors(Some(self), |e| match e {
            SchedulerError::Cancelled { cause } => Some(cause.as_ref()),
            _ => None,
        })
    }

    pub(crate) fn cancelled_by(cause: Arc<SchedulerError>) -> SchedulerError {
        SchedulerError::Cancelled { cause }
    }
}

impl fmt::Display for SchedulerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchedulerError::UserRaised { origin, source } => {
                write!(f, "{} raised: {}", origin, source)
            }
            SchedulerError::Cancelled { cause } => {
                write!(f, "cancelled due to upstream failure: {}", cause)
            }
            SchedulerError::BadYield { origin } => {
                write!(f, "{} yielded an object the scheduler does not recognize", origin)
            }
            SchedulerError::Reuse { id } => {
                write!(f, "{} was referenced after its scheduler invocation completed", id)
            }
        }
    }
}

impl std::error::Error for SchedulerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SchedulerError::UserRaised { source, .. } => Some(source.as_ref()),
            SchedulerError::Cancelled { cause } => Some(cause.as_ref()),
            SchedulerError::BadYield { .. } | SchedulerError::Reuse { .. } => None,
        }
    }
}

/// Controls how `Scheduler::run` packages multiple observed errors into the one it raises
/// (§4.7). The common case is a single root cause; this only matters when cleanup itself
/// produces additional, distinct errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorDelivery {
    /// Default. Raise the origin error directly; if exactly one error was ever observed,
    /// this is indistinguishable from `Origin`.
    Single,
    /// Always wrap observed errors in an aggregate, even if there was only one.
    Group,
    /// Raise the origin alone and silently discard any errors observed during cleanup.
    Origin,
}

impl Default for ErrorDelivery {
    fn default() -> Self {
        ErrorDelivery::Single
    }
}

/// Raised by `Scheduler::run` when `ErrorDelivery::Group` is in effect and more than one
/// distinct error was observed across the run. `SchedulerError`'s own recursive `Cancelled`
/// chain doesn't fit thiserror's `#[source]`/`#[from]` model cleanly (see its hand-written
/// `Error` impl above), but this flat wrapper is a textbook case for the derive.
#[derive(Debug, Error)]
#[error("{origin} (+{} other error(s) during cancellation)", others.len())]
pub struct GroupedError {
    #[source]
    pub origin: SchedulerError,
    pub others: Vec<SchedulerError>,
}

/// What `Scheduler::run` returns on failure, shaped by the configured [`ErrorDelivery`].
#[derive(Debug, Error)]
pub enum RunError {
    #[error("{0}")]
    Single(#[source] SchedulerError),
    #[error("{0}")]
    Grouped(#[source] GroupedError),
}
