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

//! The driver loop (§4.1), dependency joins (§4.6) and the failure controller (§4.7).
//!
//! A `Scheduler` owns a persistent worker pool; each `run` call builds a fresh [`Core`] — the
//! ready queue, record table and timer queue for that one invocation — and drives it to
//! completion. `Core` lives behind `Rc<RefCell<_>>` and is published on a thread-local stack
//! while a `run` call is in progress, the same thread-local-handle shape this crate's teacher
//! uses for its own scheduler, so that `Event::set()` (called from deep inside a coroutine
//! body) can reach back into live scheduler state without every API needing an explicit
//! `&mut Scheduler` threaded through it. The stack (not a single cell) is what makes nested
//! `run` calls (§4.8) work for free: each invocation pushes its own `Core` and only ever sees
//! its own.

use std::any::Any;
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;
use std::sync::Arc;
use std::time::Instant;

use log::{debug, trace, warn};

use crate::coroutine::{Coroutine, Poll, Resume, Spawn, Value, Yield};
use crate::error::{ErrorDelivery, GroupedError, RunError, SchedulerError};
use crate::id::CoroutineId;
use crate::record::{Join, Outcome, Record, Status};
use crate::thread_pool::{Completion, ThreadPool, ThreadSpawn};
use crate::timer::{self, TimerQueue};

/// Everything the driver needs for one `Scheduler::run` invocation.
pub(crate) struct Core {
    pool: Rc<ThreadPool>,
    root: CoroutineId,
    ready: VecDeque<CoroutineId>,
    records: HashMap<CoroutineId, Record>,
    timers: TimerQueue,
    thread_tasks: HashMap<CoroutineId, Arc<crate::thread_pool::ThreadTask>>,
    shutting_down: bool,
    origin: Option<Arc<SchedulerError>>,
    /// Every distinct error observed, origin first, in the order encountered.
    errors: Vec<SchedulerError>,
}

impl Core {
    fn new(pool: Rc<ThreadPool>, root: CoroutineId) -> Core {
        Core {
            pool,
            root,
            ready: VecDeque::new(),
            records: HashMap::new(),
            timers: TimerQueue::new(),
            thread_tasks: HashMap::new(),
            shutting_down: false,
            origin: None,
            errors: Vec::new(),
        }
    }

    fn all_done(&self) -> bool {
        self.records.values().all(|r| r.status.is_terminal())
    }
}

thread_local! {
    static CURRENT: RefCell<Vec<Rc<RefCell<Core>>>> = RefCell::new(Vec::new());
}

fn push_current(core: Rc<RefCell<Core>>) {
    CURRENT.with(|stack| stack.borrow_mut().push(core));
}

fn pop_current() {
    CURRENT.with(|stack| {
        stack.borrow_mut().pop().expect("scheduler current-core stack underflow");
    });
}

struct CurrentGuard;

impl Drop for CurrentGuard {
    fn drop(&mut self) {
        pop_current();
    }
}

/// Reach into whichever `Core` is innermost on this thread's stack. Used by `Event::set()`,
/// which has no other way to talk to the scheduler that's driving the coroutine calling it.
pub(crate) fn with_current_core<R>(f: impl FnOnce(&mut Core) -> R) -> R {
    let core = CURRENT.with(|stack| {
        stack
            .borrow()
            .last()
            .cloned()
            .expect("Event::set() called with no Scheduler running on this thread")
    });
    let mut core = core.borrow_mut();
    f(&mut core)
}

/// Wake every id in `ids` that is still genuinely parked on an event (§4.3/§4.4). Called from
/// `Event::set()`.
pub(crate) fn wake_event_waiters(ids: VecDeque<CoroutineId>) {
    with_current_core(|core| {
        for id in ids {
            if let Some(rec) = core.records.get_mut(&id) {
                if rec.status == Status::AwaitingEvent {
                    rec.status = Status::Runnable;
                    rec.waiting_on_event = None;
                    rec.wait_generation += 1;
                    rec.deadline = None;
                    rec.resume_input = Some(Resume::EventWait { set: true });
                    core.ready.push_back(id);
                }
            }
        }
    });
}

enum Resolved {
    Immediate(Outcome),
    Pending,
}

fn resolve_or_register(core: &mut Core, spawn: &Spawn) -> Resolved {
    let id = spawn.id();
    if let Some(rec) = core.records.get(&id) {
        return if rec.status.is_terminal() {
            Resolved::Immediate(rec.result.as_ref().unwrap().clone())
        } else {
            Resolved::Pending
        };
    }
    if spawn.is_registered() {
        warn!("{} referenced after its scheduler invocation completed; treating as absent", id);
        return Resolved::Immediate(Outcome::Ok(Rc::new(())));
    }
    let boxed = spawn.take();
    let mut rec = Record::new(boxed);
    if core.shutting_down {
        rec.resume_input = Some(Resume::Cancelled(SchedulerError::cancelled_by(
            core.origin.clone().expect("shutting_down implies an origin"),
        )));
    }
    core.records.insert(id, rec);
    core.ready.push_back(id);
    Resolved::Pending
}

fn link_parent(core: &mut Core, child: CoroutineId, parent: CoroutineId) {
    if let Some(rec) = core.records.get_mut(&child) {
        if !rec.parents.contains(&parent) {
            rec.parents.push(parent);
        }
    }
}

fn set_resume_and_requeue(core: &mut Core, id: CoroutineId, input: Resume) {
    if let Some(rec) = core.records.get_mut(&id) {
        rec.status = Status::Runnable;
        rec.resume_input = Some(input);
        core.ready.push_back(id);
    }
}

fn complete_ok(core: &mut Core, id: CoroutineId, value: Value) {
    let parents = {
        let rec = core.records.get_mut(&id).unwrap();
        rec.result = Some(Outcome::Ok(value.clone()));
        rec.status = Status::CompletedOk;
        std::mem::take(&mut rec.parents)
    };
    for parent in parents {
        fill_join_slot(core, parent, id, value.clone());
    }
}

/// Fill every slot in `parent`'s join that's awaiting `child`, and if the join is now
/// complete, resume the parent. Diamond-safe: a gather listing the same child twice has two
/// matching slots, both filled from this single completion.
fn fill_join_slot(core: &mut Core, parent: CoroutineId, child: CoroutineId, value: Value) {
    let Some(rec) = core.records.get_mut(&parent) else { return };
    if rec.status != Status::AwaitingChildren {
        return;
    }
    let Some(join) = rec.join.as_mut() else { return };
    for (i, cid) in join.children.iter().enumerate() {
        if *cid == child {
            join.slots[i] = Some(value.clone());
        }
    }
    if join.slots.iter().all(Option::is_some) {
        let Join { slots, is_gather, .. } = rec.join.take().unwrap();
        let values: Vec<Value> = slots.into_iter().map(Option::unwrap).collect();
        rec.status = Status::Runnable;
        rec.resume_input = Some(if is_gather {
            Resume::Values(values)
        } else {
            Resume::Value(values.into_iter().next().unwrap())
        });
        core.ready.push_back(parent);
    }
}

fn complete_err(core: &mut Core, id: CoroutineId, err: SchedulerError) {
    let parents = {
        let rec = core.records.get_mut(&id).unwrap();
        rec.result = Some(Outcome::Err(err.clone()));
        rec.status = Status::CompletedErr;
        std::mem::take(&mut rec.parents)
    };
    register_error_and_maybe_broadcast(core, err.clone());
    for parent in parents {
        cancel_parent_join(core, parent, id, err.clone());
    }
}

/// Direct join-level propagation, independent of the global broadcast below: handles the
/// case where this `Await`/`Gather` edge was formed *after* a broadcast already ran (a
/// coroutine awaiting something new while cleaning up from an earlier, unrelated failure).
fn cancel_parent_join(core: &mut Core, parent: CoroutineId, child: CoroutineId, err: SchedulerError) {
    let Some(rec) = core.records.get_mut(&parent) else { return };
    if rec.status != Status::AwaitingChildren {
        return;
    }
    match &rec.join {
        Some(join) if join.children.contains(&child) => {}
        _ => return,
    }
    rec.join = None;
    rec.status = Status::Runnable;
    rec.resume_input = Some(Resume::Cancelled(SchedulerError::cancelled_by(Arc::new(err))));
    core.ready.push_back(parent);
}

fn register_error_and_maybe_broadcast(core: &mut Core, err: SchedulerError) {
    core.errors.push(err.clone());
    if core.origin.is_none() {
        let origin = Arc::new(err);
        debug!("origin of this invocation's shutdown: {}", origin);
        core.origin = Some(origin.clone());
        broadcast_cancellation(core, origin);
    }
}

/// §4.7 step 2: every non-completed coroutine other than the origin gets cancelled. Thread
/// tasks can't be preempted, so an `AwaitingThread` record is left alone except for flipping
/// its task's advisory flag; the driver overrides the eventual real result with cancellation
/// when the completion arrives (see `handle_thread_completion`).
fn broadcast_cancellation(core: &mut Core, origin: Arc<SchedulerError>) {
    core.shutting_down = true;
    // `core.records` is a `HashMap`; its iteration order is randomized per-process. Sort by
    // id (monotonically assigned at submission, src/id.rs) to restore the submission-order
    // tie-break the scheduler otherwise guarantees for simultaneously-ready records.
    let mut ids: Vec<CoroutineId> =
        core.records.iter().filter(|(_, r)| !r.status.is_terminal()).map(|(id, _)| *id).collect();
    ids.sort();
    for id in ids {
        let status = core.records[&id].status;
        match status {
            Status::AwaitingThread => {
                if let Some(task) = core.thread_tasks.get(&id) {
                    task.request_cancel();
                }
            }
            Status::Runnable => {
                let rec = core.records.get_mut(&id).unwrap();
                rec.resume_input = Some(Resume::Cancelled(SchedulerError::cancelled_by(origin.clone())));
            }
            Status::AwaitingChildren | Status::AwaitingEvent => {
                detach_from_waitset(core, id);
                let rec = core.records.get_mut(&id).unwrap();
                rec.status = Status::Runnable;
                rec.resume_input = Some(Resume::Cancelled(SchedulerError::cancelled_by(origin.clone())));
                core.ready.push_back(id);
            }
            Status::CompletedOk | Status::CompletedErr | Status::Cancelled => unreachable!(),
        }
    }
}

fn detach_from_waitset(core: &mut Core, id: CoroutineId) {
    let rec = core.records.get_mut(&id).unwrap();
    rec.join = None;
    if let Some(event) = rec.waiting_on_event.take() {
        event.inner.borrow_mut().waiters.retain(|&w| w != id);
    }
    rec.deadline = None;
    rec.wait_generation += 1;
}

fn classify(core: &mut Core, id: CoroutineId, poll: Poll) {
    match poll {
        Poll::Done(v) => complete_ok(core, id, v),
        Poll::Failed(e) => {
            let err = SchedulerError::UserRaised { origin: id, source: Arc::from(e) };
            complete_err(core, id, err);
        }
        Poll::Yielded(y) => classify_yield(core, id, y),
    }
}

fn classify_yield(core: &mut Core, id: CoroutineId, y: Yield) {
    match y {
        Yield::Pending => set_resume_and_requeue(core, id, Resume::Tick),
        Yield::Await(spawn) => classify_await(core, id, spawn),
        Yield::Gather(list) => classify_gather(core, id, list),
        Yield::Wait(handle) => classify_wait(core, id, handle),
        Yield::Thread(spawn) => classify_thread(core, id, spawn),
    }
}

fn classify_await(core: &mut Core, id: CoroutineId, spawn: Spawn) {
    match resolve_or_register(core, &spawn) {
        Resolved::Immediate(Outcome::Ok(v)) => set_resume_and_requeue(core, id, Resume::Value(v)),
        Resolved::Immediate(Outcome::Err(e)) => set_resume_and_requeue(core, id, Resume::Cancelled(e)),
        Resolved::Pending => {
            let child = spawn.id();
            link_parent(core, child, id);
            let rec = core.records.get_mut(&id).unwrap();
            rec.status = Status::AwaitingChildren;
            rec.join = Some(Join { children: vec![child], slots: vec![None], is_gather: false });
        }
    }
}

fn classify_gather(core: &mut Core, id: CoroutineId, list: Vec<Spawn>) {
    if list.is_empty() {
        set_resume_and_requeue(core, id, Resume::Values(Vec::new()));
        return;
    }
    let mut children = Vec::with_capacity(list.len());
    let mut slots: Vec<Option<Value>> = Vec::with_capacity(list.len());
    let mut immediate_err: Option<SchedulerError> = None;
    for spawn in &list {
        let child = spawn.id();
        children.push(child);
        match resolve_or_register(core, spawn) {
            Resolved::Immediate(Outcome::Ok(v)) => slots.push(Some(v)),
            Resolved::Immediate(Outcome::Err(e)) => {
                immediate_err.get_or_insert(e);
                slots.push(Some(Rc::new(())));
            }
            Resolved::Pending => {
                link_parent(core, child, id);
                slots.push(None);
            }
        }
    }
    if let Some(e) = immediate_err {
        set_resume_and_requeue(core, id, Resume::Cancelled(e));
        return;
    }
    if slots.iter().all(Option::is_some) {
        let values = slots.into_iter().map(Option::unwrap).collect();
        set_resume_and_requeue(core, id, Resume::Values(values));
        return;
    }
    let rec = core.records.get_mut(&id).unwrap();
    rec.status = Status::AwaitingChildren;
    rec.join = Some(Join { children, slots, is_gather: true });
}

fn classify_wait(core: &mut Core, id: CoroutineId, handle: crate::event::WaitHandle) {
    if core.shutting_down {
        let origin = core.origin.clone().expect("shutting_down implies an origin");
        set_resume_and_requeue(core, id, Resume::Cancelled(SchedulerError::cancelled_by(origin)));
        return;
    }
    let event = handle.event;
    let timeout = handle.timeout;
    if event.is_set() {
        set_resume_and_requeue(core, id, Resume::EventWait { set: true });
        return;
    }
    event.inner.borrow_mut().waiters.push_back(id);
    let rec = core.records.get_mut(&id).unwrap();
    rec.status = Status::AwaitingEvent;
    rec.wait_generation += 1;
    let generation = rec.wait_generation;
    rec.waiting_on_event = Some(event.clone());
    match timeout {
        Some(dur) => {
            let deadline = Instant::now() + dur;
            rec.deadline = Some(deadline);
            core.timers.schedule(deadline, id, generation);
        }
        None => rec.deadline = None,
    }
}

fn classify_thread(core: &mut Core, id: CoroutineId, spawn: ThreadSpawn) {
    let task = core.pool.dispatch(id, spawn);
    if core.shutting_down {
        task.request_cancel();
    }
    core.thread_tasks.insert(id, task);
    core.records.get_mut(&id).unwrap().status = Status::AwaitingThread;
}

fn handle_timer_fire(core_rc: &Rc<RefCell<Core>>, id: CoroutineId, generation: u64) {
    let mut core = core_rc.borrow_mut();
    let Some(rec) = core.records.get_mut(&id) else { return };
    if rec.status != Status::AwaitingEvent || rec.wait_generation != generation {
        return;
    }
    if let Some(event) = rec.waiting_on_event.take() {
        event.inner.borrow_mut().waiters.retain(|&w| w != id);
    }
    rec.status = Status::Runnable;
    rec.deadline = None;
    rec.resume_input = Some(Resume::EventWait { set: false });
    core.ready.push_back(id);
}

fn handle_thread_completion(core_rc: &Rc<RefCell<Core>>, completion: Completion) {
    let mut core = core_rc.borrow_mut();
    let Some(task) = core.thread_tasks.remove(&completion.parent) else { return };
    let cancel_requested = task.was_cancel_requested();
    let outcome = task.take_result();
    let waiting =
        core.records.get(&completion.parent).map(|r| r.status == Status::AwaitingThread).unwrap_or(false);
    if !waiting {
        return;
    }
    if cancel_requested {
        // The real outcome still matters even though this task is being cancelled: a thread
        // task that independently failed (rather than just observing the cancel flag and
        // returning `Ok`) is a genuine second error the failure controller must not lose
        // (§4.7 "observe any new failures during cleanup").
        if let Err(e) = outcome {
            let err = SchedulerError::UserRaised { origin: completion.parent, source: Arc::from(e) };
            register_error_and_maybe_broadcast(&mut *core, err);
        }
        let origin = core.origin.clone().expect("cancel_requested implies an origin");
        let rec = core.records.get_mut(&completion.parent).unwrap();
        rec.status = Status::Runnable;
        rec.resume_input = Some(Resume::Cancelled(SchedulerError::cancelled_by(origin)));
        core.ready.push_back(completion.parent);
        return;
    }
    match outcome {
        Ok(boxed) => {
            let value: Value = Rc::from(boxed as Box<dyn Any>);
            let rec = core.records.get_mut(&completion.parent).unwrap();
            rec.status = Status::Runnable;
            rec.resume_input = Some(Resume::ThreadResult(value));
            core.ready.push_back(completion.parent);
        }
        Err(e) => {
            let rec = core.records.get_mut(&completion.parent).unwrap();
            rec.status = Status::Runnable;
            rec.resume_input = Some(Resume::ThreadFailed(Arc::from(e)));
            core.ready.push_back(completion.parent);
        }
    }
}

struct Tombstone;

impl Coroutine for Tombstone {
    fn resume(&mut self, _input: Resume) -> Poll {
        unreachable!("tombstone coroutine resumed: a record's boxed coroutine was not restored")
    }
}

fn step(core_rc: &Rc<RefCell<Core>>, id: CoroutineId) {
    let taken = {
        let mut core = core_rc.borrow_mut();
        let Some(rec) = core.records.get_mut(&id) else { return };
        if rec.status.is_terminal() {
            return;
        }
        let boxed = std::mem::replace(&mut rec.coroutine, Box::new(Tombstone));
        let input = rec.resume_input.take().expect("runnable record missing resume input");
        (boxed, input)
    };
    let (mut coroutine, input) = taken;
    trace!("resuming {}", id);
    // Core is not borrowed across this call: a coroutine body may call `Event::set()`, which
    // reaches back into this same Core through the thread-local stack.
    let poll = coroutine.resume(input);
    {
        let mut core = core_rc.borrow_mut();
        if let Some(rec) = core.records.get_mut(&id) {
            rec.coroutine = coroutine;
        }
    }
    let mut core = core_rc.borrow_mut();
    classify(&mut core, id, poll);
}

fn drive(core_rc: &Rc<RefCell<Core>>, completion_rx: &crossbeam_channel::Receiver<Completion>) {
    loop {
        loop {
            let next = core_rc.borrow_mut().ready.pop_front();
            let Some(id) = next else { break };
            step(core_rc, id);
        }
        if core_rc.borrow().all_done() {
            break;
        }
        let now = Instant::now();
        let fired = core_rc.borrow_mut().timers.pop_elapsed(now);
        for (cid, gen) in fired {
            handle_timer_fire(core_rc, cid, gen);
        }
        if !core_rc.borrow().ready.is_empty() {
            continue;
        }
        if core_rc.borrow().all_done() {
            break;
        }
        let budget = {
            let core = core_rc.borrow();
            timer::blocking_budget(core.timers.next_deadline(), Instant::now())
        };
        let received = match budget {
            Some(d) => completion_rx.recv_timeout(d).ok(),
            None => completion_rx.recv().ok(),
        };
        if let Some(completion) = received {
            handle_thread_completion(core_rc, completion);
            while let Ok(more) = completion_rx.try_recv() {
                handle_thread_completion(core_rc, more);
            }
        }
    }
}

fn finalize(core: &Core, delivery: ErrorDelivery) -> Result<Value, RunError> {
    match &core.origin {
        Some(origin_arc) => {
            let origin = origin_arc.as_ref().clone();
            let others: Vec<SchedulerError> =
                if core.errors.len() > 1 { core.errors[1..].to_vec() } else { Vec::new() };
            match delivery {
                ErrorDelivery::Origin => Err(RunError::Single(origin)),
                ErrorDelivery::Single => {
                    for other in &others {
                        warn!("additional error observed during cancellation (origin already raised): {}", other);
                    }
                    Err(RunError::Single(origin))
                }
                ErrorDelivery::Group => Err(RunError::Grouped(GroupedError { origin, others })),
            }
        }
        None => {
            let rec = core.records.get(&core.root).expect("root record always present");
            match &rec.result {
                Some(Outcome::Ok(v)) => Ok(v.clone()),
                _ => unreachable!("root reached a terminal state without an origin but isn't completed-ok"),
            }
        }
    }
}

/// Configuration for a [`Scheduler`], built via [`Builder`]. Mirrors the teacher's own
/// `Options`/`Builder` split: a plain data struct plus a fluent constructor.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    pub(crate) worker_threads: usize,
    pub(crate) error_delivery: ErrorDelivery,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        SchedulerConfig { worker_threads: num_cpus::get().max(1), error_delivery: ErrorDelivery::default() }
    }
}

/// Fluent constructor for a [`Scheduler`] (§10.3).
#[derive(Debug, Clone, Default)]
pub struct Builder {
    config: SchedulerConfig,
}

impl Builder {
    pub fn new() -> Builder {
        Builder::default()
    }

    /// Number of worker threads backing the thread-run bridge (§4.5). Defaults to the
    /// detected core count.
    pub fn worker_threads(mut self, count: usize) -> Builder {
        self.config.worker_threads = count;
        self
    }

    /// How `Scheduler::run` packages multiple observed errors (§4.7). Defaults to `Single`.
    pub fn error_delivery(mut self, delivery: ErrorDelivery) -> Builder {
        self.config.error_delivery = delivery;
        self
    }

    pub fn build(self) -> Scheduler {
        Scheduler::with_config(self.config)
    }
}

/// Drives a single root coroutine to completion, bridging blocking work to a worker pool and
/// enforcing strict failure-atomic cancellation across everything it spawned (§1–§5).
///
/// The worker pool is created once and persists across `run` calls; the ready queue, record
/// table and timer queue are scoped to a single `run` (§3, §4.8).
pub struct Scheduler {
    pool: Rc<ThreadPool>,
    completion_rx: crossbeam_channel::Receiver<Completion>,
    config: SchedulerConfig,
}

impl Scheduler {
    pub fn new() -> Scheduler {
        Scheduler::with_config(SchedulerConfig::default())
    }

    fn with_config(config: SchedulerConfig) -> Scheduler {
        let (completion_tx, completion_rx) = crossbeam_channel::unbounded();
        let pool = Rc::new(ThreadPool::new(config.worker_threads, completion_tx));
        Scheduler { pool, completion_rx, config }
    }

    /// Run `root` to completion, returning its value or the invocation's origin error shaped
    /// by this scheduler's configured [`ErrorDelivery`]. Reentrant: a coroutine body may call
    /// `run` again on this (or another) `Scheduler` to drive a nested invocation (§4.8); the
    /// thread-local current-core stack keeps the two invocations' state fully separate.
    pub fn run<C: Coroutine + 'static>(&mut self, root: C) -> Result<Value, RunError> {
        let root_spawn = Spawn::new(root);
        let root_id = root_spawn.id();
        let core = Rc::new(RefCell::new(Core::new(self.pool.clone(), root_id)));
        {
            let mut c = core.borrow_mut();
            let boxed = root_spawn.take();
            c.records.insert(root_id, Record::new(boxed));
            c.ready.push_back(root_id);
        }
        push_current(core.clone());
        let _guard = CurrentGuard;
        drive(&core, &self.completion_rx);
        finalize(&core.borrow(), self.config.error_delivery)
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Scheduler::new()
    }
}
