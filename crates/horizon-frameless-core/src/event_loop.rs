//! Cooperative single-threaded event loop.
//!
//! [`EventLoop`] is a queue of deferred work owned by the UI thread: closures
//! posted with [`EventLoop::post_task`] and one-shot timers scheduled with
//! [`EventLoop::single_shot`]. Nothing runs until the owning thread calls
//! [`EventLoop::process_events`], so a callback never executes inside the
//! call that scheduled it.
//!
//! [`NestedLoop`] pumps the same queue until a [`QuitHandle`] is triggered.
//! Blocking waits (such as waiting for a window to become ready) use it to
//! keep timers and posted work flowing.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use horizon_frameless_core::EventLoop;
//!
//! let event_loop = EventLoop::new();
//! let nested = event_loop.nested();
//! let quit = nested.quit_handle();
//!
//! event_loop.single_shot(Duration::from_millis(5), move || quit.quit());
//! nested.exec();
//! ```

use std::cmp::Ordering as CmpOrdering;
use std::collections::BinaryHeap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TryRecvError};
use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

use crate::error::{CoreError, Result};
use crate::logging::targets;
use crate::thread_check::ThreadAffinity;

new_key_type! {
    /// A unique identifier for a scheduled one-shot timer.
    pub struct TimerId;
}

type Task = Box<dyn FnOnce() + Send + 'static>;

/// Longest a nested loop sleeps before re-checking its quit flag.
const IDLE_SLICE: Duration = Duration::from_millis(10);

/// An entry in the timer queue (min-heap by fire time, FIFO among equals).
#[derive(Debug, Clone, Copy)]
struct TimerQueueEntry {
    id: TimerId,
    fire_time: Instant,
    sequence: u64,
}

impl PartialEq for TimerQueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.fire_time == other.fire_time && self.sequence == other.sequence
    }
}

impl Eq for TimerQueueEntry {}

impl PartialOrd for TimerQueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<CmpOrdering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimerQueueEntry {
    fn cmp(&self, other: &Self) -> CmpOrdering {
        // Reversed: BinaryHeap is a max-heap.
        other
            .fire_time
            .cmp(&self.fire_time)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

#[derive(Default)]
struct TimerQueue {
    callbacks: SlotMap<TimerId, Task>,
    queue: BinaryHeap<TimerQueueEntry>,
    sequence: u64,
}

impl TimerQueue {
    fn schedule(&mut self, fire_time: Instant, task: Task) -> TimerId {
        let id = self.callbacks.insert(task);
        self.sequence += 1;
        self.queue.push(TimerQueueEntry {
            id,
            fire_time,
            sequence: self.sequence,
        });
        id
    }

    /// Drop queue entries whose timers were cancelled.
    fn discard_cancelled(&mut self) {
        while let Some(entry) = self.queue.peek() {
            if self.callbacks.contains_key(entry.id) {
                break;
            }
            self.queue.pop();
        }
    }

    fn pop_expired(&mut self, now: Instant) -> Option<Task> {
        self.discard_cancelled();
        if self.queue.peek()?.fire_time > now {
            return None;
        }
        let entry = self.queue.pop()?;
        self.callbacks.remove(entry.id)
    }

    fn next_fire_time(&mut self) -> Option<Instant> {
        self.discard_cancelled();
        self.queue.peek().map(|entry| entry.fire_time)
    }
}

struct EventLoopInner {
    sender: Sender<Task>,
    receiver: Receiver<Task>,
    timers: Mutex<TimerQueue>,
    affinity: ThreadAffinity,
    nesting: AtomicUsize,
}

/// Handle to a cooperative event loop. Cloning shares the same queue.
#[derive(Clone)]
pub struct EventLoop {
    inner: Arc<EventLoopInner>,
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl EventLoop {
    /// Create an event loop owned by the calling thread.
    pub fn new() -> Self {
        let (sender, receiver) = crossbeam_channel::unbounded();
        Self {
            inner: Arc::new(EventLoopInner {
                sender,
                receiver,
                timers: Mutex::new(TimerQueue::default()),
                affinity: ThreadAffinity::current(),
                nesting: AtomicUsize::new(0),
            }),
        }
    }

    /// Queue a closure to run on the next [`process_events`](Self::process_events).
    ///
    /// May be called from any thread.
    pub fn post_task<F>(&self, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        // The receiver lives as long as `inner`; sending cannot fail.
        let _ = self.inner.sender.send(Box::new(task));
    }

    /// Run `task` once, no earlier than `delay` from now.
    pub fn single_shot<F>(&self, delay: Duration, task: F) -> TimerId
    where
        F: FnOnce() + Send + 'static,
    {
        let fire_time = Instant::now() + delay;
        let id = self.inner.timers.lock().schedule(fire_time, Box::new(task));
        tracing::trace!(target: targets::EVENT_LOOP, ?id, ?delay, "scheduled single-shot timer");
        self.wake();
        id
    }

    /// Cancel a pending timer.
    pub fn cancel_timer(&self, id: TimerId) -> Result<()> {
        match self.inner.timers.lock().callbacks.remove(id) {
            Some(_) => Ok(()),
            None => Err(CoreError::InvalidTimerId(id)),
        }
    }

    /// Whether the timer is still waiting to fire.
    pub fn is_timer_active(&self, id: TimerId) -> bool {
        self.inner.timers.lock().callbacks.contains_key(id)
    }

    /// Time until the earliest pending timer, `Duration::ZERO` if one is due.
    pub fn time_until_next_timer(&self) -> Option<Duration> {
        let next = self.inner.timers.lock().next_fire_time()?;
        Some(next.saturating_duration_since(Instant::now()))
    }

    /// Whether there is posted work or an expired timer waiting.
    pub fn has_pending_events(&self) -> bool {
        !self.inner.receiver.is_empty() || self.time_until_next_timer() == Some(Duration::ZERO)
    }

    /// Current nested loop depth.
    pub fn nesting_depth(&self) -> usize {
        self.inner.nesting.load(Ordering::Acquire)
    }

    /// Run all posted tasks, then every timer that has expired.
    ///
    /// Returns the number of callbacks executed. Internal locks are released
    /// while callbacks run, so callbacks may post or schedule more work; work
    /// posted during this call runs on the next call.
    pub fn process_events(&self) -> usize {
        self.inner.affinity.debug_assert_same_thread();

        let mut processed = 0;
        let posted = self.inner.receiver.len();
        for _ in 0..posted {
            match self.inner.receiver.try_recv() {
                Ok(task) => {
                    task();
                    processed += 1;
                }
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }

        let now = Instant::now();
        loop {
            let expired = self.inner.timers.lock().pop_expired(now);
            let Some(task) = expired else { break };
            task();
            processed += 1;
        }

        if processed > 0 {
            tracing::trace!(target: targets::EVENT_LOOP, processed, "processed events");
        }
        processed
    }

    /// Pump events for `duration`.
    pub fn run_for(&self, duration: Duration) {
        self.nested().exec_for(duration);
    }

    /// Create a nested loop over this queue.
    pub fn nested(&self) -> NestedLoop {
        NestedLoop {
            event_loop: self.clone(),
            quit: QuitHandle {
                requested: Arc::new(AtomicBool::new(false)),
                waker: self.inner.sender.clone(),
            },
        }
    }

    /// Block until work may be available, for at most `max_wait`.
    ///
    /// A posted task that arrives while waiting is run immediately.
    fn wait_for_events(&self, max_wait: Duration) {
        let timeout = match self.time_until_next_timer() {
            Some(until_timer) => until_timer.min(max_wait),
            None => max_wait,
        };
        if timeout.is_zero() {
            return;
        }
        match self.inner.receiver.recv_timeout(timeout) {
            Ok(task) => task(),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => {}
        }
    }

    fn wake(&self) {
        if self.nesting_depth() > 0 {
            let _ = self.inner.sender.send(Box::new(|| {}));
        }
    }
}

impl std::fmt::Debug for EventLoop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventLoop")
            .field("posted", &self.inner.receiver.len())
            .field("timers", &self.inner.timers.lock().callbacks.len())
            .field("nesting", &self.nesting_depth())
            .finish()
    }
}

/// Requests that a [`NestedLoop`] stop.
#[derive(Clone)]
pub struct QuitHandle {
    requested: Arc<AtomicBool>,
    waker: Sender<Task>,
}

impl QuitHandle {
    /// Ask the loop to return once the running callback finishes.
    pub fn quit(&self) {
        self.requested.store(true, Ordering::Release);
        let _ = self.waker.send(Box::new(|| {}));
    }

    pub fn is_quit_requested(&self) -> bool {
        self.requested.load(Ordering::Acquire)
    }
}

/// A loop that pumps an [`EventLoop`] until asked to quit.
pub struct NestedLoop {
    event_loop: EventLoop,
    quit: QuitHandle,
}

impl NestedLoop {
    /// Handle that stops this loop. May be moved to any thread.
    pub fn quit_handle(&self) -> QuitHandle {
        self.quit.clone()
    }

    /// Pump events until [`QuitHandle::quit`] is called.
    pub fn exec(&self) {
        self.run(None);
    }

    /// Pump events until quit or until `timeout` elapses.
    ///
    /// Returns `true` if the loop was quit, `false` on timeout.
    pub fn exec_for(&self, timeout: Duration) -> bool {
        self.run(Some(Instant::now() + timeout))
    }

    fn run(&self, deadline: Option<Instant>) -> bool {
        let depth = self.event_loop.inner.nesting.fetch_add(1, Ordering::AcqRel) + 1;
        tracing::trace!(target: targets::EVENT_LOOP, depth, "entering nested loop");

        let quit = loop {
            self.event_loop.process_events();
            if self.quit.is_quit_requested() {
                break true;
            }
            let slice = match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        break false;
                    }
                    (deadline - now).min(IDLE_SLICE)
                }
                None => IDLE_SLICE,
            };
            self.event_loop.wait_for_events(slice);
            if self.quit.is_quit_requested() {
                break true;
            }
        };

        self.event_loop.inner.nesting.fetch_sub(1, Ordering::AcqRel);
        tracing::trace!(target: targets::EVENT_LOOP, depth, quit, "left nested loop");
        quit
    }
}
