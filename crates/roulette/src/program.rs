//! Elm-style event loop.
//!
//! The loop waits on the [`EventSource`] for at most the time until the next
//! timer, converts events into messages, fires every due timer in deadline
//! order, and re-renders when any message was delivered. Executing
//! [`Cmd::Quit`] stops the loop and drops all pending timers.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::io::{self, Write};
use std::time::Duration;

use roulette_core::event::Event;
use roulette_core::frame::Frame;
use roulette_core::model::{Cmd, Model};
use tracing::{debug, trace};
use web_time::Instant;

use crate::presenter::Presenter;

/// Upper bound on a single wait when no timer is pending.
const IDLE_POLL: Duration = Duration::from_millis(100);

/// Something that yields terminal events.
pub trait EventSource {
    /// Wait up to `timeout` for the next event.
    fn poll_event(&mut self, timeout: Duration) -> io::Result<Option<Event>>;
}

struct Timer<M> {
    deadline: Instant,
    seq: u64,
    msg: M,
}

impl<M> PartialEq for Timer<M> {
    fn eq(&self, other: &Self) -> bool {
        self.deadline == other.deadline && self.seq == other.seq
    }
}

impl<M> Eq for Timer<M> {}

impl<M> PartialOrd for Timer<M> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<M> Ord for Timer<M> {
    // Reversed: BinaryHeap is a max-heap, the earliest deadline must pop first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .deadline
            .cmp(&self.deadline)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Pending tagged timers, earliest deadline first, ties in insertion order.
pub struct TimerQueue<M> {
    heap: BinaryHeap<Timer<M>>,
    next_seq: u64,
}

impl<M> Default for TimerQueue<M> {
    fn default() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_seq: 0,
        }
    }
}

impl<M> TimerQueue<M> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver `msg` at `deadline`.
    pub fn schedule(&mut self, deadline: Instant, msg: M) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Timer { deadline, seq, msg });
    }

    /// Earliest pending deadline.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.heap.peek().map(|t| t.deadline)
    }

    /// Remove and return the earliest timer due at `now`.
    pub fn pop_due(&mut self, now: Instant) -> Option<M> {
        if self.heap.peek()?.deadline > now {
            return None;
        }
        self.heap.pop().map(|t| t.msg)
    }

    pub fn clear(&mut self) {
        self.heap.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

/// Runs a [`Model`] against an event source and a presenter.
pub struct Program<M: Model, S: EventSource, W: Write> {
    model: M,
    source: S,
    presenter: Presenter<W>,
    timers: TimerQueue<M::Message>,
    running: bool,
    dirty: bool,
}

impl<M: Model, S: EventSource, W: Write> Program<M, S, W> {
    pub fn new(model: M, source: S, writer: W) -> Self {
        Self {
            model,
            source,
            presenter: Presenter::new(writer),
            timers: TimerQueue::new(),
            running: true,
            dirty: true,
        }
    }

    /// Run until the model quits or the source fails.
    pub fn run(&mut self) -> io::Result<()> {
        let cmd = self.model.init();
        self.execute_cmd(cmd);
        self.render_frame()?;

        while self.running {
            let timeout = self.timeout(Instant::now());
            if let Some(event) = self.source.poll_event(timeout)? {
                trace!(?event, "event");
                self.dispatch(M::Message::from(event));
            }

            let now = Instant::now();
            while self.running {
                let Some(msg) = self.timers.pop_due(now) else {
                    break;
                };
                self.dispatch(msg);
            }

            if self.dirty {
                self.render_frame()?;
            }
        }

        debug!("program finished");
        self.presenter.finish()
    }

    fn timeout(&self, now: Instant) -> Duration {
        self.timers
            .next_deadline()
            .map_or(IDLE_POLL, |deadline| deadline.saturating_duration_since(now))
    }

    fn dispatch(&mut self, msg: M::Message) {
        let cmd = self.model.update(msg);
        self.dirty = true;
        self.execute_cmd(cmd);
    }

    fn execute_cmd(&mut self, cmd: Cmd<M::Message>) {
        match cmd {
            Cmd::None => {}
            Cmd::Quit => {
                self.running = false;
                self.timers.clear();
            }
            Cmd::Batch(cmds) => {
                for c in cmds {
                    self.execute_cmd(c);
                }
            }
            Cmd::Tick { after, msg } => {
                if self.running {
                    self.timers.schedule(Instant::now() + after, msg);
                }
            }
        }
    }

    fn render_frame(&mut self) -> io::Result<()> {
        let mut frame = Frame::new();
        self.model.view(&mut frame);
        self.presenter.present(&frame)?;
        self.dirty = false;
        Ok(())
    }

    #[must_use]
    pub fn model(&self) -> &M {
        &self.model
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn presenter(&self) -> &Presenter<W> {
        &self.presenter
    }
}
