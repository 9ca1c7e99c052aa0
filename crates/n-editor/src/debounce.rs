//! Edit debouncing — decides when to re-run color detection.
//!
//! Typing produces bursts of edit events. Re-evaluating on every keystroke
//! is wasted work, so evaluation waits for a trailing quiet period: only
//! once no edit has been seen for [`QUIET_PERIOD`] does one evaluation run.
//!
//! # State machine
//!
//! ```text
//!            notify_edit            tick (quiet elapsed)
//!   Idle ───────────────▶ Pending ───────────────────────▶ Evaluating
//!    ▲                    │    ▲                               │
//!    │                    └────┘ notify_edit (re-arm)          │ notify_edit
//!    │                                                         │ (deferred)
//!    └──────────── finish (nothing deferred) ◀─────────────────┘
//!                  finish (edits deferred) ──▶ Pending
//!
//!   shutdown: any state ──▶ Stopped, except Evaluating, where the stop
//!   lands at finish. Stopped is terminal.
//! ```
//!
//! Edits the caller makes itself (applying an insertion plan) must not
//! schedule another evaluation; [`Debouncer::set_suppressed`] turns edit
//! notifications into no-ops for that window.
//!
//! [`Debouncer`] is a plain value driven with explicit timestamps, so it
//! can be tested without sleeping. [`Watcher`] runs one on a background
//! thread fed by a channel.

use std::fmt;
use std::io;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, trace};

/// Default trailing quiet period before an evaluation runs.
pub const QUIET_PERIOD: Duration = Duration::from_millis(120);

// ---------------------------------------------------------------------------
// DebounceState
// ---------------------------------------------------------------------------

/// Where the debouncer is in its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebounceState {
    /// Nothing pending.
    Idle,
    /// An edit was seen; evaluation is due once the quiet period has
    /// passed since `last_edit`.
    Pending { last_edit: Instant },
    /// An evaluation is running. `deferred` records whether edits arrived
    /// meanwhile.
    Evaluating { deferred: bool },
    /// Shut down. No further transitions.
    Stopped,
}

impl fmt::Display for DebounceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("idle"),
            Self::Pending { .. } => f.write_str("pending"),
            Self::Evaluating { .. } => f.write_str("evaluating"),
            Self::Stopped => f.write_str("stopped"),
        }
    }
}

// ---------------------------------------------------------------------------
// Debouncer
// ---------------------------------------------------------------------------

/// Trailing-edge debouncer with at most one evaluation in flight.
#[derive(Debug, Clone)]
pub struct Debouncer {
    state: DebounceState,
    quiet: Duration,
    suppressed: bool,
    stop_requested: bool,
}

impl Debouncer {
    /// A debouncer with the default [`QUIET_PERIOD`].
    #[must_use]
    pub const fn new() -> Self {
        Self::with_quiet_period(QUIET_PERIOD)
    }

    #[must_use]
    pub const fn with_quiet_period(quiet: Duration) -> Self {
        Self {
            state: DebounceState::Idle,
            quiet,
            suppressed: false,
            stop_requested: false,
        }
    }

    #[inline]
    #[must_use]
    pub const fn state(&self) -> DebounceState {
        self.state
    }

    #[inline]
    #[must_use]
    pub const fn quiet_period(&self) -> Duration {
        self.quiet
    }

    #[inline]
    #[must_use]
    pub const fn is_suppressed(&self) -> bool {
        self.suppressed
    }

    #[inline]
    #[must_use]
    pub const fn is_stopped(&self) -> bool {
        matches!(self.state, DebounceState::Stopped)
    }

    /// Ignore edit notifications while `true`. Used around edits the
    /// caller makes itself.
    pub const fn set_suppressed(&mut self, suppressed: bool) {
        self.suppressed = suppressed;
    }

    /// Record an edit observed at `now`.
    pub fn notify_edit(&mut self, now: Instant) {
        if self.suppressed {
            trace!("edit ignored (suppressed)");
            return;
        }
        self.state = match self.state {
            DebounceState::Idle | DebounceState::Pending { .. } => {
                DebounceState::Pending { last_edit: now }
            }
            DebounceState::Evaluating { .. } => DebounceState::Evaluating { deferred: true },
            DebounceState::Stopped => DebounceState::Stopped,
        };
    }

    /// Advance the timer. Returns `true` when the quiet period has
    /// elapsed: the state is now `Evaluating` and the caller must run
    /// exactly one evaluation followed by [`finish`](Self::finish).
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.state {
            DebounceState::Pending { last_edit }
                if now.saturating_duration_since(last_edit) >= self.quiet =>
            {
                self.state = DebounceState::Evaluating { deferred: false };
                true
            }
            _ => false,
        }
    }

    /// How long until [`tick`](Self::tick) would fire, or `None` when no
    /// evaluation is pending.
    #[must_use]
    pub fn time_to_fire(&self, now: Instant) -> Option<Duration> {
        match self.state {
            DebounceState::Pending { last_edit } => {
                Some(self.quiet.saturating_sub(now.saturating_duration_since(last_edit)))
            }
            _ => None,
        }
    }

    /// Mark the running evaluation as done.
    ///
    /// Edits deferred during the evaluation re-arm the timer from `now`.
    /// A shutdown requested during the evaluation takes effect here.
    pub fn finish(&mut self, now: Instant) {
        let DebounceState::Evaluating { deferred } = self.state else {
            return;
        };
        self.state = if self.stop_requested {
            DebounceState::Stopped
        } else if deferred {
            DebounceState::Pending { last_edit: now }
        } else {
            DebounceState::Idle
        };
    }

    /// Stop the debouncer. An evaluation in flight is never cancelled;
    /// the stop lands when it finishes.
    pub fn shutdown(&mut self) {
        self.stop_requested = true;
        if !matches!(self.state, DebounceState::Evaluating { .. }) {
            self.state = DebounceState::Stopped;
        }
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Watcher
// ---------------------------------------------------------------------------

enum Signal {
    Edit,
    Suppress(bool),
    Stop,
}

/// A [`Debouncer`] running on its own thread.
///
/// The owner sends edit notifications; the thread calls `evaluate` once
/// per settled burst. Dropping the watcher shuts it down.
pub struct Watcher {
    tx: Sender<Signal>,
    /// `None` after `shutdown()` joins it.
    handle: Option<JoinHandle<()>>,
}

impl Watcher {
    /// Spawn the watcher thread.
    ///
    /// # Errors
    ///
    /// Returns an error if the OS cannot spawn a new thread.
    pub fn spawn<F>(quiet: Duration, evaluate: F) -> io::Result<Self>
    where
        F: FnMut() + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        let handle = thread::Builder::new()
            .name("color-watcher".into())
            .spawn(move || Self::watch_loop(&rx, Debouncer::with_quiet_period(quiet), evaluate))?;
        Ok(Self {
            tx,
            handle: Some(handle),
        })
    }

    /// Report an edit. A no-op once the watcher has stopped.
    pub fn notify_edit(&self) {
        let _ = self.tx.send(Signal::Edit);
    }

    /// Suppress or resume edit notifications.
    pub fn set_suppressed(&self, suppressed: bool) {
        let _ = self.tx.send(Signal::Suppress(suppressed));
    }

    /// Signal the thread to stop and wait for it to exit. An evaluation
    /// in flight completes first.
    ///
    /// Idempotent.
    pub fn shutdown(&mut self) {
        let _ = self.tx.send(Signal::Stop);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    fn apply(debouncer: &mut Debouncer, signal: Signal) {
        match signal {
            Signal::Edit => debouncer.notify_edit(Instant::now()),
            Signal::Suppress(on) => debouncer.set_suppressed(on),
            Signal::Stop => debouncer.shutdown(),
        }
    }

    fn watch_loop<F: FnMut()>(rx: &Receiver<Signal>, mut debouncer: Debouncer, mut evaluate: F) {
        while !debouncer.is_stopped() {
            let received = match debouncer.time_to_fire(Instant::now()) {
                Some(wait) => rx.recv_timeout(wait),
                None => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
            };
            match received {
                Ok(signal) => Self::apply(&mut debouncer, signal),
                Err(RecvTimeoutError::Timeout) => {}
                // Owner gone without calling shutdown.
                Err(RecvTimeoutError::Disconnected) => debouncer.shutdown(),
            }

            if debouncer.tick(Instant::now()) {
                debug!("evaluating after quiet period");
                evaluate();
                // Whatever queued up while evaluating counts as deferred.
                while let Ok(signal) = rx.try_recv() {
                    Self::apply(&mut debouncer, signal);
                }
                debouncer.finish(Instant::now());
            }
        }
        debug!("watcher stopped");
    }
}

impl Drop for Watcher {
    fn drop(&mut self) {
        self.shutdown();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
