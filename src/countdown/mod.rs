//! Countdown engine: a two-state machine (Counting / Finished) driven by a
//! periodic tick.
//!
//! The engine owns its single tick handle and its single celebration handle,
//! so several engines can coexist and tests can drive one with a manual clock
//! and ticker. Every reconfiguration cancels the old tick before arming a new
//! one; at most one tick source is live per engine.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use chrono::{DateTime, Utc};

use crate::time_source::TimeSource;

mod breakdown;

pub use breakdown::{Breakdown, SECS_PER_DAY, SECS_PER_HOUR, SECS_PER_MINUTE, Unit, remaining_seconds};
use breakdown::EmittedDigits;

// --- Host seams -------------------------------------------------------------

/// Wall clock in epoch milliseconds.
pub trait Clock {
    fn now_ms(&self) -> i64;
}

/// Consumer of formatted digits and the completion signal (the DOM in the browser).
pub trait DisplaySink {
    fn show_unit(&mut self, unit: Unit, text: &str);
    /// `true` swaps in the "completed" headline; `false` reverts it.
    fn show_completed(&mut self, completed: bool);
}

/// Periodic callback source. Dropping or cancelling a handle must stop its
/// callbacks.
pub trait Ticker {
    type Handle;
    fn every(&mut self, period_ms: u32, tick: Box<dyn FnMut()>) -> Self::Handle;
    fn cancel(&mut self, handle: Self::Handle);
}

/// Something that can be started and later stopped through a [`StopHandle`].
pub trait Celebration {
    fn start(&mut self) -> StopHandle;
}

/// Stops one celebration activation.
#[must_use = "dropping a StopHandle leaves the celebration running"]
pub struct StopHandle {
    stop: Option<Box<dyn FnOnce()>>,
}

impl StopHandle {
    pub fn new(stop: impl FnOnce() + 'static) -> Self {
        Self {
            stop: Some(Box::new(stop)),
        }
    }

    /// Handle for an activation that never started (reduced motion, no surface).
    pub fn noop() -> Self {
        Self { stop: None }
    }

    pub fn stop(mut self) {
        if let Some(stop) = self.stop.take() {
            stop();
        }
    }
}

impl std::fmt::Debug for StopHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StopHandle")
            .field("armed", &self.stop.is_some())
            .finish()
    }
}

// --- State machine ----------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Counting,
    Finished,
}

impl Phase {
    /// Finished once the target is not in the future.
    pub fn at(target_ms: i64, now_ms: i64) -> Self {
        if target_ms <= now_ms {
            Phase::Finished
        } else {
            Phase::Counting
        }
    }
}

struct Countdown {
    source: TimeSource,
    clock: Box<dyn Clock>,
    display: Box<dyn DisplaySink>,
    celebration: Box<dyn Celebration>,
    target_ms: i64,
    phase: Phase,
    remaining: u64,
    digits: EmittedDigits,
    completed_shown: Option<bool>,
    effect: Option<StopHandle>,
}

impl Countdown {
    /// Re-read the target and derive the starting phase from it.
    fn rearm(&mut self) {
        let now = self.clock.now_ms();
        self.target_ms = self.source.current_target().timestamp_millis();
        let phase = Phase::at(self.target_ms, now);
        if phase != self.phase {
            tracing::info!(from = ?self.phase, to = ?phase, "phase changed by reconfiguration");
        }
        self.phase = phase;
    }

    fn tick(&mut self) {
        let remaining = remaining_seconds(self.target_ms, self.clock.now_ms());
        self.remaining = remaining;
        for (unit, text) in self.digits.changes(&Breakdown::from_seconds(remaining)) {
            self.display.show_unit(unit, &text);
        }

        if remaining == 0 {
            if self.phase == Phase::Counting {
                tracing::info!("countdown reached zero");
                self.phase = Phase::Finished;
            }
            self.show_completed(true);
            if self.effect.is_none() {
                tracing::debug!("starting celebration");
                self.effect = Some(self.celebration.start());
            }
            return;
        }

        self.phase = Phase::Counting;
        self.stop_celebration();
        self.show_completed(false);
    }

    fn show_completed(&mut self, completed: bool) {
        if self.completed_shown != Some(completed) {
            self.completed_shown = Some(completed);
            self.display.show_completed(completed);
        }
    }

    fn stop_celebration(&mut self) {
        if let Some(effect) = self.effect.take() {
            tracing::debug!("stopping celebration");
            effect.stop();
        }
    }
}

// --- Engine -----------------------------------------------------------------

pub struct CountdownEngine<T: Ticker> {
    inner: Rc<RefCell<Countdown>>,
    ticker: T,
    period_ms: u32,
    handle: Option<T::Handle>,
}

impl<T: Ticker> CountdownEngine<T> {
    /// Build an idle engine; nothing is displayed until [`start`](Self::start).
    pub fn new(
        source: TimeSource,
        clock: Box<dyn Clock>,
        display: Box<dyn DisplaySink>,
        celebration: Box<dyn Celebration>,
        ticker: T,
        period_ms: u32,
    ) -> Self {
        let target_ms = source.current_target().timestamp_millis();
        let phase = Phase::at(target_ms, clock.now_ms());
        let inner = Countdown {
            source,
            clock,
            display,
            celebration,
            target_ms,
            phase,
            remaining: 0,
            digits: EmittedDigits::default(),
            completed_shown: None,
            effect: None,
        };
        Self {
            inner: Rc::new(RefCell::new(inner)),
            ticker,
            period_ms: period_ms.max(1),
            handle: None,
        }
    }

    pub fn start(&mut self) {
        self.restart();
    }

    /// Cancel the live tick, recompute and redisplay now, then arm a fresh tick.
    fn restart(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.ticker.cancel(handle);
        }
        {
            let mut inner = self.inner.borrow_mut();
            inner.rearm();
            inner.tick();
        }
        let weak: Weak<RefCell<Countdown>> = Rc::downgrade(&self.inner);
        let handle = self.ticker.every(
            self.period_ms,
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.borrow_mut().tick();
                }
            }),
        );
        self.handle = Some(handle);
    }

    /// Persist a new target (ignored if it does not parse) and restart.
    pub fn set_target(&mut self, raw: &str) -> bool {
        let stored = self.inner.borrow_mut().source.set_target(raw);
        self.restart();
        stored
    }

    pub fn set_timezone(&mut self, selector: &str) {
        self.inner.borrow_mut().source.set_timezone(selector);
        self.restart();
    }

    /// Settings form save: optional target input plus the zone selector,
    /// applied together with a single restart.
    pub fn save_settings(&mut self, target: Option<&str>, timezone: &str) {
        {
            let mut inner = self.inner.borrow_mut();
            if let Some(raw) = target.filter(|raw| !raw.trim().is_empty()) {
                inner.source.set_target(raw);
            }
            inner.source.set_timezone(timezone);
        }
        tracing::info!(timezone, "settings saved");
        self.restart();
    }

    /// Forget stored settings, drop any celebration and the completed
    /// headline, and count toward the default target.
    pub fn reset(&mut self) {
        {
            let mut inner = self.inner.borrow_mut();
            inner.source.clear();
            inner.stop_celebration();
            inner.completed_shown = None;
        }
        tracing::info!("countdown reset to defaults");
        self.restart();
    }

    /// Halt ticking and the celebration. `start` resumes.
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.ticker.cancel(handle);
        }
        self.inner.borrow_mut().stop_celebration();
    }

    pub fn phase(&self) -> Phase {
        self.inner.borrow().phase
    }

    pub fn remaining_seconds(&self) -> u64 {
        self.inner.borrow().remaining
    }

    pub fn breakdown(&self) -> Breakdown {
        Breakdown::from_seconds(self.remaining_seconds())
    }

    pub fn is_celebrating(&self) -> bool {
        self.inner.borrow().effect.is_some()
    }

    pub fn is_ticking(&self) -> bool {
        self.handle.is_some()
    }

    pub fn current_target(&self) -> DateTime<Utc> {
        self.inner.borrow().source.current_target()
    }

    pub fn current_timezone(&self) -> String {
        self.inner.borrow().source.current_timezone()
    }
}

impl<T: Ticker> Drop for CountdownEngine<T> {
    fn drop(&mut self) {
        self.stop();
    }
}
