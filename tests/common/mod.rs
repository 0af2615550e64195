// Test doubles for driving the engine and the celebration natively.
#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use nian_countdown::celebration::{CelebrationEffect, FrameDriver, Size, Surface};
use nian_countdown::countdown::{Clock, DisplaySink, Ticker};
use nian_countdown::storage::{KeyValueStore, MemoryStore};
use nian_countdown::{CountdownEngine, StopHandle, TimeSource, Unit, WidgetConfig};

/// 2026-10-18T00:00:00Z, well after the compiled-in default target.
pub const NOW_MS: i64 = 1_792_281_600_000;

#[derive(Clone, Default)]
pub struct ManualClock(Rc<Cell<i64>>);

impl ManualClock {
    pub fn at(ms: i64) -> Self {
        Self(Rc::new(Cell::new(ms)))
    }
    pub fn advance_ms(&self, ms: i64) {
        self.0.set(self.0.get() + ms);
    }
    pub fn now(&self) -> i64 {
        self.0.get()
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.0.get()
    }
}

struct TickSlot {
    tick: Option<Box<dyn FnMut()>>,
    live: bool,
}

/// Ticker fired by hand. Handles are slot indices.
#[derive(Clone, Default)]
pub struct ManualTicker {
    slots: Rc<RefCell<Vec<TickSlot>>>,
}

impl ManualTicker {
    pub fn live(&self) -> usize {
        self.slots.borrow().iter().filter(|s| s.live).count()
    }

    /// Run every live tick once.
    pub fn fire(&self) {
        let count = self.slots.borrow().len();
        for i in 0..count {
            let tick = {
                let mut slots = self.slots.borrow_mut();
                if !slots[i].live {
                    continue;
                }
                slots[i].tick.take()
            };
            if let Some(mut tick) = tick {
                tick();
                let mut slots = self.slots.borrow_mut();
                if slots[i].live {
                    slots[i].tick = Some(tick);
                }
            }
        }
    }
}

impl Ticker for ManualTicker {
    type Handle = usize;

    fn every(&mut self, _period_ms: u32, tick: Box<dyn FnMut()>) -> usize {
        let mut slots = self.slots.borrow_mut();
        slots.push(TickSlot {
            tick: Some(tick),
            live: true,
        });
        slots.len() - 1
    }

    fn cancel(&mut self, handle: usize) {
        if let Some(slot) = self.slots.borrow_mut().get_mut(handle) {
            slot.live = false;
            slot.tick = None;
        }
    }
}

#[derive(Default, Debug)]
pub struct DisplayLog {
    pub units: Vec<(Unit, String)>,
    pub completed: Vec<bool>,
}

#[derive(Clone, Default)]
pub struct RecordingDisplay(pub Rc<RefCell<DisplayLog>>);

impl DisplaySink for RecordingDisplay {
    fn show_unit(&mut self, unit: Unit, text: &str) {
        self.0.borrow_mut().units.push((unit, text.to_string()));
    }
    fn show_completed(&mut self, completed: bool) {
        self.0.borrow_mut().completed.push(completed);
    }
}

#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct SurfaceLog {
    pub clears: u32,
    pub fills: u32,
    pub strokes: u32,
    pub frames: u32,
}

#[derive(Clone)]
pub struct RecordingSurface {
    pub log: Rc<RefCell<SurfaceLog>>,
    pub size: Size,
}

impl RecordingSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            log: Rc::default(),
            size: Size { width, height },
        }
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> Size {
        self.size
    }
    fn clear(&mut self) {
        self.log.borrow_mut().clears += 1;
    }
    fn fill_circle(&mut self, _x: f64, _y: f64, _r: f64, _a: f64) {
        self.log.borrow_mut().fills += 1;
    }
    fn stroke_circle(&mut self, _x: f64, _y: f64, _r: f64, _a: f64) {
        self.log.borrow_mut().strokes += 1;
    }
    fn end_frame(&mut self) {
        self.log.borrow_mut().frames += 1;
    }
}

type FrameTask = Box<dyn FnMut(f64) -> bool>;

/// Frame driver pumped by hand; records how often `run` was called.
#[derive(Clone, Default)]
pub struct ManualFrames {
    tasks: Rc<RefCell<Vec<Option<FrameTask>>>>,
    runs: Rc<Cell<u32>>,
}

impl ManualFrames {
    pub fn runs(&self) -> u32 {
        self.runs.get()
    }

    pub fn active(&self) -> usize {
        self.tasks.borrow().iter().filter(|t| t.is_some()).count()
    }

    /// Deliver one frame at `ts` to every active task.
    pub fn pump(&self, ts: f64) {
        let count = self.tasks.borrow().len();
        for i in 0..count {
            let task = self.tasks.borrow_mut()[i].take();
            if let Some(mut task) = task {
                if task(ts) {
                    let mut tasks = self.tasks.borrow_mut();
                    if tasks[i].is_none() {
                        tasks[i] = Some(task);
                    }
                }
            }
        }
    }
}

impl FrameDriver for ManualFrames {
    fn now(&self) -> f64 {
        0.0
    }

    fn run(&mut self, frame: FrameTask) -> StopHandle {
        self.runs.set(self.runs.get() + 1);
        let index = {
            let mut tasks = self.tasks.borrow_mut();
            tasks.push(Some(frame));
            tasks.len() - 1
        };
        let tasks = self.tasks.clone();
        StopHandle::new(move || {
            tasks.borrow_mut()[index] = None;
        })
    }
}

pub struct Harness {
    pub engine: CountdownEngine<ManualTicker>,
    pub clock: ManualClock,
    pub ticker: ManualTicker,
    pub display: RecordingDisplay,
    pub frames: ManualFrames,
    pub surface: Rc<RefCell<SurfaceLog>>,
    pub store: MemoryStore,
}

impl Harness {
    pub fn new(now_ms: i64, stored_target: Option<&str>, reduced_motion: bool) -> Self {
        let config = WidgetConfig::default();
        let mut store = MemoryStore::new();
        if let Some(target) = stored_target {
            store.set(&config.target_key, target);
        }
        let clock = ManualClock::at(now_ms);
        let ticker = ManualTicker::default();
        let display = RecordingDisplay::default();
        let frames = ManualFrames::default();
        let surface = RecordingSurface::new(600.0, 400.0);
        let surface_log = surface.log.clone();
        let effect = CelebrationEffect::new(surface, frames.clone(), reduced_motion, &config)
            .with_seed(11);
        let engine = CountdownEngine::new(
            TimeSource::new(Box::new(store.clone()), &config),
            Box::new(clock.clone()),
            Box::new(display.clone()),
            Box::new(effect),
            ticker.clone(),
            config.tick_period_ms,
        );
        Self {
            engine,
            clock,
            ticker,
            display,
            frames,
            surface: surface_log,
            store,
        }
    }

    /// Advance the clock by one period and fire the tick.
    pub fn tick_after(&self, ms: i64) {
        self.clock.advance_ms(ms);
        self.ticker.fire();
    }

    pub fn last_completed(&self) -> Option<bool> {
        self.display.0.borrow().completed.last().copied()
    }
}

/// ISO string `secs` seconds after `now_ms`.
pub fn iso_after(now_ms: i64, secs: i64) -> String {
    let t = chrono::DateTime::from_timestamp_millis(now_ms + secs * 1000).unwrap();
    t.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}
