// Browser time sources: wall clock, the 1 s interval and the rAF loop.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo_timers::callback::Interval;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::Window;

use crate::celebration::FrameDriver;
use crate::countdown::{Clock, StopHandle, Ticker};

/// `Date.now()`.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        js_sys::Date::now() as i64
    }
}

/// `setInterval` via gloo; dropping the handle clears the interval.
#[derive(Debug, Default)]
pub struct IntervalTicker;

impl Ticker for IntervalTicker {
    type Handle = Interval;

    fn every(&mut self, period_ms: u32, mut tick: Box<dyn FnMut()>) -> Interval {
        Interval::new(period_ms, move || tick())
    }

    fn cancel(&mut self, handle: Interval) {
        drop(handle);
    }
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// `requestAnimationFrame` chain. One closure re-requests itself each frame;
/// stopping cancels the pending request and drops the closure, which also
/// breaks the closure's reference to itself.
pub struct RafDriver {
    window: Window,
}

impl RafDriver {
    pub fn new(window: Window) -> Self {
        Self { window }
    }
}

impl FrameDriver for RafDriver {
    fn now(&self) -> f64 {
        self.window.performance().map(|p| p.now()).unwrap_or(0.0)
    }

    fn run(&mut self, mut frame: Box<dyn FnMut(f64) -> bool>) -> StopHandle {
        let f: FrameCallback = Rc::new(RefCell::new(None));
        let pending: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));

        let g = f.clone();
        let pending_in_frame = pending.clone();
        let win = self.window.clone();
        *f.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
            pending_in_frame.set(None);
            if !frame(ts) {
                return;
            }
            if let Some(cb) = g.borrow().as_ref() {
                if let Ok(id) = win.request_animation_frame(cb.as_ref().unchecked_ref()) {
                    pending_in_frame.set(Some(id));
                }
            }
        }) as Box<dyn FnMut(f64)>));

        if let Some(cb) = f.borrow().as_ref() {
            match self.window.request_animation_frame(cb.as_ref().unchecked_ref()) {
                Ok(id) => pending.set(Some(id)),
                Err(_) => tracing::warn!("requestAnimationFrame rejected, no frames will run"),
            }
        }

        let win = self.window.clone();
        StopHandle::new(move || {
            if let Some(id) = pending.take() {
                let _ = win.cancel_animation_frame(id);
            }
            f.borrow_mut().take();
        })
    }
}

/// `(prefers-reduced-motion: reduce)`, sampled once.
pub fn prefers_reduced_motion(window: &Window) -> bool {
    matches!(
        window.match_media("(prefers-reduced-motion: reduce)"),
        Ok(Some(mql)) if mql.matches()
    )
}
