// Overlay canvas: a `Surface` over a 2D context scaled for devicePixelRatio.

use std::f64::consts::TAU;

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, Window};

use crate::celebration::{Size, Surface};
use crate::error::WidgetError;

const PARTICLE_FILL: &str = "rgba(255, 215, 160, 0.8)";
const RING_STROKE: &str = "rgba(215, 161, 74, 0.7)";
const RING_LINE_WIDTH: f64 = 2.0;

pub struct CanvasSurface {
    window: Window,
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(window: Window, canvas: HtmlCanvasElement) -> Result<Self, WidgetError> {
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| WidgetError::Canvas("2d context unavailable".to_string()))?
            .dyn_into()
            .map_err(|_| WidgetError::Canvas("not a 2d context".to_string()))?;
        let surface = Self {
            window,
            canvas,
            ctx,
        };
        surface.resize();
        Ok(surface)
    }

    /// Match the backing store to the viewport at device resolution and
    /// rescale the transform so drawing stays in CSS pixels.
    pub fn resize(&self) {
        let Size { width, height } = viewport(&self.window);
        let ratio = match self.window.device_pixel_ratio() {
            r if r > 0.0 => r,
            _ => 1.0,
        };
        self.canvas.set_width((width * ratio) as u32);
        self.canvas.set_height((height * ratio) as u32);
        let style = self.canvas.style();
        let _ = style.set_property("width", &format!("{width}px"));
        let _ = style.set_property("height", &format!("{height}px"));
        if self.ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0).is_err()
            || self.ctx.scale(ratio, ratio).is_err()
        {
            tracing::warn!(ratio, "could not rescale canvas transform");
        }
    }

    fn circle(&self, x: f64, y: f64, radius: f64, alpha: f64) -> bool {
        self.ctx.set_global_alpha(alpha.clamp(0.0, 1.0));
        self.ctx.begin_path();
        self.ctx.arc(x, y, radius.max(0.0), 0.0, TAU).is_ok()
    }
}

impl Surface for CanvasSurface {
    fn size(&self) -> Size {
        viewport(&self.window)
    }

    fn clear(&mut self) {
        let Size { width, height } = viewport(&self.window);
        self.ctx.clear_rect(0.0, 0.0, width, height);
    }

    fn fill_circle(&mut self, x: f64, y: f64, radius: f64, alpha: f64) {
        self.ctx.set_fill_style_str(PARTICLE_FILL);
        if self.circle(x, y, radius, alpha) {
            self.ctx.fill();
        }
    }

    fn stroke_circle(&mut self, x: f64, y: f64, radius: f64, alpha: f64) {
        self.ctx.set_stroke_style_str(RING_STROKE);
        self.ctx.set_line_width(RING_LINE_WIDTH);
        if self.circle(x, y, radius, alpha) {
            self.ctx.stroke();
        }
    }

    fn end_frame(&mut self) {
        self.ctx.set_global_alpha(1.0);
    }
}

/// Viewport size in CSS pixels; zero when the window reports nothing usable.
pub fn viewport(window: &Window) -> Size {
    let dim = |v: Result<wasm_bindgen::JsValue, wasm_bindgen::JsValue>| {
        v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0)
    };
    Size {
        width: dim(window.inner_width()),
        height: dim(window.inner_height()),
    }
}
