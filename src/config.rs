//! Compiled-in defaults and tunables for the widget.
//!
//! Everything the widget falls back to lives here: the default target instant,
//! the default display zone, the two localStorage keys and the animation knobs.
//! With the `serde` feature a partial JSON object can override any field.

/// Sentinel timezone selector meaning "format in the viewer's own zone".
pub const LOCAL_TIMEZONE: &str = "local";

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WidgetConfig {
    /// Countdown target used when nothing (or garbage) is stored.
    pub default_target: String,
    /// IANA zone name used for labels when nothing is stored.
    pub default_timezone: String,
    pub target_key: String,
    pub timezone_key: String,
    pub tick_period_ms: u32,
    /// Delay before a flipped digit is committed to `.current`.
    pub flip_delay_ms: u32,
    pub max_particles: usize,
    /// One particle per this many CSS pixels of viewport width.
    pub particle_width_divisor: f64,
    pub ring_count: usize,
    pub headline_counting: String,
    pub headline_completed: String,
    pub subtitles: Vec<String>,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            default_target: "2025-02-10T00:00:00+08:00".to_string(),
            default_timezone: "Asia/Shanghai".to_string(),
            target_key: "cny_target".to_string(),
            timezone_key: "cny_timezone".to_string(),
            tick_period_ms: 1000,
            flip_delay_ms: 420,
            max_particles: 220,
            particle_width_divisor: 3.0,
            ring_count: 6,
            headline_counting: "新春倒计时".to_string(),
            headline_completed: "春节快乐".to_string(),
            subtitles: vec![
                "灯火可亲，年味将至".to_string(),
                "万事顺意，向新而行".to_string(),
                "人间烟火处，最是团圆时".to_string(),
            ],
        }
    }
}

impl WidgetConfig {
    /// Parse a (possibly partial) JSON override; missing fields keep defaults.
    #[cfg(feature = "serde_json")]
    pub fn from_json(json: &str) -> Result<Self, crate::error::WidgetError> {
        serde_json::from_str(json).map_err(|e| crate::error::WidgetError::Config(e.to_string()))
    }

    /// Number of falling particles for a viewport of the given CSS width.
    pub fn particle_count(&self, viewport_width: f64) -> usize {
        particle_budget(viewport_width, self.particle_width_divisor, self.max_particles)
    }
}

/// One particle per `divisor` CSS pixels of width, capped at `max`.
pub fn particle_budget(viewport_width: f64, divisor: f64, max: usize) -> usize {
    if divisor <= 0.0 || viewport_width <= 0.0 {
        return 0;
    }
    ((viewport_width / divisor).floor() as usize).min(max)
}
