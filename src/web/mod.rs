//! Browser host: binds the countdown engine and celebration overlay to the page.
//!
//! The mounted widget lives in a thread-local, the same way the page's event
//! listeners reach it. Listener closures are leaked (`forget`) for the page's
//! lifetime; every one of them goes through [`with_widget`] and is a no-op
//! after [`unmount`].

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use rand::seq::SliceRandom;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlCanvasElement, Window};

use crate::celebration::CelebrationEffect;
use crate::config::WidgetConfig;
use crate::countdown::{Celebration, CountdownEngine, StopHandle};
use crate::error::WidgetError;
use crate::format::{local_input_value, target_label, zone_label};
use crate::storage::{BrowserStorage, KeyValueStore, MemoryStore};
use crate::time_source::TimeSource;

pub mod canvas;
pub mod dom;
pub mod share;
pub mod timers;

use canvas::CanvasSurface;
use dom::{DomDisplay, by_id, field_value, set_field_value, set_text};
use timers::{IntervalTicker, RafDriver, SystemClock, prefers_reduced_motion};

const SUBTITLE_ID: &str = "subtitle";
const SETTINGS_ID: &str = "settings";
const SETTINGS_TOGGLE_ID: &str = "settings-toggle";
const SETTINGS_CLOSE_ID: &str = "settings-close";
const TARGET_INPUT_ID: &str = "target-input";
const TIMEZONE_INPUT_ID: &str = "timezone-input";
const SAVE_BUTTON_ID: &str = "save-button";
const TARGET_DISPLAY_ID: &str = "target-display";
const TIMEZONE_DISPLAY_ID: &str = "timezone-display";
const SHARE_BUTTON_ID: &str = "share-button";
const RESET_BUTTON_ID: &str = "reset-button";
const CANVAS_ID: &str = "celebration-canvas";

const ACTIVE_CLASS: &str = "active";

/// Celebration stand-in when the page has no usable overlay canvas.
struct NoSurface;

impl Celebration for NoSurface {
    fn start(&mut self) -> StopHandle {
        StopHandle::noop()
    }
}

struct SettingsPanel {
    root: Option<Element>,
    target_input: Option<Element>,
    timezone_input: Option<Element>,
    target_display: Option<Element>,
    timezone_display: Option<Element>,
    subtitle: Option<Element>,
}

impl SettingsPanel {
    fn find(doc: &Document) -> Self {
        Self {
            root: doc.get_element_by_id(SETTINGS_ID),
            target_input: doc.get_element_by_id(TARGET_INPUT_ID),
            timezone_input: doc.get_element_by_id(TIMEZONE_INPUT_ID),
            target_display: doc.get_element_by_id(TARGET_DISPLAY_ID),
            timezone_display: doc.get_element_by_id(TIMEZONE_DISPLAY_ID),
            subtitle: doc.get_element_by_id(SUBTITLE_ID),
        }
    }
}

struct Widget {
    window: Window,
    doc: Document,
    config: WidgetConfig,
    engine: CountdownEngine<IntervalTicker>,
    panel: SettingsPanel,
    overlay: Option<CanvasHandle>,
}

impl Widget {
    fn sync_labels(&self) {
        let zone = self.engine.current_timezone();
        let target = self.engine.current_target();
        set_text(
            self.panel.target_display.as_ref(),
            &target_label(&target, &zone, &self.config.default_timezone),
        );
        set_text(self.panel.timezone_display.as_ref(), &zone_label(&zone));
    }

    fn sync_inputs(&self) {
        if let Some(input) = &self.panel.target_input {
            set_field_value(input, &local_input_value(&self.engine.current_target()));
        }
        if let Some(input) = &self.panel.timezone_input {
            set_field_value(input, &self.engine.current_timezone());
        }
    }

    fn set_subtitle(&self) {
        let mut rng = rand::thread_rng();
        if let Some(line) = self.config.subtitles.choose(&mut rng) {
            set_text(self.panel.subtitle.as_ref(), line);
        }
    }

    fn open_settings(&mut self) {
        self.sync_inputs();
        if let Some(root) = &self.panel.root {
            let _ = root.class_list().add_1(ACTIVE_CLASS);
            let _ = root.set_attribute("aria-hidden", "false");
        }
    }

    fn close_settings(&mut self) {
        if let Some(root) = &self.panel.root {
            let _ = root.class_list().remove_1(ACTIVE_CLASS);
            let _ = root.set_attribute("aria-hidden", "true");
        }
    }

    fn save_settings(&mut self) {
        let target = self.panel.target_input.as_ref().and_then(field_value);
        let zone = self
            .panel
            .timezone_input
            .as_ref()
            .and_then(field_value)
            .unwrap_or_else(|| self.engine.current_timezone());
        self.engine.save_settings(target.as_deref(), &zone);
        self.sync_labels();
        self.close_settings();
    }

    fn reset(&mut self) {
        self.engine.reset();
        self.sync_labels();
        self.set_subtitle();
    }

    fn resize_overlay(&mut self) {
        if let Some(surface) = &self.overlay {
            surface.borrow().resize();
        }
    }

    fn share(&mut self) {
        let message = share::compose(&self.window, &self.doc);
        wasm_bindgen_futures::spawn_local(share::share(self.window.clone(), message));
    }
}

thread_local! {
    static WIDGET: RefCell<Option<Widget>> = const { RefCell::new(None) };
    // Listeners outlive unmount; a remount must not wire them twice.
    static WIRED: Cell<bool> = const { Cell::new(false) };
}

fn with_widget(action: impl FnOnce(&mut Widget)) {
    WIDGET.with(|cell| {
        if let Some(widget) = cell.borrow_mut().as_mut() {
            action(widget);
        }
    });
}

/// Build the widget from the page and start counting.
pub fn mount(config: WidgetConfig) -> Result<(), WidgetError> {
    if WIDGET.with(|cell| cell.borrow().is_some()) {
        tracing::warn!("countdown already mounted");
        return Ok(());
    }
    let window = web_sys::window().ok_or(WidgetError::NoWindow)?;
    let doc = window.document().ok_or(WidgetError::NoDocument)?;
    let reduced_motion = prefers_reduced_motion(&window);

    let store: Box<dyn KeyValueStore> = match BrowserStorage::open(&window) {
        Some(storage) => Box::new(storage),
        None => Box::new(MemoryStore::new()),
    };
    let source = TimeSource::new(store, &config);
    let display = DomDisplay::new(&doc, &config, reduced_motion);
    let (celebration, overlay) = build_celebration(&window, &doc, &config, reduced_motion);
    let engine = CountdownEngine::new(
        source,
        Box::new(SystemClock),
        Box::new(display),
        celebration,
        IntervalTicker,
        config.tick_period_ms,
    );

    let widget = Widget {
        window: window.clone(),
        doc: doc.clone(),
        config,
        engine,
        panel: SettingsPanel::find(&doc),
        overlay,
    };
    widget.set_subtitle();
    widget.sync_labels();
    widget.sync_inputs();
    let backdrop = widget.panel.root.clone();
    WIDGET.with(|cell| cell.replace(Some(widget)));

    if !WIRED.with(|wired| wired.replace(true)) {
        on_click(&doc, SETTINGS_TOGGLE_ID, Widget::open_settings)?;
        on_click(&doc, SETTINGS_CLOSE_ID, Widget::close_settings)?;
        on_click(&doc, SAVE_BUTTON_ID, Widget::save_settings)?;
        on_click(&doc, SHARE_BUTTON_ID, Widget::share)?;
        on_click(&doc, RESET_BUTTON_ID, Widget::reset)?;
        if let Some(root) = backdrop {
            on_backdrop_click(&root)?;
        }
        on_resize(&window)?;
    }

    with_widget(|widget| widget.engine.start());
    tracing::info!(reduced_motion, "countdown mounted");
    Ok(())
}

/// Stop ticking and the celebration, and detach the widget from listeners.
pub fn unmount() {
    let widget = WIDGET.with(|cell| cell.borrow_mut().take());
    if let Some(mut widget) = widget {
        widget.engine.stop();
        tracing::info!("countdown unmounted");
    }
}

type CanvasHandle = Rc<RefCell<CanvasSurface>>;

fn build_celebration(
    window: &Window,
    doc: &Document,
    config: &WidgetConfig,
    reduced_motion: bool,
) -> (Box<dyn Celebration>, Option<CanvasHandle>) {
    let Some(canvas) = by_id::<HtmlCanvasElement>(doc, CANVAS_ID) else {
        let err = WidgetError::MissingElement(CANVAS_ID.to_string());
        tracing::warn!(%err, "celebration disabled");
        return (Box::new(NoSurface), None);
    };
    match CanvasSurface::new(window.clone(), canvas) {
        Ok(surface) => {
            let effect = CelebrationEffect::new(
                surface,
                RafDriver::new(window.clone()),
                reduced_motion,
                config,
            );
            let handle = effect.surface();
            (Box::new(effect), Some(handle))
        }
        Err(err) => {
            tracing::warn!(%err, "celebration disabled");
            (Box::new(NoSurface), None)
        }
    }
}

fn on_click(doc: &Document, id: &str, action: fn(&mut Widget)) -> Result<(), WidgetError> {
    let Some(el) = doc.get_element_by_id(id) else {
        tracing::debug!(id, "control missing, not wired");
        return Ok(());
    };
    let closure = Closure::wrap(Box::new(move |_evt: web_sys::MouseEvent| {
        with_widget(action);
    }) as Box<dyn FnMut(_)>);
    el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

// Clicks on the dimmed backdrop itself (not the dialog inside) close settings.
fn on_backdrop_click(root: &Element) -> Result<(), WidgetError> {
    let backdrop: web_sys::EventTarget = root.clone().into();
    let closure = Closure::wrap(Box::new(move |evt: web_sys::MouseEvent| {
        if evt.target().as_ref() == Some(&backdrop) {
            with_widget(Widget::close_settings);
        }
    }) as Box<dyn FnMut(_)>);
    root.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn on_resize(window: &Window) -> Result<(), WidgetError> {
    let closure = Closure::wrap(Box::new(move |_evt: web_sys::Event| {
        with_widget(Widget::resize_overlay);
    }) as Box<dyn FnMut(_)>);
    window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}
