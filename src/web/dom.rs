//! DOM side of the countdown: flip-digit groups, headline and reset button.
//!
//! Every node is optional. A page missing some of them still counts down;
//! the missing parts simply never update.

use std::collections::HashMap;

use gloo_timers::callback::Timeout;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, HtmlInputElement, HtmlSelectElement};

use crate::config::WidgetConfig;
use crate::countdown::{DisplaySink, Unit};

const FLIP_CLASS: &str = "flip";

/// One `.value[data-unit=…]` group with its `.current` / `.next` faces.
#[derive(Clone)]
struct DigitGroup {
    node: Element,
    current: Element,
    next: Element,
}

impl DigitGroup {
    fn find(doc: &Document, unit: Unit) -> Option<Self> {
        let node = doc
            .query_selector(&format!(".value[data-unit=\"{}\"]", unit.key()))
            .ok()
            .flatten()?;
        let current = node.query_selector(".current").ok().flatten()?;
        let next = node.query_selector(".next").ok().flatten()?;
        Some(Self {
            node,
            current,
            next,
        })
    }

    fn shown(&self) -> Option<String> {
        self.current.text_content()
    }

    /// Latest text handed to the group. `.current` trails it while a flip is
    /// pending; `.next` never does.
    fn staged(&self) -> Option<String> {
        self.next.text_content()
    }
}

pub struct DomDisplay {
    groups: HashMap<Unit, DigitGroup>,
    headline: Option<Element>,
    reset_button: Option<HtmlElement>,
    reduced_motion: bool,
    flip_delay_ms: u32,
    headline_counting: String,
    headline_completed: String,
}

impl DomDisplay {
    pub fn new(doc: &Document, config: &WidgetConfig, reduced_motion: bool) -> Self {
        let groups: HashMap<Unit, DigitGroup> = Unit::ALL
            .into_iter()
            .filter_map(|unit| DigitGroup::find(doc, unit).map(|g| (unit, g)))
            .collect();
        if groups.len() < Unit::ALL.len() {
            tracing::warn!(found = groups.len(), "some digit groups are missing");
        }
        Self {
            groups,
            headline: doc.query_selector("h1").ok().flatten(),
            reset_button: by_id::<HtmlElement>(doc, "reset-button"),
            reduced_motion,
            flip_delay_ms: config.flip_delay_ms,
            headline_counting: config.headline_counting.clone(),
            headline_completed: config.headline_completed.clone(),
        }
    }

    pub fn set_headline(&self, completed: bool) {
        if let Some(h1) = &self.headline {
            let text = if completed {
                &self.headline_completed
            } else {
                &self.headline_counting
            };
            h1.set_text_content(Some(text));
        }
    }
}

impl DisplaySink for DomDisplay {
    fn show_unit(&mut self, unit: Unit, text: &str) {
        let Some(group) = self.groups.get(&unit) else {
            return;
        };
        if group.staged().as_deref() == Some(text) {
            return;
        }
        if self.reduced_motion {
            group.current.set_text_content(Some(text));
            group.next.set_text_content(Some(text));
            return;
        }
        group.next.set_text_content(Some(text));
        let _ = group.node.class_list().add_1(FLIP_CLASS);
        let group = group.clone();
        let text = text.to_string();
        Timeout::new(self.flip_delay_ms, move || {
            group.current.set_text_content(Some(&text));
            let _ = group.node.class_list().remove_1(FLIP_CLASS);
        })
        .forget();
    }

    fn show_completed(&mut self, completed: bool) {
        self.set_headline(completed);
        if let Some(button) = &self.reset_button {
            button.set_hidden(!completed);
        }
    }
}

/// Currently displayed text of a unit, for the share message.
pub fn displayed_unit(doc: &Document, unit: Unit) -> String {
    DigitGroup::find(doc, unit)
        .and_then(|g| g.shown())
        .unwrap_or_else(|| unit.format(0))
}

pub fn by_id<T: JsCast>(doc: &Document, id: &str) -> Option<T> {
    doc.get_element_by_id(id).and_then(|el| el.dyn_into::<T>().ok())
}

pub fn set_text(el: Option<&Element>, text: &str) {
    if let Some(el) = el {
        el.set_text_content(Some(text));
    }
}

/// Value of an `<input>` or `<select>`.
pub fn field_value(el: &Element) -> Option<String> {
    if let Some(input) = el.dyn_ref::<HtmlInputElement>() {
        return Some(input.value());
    }
    el.dyn_ref::<HtmlSelectElement>().map(|select| select.value())
}

pub fn set_field_value(el: &Element, value: &str) {
    if let Some(input) = el.dyn_ref::<HtmlInputElement>() {
        input.set_value(value);
    } else if let Some(select) = el.dyn_ref::<HtmlSelectElement>() {
        select.set_value(value);
    }
}
