// Share action: copy the countdown text and page URL to the clipboard,
// falling back to a manual-copy prompt.

use js_sys::{Function, Promise, Reflect};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, Window};

use crate::countdown::Unit;
use crate::format::share_message;

use super::dom::displayed_unit;

const COPIED_NOTICE: &str = "已复制倒计时与链接，快去分享吧！";
const MANUAL_COPY_PROMPT: &str = "复制以下内容分享：";

pub fn compose(window: &Window, doc: &Document) -> String {
    let url = window.location().href().unwrap_or_default();
    share_message(
        &displayed_unit(doc, Unit::Days),
        &displayed_unit(doc, Unit::Hours),
        &displayed_unit(doc, Unit::Minutes),
        &displayed_unit(doc, Unit::Seconds),
        &url,
    )
}

pub async fn share(window: Window, message: String) {
    match write_clipboard(&window, &message).await {
        Ok(()) => {
            let _ = window.alert_with_message(COPIED_NOTICE);
        }
        Err(err) => {
            tracing::debug!(?err, "clipboard write failed, prompting instead");
            let _ = window.prompt_with_message_and_default(MANUAL_COPY_PROMPT, &message);
        }
    }
}

// navigator.clipboard is looked up dynamically so insecure contexts, which
// lack it, land in the prompt fallback.
async fn write_clipboard(window: &Window, text: &str) -> Result<(), JsValue> {
    let clipboard = Reflect::get(&window.navigator(), &JsValue::from_str("clipboard"))?;
    if clipboard.is_undefined() || clipboard.is_null() {
        return Err(JsValue::from_str("clipboard unavailable"));
    }
    let write: Function = Reflect::get(&clipboard, &JsValue::from_str("writeText"))?.dyn_into()?;
    let promise: Promise = write.call1(&clipboard, &JsValue::from_str(text))?.dyn_into()?;
    JsFuture::from(promise).await?;
    Ok(())
}
