// Display strings around the countdown: target/zone labels, the settings
// form value and the share message.

use chrono::{DateTime, Local, Utc};
use chrono_tz::Tz;

use crate::config::LOCAL_TIMEZONE;

const LABEL_FORMAT: &str = "%Y年%-m月%-d日 %H:%M";
const INPUT_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Target rendered in the selected zone, e.g. `2025年2月10日 00:00`.
///
/// `local` uses the viewer's zone; an unknown zone name falls back to
/// `fallback_zone`, and then to UTC.
pub fn target_label(target: &DateTime<Utc>, selector: &str, fallback_zone: &str) -> String {
    if selector == LOCAL_TIMEZONE {
        return target.with_timezone(&Local).format(LABEL_FORMAT).to_string();
    }
    match selector.parse::<Tz>().or_else(|_| fallback_zone.parse::<Tz>()) {
        Ok(tz) => target.with_timezone(&tz).format(LABEL_FORMAT).to_string(),
        Err(_) => {
            tracing::warn!(selector, "unknown timezone, labelling in UTC");
            target.format(LABEL_FORMAT).to_string()
        }
    }
}

pub fn zone_label(selector: &str) -> String {
    if selector == LOCAL_TIMEZONE {
        "本地时区".to_string()
    } else {
        selector.to_string()
    }
}

/// Value for an `<input type="datetime-local">`, in the viewer's zone.
pub fn local_input_value(target: &DateTime<Utc>) -> String {
    target.with_timezone(&Local).format(INPUT_FORMAT).to_string()
}

/// Shareable text built from the digits currently on screen.
pub fn share_message(days: &str, hours: &str, minutes: &str, seconds: &str, url: &str) -> String {
    format!("新春倒计时：还剩 {days}天{hours}小时{minutes}分{seconds}秒，一起等年味～ {url}")
}
