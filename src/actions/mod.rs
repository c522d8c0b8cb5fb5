pub mod counter;
pub mod direction;
pub mod press;
pub mod reset;

use std::sync::atomic::{AtomicBool, Ordering};

use serde::Deserialize;
use serde_json::{Map, Value};
use streamdeck_lib::Context;
use tracing::info;

use crate::session;
use crate::topics::STATE_CHANGED;

pub mod ids {
    use crate::PLUGIN_ID;

    pub const COUNTER: &str = const_format::concatcp!(PLUGIN_ID, ".counter");
    pub const DIRECTION: &str = const_format::concatcp!(PLUGIN_ID, ".direction");
    pub const RESET: &str = const_format::concatcp!(PLUGIN_ID, ".reset");
}

/// Which set of store operations the keys drive.
///
/// `Step` presses add the signed step and the direction key flips its sign.
/// `Unit` presses add one and the direction key subtracts one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Step,
    Unit,
}

/// One mode for the whole plugin, so the counter and direction keys of a
/// deck always drive the same variant. The key configured last wins.
pub struct SharedMode(AtomicBool);

impl SharedMode {
    pub const fn new() -> Self {
        Self(AtomicBool::new(false))
    }

    pub fn get(&self) -> Mode {
        if self.0.load(Ordering::SeqCst) { Mode::Unit } else { Mode::Step }
    }

    /// Returns true when the mode changed.
    pub fn set(&self, mode: Mode) -> bool {
        let unit = mode == Mode::Unit;
        self.0.swap(unit, Ordering::SeqCst) != unit
    }
}

pub static MODE: SharedMode = SharedMode::new();

/// Adopt the `mode` from a key's settings, if it names one, and redraw every
/// key when it changes.
pub(crate) fn adopt_mode(cx: &Context, settings: &Map<String, Value>) {
    let Some(mode) = get_mode(settings) else {
        return;
    };
    if MODE.set(mode) {
        info!(?mode, "counter mode changed");
        cx.bus().publish_t(STATE_CHANGED, session::snapshot(cx));
    }
}

pub const DEFAULT_LONG_PRESS_MS: u64 = 500;

// ── Settings helpers ────────────────────────────────────────────────────────

pub(crate) fn get_mode(v: &Map<String, Value>) -> Option<Mode> {
    v.get("mode")
        .and_then(|m| serde_json::from_value(m.clone()).ok())
}

/// A non-negative integer given either as a JSON number or a numeric string.
pub(crate) fn get_u64(v: &Map<String, Value>, k: &str) -> Option<u64> {
    let value = v.get(k)?;
    value
        .as_u64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn settings(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn mode_is_read_only_when_named() {
        assert_eq!(get_mode(&Map::new()), None);
        assert_eq!(get_mode(&settings(json!({ "mode": "bogus" }))), None);
        assert_eq!(get_mode(&settings(json!({ "mode": "unit" }))), Some(Mode::Unit));
        assert_eq!(get_mode(&settings(json!({ "mode": "step" }))), Some(Mode::Step));
    }

    #[test]
    fn shared_mode_is_the_last_one_set() {
        let mode = SharedMode::new();
        assert_eq!(mode.get(), Mode::Step);
        assert!(mode.set(Mode::Unit));
        assert_eq!(mode.get(), Mode::Unit);
        assert!(!mode.set(Mode::Unit));
        assert!(mode.set(Mode::Step));
        assert_eq!(mode.get(), Mode::Step);
    }

    #[test]
    fn numbers_accept_numeric_strings() {
        let s = settings(json!({ "a": 750, "b": " 250 ", "c": "soon", "d": -1 }));
        assert_eq!(get_u64(&s, "a"), Some(750));
        assert_eq!(get_u64(&s, "b"), Some(250));
        assert_eq!(get_u64(&s, "c"), None);
        assert_eq!(get_u64(&s, "d"), None);
        assert_eq!(get_u64(&s, "missing"), None);
    }

    #[test]
    fn action_ids_share_the_plugin_prefix() {
        assert_eq!(ids::COUNTER, "de.lenidh.counter.counter");
        assert_eq!(ids::DIRECTION, "de.lenidh.counter.direction");
        assert_eq!(ids::RESET, "de.lenidh.counter.reset");
    }
}
