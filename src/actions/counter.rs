use std::time::Duration;

use serde_json::{Map, Value};
use streamdeck_lib::prelude::*;

use step_counter::store::CounterStore;

use super::press::LongPress;
use super::{DEFAULT_LONG_PRESS_MS, MODE, Mode, adopt_mode, get_u64};
use crate::render::render_number;
use crate::session;
use crate::topics::STATE_CHANGED;

/// Shows the count. Short press counts, long press resets.
pub struct CounterAction {
    press: LongPress,
    hold: Duration,
}

impl Default for CounterAction {
    fn default() -> Self {
        Self {
            press: LongPress::default(),
            hold: Duration::from_millis(DEFAULT_LONG_PRESS_MS),
        }
    }
}

impl ActionStatic for CounterAction {
    const ID: &'static str = super::ids::COUNTER;
}

impl Action for CounterAction {
    fn id(&self) -> &str {
        Self::ID
    }

    fn topics(&self) -> &'static [&'static str] {
        &[STATE_CHANGED.name]
    }

    fn init(&mut self, cx: &Context, ctx_id: &str) {
        if let Some(state) = session::peek() {
            render_number(cx, ctx_id, state.count);
        }
        cx.sd().get_settings(ctx_id);
    }

    fn did_receive_settings(&mut self, cx: &Context, ev: &incoming::DidReceiveSettings) {
        self.hold = parse_hold(&ev.settings);
        adopt_mode(cx, &ev.settings);
        render_number(cx, ev.context, session::snapshot(cx).count);
    }

    fn key_down(&mut self, cx: &Context, _ev: &incoming::KeyDown) {
        let cx2 = cx.clone();
        self.press.begin(self.hold, move || {
            session::with_store(&cx2, CounterStore::reset);
        });
    }

    fn key_up(&mut self, cx: &Context, _ev: &incoming::KeyUp) {
        if self.press.end() {
            let mode = MODE.get();
            session::with_store(cx, |store| press(store, mode));
        }
    }

    fn on_notify(&mut self, cx: &Context, ctx_id: &str, event: &ErasedTopic) {
        if let Some(state) = event.downcast(STATE_CHANGED) {
            render_number(cx, ctx_id, state.count);
        }
    }
}

/// Short-press operation for the plugin's mode.
fn press(store: &mut CounterStore, mode: Mode) {
    match mode {
        Mode::Step => store.add_step(),
        Mode::Unit => store.increment(),
    }
}

fn parse_hold(v: &Map<String, Value>) -> Duration {
    Duration::from_millis(get_u64(v, "longPressMs").unwrap_or(DEFAULT_LONG_PRESS_MS))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use step_counter::store::CounterState;

    #[test]
    fn press_follows_mode() {
        let mut store = CounterStore::with_state(10, -4);
        press(&mut store, Mode::Step);
        assert_eq!(store.state(), CounterState::new(6, -4));
        press(&mut store, Mode::Unit);
        assert_eq!(store.state(), CounterState::new(7, -4));
    }

    #[test]
    fn hold_time_falls_back_to_default() {
        assert_eq!(parse_hold(&Map::new()), Duration::from_millis(500));

        let v = json!({ "longPressMs": "900" });
        assert_eq!(parse_hold(v.as_object().unwrap()), Duration::from_millis(900));
    }
}
