use streamdeck_lib::prelude::*;

use step_counter::store::CounterStore;

use super::{MODE, Mode, adopt_mode};
use crate::render::render_step;
use crate::session;
use crate::topics::STATE_CHANGED;

/// Shows which way the counter moves. In step mode a press flips the sign
/// of the step; in unit mode a press counts down by one.
#[derive(Default)]
pub struct DirectionAction;

impl ActionStatic for DirectionAction {
    const ID: &'static str = super::ids::DIRECTION;
}

impl Action for DirectionAction {
    fn id(&self) -> &str {
        Self::ID
    }

    fn topics(&self) -> &'static [&'static str] {
        &[STATE_CHANGED.name]
    }

    fn init(&mut self, cx: &Context, ctx_id: &str) {
        if let Some(state) = session::peek() {
            render_step(cx, ctx_id, label_step(MODE.get(), state.step));
        }
        cx.sd().get_settings(ctx_id);
    }

    fn did_receive_settings(&mut self, cx: &Context, ev: &incoming::DidReceiveSettings) {
        adopt_mode(cx, &ev.settings);
        let step = session::snapshot(cx).step;
        render_step(cx, ev.context, label_step(MODE.get(), step));
    }

    fn key_up(&mut self, cx: &Context, _ev: &incoming::KeyUp) {
        let mode = MODE.get();
        session::with_store(cx, |store| press(store, mode));
    }

    fn on_notify(&mut self, cx: &Context, ctx_id: &str, event: &ErasedTopic) {
        if let Some(state) = event.downcast(STATE_CHANGED) {
            render_step(cx, ctx_id, label_step(MODE.get(), state.step));
        }
    }
}

fn press(store: &mut CounterStore, mode: Mode) {
    match mode {
        Mode::Step => store.negate_step(),
        Mode::Unit => store.decrement(),
    }
}

/// The signed amount this key stands for.
fn label_step(mode: Mode, step: i64) -> i64 {
    match mode {
        Mode::Step => step,
        Mode::Unit => -1,
    }
}
