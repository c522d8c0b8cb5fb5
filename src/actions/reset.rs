use streamdeck_lib::prelude::*;

use step_counter::store::CounterStore;

use crate::render::render_label;
use crate::session;

const LABEL: &str = "0";

/// Zeroes the count, keeping the step.
#[derive(Default)]
pub struct ResetAction;

impl ActionStatic for ResetAction {
    const ID: &'static str = super::ids::RESET;
}

impl Action for ResetAction {
    fn id(&self) -> &str {
        Self::ID
    }

    fn init(&mut self, cx: &Context, ctx_id: &str) {
        render_label(cx, ctx_id, LABEL);
    }

    fn key_up(&mut self, cx: &Context, _ev: &incoming::KeyUp) {
        session::with_store(cx, CounterStore::reset);
    }
}
