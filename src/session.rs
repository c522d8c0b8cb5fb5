//! The plugin's one counter.
//!
//! Stream Deck builds every action instance through `Default`, so the keys
//! reach the shared [`CounterStore`] through this module. The store is opened
//! on the first settings event or key press, by which time the host has
//! delivered the global settings. From then on every change is written back
//! to the globals and forwarded to the plugin bus so every key re-renders.

use std::sync::{Mutex, OnceLock, PoisonError};

use streamdeck_lib::Context;
use tracing::info;

use step_counter::state::{GlobalSettings, open_persisted};
use step_counter::store::{CounterState, CounterStore};

use crate::topics::STATE_CHANGED;

static STORE: OnceLock<Mutex<CounterStore>> = OnceLock::new();

fn open(cx: &Context) -> CounterStore {
    let mut store = open_persisted(GlobalSettings::new(cx));
    info!(count = store.count(), step = store.step(), "counter loaded");

    // Handlers of STATE_CHANGED render from the payload and must not call
    // back into this module: the store lock is held while publishing.
    let bus_cx = cx.clone();
    store.subscribe(move |state| bus_cx.bus().publish_t(STATE_CHANGED, state));
    store
}

/// Run `f` against the shared store, opening it on first use.
pub fn with_store<R>(cx: &Context, f: impl FnOnce(&mut CounterStore) -> R) -> R {
    let store = STORE.get_or_init(|| Mutex::new(open(cx)));
    let mut guard = store.lock().unwrap_or_else(PoisonError::into_inner);
    f(&mut guard)
}

pub fn snapshot(cx: &Context) -> CounterState {
    with_store(cx, |store| store.state())
}

/// Current state if the store is already open. Never loads the globals.
pub fn peek() -> Option<CounterState> {
    STORE
        .get()
        .map(|store| store.lock().unwrap_or_else(PoisonError::into_inner).state())
}
