use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anyhow::{Result, anyhow};
use serde_json::{Map, Value};
use streamdeck_lib::Context;
use tracing::warn;

use crate::store::{CounterState, CounterStore, DEFAULT_COUNT, DEFAULT_STEP};

/// Key of the object holding both slots in the plugin's global settings.
const GLOBALS_KEY: &str = "counter";

/// The two persisted integers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Slot {
    Count,
    Step,
}

impl Slot {
    pub fn key(self) -> &'static str {
        match self {
            Slot::Count => "count",
            Slot::Step => "step",
        }
    }

    /// Value used when the slot has never been written.
    pub fn default_value(self) -> i64 {
        match self {
            Slot::Count => DEFAULT_COUNT,
            Slot::Step => DEFAULT_STEP,
        }
    }
}

/// Key-value storage for the counter's persisted slots.
///
/// `read` returns `Ok(None)` for an absent slot; errors are reserved for
/// storage that exists but cannot be used.
pub trait SettingsStore {
    fn read(&self, slot: Slot) -> Result<Option<i64>>;
    fn write(&self, slot: Slot, value: i64) -> Result<()>;
}

/// Read a slot, falling back to its default when absent or unreadable.
pub fn read_or_default(settings: &impl SettingsStore, slot: Slot) -> i64 {
    match settings.read(slot) {
        Ok(Some(v)) => v,
        Ok(None) => slot.default_value(),
        Err(err) => {
            warn!(slot = slot.key(), error = %err, "unreadable setting, using default");
            slot.default_value()
        }
    }
}

pub fn load_state(settings: &impl SettingsStore) -> CounterState {
    CounterState::new(
        read_or_default(settings, Slot::Count),
        read_or_default(settings, Slot::Step),
    )
}

/// Seed `store` from persisted settings through its public setters.
pub fn seed_store(store: &mut CounterStore, settings: &impl SettingsStore) {
    let loaded = load_state(settings);
    store.set_count(loaded.count);
    store.set_step(loaded.step);
}

/// Build a store seeded from `settings` that writes every published state
/// back to them. Seeding happens before the writer is attached; the writer's
/// first call then stores the loaded pair, filling in absent slots.
pub fn open_persisted<S>(settings: S) -> CounterStore
where
    S: SettingsStore + Send + 'static,
{
    let mut store = CounterStore::new();
    seed_store(&mut store, &settings);
    store.subscribe(move |state| {
        if let Err(err) = save_state(&settings, state) {
            warn!(error = %err, "failed to persist counter");
        }
    });
    store
}

/// Persist both slots. Stops at the first failing write.
pub fn save_state(settings: &impl SettingsStore, state: CounterState) -> Result<()> {
    settings.write(Slot::Count, state.count)?;
    settings.write(Slot::Step, state.step)
}

// ── Stream Deck globals ─────────────────────────────────────────────────────

/// Slots stored in `cx.globals()["counter"]`, persisted by the Stream Deck app.
pub struct GlobalSettings {
    cx: Context,
}

impl GlobalSettings {
    pub fn new(cx: &Context) -> Self {
        Self { cx: cx.clone() }
    }
}

impl SettingsStore for GlobalSettings {
    fn read(&self, slot: Slot) -> Result<Option<i64>> {
        let value = self
            .cx
            .globals()
            .get(GLOBALS_KEY)
            .and_then(|v| v.get(slot.key()).cloned());
        parse_slot(slot, value)
    }

    fn write(&self, slot: Slot, value: i64) -> Result<()> {
        let mut result = Ok(());
        self.cx.globals().with_mut(|m| {
            let obj = m
                .entry(GLOBALS_KEY.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            match obj.as_object_mut() {
                Some(map) => {
                    map.insert(slot.key().to_string(), Value::from(value));
                }
                None => {
                    result = Err(anyhow!("global `{GLOBALS_KEY}` is not an object"));
                }
            }
        });
        result
    }
}

fn parse_slot(slot: Slot, value: Option<Value>) -> Result<Option<i64>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_i64()
            .map(Some)
            .ok_or_else(|| anyhow!("slot `{}` holds non-integer {n}", slot.key())),
        Some(other) => Err(anyhow!("slot `{}` holds {other}, expected an integer", slot.key())),
    }
}

// ── In-memory ───────────────────────────────────────────────────────────────

/// Process-local settings, for hosts without persistence and for tests.
/// Clones share the same slots.
#[derive(Clone, Debug, Default)]
pub struct MemorySettings {
    slots: Arc<Mutex<HashMap<Slot, i64>>>,
}

impl SettingsStore for MemorySettings {
    fn read(&self, slot: Slot) -> Result<Option<i64>> {
        let slots = self.slots.lock().map_err(|_| anyhow!("settings lock poisoned"))?;
        Ok(slots.get(&slot).copied())
    }

    fn write(&self, slot: Slot, value: i64) -> Result<()> {
        let mut slots = self.slots.lock().map_err(|_| anyhow!("settings lock poisoned"))?;
        slots.insert(slot, value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Broken;

    impl SettingsStore for Broken {
        fn read(&self, slot: Slot) -> Result<Option<i64>> {
            Err(anyhow!("{} unavailable", slot.key()))
        }

        fn write(&self, _slot: Slot, _value: i64) -> Result<()> {
            Err(anyhow!("read-only"))
        }
    }

    #[test]
    fn empty_settings_load_defaults() {
        assert_eq!(load_state(&MemorySettings::default()), CounterState::new(0, 1));
    }

    #[test]
    fn failing_reads_fall_back_to_defaults() {
        assert_eq!(load_state(&Broken), CounterState::new(0, 1));
        assert!(save_state(&Broken, CounterState::new(1, 1)).is_err());
    }

    #[test]
    fn saved_state_loads_back() {
        let settings = MemorySettings::default();
        save_state(&settings, CounterState::new(-8, -2)).unwrap();
        assert_eq!(load_state(&settings), CounterState::new(-8, -2));
    }

    #[test]
    fn seeding_publishes_through_setters() {
        let settings = MemorySettings::default();
        settings.write(Slot::Count, 5).unwrap();

        let mut store = CounterStore::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        store.subscribe(move |s| sink.lock().unwrap().push(s));

        seed_store(&mut store, &settings);
        assert_eq!(store.state(), CounterState::new(5, 1));
        assert_eq!(seen.lock().unwrap().len(), 3);
    }

    #[test]
    fn persisted_store_starts_from_saved_slots() {
        let settings = MemorySettings::default();
        save_state(&settings, CounterState::new(7, -2)).unwrap();

        let store = open_persisted(settings.clone());
        assert_eq!(store.state(), CounterState::new(7, -2));
        assert_eq!(store.observer_count(), 1);
    }

    #[test]
    fn persisted_store_writes_defaults_for_absent_slots() {
        let settings = MemorySettings::default();
        let _store = open_persisted(settings.clone());
        assert_eq!(settings.read(Slot::Count).unwrap(), Some(0));
        assert_eq!(settings.read(Slot::Step).unwrap(), Some(1));
    }

    #[test]
    fn every_change_is_written_through() {
        let settings = MemorySettings::default();
        let mut store = open_persisted(settings.clone());

        store.add_step();
        store.add_step();
        assert_eq!(load_state(&settings), CounterState::new(2, 1));

        store.negate_step();
        store.add_step();
        assert_eq!(load_state(&settings), CounterState::new(1, -1));

        store.reset();
        assert_eq!(load_state(&settings), CounterState::new(0, -1));
    }

    #[test]
    fn failing_writes_do_not_disturb_the_store() {
        let mut store = open_persisted(Broken);
        store.increment();
        assert_eq!(store.state(), CounterState::new(1, 1));
    }

    #[test]
    fn slot_values_are_parsed_strictly() {
        assert_eq!(parse_slot(Slot::Count, None).unwrap(), None);
        assert_eq!(parse_slot(Slot::Count, Some(Value::Null)).unwrap(), None);
        assert_eq!(parse_slot(Slot::Step, Some(Value::from(-3))).unwrap(), Some(-3));
        assert!(parse_slot(Slot::Step, Some(Value::from(1.5))).is_err());
        assert!(parse_slot(Slot::Count, Some(Value::from("7"))).is_err());
    }
}
