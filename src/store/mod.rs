//! The counter state container.
//!
//! [`CounterStore`] owns the `(count, step)` pair. Every mutation builds a
//! fresh [`CounterState`] and hands it to all registered observers before
//! returning. New observers get the current state straight away, so a late
//! subscriber never has to wait for the next change to render.

use tracing::debug;

/// Immutable snapshot of the counter, published after every mutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CounterState {
    pub count: i64,
    pub step: i64,
}

impl CounterState {
    pub const fn new(count: i64, step: i64) -> Self {
        Self { count, step }
    }
}

impl Default for CounterState {
    fn default() -> Self {
        Self::new(DEFAULT_COUNT, DEFAULT_STEP)
    }
}

pub const DEFAULT_COUNT: i64 = 0;
pub const DEFAULT_STEP: i64 = 1;

/// Handle returned by [`CounterStore::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Observer = Box<dyn FnMut(CounterState) + Send>;

pub struct CounterStore {
    count: i64,
    step: i64,
    next_id: u64,
    observers: Vec<(SubscriptionId, Observer)>,
}

impl Default for CounterStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CounterStore {
    /// Store starting at count 0, step 1.
    pub fn new() -> Self {
        Self::with_state(DEFAULT_COUNT, DEFAULT_STEP)
    }

    pub fn with_state(count: i64, step: i64) -> Self {
        Self {
            count,
            step,
            next_id: 0,
            observers: Vec::new(),
        }
    }

    pub fn count(&self) -> i64 {
        self.count
    }

    pub fn step(&self) -> i64 {
        self.step
    }

    pub fn state(&self) -> CounterState {
        CounterState::new(self.count, self.step)
    }

    // ── Mutations ───────────────────────────────────────────────────────────

    pub fn increment(&mut self) {
        self.count = self.count.saturating_add(1);
        self.publish("increment");
    }

    pub fn decrement(&mut self) {
        self.count = self.count.saturating_sub(1);
        self.publish("decrement");
    }

    /// Add the current step to the count. A negative step counts down.
    pub fn add_step(&mut self) {
        self.count = self.count.saturating_add(self.step);
        self.publish("add_step");
    }

    /// Zero the count. The step is kept.
    pub fn reset(&mut self) {
        self.count = 0;
        self.publish("reset");
    }

    pub fn set_count(&mut self, value: i64) {
        self.count = value;
        self.publish("set_count");
    }

    pub fn set_step(&mut self, value: i64) {
        self.step = value;
        self.publish("set_step");
    }

    /// Flip the counting direction. Wraps, so negating twice always
    /// restores the step, `i64::MIN` included.
    pub fn negate_step(&mut self) {
        self.step = self.step.wrapping_neg();
        self.publish("negate_step");
    }

    // ── Subscriptions ───────────────────────────────────────────────────────

    /// Register `observer` and call it once with the current state.
    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: FnMut(CounterState) + Send + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);

        let mut observer: Observer = Box::new(observer);
        observer(self.state());
        self.observers.push((id, observer));
        id
    }

    /// Stop delivering to `id`. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sid, _)| *sid != id);
        self.observers.len() != before
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    fn publish(&mut self, op: &'static str) {
        let state = self.state();
        debug!(op, count = state.count, step = state.step, "counter updated");
        for (_, observer) in self.observers.iter_mut() {
            observer(state);
        }
    }
}
