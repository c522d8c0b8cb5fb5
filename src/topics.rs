use streamdeck_lib::TopicId;

use step_counter::store::CounterState;

/// Published by the session after every store mutation, and once when the
/// store is first opened. Every counter key subscribes to re-render.
pub const STATE_CHANGED: TopicId<CounterState> = TopicId::new("counter_state_changed");
