//! Step counter core: the counter state container and the settings slots it
//! is persisted through. The Stream Deck plugin in `main.rs` is the only
//! presentation layer built on it.

pub mod state;
pub mod store;
