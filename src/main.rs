mod actions;
mod render;
mod session;
mod topics;

use streamdeck_lib::prelude::*;
use tracing::info;

use actions::{counter::CounterAction, direction::DirectionAction, reset::ResetAction};

pub const PLUGIN_ID: &str = "de.lenidh.counter";

fn main() -> anyhow::Result<()> {
    let _guard = init(PLUGIN_ID);
    info!("Starting counter Stream Deck plugin");

    let plugin = Plugin::new()
        .add_action(ActionFactory::default_of::<CounterAction>())
        .add_action(ActionFactory::default_of::<DirectionAction>())
        .add_action(ActionFactory::default_of::<ResetAction>());

    run_plugin(plugin)
}
