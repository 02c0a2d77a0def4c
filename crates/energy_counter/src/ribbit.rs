use bevy::log::info;
use bevy::prelude::*;
use bits_helpers::RibbitMessageHandler;
use ribbit_bits::{BitDuration, BitResult};

use crate::cell::{CellId, OccupiedCell};
use crate::screen::CounterState;

#[derive(Default, Clone, Copy)]
pub struct EnergyCounter;

impl RibbitMessageHandler for EnergyCounter {
    fn restart(world: &mut World) {
        info!("Restarting EnergyCounter");

        world
            .resource_mut::<NextState<CounterState>>()
            .set(CounterState::Mounting);
    }

    // The count is the value of the cell holding the token.
    fn end(world: &mut World) -> BitResult {
        let count = world
            .get_resource::<OccupiedCell>()
            .and_then(OccupiedCell::get)
            .map_or(0, CellId::value);
        info!("Ending EnergyCounter at {count}");

        BitResult::HighestScore(u32::from(count).into())
    }

    fn duration(_world: &mut World) -> BitDuration {
        BitDuration::max_duration()
    }
}
