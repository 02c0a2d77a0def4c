use bevy::prelude::*;
use ribbit_bits::{BitMessage, BitResult, RibbitMessage};

use crate::{BIT_MESSAGE_QUEUE, RIBBIT_MESSAGE_QUEUE};

/// Stands in for the Ribbit page when a bit runs natively.
///
/// `R` restarts the bit, `S` starts it and `E` ends it. Whatever the bit sends
/// back is logged.
pub struct RibbitSimulation;

impl Plugin for RibbitSimulation {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, request_parameters)
            .add_systems(Update, (simulate_host_keys, log_bit_messages));
    }
}

fn request_parameters() {
    RIBBIT_MESSAGE_QUEUE.push(RibbitMessage::Parameters);
}

fn simulate_host_keys(keycode: Res<ButtonInput<KeyCode>>) {
    if keycode.just_pressed(KeyCode::KeyR) {
        RIBBIT_MESSAGE_QUEUE.push(RibbitMessage::Restart);
    } else if keycode.just_pressed(KeyCode::KeyS) {
        RIBBIT_MESSAGE_QUEUE.push(RibbitMessage::Start);
    } else if keycode.just_pressed(KeyCode::KeyE) {
        RIBBIT_MESSAGE_QUEUE.push(RibbitMessage::End);
    }
}

fn log_bit_messages() {
    for message in BIT_MESSAGE_QUEUE.drain() {
        match message {
            BitMessage::End(result) => info!("bit ended: {}", describe_result(&result)),
            other => info!("bit sent {other:?}"),
        }
    }
}

fn describe_result(result: &BitResult) -> String {
    match result {
        BitResult::LowestScore(score) | BitResult::HighestScore(score) => {
            format!("score {score}")
        }
        BitResult::LongestDuration(duration) | BitResult::FastestDuration(duration) => {
            format!("time {:.1}s", duration.as_secs_f32())
        }
        BitResult::Success => "success".to_owned(),
        BitResult::Failure => "failure".to_owned(),
    }
}
