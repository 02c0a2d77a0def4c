mod bit;
pub use bit::*;

pub mod cleanup;
pub mod input;

mod ribbit_communication;
pub use ribbit_communication::*;

#[cfg(not(target_arch = "wasm32"))]
mod ribbit_simulation;
#[cfg(not(target_arch = "wasm32"))]
pub use ribbit_simulation::RibbitSimulation;

mod window_resizing;
