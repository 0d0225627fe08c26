mod particle;
mod particle_io;
mod particle_simulation;
mod scenes;

pub use particle::*;
pub use particle_io::*;
pub use particle_simulation::*;
pub use scenes::*;

#[cfg(test)]
mod particle_simulation_tests;
