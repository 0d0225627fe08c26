mod bounding_box;

pub use bounding_box::*;

/// Two-dimensional single-precision vector used for positions, velocities and forces.
pub use glam::Vec2;

#[cfg(test)]
mod bounding_box_tests;
