mod forces_2d;

pub use forces_2d::*;

#[cfg(test)]
mod forces_2d_tests;
