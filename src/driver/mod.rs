mod simulation_driver;

pub use simulation_driver::*;
