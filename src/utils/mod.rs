pub mod errors;
mod constants;
mod constants_config;
mod number_format;

pub use errors::SimulationError;
pub use constants::*;
pub use constants_config::*;
pub use number_format::*;
