mod transport;
mod local;

pub use transport::*;
pub use local::*;
