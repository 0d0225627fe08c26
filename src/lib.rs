pub mod utils;
pub mod models;
pub mod forces;
pub mod particles;
pub mod spatial;
pub mod decomposition;
pub mod transport;
pub mod driver;
