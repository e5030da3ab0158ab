mod alphabet;
mod encoder;

pub use alphabet::*;
pub use encoder::*;
