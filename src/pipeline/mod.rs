pub mod shuffle;
pub mod unshuffle;

pub use shuffle::*;
pub use unshuffle::*;
