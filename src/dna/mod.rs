//! dna utilities : orientation of sequences and rotation aware distances

pub mod alphabet;
pub mod distance;

pub use alphabet::*;
pub use distance::*;
