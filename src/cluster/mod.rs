//! clustering engine and choice of cluster representatives

pub mod clustering;
pub mod representative;

pub use clustering::*;
pub use representative::*;
