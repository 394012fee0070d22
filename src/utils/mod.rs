//! contains utils used around clustering : parameters, file io and resource reporting

pub mod read;
pub mod files;
pub mod parameters;
pub mod resources;

pub use read::*;
pub use files::*;
pub use parameters::*;
pub use resources::*;
