//! rotclust : greedy clustering of sequences similar up to a cyclic rotation and/or a strand reversal.
//!
//! Sequences coming from circular molecules can be linearized at any position and can be read on
//! any strand. Two such reads are compared by an edit distance minimized over all rotations of one of
//! them and over both strands (see module [dna::distance]).
//! Clustering (module [cluster::clustering]) is a greedy single pass : the first unassigned sequence seeds a cluster
//! and all remaining unassigned sequences are compared in parallel to the seed.

pub mod errors;
pub mod dna;
pub mod cluster;
pub mod utils;

pub use errors::RotClustError;
