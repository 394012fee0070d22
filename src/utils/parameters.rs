//! structures related to processing parameters


use serde::{Deserialize, Serialize};

use crate::errors::RotClustError;
use crate::dna::distance::DistanceMode;
use crate::cluster::clustering::ClaimStrategy;


/// default minimum ratio of lengths of compared sequences
pub const DEFAULT_LENGTH_RATIO : f64 = 0.85;

/// default similarity threshold to claim a sequence in a cluster
pub const DEFAULT_SIMILARITY : f64 = 0.90;


// checks value is in (0, 1]
fn check_unit_interval(name : &str, value : f64) -> Result<(), RotClustError> {
    if value > 0. && value <= 1. {
        Ok(())
    }
    else {
        Err(RotClustError::invalid(name, value, "must be in (0, 1]"))
    }
} // end of check_unit_interval


/// Gathers parameters of the clustering engine.
/// Values are checked at construction so an engine never runs with bad parameters.
/// Deserialization goes through the same checks.
#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "ParamsRecord")]
pub struct ClusteringParams {
    /// minimum of min(len)/max(len) for a pair to be aligned
    length_ratio : f64,
    /// minimum similarity to the seed to enter a cluster
    similarity : f64,
    /// number of worker threads, 0 means rayon default (all hardware threads)
    nb_threads : usize,
    /// distance engine used for comparisons
    distance_mode : DistanceMode,
    /// how matching candidates are claimed
    claim_strategy : ClaimStrategy,
}  // end of ClusteringParams


// unchecked form of ClusteringParams as found in a json dump
#[derive(Deserialize)]
struct ParamsRecord {
    length_ratio : f64,
    similarity : f64,
    nb_threads : usize,
    distance_mode : DistanceMode,
    claim_strategy : ClaimStrategy,
}


impl TryFrom<ParamsRecord> for ClusteringParams {
    type Error = RotClustError;

    fn try_from(record : ParamsRecord) -> Result<Self, Self::Error> {
        let mut params = ClusteringParams::new(record.length_ratio, record.similarity)?
                .with_distance_mode(record.distance_mode)
                .with_claim_strategy(record.claim_strategy);
        // 0 is a valid dumped value, it stands for rayon default
        params.nb_threads = record.nb_threads;
        Ok(params)
    }
} // end of TryFrom<ParamsRecord>



impl Default for ClusteringParams {
    fn default() -> Self {
        ClusteringParams{length_ratio : DEFAULT_LENGTH_RATIO, similarity : DEFAULT_SIMILARITY, nb_threads : 0,
                distance_mode : DistanceMode::default(), claim_strategy : ClaimStrategy::default()}
    }
} // end of default for ClusteringParams



impl ClusteringParams {
    /// length_ratio and similarity must be in (0,1]
    pub fn new(length_ratio : f64, similarity : f64) -> Result<Self, RotClustError> {
        check_unit_interval("length_ratio", length_ratio)?;
        check_unit_interval("similarity", similarity)?;
        Ok(ClusteringParams{length_ratio, similarity, ..Default::default()})
    } // end of new

    /// sets the number of threads. Must be positive.
    pub fn with_threads(mut self, nb_threads : usize) -> Result<Self, RotClustError> {
        if nb_threads == 0 {
            return Err(RotClustError::invalid("threads", nb_threads, "must be positive"));
        }
        self.nb_threads = nb_threads;
        Ok(self)
    }

    pub fn with_distance_mode(mut self, distance_mode : DistanceMode) -> Self {
        self.distance_mode = distance_mode;
        self
    }

    pub fn with_claim_strategy(mut self, claim_strategy : ClaimStrategy) -> Self {
        self.claim_strategy = claim_strategy;
        self
    }

    pub fn get_length_ratio(&self) -> f64 {
        self.length_ratio
    }

    pub fn get_similarity(&self) -> f64 {
        self.similarity
    }

    /// returns 0 if the platform default is to be used
    pub fn get_nb_threads(&self) -> usize {
        self.nb_threads
    }

    pub fn get_distance_mode(&self) -> DistanceMode {
        self.distance_mode
    }

    pub fn get_claim_strategy(&self) -> ClaimStrategy {
        self.claim_strategy
    }
} // end of impl ClusteringParams


//=========================================================================================

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn test_defaults() {
        let params = ClusteringParams::default();
        assert_eq!(params.get_length_ratio(), 0.85);
        assert_eq!(params.get_similarity(), 0.90);
        assert_eq!(params.get_nb_threads(), 0);
        assert_eq!(params.get_distance_mode(), DistanceMode::Approx);
        assert_eq!(params.get_claim_strategy(), ClaimStrategy::Merged);
    }

    #[test]
    fn test_validation() {
        assert!(ClusteringParams::new(1.0, 1.0).is_ok());
        assert!(ClusteringParams::new(0.5, 0.01).is_ok());
        assert!(ClusteringParams::new(0., 0.9).is_err());
        assert!(ClusteringParams::new(-0.1, 0.9).is_err());
        assert!(ClusteringParams::new(1.01, 0.9).is_err());
        assert!(ClusteringParams::new(0.85, 0.).is_err());
        assert!(ClusteringParams::new(0.85, 1.5).is_err());
        assert!(ClusteringParams::new(f64::NAN, 0.9).is_err());
        let params = ClusteringParams::new(0.85, 0.9).unwrap();
        assert!(params.with_threads(0).is_err());
        assert_eq!(params.with_threads(4).unwrap().get_nb_threads(), 4);
    }

    #[test]
    fn test_json_reload_is_checked() {
        let params = ClusteringParams::new(0.8, 0.95).unwrap()
                .with_threads(3).unwrap()
                .with_distance_mode(DistanceMode::Exact)
                .with_claim_strategy(ClaimStrategy::Locked);
        let dumped = serde_json::to_string(&params).unwrap();
        let reloaded : ClusteringParams = serde_json::from_str(&dumped).unwrap();
        assert_eq!(reloaded.get_length_ratio(), 0.8);
        assert_eq!(reloaded.get_similarity(), 0.95);
        assert_eq!(reloaded.get_nb_threads(), 3);
        assert_eq!(reloaded.get_distance_mode(), DistanceMode::Exact);
        assert_eq!(reloaded.get_claim_strategy(), ClaimStrategy::Locked);
        //
        let bad = r#"{"length_ratio":0.85,"similarity":1.5,"nb_threads":0,"distance_mode":"Approx","claim_strategy":"Merged"}"#;
        assert!(serde_json::from_str::<ClusteringParams>(bad).is_err());
        let bad = r#"{"length_ratio":0.0,"similarity":0.9,"nb_threads":0,"distance_mode":"Approx","claim_strategy":"Merged"}"#;
        assert!(serde_json::from_str::<ClusteringParams>(bad).is_err());
    }

} // end of mod tests
