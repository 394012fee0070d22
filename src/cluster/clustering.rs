//! Greedy rotation aware clustering.
//!
//! Sequences are processed in their input order. The first sequence not yet claimed seeds a new cluster,
//! then all sequences after it and not yet claimed are compared to the seed in parallel. Those passing the
//! length ratio gate with a similarity above threshold are claimed by the cluster.
//! The loop on seeds is sequential, so the partition depends only on input order and parameters,
//! not on thread scheduling.
//!
//! Note that a cluster member is only guaranteed to be similar to the seed, not to other members.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::SystemTime;

use parking_lot::Mutex;
use rayon::prelude::*;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::errors::RotClustError;
use crate::dna::distance::length_ratio_ok;
use crate::utils::parameters::ClusteringParams;


/// A cluster is a list of sequence ranks. The first one is the seed.
pub type Cluster = Vec<usize>;


/// How matching candidates of a seed scan are claimed into the cluster.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize, EnumString, Display)]
#[strum(serialize_all = "lowercase")]
pub enum ClaimStrategy {
    /// each worker keeps its matches, they are merged in the cluster after the scan. Members are in rank order.
    Merged,
    /// a worker claims a match as soon as found, under a lock. Members are in claim order.
    Locked,
}


impl Default for ClaimStrategy {
    fn default() -> Self {
        ClaimStrategy::Merged
    }
}


//=========================================================================================

// claimed flag of each sequence. Flags only go from false to true.
struct AssignmentState {
    claimed : Vec<AtomicBool>,
    nb_claimed : AtomicUsize,
}


impl AssignmentState {
    fn new(nb_items : usize) -> Self {
        let claimed = (0..nb_items).map(|_| AtomicBool::new(false)).collect();
        AssignmentState{claimed, nb_claimed : AtomicUsize::new(0)}
    }

    #[inline]
    fn is_claimed(&self, rank : usize) -> bool {
        self.claimed[rank].load(Ordering::Acquire)
    }

    // returns true if we got the claim, false if rank was already claimed
    #[inline]
    fn claim(&self, rank : usize) -> bool {
        let already = self.claimed[rank].swap(true, Ordering::AcqRel);
        if !already {
            self.nb_claimed.fetch_add(1, Ordering::Relaxed);
        }
        !already
    }

    fn get_nb_claimed(&self) -> usize {
        self.nb_claimed.load(Ordering::Relaxed)
    }
} // end of impl AssignmentState


//=========================================================================================


/// The result of a clustering : clusters in creation order.
/// Each input rank is in exactly one cluster.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Partition {
    clusters : Vec<Cluster>,
    /// number of sequences clustered
    nb_items : usize,
}


impl Partition {
    pub fn new(clusters : Vec<Cluster>, nb_items : usize) -> Self {
        Partition{clusters, nb_items}
    }

    pub fn get_nb_clusters(&self) -> usize {
        self.clusters.len()
    }

    pub fn get_nb_items(&self) -> usize {
        self.nb_items
    }

    pub fn get_clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Cluster> {
        self.clusters.iter()
    }

    /// returns for each sequence rank the rank of its cluster, None if a rank is missing.
    pub fn cluster_of(&self) -> Vec<Option<usize>> {
        let mut cluster_of = vec![None; self.nb_items];
        for (c, cluster) in self.clusters.iter().enumerate() {
            for &rank in cluster {
                if rank < self.nb_items {
                    cluster_of[rank] = Some(c);
                }
            }
        }
        cluster_of
    }

    /// checks each rank in [0, nb_items) appears exactly once and no cluster is empty.
    pub fn is_complete(&self) -> bool {
        let mut seen = vec![false; self.nb_items];
        for cluster in &self.clusters {
            if cluster.is_empty() {
                return false;
            }
            for &rank in cluster {
                if rank >= self.nb_items || seen[rank] {
                    return false;
                }
                seen[rank] = true;
            }
        }
        seen.into_iter().all(|s| s)
    } // end of is_complete

    pub fn into_clusters(self) -> Vec<Cluster> {
        self.clusters
    }
} // end of impl Partition


impl<'a> IntoIterator for &'a Partition {
    type Item = &'a Cluster;
    type IntoIter = std::slice::Iter<'a, Cluster>;

    fn into_iter(self) -> Self::IntoIter {
        self.clusters.iter()
    }
}


//=========================================================================================


/// The clustering engine. It owns the thread pool used to scan candidates of each seed.
pub struct ClusterEngine {
    params : ClusteringParams,
    pool : rayon::ThreadPool,
}


impl ClusterEngine {
    /// allocates the thread pool. With params.get_nb_threads() == 0 rayon chooses the number of threads.
    pub fn new(params : ClusteringParams) -> Result<Self, RotClustError> {
        let pool = rayon::ThreadPoolBuilder::new().num_threads(params.get_nb_threads()).build()?;
        log::info!("ClusterEngine nb threads in pool : {:?}", pool.current_num_threads());
        Ok(ClusterEngine{params, pool})
    } // end of new

    pub fn get_params(&self) -> &ClusteringParams {
        &self.params
    }

    pub fn get_nb_threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    // true if candidate must join the cluster of seed
    fn is_match(&self, seed : &[u8], candidate : &[u8]) -> bool {
        if !length_ratio_ok(seed, candidate, self.params.get_length_ratio()) {
            return false;
        }
        let threshold = self.params.get_similarity();
        match self.params.get_distance_mode().similarity(seed, candidate, threshold) {
            Some(sim) => sim >= threshold,
            None => false,
        }
    } // end of is_match


    // scan with per worker match lists, merged after the scan
    fn scan_merged(&self, seed_rank : usize, seqs : &[&[u8]], state : &AssignmentState, cluster : &mut Cluster) {
        let seed = seqs[seed_rank];
        let matches : Vec<usize> = self.pool.install(|| {
            (seed_rank+1..seqs.len()).into_par_iter()
                .filter(|&j| !state.is_claimed(j) && self.is_match(seed, seqs[j]))
                .collect()
        });
        // recheck flags at merge so a rank is never claimed twice
        for j in matches {
            if state.claim(j) {
                cluster.push(j);
            }
        }
    } // end of scan_merged


    // scan where matches are claimed under a lock, entered only on a match
    fn scan_locked(&self, seed_rank : usize, seqs : &[&[u8]], state : &AssignmentState, cluster : &mut Cluster) {
        let seed = seqs[seed_rank];
        let members = Mutex::new(std::mem::take(cluster));
        self.pool.install(|| {
            (seed_rank+1..seqs.len()).into_par_iter().for_each(|j| {
                if state.is_claimed(j) || !self.is_match(seed, seqs[j]) {
                    return;
                }
                let mut members = members.lock();
                if state.claim(j) {
                    members.push(j);
                }
            });
        });
        *cluster = members.into_inner();
    } // end of scan_locked


    /// clusters sequences, ranks in the partition are ranks in seqs.
    pub fn cluster<S>(&self, seqs : &[S]) -> Partition
        where S : AsRef<[u8]> {
        //
        let start_t = SystemTime::now();
        let nb_items = seqs.len();
        log::info!("rotation aware clustering of {} sequences, length ratio : {}, similarity : {}, mode : {}, claim : {}",
            nb_items, self.params.get_length_ratio(), self.params.get_similarity(),
            self.params.get_distance_mode(), self.params.get_claim_strategy());
        //
        let seqs : Vec<&[u8]> = seqs.iter().map(|s| s.as_ref()).collect();
        let state = AssignmentState::new(nb_items);
        let mut clusters = Vec::<Cluster>::new();
        //
        for i in 0..nb_items {
            if !state.claim(i) {
                continue;
            }
            let mut cluster : Cluster = vec![i];
            match self.params.get_claim_strategy() {
                ClaimStrategy::Merged => self.scan_merged(i, &seqs, &state, &mut cluster),
                ClaimStrategy::Locked => self.scan_locked(i, &seqs, &state, &mut cluster),
            }
            let cluster_size = cluster.len();
            clusters.push(cluster);
            if clusters.len() % 10 == 0 || cluster_size > 1 {
                let nb_claimed = state.get_nb_claimed();
                log::info!("[Cluster {}] seed={} size={} assigned={} remaining={}",
                    clusters.len(), i, cluster_size, nb_claimed, nb_items - nb_claimed);
            }
        }
        //
        if let Ok(elapsed) = start_t.elapsed() {
            log::info!("clustering done, nb clusters : {}, elapsed time(s) {}", clusters.len(), elapsed.as_secs_f32());
        }
        Partition::new(clusters, nb_items)
    } // end of cluster

} // end of impl ClusterEngine


//=========================================================================================

// end of mod tests
