//! Rotation and strand aware edit distances.
//!
//! The distance between s and t is the minimum edit distance between s and any cyclic rotation of t,
//! minimized again over t and its reverse complement.
//! All rotations of t are the windows of length |t| of t concatenated with itself (its doubled sequence).
//!
//! - [rotation_distance] enumerates all windows and runs a global alignment on each. It is exact but
//!   costs |t| alignments per strand.
//! - [rotation_distance_with_cutoff] does the same but stops as soon as an acceptable distance is found.
//! - [approximate_rotation_distance] runs one infix alignment of s against the doubled t per strand, letting
//!   the aligner find the best placement of s. This is the one used in clustering.
//!
//! Alignments are done with edlib (crate edlib_rs) in distance only mode.

use edlib_rs::edlibrs::{edlibAlignRs, EdlibAlignConfigRs, EdlibAlignModeRs, EdlibAlignTaskRs, EdlibEqualityPairRs};

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use super::alphabet::{doubled, reverse_complement};


// alignment modes we use from edlib
#[derive(Copy, Clone, Debug)]
enum AlignMode {
    /// end to end alignment of both sequences (edlib NW)
    Global,
    /// query aligned in full, free gaps at both ends of target (edlib HW)
    Infix,
}


// edit distance of query against target. Returns None if edlib fails or if the distance is above max_dist.
fn edlib_distance(query : &[u8], target : &[u8], mode : AlignMode, max_dist : Option<usize>) -> Option<usize> {
    let empty : &[EdlibEqualityPairRs] = &[];
    let k = match max_dist {
        Some(d) => d.min(i32::MAX as usize) as i32,
        None => -1,
    };
    let mode = match mode {
        AlignMode::Global => EdlibAlignModeRs::EDLIB_MODE_NW,
        AlignMode::Infix  => EdlibAlignModeRs::EDLIB_MODE_HW,
    };
    let config = EdlibAlignConfigRs { k, mode, task : EdlibAlignTaskRs::EDLIB_TASK_DISTANCE, additionalequalities : empty };
    let res = edlibAlignRs(query, target, &config);
    if res.editDistance >= 0 {
        Some(res.editDistance as usize)
    }
    else {
        None
    }
} // end of edlib_distance



// global alignment of s against all windows of doubled base, updating best.
// returns true when best <= stop_at, the caller must stop scanning.
fn scan_orientation(s : &[u8], base : &[u8], best : &mut usize, stop_at : usize) -> bool {
    let len = base.len();
    let doubled_base = doubled(base);
    for i in 0..len {
        // we only want distances strictly better than best, so edlib can prune at best-1
        let window = &doubled_base[i..i+len];
        if let Some(d) = edlib_distance(s, window, AlignMode::Global, Some(*best - 1)) {
            *best = d;
            if *best <= stop_at {
                log::trace!("scan_orientation stop at offset {}, distance {}", i, d);
                return true;
            }
        }
    }
    false
} // end of scan_orientation



// scans all rotations of t and of its reverse complement.
// Stops as soon as best <= stop_at. best starts at the bound so the result is min(true distance, bound)
// when we do not stop early.
fn rotation_scan(s : &[u8], t : &[u8], max_dist : Option<usize>, stop_at : usize) -> usize {
    let mut best = max_dist.unwrap_or(s.len().max(t.len()));
    if best <= stop_at {
        return best;
    }
    // edlib is not asked to align empty sequences, distance is then the length of the other one
    if s.is_empty() || t.is_empty() {
        return best.min(s.len().max(t.len()));
    }
    if scan_orientation(s, t, &mut best, stop_at) {
        return best;
    }
    let rc = reverse_complement(t);
    scan_orientation(s, &rc, &mut best, stop_at);
    best
} // end of rotation_scan



/// Exact rotation and strand aware edit distance between s and t.
///
/// max_dist is a bound on the distance (defaults to max(|s|,|t|)), it is passed to each alignment so
/// the aligner can prune. If no rotation is at distance less than the bound, the bound is returned.
/// Scanning stops at the first rotation at distance 0.
pub fn rotation_distance(s : &[u8], t : &[u8], max_dist : Option<usize>) -> usize {
    rotation_scan(s, t, max_dist, 0)
} // end of rotation_distance



/// Same scan as [rotation_distance] but stops as soon as the best distance found is less or equal to cutoff.
/// The returned distance is then acceptable for the caller but not necessarily the minimum.
pub fn rotation_distance_with_cutoff(s : &[u8], t : &[u8], cutoff : usize, max_dist : Option<usize>) -> usize {
    rotation_scan(s, t, max_dist, cutoff)
} // end of rotation_distance_with_cutoff



/// Approximate rotation and strand aware distance.
///
/// s is aligned in full in infix mode against doubled t, (resp. doubled reverse complement of t) so
/// the aligner locates the best rotation window by itself. The minimum of the two orientations is returned,
/// None if no alignment succeeded (i.e distance above max_dist in both orientations).
/// An empty operand gives max(|s|,|t|) as for the exact distance.
pub fn approximate_rotation_distance(s : &[u8], t : &[u8], max_dist : Option<usize>) -> Option<usize> {
    if s.is_empty() || t.is_empty() {
        let d = s.len().max(t.len());
        return match max_dist {
            Some(m) if d > m => None,
            _ => Some(d),
        };
    }
    let forward = edlib_distance(s, &doubled(t), AlignMode::Infix, max_dist);
    if forward == Some(0) {
        return forward;
    }
    let reverse = edlib_distance(s, &doubled(&reverse_complement(t)), AlignMode::Infix, max_dist);
    match (forward, reverse) {
        (Some(f), Some(r)) => Some(f.min(r)),
        (Some(f), None) => Some(f),
        (None, r) => r,
    }
} // end of approximate_rotation_distance



/// returns true if min(|a|,|b|) / max(|a|,|b|) >= ratio.
/// Two empty sequences never pass.
#[inline]
pub fn length_ratio_ok(a : &[u8], b : &[u8], ratio : f64) -> bool {
    let (l1, l2) = (a.len() as f64, b.len() as f64);
    l1.min(l2) / l1.max(l2) >= ratio
} // end of length_ratio_ok


/// 1 - dist / max(len_a, len_b). Can be negative if dist is above both lengths.
#[inline]
pub fn similarity_from_distance(dist : usize, len_a : usize, len_b : usize) -> f64 {
    let max_len = len_a.max(len_b);
    if max_len == 0 {
        return 1.0;
    }
    1.0 - dist as f64 / max_len as f64
}


/// similarity computed from the exact [rotation_distance]
pub fn similarity(a : &[u8], b : &[u8]) -> f64 {
    let d = rotation_distance(a, b, None);
    similarity_from_distance(d, a.len(), b.len())
}


/// similarity computed from [approximate_rotation_distance], None if there is no match.
pub fn approximate_similarity(a : &[u8], b : &[u8]) -> Option<f64> {
    approximate_rotation_distance(a, b, None).map(|d| similarity_from_distance(d, a.len(), b.len()))
}


/// The largest distance d such that `similarity_from_distance(d, max_len, max_len) >= threshold`,
/// 0 if there is none. This is the cutoff used by [DistanceMode::Cutoff].
///
/// The floor of max_len * (1 - threshold) is only a first guess, rounding can put it one off
/// the test done on similarity, so it is adjusted against that same test.
pub fn acceptance_cutoff(max_len : usize, threshold : f64) -> usize {
    let mut cutoff = ((max_len as f64 * (1.0 - threshold)).floor().max(0.) as usize).min(max_len);
    while cutoff > 0 && similarity_from_distance(cutoff, max_len, max_len) < threshold {
        cutoff -= 1;
    }
    while cutoff < max_len && similarity_from_distance(cutoff + 1, max_len, max_len) >= threshold {
        cutoff += 1;
    }
    cutoff
} // end of acceptance_cutoff


//=========================================================================================

/// Which distance engine is used to compare a candidate to a cluster seed
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize, EnumString, Display)]
#[strum(serialize_all = "lowercase")]
pub enum DistanceMode {
    /// one infix alignment by strand, see [approximate_rotation_distance]
    Approx,
    /// all rotations, see [rotation_distance]
    Exact,
    /// all rotations with early exit at [acceptance_cutoff], see [rotation_distance_with_cutoff]
    Cutoff,
}


impl Default for DistanceMode {
    fn default() -> Self {
        DistanceMode::Approx
    }
}


impl DistanceMode {
    /// similarity of candidate b to seed a, None when there is no match.
    /// threshold is only used by the Cutoff mode to stop scanning rotations.
    pub fn similarity(&self, a : &[u8], b : &[u8], threshold : f64) -> Option<f64> {
        let sim = match self {
            DistanceMode::Approx => approximate_similarity(a, b)?,
            DistanceMode::Exact  => similarity(a, b),
            DistanceMode::Cutoff => {
                let cutoff = acceptance_cutoff(a.len().max(b.len()), threshold);
                let d = rotation_distance_with_cutoff(a, b, cutoff, None);
                similarity_from_distance(d, a.len(), b.len())
            }
        };
        // a negative similarity is no match
        if sim < 0. {
            None
        }
        else {
            Some(sim)
        }
    } // end of similarity
} // end of impl DistanceMode


//=========================================================================================


// end of mod tests
