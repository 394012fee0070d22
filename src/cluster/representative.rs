//! Choice of the sequence standing for a cluster in output.
//!
//! - by score : reads produced by r2rtr carry a score after the last ':' of their name, the best scored read is kept.
//! - by length : the longest read is kept.
//!
//! In both cases ties are resolved to the first member of the cluster.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::utils::read::Read;


/// policy to select a cluster representative
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize, EnumString, Display)]
#[strum(serialize_all = "lowercase")]
pub enum RepPolicy {
    /// highest score parsed from read name
    Score,
    /// longest sequence
    Length,
}


impl Default for RepPolicy {
    fn default() -> Self {
        RepPolicy::Length
    }
}


impl RepPolicy {
    /// returns the rank (in reads) of the representative, None if cluster is empty
    pub fn select(&self, cluster : &[usize], reads : &[Read]) -> Option<usize> {
        match self {
            RepPolicy::Score => select_by_score(cluster, reads),
            RepPolicy::Length => select_by_length(cluster, reads),
        }
    }
} // end of impl RepPolicy



/// parses the integer following the last ':' in name.
/// As C atoi does, leading blanks and a sign are accepted and parsing stops at first non digit.
/// Returns 0 if there is no ':' or no digit.
pub fn parse_score(name : &str) -> i64 {
    let suffix = match name.rfind(':') {
        Some(pos) => name[pos+1..].trim_start(),
        None => return 0,
    };
    let bytes = suffix.as_bytes();
    let mut end = 0;
    if !bytes.is_empty() && (bytes[0] == b'+' || bytes[0] == b'-') {
        end = 1;
    }
    let first_digit = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == first_digit {
        return 0;
    }
    suffix[..end].parse::<i64>().unwrap_or(0)
} // end of parse_score



/// representative with highest score, see [parse_score]
pub fn select_by_score(cluster : &[usize], reads : &[Read]) -> Option<usize> {
    let mut best = *cluster.first()?;
    let mut best_score = parse_score(reads[best].get_id());
    for &rank in &cluster[1..] {
        let score = parse_score(reads[rank].get_id());
        if score > best_score {
            best_score = score;
            best = rank;
        }
    }
    Some(best)
} // end of select_by_score



/// representative with longest sequence
pub fn select_by_length(cluster : &[usize], reads : &[Read]) -> Option<usize> {
    let mut best = *cluster.first()?;
    let mut best_len = reads[best].len();
    for &rank in &cluster[1..] {
        if reads[rank].len() > best_len {
            best_len = reads[rank].len();
            best = rank;
        }
    }
    Some(best)
} // end of select_by_length


//=========================================================================================

// end of mod tests
