//! base complementation and reverse complement.
//! Only upper case A, C, G, T are known bases, any other byte is complemented to N.


/// complement of a base, A <-> T , C <-> G, anything else gives N
#[inline]
pub fn complement(base : u8) -> u8 {
    match base {
        b'A' => b'T',
        b'T' => b'A',
        b'C' => b'G',
        b'G' => b'C',
        _    => b'N',
    }
} // end of complement



/// returns the reverse complement of seq in a newly allocated vector of same length.
pub fn reverse_complement(seq : &[u8]) -> Vec<u8> {
    seq.iter().rev().map(|b| complement(*b)).collect()
} // end of reverse_complement



/// returns seq concatenated with itself. All rotations of seq are windows of the result.
pub fn doubled(seq : &[u8]) -> Vec<u8> {
    let mut doubled = Vec::<u8>::with_capacity(2 * seq.len());
    doubled.extend_from_slice(seq);
    doubled.extend_from_slice(seq);
    doubled
} // end of doubled


//========================================================================================

// end of mod tests
