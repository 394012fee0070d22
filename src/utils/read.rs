//! The record type loaded from sequence files and referenced by its rank everywhere else.


/// A sequence with its identifier, as read in a fasta/fastq record.
/// Created once at load time, never mutated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Read {
    /// name of record, header truncated at first white space
    id : String,
    /// bases as read in file
    seq : Vec<u8>,
}  // end of Read


impl Read {
    pub fn new(id : String, seq : Vec<u8>) -> Self {
        Read{id, seq}
    }

    /// get fasta id
    pub fn get_id(&self) -> &str {
        &self.id
    }

    pub fn get_seq(&self) -> &[u8] {
        &self.seq
    }

    pub fn len(&self) -> usize {
        self.seq.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }
} // end of impl Read


impl AsRef<[u8]> for Read {
    fn as_ref(&self) -> &[u8] {
        &self.seq
    }
}
