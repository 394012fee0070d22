//! This file contains loading of sequence files and dump of clustering results.
//!
//! Output formats :
//! - representatives : a fasta file with one record by cluster, header is `>cluster{k}|{representative id}`
//!   with k starting at 1.
//! - membership : for each cluster a line `>cluster{k}` followed by one member id by line.

use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::errors::RotClustError;
use crate::cluster::clustering::Partition;
use crate::cluster::representative::RepPolicy;

use super::read::Read;


// record name is the header up to first blank, the rest is a comment.
fn record_name(header : &[u8]) -> String {
    let end = header.iter().position(|c| c.is_ascii_whitespace()).unwrap_or(header.len());
    String::from_utf8_lossy(&header[..end]).into_owned()
}


fn parse_error(path : &Path, e : impl std::fmt::Display) -> RotClustError {
    RotClustError::Parse{path : path.display().to_string(), msg : e.to_string()}
}


/// opens and parses a fasta or fastq file (possibly gzipped) with needletail.
/// Records are returned in file order, their rank in the vector is their identity in clustering.
pub fn load_reads(path : &Path) -> Result<Vec<Read>, RotClustError> {
    log::info!("loading sequences from {:?}", path);
    // needletail refuses empty files, an empty file is an empty collection for us
    if fs::metadata(path)?.len() == 0 {
        log::warn!("file {:?} is empty", path);
        return Ok(Vec::new());
    }
    let mut reader = needletail::parse_fastx_file(path).map_err(|e| parse_error(path, e))?;
    let mut reads = Vec::<Read>::new();
    while let Some(record) = reader.next() {
        let seqrec = record.map_err(|e| parse_error(path, e))?;
        let id = record_name(seqrec.id());
        reads.push(Read::new(id, seqrec.seq().into_owned()));
        if log::log_enabled!(log::Level::Trace) && reads.len() % 100_000 == 0 {
            log::trace!("load_reads, nb loaded {} ", reads.len());
        }
    }
    log::info!("loaded {} sequences", reads.len());
    Ok(reads)
} // end of load_reads



fn create_writer(path : &Path) -> Result<BufWriter<fs::File>, RotClustError> {
    let file = OpenOptions::new().write(true).create(true).truncate(true).open(path).map_err(|e| {
        log::error!("cannot write {:?} : {}", path, e);
        e
    })?;
    Ok(BufWriter::new(file))
}



/// dumps one representative by cluster, chosen according to policy, in fasta format.
pub fn write_clusters_fasta(partition : &Partition, reads : &[Read], path : &Path, policy : RepPolicy) -> Result<(), RotClustError> {
    log::info!("dumping representatives in {:?}, policy : {}", path, policy);
    let mut out = create_writer(path)?;
    for (c, cluster) in partition.iter().enumerate() {
        if let Some(rep) = policy.select(cluster, reads) {
            writeln!(out, ">cluster{}|{}", c + 1, reads[rep].get_id())?;
            out.write_all(reads[rep].get_seq())?;
            out.write_all(b"\n")?;
        }
    }
    out.flush()?;
    Ok(())
} // end of write_clusters_fasta



/// dumps cluster membership, one header by cluster followed by member ids, seed first.
pub fn write_clusters_txt(partition : &Partition, reads : &[Read], path : &Path) -> Result<(), RotClustError> {
    log::info!("dumping cluster membership in {:?}", path);
    let mut out = create_writer(path)?;
    for (c, cluster) in partition.iter().enumerate() {
        writeln!(out, ">cluster{}", c + 1)?;
        for &rank in cluster {
            writeln!(out, "{}", reads[rank].get_id())?;
        }
    }
    out.flush()?;
    Ok(())
} // end of write_clusters_txt


//=========================================================================================

#[cfg(test)]
mod tests {

    use super::*;

    fn reads() -> Vec<Read> {
        vec![
            Read::new("a:3".to_string(), b"ACGTAC".to_vec()),
            Read::new("b:7".to_string(), b"ACG".to_vec()),
            Read::new("c:1".to_string(), b"TTTT".to_vec()),
        ]
    }

    #[test]
    fn test_record_name() {
        assert_eq!(record_name(b"read1 some comment"), "read1");
        assert_eq!(record_name(b"read2\tx"), "read2");
        assert_eq!(record_name(b"read3"), "read3");
    }

    #[test]
    fn test_load_fasta() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("in.fa");
        fs::write(&path, ">r1 circle\nACGT\nACGT\n>r2\nGGCC\n").unwrap();
        let reads = load_reads(&path).unwrap();
        assert_eq!(reads.len(), 2);
        assert_eq!(reads[0].get_id(), "r1");
        assert_eq!(reads[0].get_seq(), b"ACGTACGT");
        assert_eq!(reads[1].get_id(), "r2");
        assert_eq!(reads[1].get_seq(), b"GGCC");
    }

    #[test]
    fn test_load_empty_and_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.fa");
        fs::write(&path, "").unwrap();
        assert!(load_reads(&path).unwrap().is_empty());
        assert!(load_reads(&dir.path().join("missing.fa")).is_err());
    }

    #[test]
    fn test_write_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let reads = reads();
        let partition = Partition::new(vec![vec![0, 1], vec![2]], 3);
        //
        let fasta = dir.path().join("out.fa");
        write_clusters_fasta(&partition, &reads, &fasta, RepPolicy::Length).unwrap();
        assert_eq!(fs::read_to_string(&fasta).unwrap(), ">cluster1|a:3\nACGTAC\n>cluster2|c:1\nTTTT\n");
        write_clusters_fasta(&partition, &reads, &fasta, RepPolicy::Score).unwrap();
        assert_eq!(fs::read_to_string(&fasta).unwrap(), ">cluster1|b:7\nACG\n>cluster2|c:1\nTTTT\n");
        //
        let txt = dir.path().join("clusters.txt");
        write_clusters_txt(&partition, &reads, &txt).unwrap();
        assert_eq!(fs::read_to_string(&txt).unwrap(), ">cluster1\na:3\nb:7\n>cluster2\nc:1\n");
    }

    #[test]
    fn test_write_to_bad_path() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("no_such_dir").join("out.fa");
        let partition = Partition::new(vec![vec![0]], 1);
        assert!(write_clusters_fasta(&partition, &reads()[..1], &bad, RepPolicy::Length).is_err());
    }

} // end of mod tests
