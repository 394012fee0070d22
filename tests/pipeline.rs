//! load, cluster and dump on a small fasta file

use std::fs;

use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;

use rotclust::cluster::{ClusterEngine, ClaimStrategy, RepPolicy};
use rotclust::dna::{reverse_complement, DistanceMode};
use rotclust::utils::*;


fn random_seq(rng : &mut StdRng, len : usize) -> Vec<u8> {
    (0..len).map(|_| b"ACGT"[rng.gen_range(0..4)]).collect()
}


// two families of circles : A seen as rotations and reverse complement, B with one read extended by 10 bases
fn write_input(path : &std::path::Path) {
    let mut rng = StdRng::seed_from_u64(4664);
    let a = random_seq(&mut rng, 150);
    let b = random_seq(&mut rng, 120);
    let mut a_rot = a[40..].to_vec();
    a_rot.extend_from_slice(&a[..40]);
    let a_rc = reverse_complement(&a[75..].iter().chain(a[..75].iter()).copied().collect::<Vec<u8>>());
    let mut b_long = b.clone();
    b_long.extend_from_slice(&b[..10]);
    //
    let mut content = String::new();
    for (name, seq) in [("a1:4", &a), ("b1:2", &b), ("a2:9 rotated", &a_rot), ("b2:1", &b_long), ("a3:9", &a_rc)] {
        content.push_str(&format!(">{}\n{}\n", name, String::from_utf8_lossy(seq)));
    }
    fs::write(path, content).unwrap();
}


#[test]
fn test_pipeline_all_engines() {
    let _ = env_logger::builder().is_test(true).try_init();
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.fa");
    write_input(&input);
    let reads = load_reads(&input).unwrap();
    assert_eq!(reads.len(), 5);
    //
    for mode in [DistanceMode::Approx, DistanceMode::Exact, DistanceMode::Cutoff] {
        for claim in [ClaimStrategy::Merged, ClaimStrategy::Locked] {
            let params = ClusteringParams::new(0.85, 0.90).unwrap()
                        .with_threads(2).unwrap()
                        .with_distance_mode(mode)
                        .with_claim_strategy(claim);
            let partition = ClusterEngine::new(params).unwrap().cluster(&reads);
            assert!(partition.is_complete());
            assert_eq!(partition.get_nb_clusters(), 2, "mode {} claim {}", mode, claim);
            let mut first = partition.get_clusters()[0].clone();
            first.sort_unstable();
            assert_eq!(first, vec![0, 2, 4]);
            let mut second = partition.get_clusters()[1].clone();
            second.sort_unstable();
            assert_eq!(second, vec![1, 3]);
        }
    }
}


#[test]
fn test_pipeline_outputs() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.fa");
    write_input(&input);
    let reads = load_reads(&input).unwrap();
    let params = ClusteringParams::default().with_threads(1).unwrap();
    let partition = ClusterEngine::new(params).unwrap().cluster(&reads);
    //
    let output = dir.path().join("out.fa");
    write_clusters_fasta(&partition, &reads, &output, RepPolicy::Score).unwrap();
    let representatives = load_reads(&output).unwrap();
    assert_eq!(representatives.len(), 2);
    // tie on score 9, first member in cluster order wins. Merged keeps members in rank order
    assert_eq!(representatives[0].get_id(), "cluster1|a2:9");
    assert_eq!(representatives[1].get_id(), "cluster2|b1:2");
    //
    write_clusters_fasta(&partition, &reads, &output, RepPolicy::Length).unwrap();
    let representatives = load_reads(&output).unwrap();
    assert_eq!(representatives[0].get_id(), "cluster1|a1:4");
    assert_eq!(representatives[1].get_id(), "cluster2|b2:1");
    assert_eq!(representatives[1].len(), 130);
    //
    let clusters = dir.path().join("clusters.txt");
    write_clusters_txt(&partition, &reads, &clusters).unwrap();
    let text = fs::read_to_string(&clusters).unwrap();
    assert!(text.starts_with(">cluster1\na1:4\n"));
    assert_eq!(text.lines().filter(|l| l.starts_with(">cluster")).count(), 2);
    assert_eq!(text.lines().count(), 7);
}
