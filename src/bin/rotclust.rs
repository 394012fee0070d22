//! rotclust <in.fa> <out.fa> [options]
//!
//! Clusters sequences similar up to a rotation and/or a reverse complement and dumps one representative by cluster.
//!
//! -l --length-ratio : minimum ratio of lengths of compared sequences, in (0,1]. Default 0.85
//! -s --similarity : similarity threshold to the cluster seed, in (0,1]. Default 0.90
//! -c --clusters : file where cluster membership is dumped. Default none.
//! -x --r2rtr [BOOL] : input names carry a r2rtr score after the last ':', representative is the best scored read.
//!         Default is to keep the longest read.
//! -t --threads : number of threads. Default all available.
//! -m --mode : distance engine, approx (default) exact or cutoff.
//! --claim : merged (default) or locked.
//! --summary : dump a json summary of the run in this file.
//!
//! Logging is done with env_logger, set RUST_LOG=info to get progress.

use clap::{Arg, ArgAction, ArgMatches, Command};
use anyhow::{Context, anyhow};

use std::path::PathBuf;

// for logging (debug mostly, switched at compile time in cargo.toml)
use env_logger::Builder;

use rotclust::utils::*;
use rotclust::cluster::{ClusterEngine, ClaimStrategy, RepPolicy};
use rotclust::dna::DistanceMode;


// install a logger facility
pub fn init_log() -> u64 {
    Builder::from_default_env().init();
    println!("\n ************** initializing logger *****************\n");
    return 1;
}


// what the command line asks for
struct RunArgs {
    input : PathBuf,
    output : PathBuf,
    clusters_file : Option<PathBuf>,
    summary_file : Option<PathBuf>,
    rep_policy : RepPolicy,
    params : ClusteringParams,
}


#[doc(hidden)]
fn parse_args(matches : &ArgMatches) -> Result<RunArgs, anyhow::Error> {
    log::debug!("in parse_args");
    //
    let input = matches.get_one::<PathBuf>("input").ok_or_else(|| anyhow!("input file is mandatory"))?.clone();
    let output = matches.get_one::<PathBuf>("output").ok_or_else(|| anyhow!("output file is mandatory"))?.clone();
    let clusters_file = matches.get_one::<PathBuf>("clusters").cloned();
    let summary_file = matches.get_one::<PathBuf>("summary").cloned();
    //
    let length_ratio = *matches.get_one::<f64>("length_ratio").unwrap_or(&DEFAULT_LENGTH_RATIO);
    let similarity = *matches.get_one::<f64>("similarity").unwrap_or(&DEFAULT_SIMILARITY);
    let nb_threads = matches.get_one::<usize>("threads").copied().unwrap_or_else(num_cpus::get);
    //
    let mode = match matches.get_one::<String>("mode") {
        Some(mode) => mode.parse::<DistanceMode>().map_err(|_| anyhow!("unknown distance mode {}", mode))?,
        None => DistanceMode::default(),
    };
    let claim = match matches.get_one::<String>("claim") {
        Some(claim) => claim.parse::<ClaimStrategy>().map_err(|_| anyhow!("unknown claim strategy {}", claim))?,
        None => ClaimStrategy::default(),
    };
    let by_score = matches.get_one::<bool>("r2rtr").copied().unwrap_or(false);
    let rep_policy = if by_score { RepPolicy::Score } else { RepPolicy::Length };
    //
    let params = ClusteringParams::new(length_ratio, similarity)?
            .with_threads(nb_threads)?
            .with_distance_mode(mode)
            .with_claim_strategy(claim);
    //
    Ok(RunArgs{input, output, clusters_file, summary_file, rep_policy, params})
} // end of parse_args



fn run(args : &RunArgs) -> Result<(), anyhow::Error> {
    let timer = RunTimer::start();
    //
    log::info!("Reading sequences...");
    let reads = load_reads(&args.input).with_context(|| format!("cannot load {:?}", args.input))?;
    log::info!("Loaded {} sequences", reads.len());
    timer.report("loaded");
    //
    log::info!("Rotation-aware clustering started");
    let engine = ClusterEngine::new(args.params)?;
    let partition = engine.cluster(&reads);
    log::info!("Clustering finished");
    log::info!("Total clusters: {}", partition.get_nb_clusters());
    //
    write_clusters_fasta(&partition, &reads, &args.output, args.rep_policy)
            .with_context(|| format!("cannot write {:?}", args.output))?;
    if let Some(clusters_file) = &args.clusters_file {
        write_clusters_txt(&partition, &reads, clusters_file)
                .with_context(|| format!("cannot write {:?}", clusters_file))?;
    }
    //
    let usage = timer.report("INFO");
    let summary = RunSummary::new(&args.input, &args.output, args.clusters_file.as_deref(),
                    reads.len(), partition.get_nb_clusters(), args.params, usage);
    summary.log();
    if let Some(summary_file) = &args.summary_file {
        summary.dump_json(summary_file).with_context(|| format!("cannot write {:?}", summary_file))?;
    }
    println!("rotclust : {} sequences, {} clusters, {}", reads.len(), partition.get_nb_clusters(), usage);
    Ok(())
} // end of run


//============================================================================================


// command line description
fn build_cli() -> Command {
    Command::new("rotclust")
        .version("0.1.0")
        .about("Rotation and strand aware greedy clustering of circular sequences")
        .arg(Arg::new("input")
            .help("input fasta/fastq file, possibly gzipped")
            .required(true)
            .value_parser(clap::value_parser!(PathBuf))
            .action(ArgAction::Set),
        )
        .arg(Arg::new("output")
            .help("output fasta file of cluster representatives")
            .required(true)
            .value_parser(clap::value_parser!(PathBuf))
            .action(ArgAction::Set),
        )
        .arg(Arg::new("length_ratio")
            .short('l')
            .long("length-ratio")
            .value_name("FLOAT")
            .help("Minimum length ratio")
            .default_value("0.85")
            .value_parser(clap::value_parser!(f64))
            .action(ArgAction::Set),
        )
        .arg(Arg::new("similarity")
            .short('s')
            .long("similarity")
            .value_name("FLOAT")
            .help("Similarity threshold")
            .default_value("0.90")
            .value_parser(clap::value_parser!(f64))
            .action(ArgAction::Set),
        )
        .arg(Arg::new("clusters")
            .short('c')
            .long("clusters")
            .value_name("FILE")
            .help("Output clustering results to this file")
            .required(false)
            .value_parser(clap::value_parser!(PathBuf))
            .action(ArgAction::Set),
        )
        .arg(Arg::new("r2rtr")
            .short('x')
            .long("r2rtr")
            .value_name("BOOL")
            .help("input names are in r2rtr format, representative is chosen by score")
            .long_help("input names are in r2rtr format (score after the last ':'), representative is chosen by score.\n\
                -x alone means true, -x 1 / -x 0 (or true / false) are accepted too.\n\
                Without a value, put -x after the input and output files.")
            .num_args(0..=1)
            .default_value("false")
            .default_missing_value("true")
            .value_parser(clap::builder::BoolishValueParser::new())
            .action(ArgAction::Set),
        )
        .arg(Arg::new("threads")
            .short('t')
            .long("threads")
            .value_name("INT")
            .help("Number of threads (default: max available)")
            .required(false)
            .value_parser(clap::value_parser!(usize))
            .action(ArgAction::Set),
        )
        .arg(Arg::new("mode")
            .short('m')
            .long("mode")
            .value_name("MODE")
            .help("distance engine : approx, exact or cutoff")
            .default_value("approx")
            .value_parser(["approx", "exact", "cutoff"])
            .action(ArgAction::Set),
        )
        .arg(Arg::new("claim")
            .long("claim")
            .value_name("STRATEGY")
            .help("claim strategy in parallel scan : merged or locked")
            .default_value("merged")
            .value_parser(["merged", "locked"])
            .action(ArgAction::Set),
        )
        .arg(Arg::new("summary")
            .long("summary")
            .value_name("FILE")
            .help("dump a json summary of the run")
            .required(false)
            .value_parser(clap::value_parser!(PathBuf))
            .action(ArgAction::Set),
        )
} // end of build_cli


fn main() {
    let _ = init_log();
    //
    let matches = build_cli().get_matches();
    //
    let args = match parse_args(&matches) {
        Ok(args) => args,
        Err(e) => {
            log::error!("bad arguments : {:#}", e);
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = run(&args) {
        log::error!("rotclust failed : {:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
} // end of main


//============================================================================================

#[cfg(test)]
mod tests {

    use super::*;

    fn parse(argv : &[&str]) -> RunArgs {
        let matches = build_cli().try_get_matches_from(argv.iter().copied()).unwrap();
        parse_args(&matches).unwrap()
    }

    #[test]
    fn test_defaults() {
        let args = parse(&["rotclust", "in.fa", "out.fa"]);
        assert_eq!(args.rep_policy, RepPolicy::Length);
        assert_eq!(args.params.get_length_ratio(), 0.85);
        assert_eq!(args.params.get_similarity(), 0.90);
        assert_eq!(args.params.get_distance_mode(), DistanceMode::Approx);
        assert!(args.params.get_nb_threads() > 0);
        assert!(args.clusters_file.is_none());
    }

    #[test]
    fn test_r2rtr_with_or_without_value() {
        assert_eq!(parse(&["rotclust", "in.fa", "out.fa", "-x"]).rep_policy, RepPolicy::Score);
        assert_eq!(parse(&["rotclust", "in.fa", "out.fa", "-x", "1"]).rep_policy, RepPolicy::Score);
        assert_eq!(parse(&["rotclust", "in.fa", "out.fa", "-x", "true"]).rep_policy, RepPolicy::Score);
        assert_eq!(parse(&["rotclust", "in.fa", "out.fa", "-x", "0"]).rep_policy, RepPolicy::Length);
        let args = parse(&["rotclust", "-x", "1", "in.fa", "out.fa", "-t", "2"]);
        assert_eq!(args.rep_policy, RepPolicy::Score);
        assert_eq!(args.input, PathBuf::from("in.fa"));
        assert_eq!(args.params.get_nb_threads(), 2);
    }

    #[test]
    fn test_bad_values_rejected() {
        let matches = build_cli().try_get_matches_from(["rotclust", "in.fa", "out.fa", "-s", "1.5"]).unwrap();
        assert!(parse_args(&matches).is_err());
        let matches = build_cli().try_get_matches_from(["rotclust", "in.fa", "out.fa", "-t", "0"]).unwrap();
        assert!(parse_args(&matches).is_err());
        assert!(build_cli().try_get_matches_from(["rotclust", "in.fa", "out.fa", "-m", "fast"]).is_err());
    }

} // end of mod tests
