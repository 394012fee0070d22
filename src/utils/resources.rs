//! Timing and resource usage of a run, and the run summary.
//! The clustering engine does not report resources itself, the caller does it after the engine returns.

use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::SystemTime;

use cpu_time::ProcessTime;
use serde::{Deserialize, Serialize};
use serde_json::to_writer_pretty;

use crate::errors::RotClustError;
use super::parameters::ClusteringParams;


/// Resource usage at some point of a run
#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
pub struct ResourceUsage {
    /// wall clock time since start (s)
    pub real_time : f64,
    /// process cpu time since start, all threads (s)
    pub cpu_time : f64,
    /// resident memory (Gb), None if not available on platform
    pub rss_gb : Option<f64>,
}


impl std::fmt::Display for ResourceUsage {
    fn fmt(&self, f : &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Real time: {:.3} sec; CPU: {:.3} sec; ", self.real_time, self.cpu_time)?;
        match self.rss_gb {
            Some(rss) => write!(f, "RSS: {:.3} GB", rss),
            None => write!(f, "RSS: unavailable"),
        }
    }
}


/// Started at beginning of main, gives elapsed and cpu times.
pub struct RunTimer {
    start_t : SystemTime,
    cpu_start : ProcessTime,
}


impl RunTimer {
    pub fn start() -> Self {
        RunTimer{start_t : SystemTime::now(), cpu_start : ProcessTime::now()}
    }

    /// current usage. Memory is the resident set size given by memory_stats
    pub fn usage(&self) -> ResourceUsage {
        let real_time = self.start_t.elapsed().map(|d| d.as_secs_f64()).unwrap_or(0.);
        let cpu_time = self.cpu_start.elapsed().as_secs_f64();
        let rss_gb = memory_stats::memory_stats().map(|m| m.physical_mem as f64 / (1024. * 1024. * 1024.));
        ResourceUsage{real_time, cpu_time, rss_gb}
    }

    /// logs usage at info level with a tag
    pub fn report(&self, tag : &str) -> ResourceUsage {
        let usage = self.usage();
        log::info!("[{}] {}", tag, usage);
        usage
    }
} // end of impl RunTimer


//=========================================================================================


/// What a run did, logged at end and possibly dumped in json.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunSummary {
    /// date of end of run (rfc3339)
    pub date : String,
    pub input : String,
    pub output : String,
    pub clusters_file : Option<String>,
    pub nb_sequences : usize,
    pub nb_clusters : usize,
    pub params : ClusteringParams,
    pub usage : ResourceUsage,
}


impl RunSummary {
    pub fn new(input : &Path, output : &Path, clusters_file : Option<&Path>, nb_sequences : usize, nb_clusters : usize,
                params : ClusteringParams, usage : ResourceUsage) -> Self {
        RunSummary{
            date : chrono::Local::now().to_rfc3339(),
            input : input.display().to_string(),
            output : output.display().to_string(),
            clusters_file : clusters_file.map(|p| p.display().to_string()),
            nb_sequences, nb_clusters, params, usage
        }
    } // end of new


    pub fn log(&self) {
        log::info!("[SUMMARY]");
        log::info!("  Input FASTA     : {}", self.input);
        log::info!("  Output FASTA    : {}", self.output);
        if let Some(clusters_file) = &self.clusters_file {
            log::info!("  Clusters file   : {}", clusters_file);
        }
        log::info!("  Sequences       : {}", self.nb_sequences);
        log::info!("  Clusters        : {}", self.nb_clusters);
        log::info!("  length_ratio    : {:.3}", self.params.get_length_ratio());
        log::info!("  similarity      : {:.3}", self.params.get_similarity());
        log::info!("  distance mode   : {}", self.params.get_distance_mode());
        log::info!("  {}", self.usage);
    } // end of log


    pub fn dump_json(&self, filepath : &Path) -> Result<(), RotClustError> {
        log::info!("dumping run summary in json file : {:?}", filepath);
        let file = OpenOptions::new().write(true).create(true).truncate(true).open(filepath)?;
        let mut writer = BufWriter::new(file);
        to_writer_pretty(&mut writer, &self)?;
        writer.flush()?;
        Ok(())
    } // end of dump_json

} // end of impl RunSummary


//=========================================================================================

// end of mod tests
