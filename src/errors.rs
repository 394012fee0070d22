//! error type of the crate

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RotClustError {
    /// a parameter given by user is out of its range
    #[error("invalid parameter {name} : {value}, {reason}")]
    InvalidParameter { name : String, value : String, reason : String },
    /// bad record in sequence file
    #[error("parse error in {path} : {msg}")]
    Parse { path : String, msg : String },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("could not build thread pool : {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}  // end of RotClustError


impl RotClustError {
    pub(crate) fn invalid(name : &str, value : impl ToString, reason : &str) -> Self {
        RotClustError::InvalidParameter{name : name.to_string(), value : value.to_string(), reason : reason.to_string()}
    }
} // end of impl RotClustError
