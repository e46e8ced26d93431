use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

// Startup failures, the server never begins serving after one of these
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid replacement pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("couldn't read routes file {path}: {source}")]
    RoutesFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("error parsing routes csv: {0}")]
    Csv(#[from] csv::Error),

    #[error("please provide either --routes or --cmd")]
    NoRouteSource,

    #[error("couldn't open log file {path}: {source}")]
    LogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// Rejected GET parameters
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubstitutionError {
    #[error("GET param {name:?} has {count} values, exactly one is allowed")]
    Arity { name: String, count: usize },

    #[error("GET param {name:?} doesn't begin with $")]
    Prefix { name: String },

    #[error("GET param {name:?} value doesn't match the replacement pattern")]
    Pattern { name: String },

    #[error("malformed query string: {0}")]
    Malformed(String),
}

// Command failures, captured output is kept alongside in ExecutionResult
#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("failed to start shell: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("command exited with {0}")]
    Exit(ExitStatus),
}

// Anything that turns a matched route into a 500
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Substitution(#[from] SubstitutionError),

    #[error(transparent)]
    Execution(#[from] ExecutionError),
}
