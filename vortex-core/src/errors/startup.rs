use std::path::PathBuf;
use thiserror::Error;

/// Fatal conditions that prevent the core from beginning to serve traffic.
#[derive(Error, Debug)]
pub enum StartupError {
    #[error("shared region `{path}` not found: {source}")]
    ShmNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("shared region `{path}` is {actual} bytes, need at least {expected}")]
    ShmTooSmall {
        path: PathBuf,
        expected: usize,
        actual: usize,
    },

    #[error("shared region `{path}`: permission denied: {source}")]
    ShmPermission {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to bind listener on `{addr}`: {source}")]
    BindFailed {
        addr: String,
        #[source]
        source: std::io::Error,
    },
}
