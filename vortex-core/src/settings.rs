//! A minimal environment-driven settings layer; no config file, watcher, or nested sections.
//!
//! Every field has a hardcoded default that matches the wire/shared-memory contract; the
//! overrides exist purely so the binary can be pointed at a test fixture without recompiling.

use crate::constants::{DEFAULT_BIND_ADDR, DEFAULT_LISTEN_BACKLOG, DEFAULT_SHM_PATH};
use crate::errors::SettingsError;
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Resolved runtime settings for the ingest daemon.
#[derive(Debug, Clone)]
pub struct Settings {
    pub bind_addr: SocketAddr,
    pub shm_path: PathBuf,
    pub listen_backlog: u32,
    pub log_level: String,
}

impl Settings {
    /// Resolve settings from the environment, falling back to the built-in defaults.
    pub fn from_env() -> Result<Self, SettingsError> {
        let bind_addr = match env::var("VORTEX_BIND_ADDR") {
            Ok(v) => v
                .parse()
                .map_err(|_| SettingsError::BadBindAddr { var: "VORTEX_BIND_ADDR", value: v })?,
            Err(_) => DEFAULT_BIND_ADDR.parse().expect("default bind addr is valid"),
        };

        let shm_path = env::var_os("VORTEX_SHM_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SHM_PATH));

        let listen_backlog = match env::var("VORTEX_LISTEN_BACKLOG") {
            Ok(v) => v.parse().map_err(|_| SettingsError::BadInteger {
                var: "VORTEX_LISTEN_BACKLOG",
                value: v,
            })?,
            Err(_) => DEFAULT_LISTEN_BACKLOG,
        };

        let log_level = env::var("VORTEX_LOG")
            .or_else(|_| env::var("RUST_LOG"))
            .unwrap_or_else(|_| "info".to_string());

        Ok(Self { bind_addr, shm_path, listen_backlog, log_level })
    }
}
