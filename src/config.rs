//! Runtime configuration read from the environment.
//!
//! Every variable is optional; unset ones fall back to defaults that run an
//! in-memory board on port 3000 with the 08:00-20:00 half-hour timeline.

use std::fs::File;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::timeline::TimelineWindow;

pub const HTTP_ADDR_VAR: &str = "WORK_CALENDAR_HTTP_ADDR";
pub const DATABASE_VAR: &str = "WORK_CALENDAR_DB";
pub const TIMELINE_VAR: &str = "WORK_CALENDAR_TIMELINE";
pub const SESSIONS_VAR: &str = "WORK_CALENDAR_SESSIONS";

const DEFAULT_HTTP_ADDR: &str = "0.0.0.0:3000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid timeline window: {0}")]
    InvalidWindow(String),

    #[error("invalid value for {name}: {message}")]
    InvalidVar { name: &'static str, message: String },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to initialize logging: {0}")]
    Telemetry(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub http_addr: SocketAddr,
    pub database_path: Option<PathBuf>,
    pub sessions_path: Option<PathBuf>,
    pub timeline: TimelineWindow,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_addr = lookup(HTTP_ADDR_VAR).unwrap_or_else(|| DEFAULT_HTTP_ADDR.to_string());
        let http_addr = raw_addr
            .trim()
            .parse()
            .map_err(|err: std::net::AddrParseError| ConfigError::InvalidVar {
                name: HTTP_ADDR_VAR,
                message: format!("'{raw_addr}': {err}"),
            })?;

        let timeline = match non_blank(lookup(TIMELINE_VAR)) {
            Some(path) => load_timeline_window(path)?,
            None => TimelineWindow::default(),
        };

        Ok(Self {
            http_addr,
            database_path: non_blank(lookup(DATABASE_VAR)).map(PathBuf::from),
            sessions_path: non_blank(lookup(SESSIONS_VAR)).map(PathBuf::from),
            timeline,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

pub(crate) fn read_json<T, P>(path: P) -> Result<T, ConfigError>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(file).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads a window from JSON; out-of-range hours or a zero slot width fail to parse.
pub fn load_timeline_window<P: AsRef<Path>>(path: P) -> Result<TimelineWindow, ConfigError> {
    read_json(path)
}

pub fn save_timeline_window<P: AsRef<Path>>(
    window: &TimelineWindow,
    path: P,
) -> Result<(), ConfigError> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::to_writer_pretty(file, window).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
