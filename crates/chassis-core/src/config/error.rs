//! # Chassis Core Configuration Errors
//!
//! Defines [`ConfigError`], covering the two loading failure classes
//! (discovery and parsing) and the two lookup failure classes (unknown
//! namespace and unfollowable path).
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config discovery failed for directory '{path}': {source}")]
    Discovery {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to load config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    #[error("unsupported config format for file: {0}")]
    UnsupportedFormat(PathBuf),

    #[error("namespace '{namespace}' is declared by more than one config file (second: '{path}')")]
    DuplicateNamespace { namespace: String, path: PathBuf },

    #[error("unknown config namespace '{0}'")]
    UnknownNamespace(String),

    #[error("config path '{path}' cannot be followed at segment '{segment}': {reason}")]
    PathNotFollowable {
        path: String,
        segment: String,
        reason: String,
    },

    #[error("config value at '{path}' does not match the requested type: {source}")]
    TypeMismatch {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
