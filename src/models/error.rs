use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SwapError {
    #[error("Resource not found: '{path}'")]
    NotFound { path: PathBuf },

    #[error("No backup of '{original}' exists at '{backup}'")]
    BackupMissing { original: PathBuf, backup: PathBuf },

    #[error("Failed to {operation} '{path}': {cause}")]
    IoFailure {
        operation: &'static str,
        path: PathBuf,
        cause: io::Error,
    },

    #[error("Failed to hash file '{path}': {cause}")]
    HashError { path: PathBuf, cause: io::Error },

    #[error("Failed to read config file '{path}': {cause}")]
    ConfigRead { path: PathBuf, cause: io::Error },

    #[error("Failed to parse config file '{path}': {cause}")]
    ConfigParse {
        path: PathBuf,
        cause: serde_json::Error,
    },

    #[error("Failed to write config file '{path}': {cause}")]
    ConfigWrite { path: PathBuf, cause: io::Error },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("EasiNote 5 installation directory not found")]
    InstallNotFound,

    #[error("Resource directory not found: '{path}'")]
    ResourceDirNotFound { path: PathBuf },

    #[error("Unsupported resource '{path}': {reason}")]
    UnsupportedResource { path: PathBuf, reason: String },

    #[error("Failed to read directory entry: {0}")]
    DirectoryRead(String),
}

impl SwapError {
    pub fn io(operation: &'static str, path: impl Into<PathBuf>, cause: io::Error) -> Self {
        SwapError::IoFailure {
            operation,
            path: path.into(),
            cause,
        }
    }
}

pub type Result<T> = std::result::Result<T, SwapError>;
