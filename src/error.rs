use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SecureEnvError>;

#[derive(Debug, Error)]
pub enum SecureEnvError {
    #[error("File {} not found.", .0.display())]
    SourceNotFound(PathBuf),

    #[error("File {} not found.", .0.display())]
    TokenNotFound(PathBuf),

    #[error("Passwords do not match.")]
    PasswordMismatch,

    /// Wrong password, truncated or corrupted token, unsupported version.
    /// Deliberately carries no detail.
    #[error("Decryption failed. Wrong password?")]
    DecodeFailure,

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
