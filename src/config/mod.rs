//! File locations and key-derivation settings for one invocation
//!
//! Handles:
//! - The plaintext path and its `.enc` sibling
//! - Reading both files and writing them back atomically

mod storage;

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::crypto::KdfParams;

pub use storage::{read_plaintext, read_token, write_atomic};

/// Secrets file protected when no path is given on the command line
pub const DEFAULT_SECRETS_FILE: &str = ".env";

/// Appended to the plaintext file name to get the token file name
pub const ENCRYPTED_SUFFIX: &str = ".enc";

/// Everything a flow needs besides the password
#[derive(Debug, Clone)]
pub struct FileConfig {
    plaintext_path: PathBuf,
    pub kdf: KdfParams,
}

impl FileConfig {
    pub fn new(plaintext_path: impl Into<PathBuf>) -> Self {
        Self {
            plaintext_path: plaintext_path.into(),
            kdf: KdfParams::default(),
        }
    }

    pub fn with_kdf(mut self, kdf: KdfParams) -> Self {
        self.kdf = kdf;
        self
    }

    pub fn plaintext_path(&self) -> &Path {
        &self.plaintext_path
    }

    /// `P` -> `P.enc`; the suffix is appended, never substituted
    pub fn token_path(&self) -> PathBuf {
        let mut name: OsString = self.plaintext_path.clone().into_os_string();
        name.push(ENCRYPTED_SUFFIX);
        PathBuf::from(name)
    }
}

impl Default for FileConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SECRETS_FILE)
    }
}
