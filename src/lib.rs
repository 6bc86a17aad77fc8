//! Secure Env - password-protected encryption for a project's secrets file
//!
//! This crate:
//! - Derives a 256-bit key from a password with PBKDF2-HMAC-SHA256
//! - Seals the secrets file (`.env` by default) into a Fernet token stored as `.env.enc`
//! - Restores the plaintext from the token, rejecting wrong passwords and tampered files
//! - Never stores the password or reads it from the environment

pub mod cli;
pub mod config;
pub mod crypto;
pub mod error;

pub use error::{Result, SecureEnvError};
