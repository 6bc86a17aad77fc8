//! Cryptographic primitives for secure-env
//!
//! This module provides:
//! - PBKDF2-HMAC-SHA256 for password-based key derivation
//! - Fernet tokens (AES-128-CBC + HMAC-SHA256) for authenticated encryption
//! - Secure memory handling with automatic zeroing

mod kdf;
mod secure_bytes;
pub mod token;

pub use kdf::{derive_key, DerivedKey, KdfParams, DEFAULT_ITERATIONS, DEFAULT_SALT, KEY_LEN};
pub use secure_bytes::SecureBytes;
pub use token::{decode, encode};
