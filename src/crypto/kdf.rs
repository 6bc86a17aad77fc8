//! PBKDF2-HMAC-SHA256 Key Derivation
//!
//! Turns the user's password into the 32-byte key consumed by the token
//! codec. The iteration count makes each password guess cost as much as a
//! full unlock, which is what protects a leaked `.env.enc`.

use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;

use super::SecureBytes;
use crate::error::{Result, SecureEnvError};

/// Derived key length in bytes (HMAC signing half + AES encryption half)
pub const KEY_LEN: usize = 32;

/// Length of each half of the derived key
pub const HALF_KEY_LEN: usize = KEY_LEN / 2;

/// Iteration count shared with existing `.env.enc` files
pub const DEFAULT_ITERATIONS: u32 = 480_000;

/// Salt shared by every file this tool has ever written.
///
/// A fixed salt means the password alone is enough to decrypt on another
/// machine. It also means identical passwords produce identical keys
/// across projects.
pub const DEFAULT_SALT: &[u8] = b"salt_";

/// Inputs to key derivation other than the password
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KdfParams {
    pub salt: Vec<u8>,
    pub iterations: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            salt: DEFAULT_SALT.to_vec(),
            iterations: DEFAULT_ITERATIONS,
        }
    }
}

impl KdfParams {
    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_salt(mut self, salt: impl Into<Vec<u8>>) -> Self {
        self.salt = salt.into();
        self
    }
}

/// A 256-bit key derived from a password
///
/// The token format splits it in two: the first half signs, the second
/// half encrypts.
pub struct DerivedKey {
    key: SecureBytes,
}

impl DerivedKey {
    /// Wrap raw key bytes, e.g. a key decoded from a test vector
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self {
            key: SecureBytes::new(bytes.to_vec()),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.key
    }

    /// HMAC-SHA256 key (bytes 0..16)
    pub fn signing_key(&self) -> &[u8] {
        &self.key[..HALF_KEY_LEN]
    }

    /// AES-128 key (bytes 16..32)
    pub fn encryption_key(&self) -> &[u8] {
        &self.key[HALF_KEY_LEN..]
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("DerivedKey([REDACTED])")
    }
}

/// Derive an encryption key from a password using PBKDF2-HMAC-SHA256
///
/// # Arguments
/// * `password` - The user's password, accepted even when empty
/// * `params` - Salt and iteration count
///
/// # Errors
/// Returns `InvalidConfig` if the iteration count is zero
pub fn derive_key(password: &[u8], params: &KdfParams) -> Result<DerivedKey> {
    if params.iterations == 0 {
        return Err(SecureEnvError::InvalidConfig(
            "PBKDF2 iteration count must be positive".into(),
        ));
    }

    let mut key = SecureBytes::zeroed(KEY_LEN);
    pbkdf2_hmac::<Sha256>(password, &params.salt, params.iterations, key.as_mut_slice());

    tracing::debug!(iterations = params.iterations, salt_len = params.salt.len(), "derived key");

    Ok(DerivedKey { key })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_params() -> KdfParams {
        KdfParams::default().with_iterations(1_000)
    }

    #[test]
    fn test_derive_key_deterministic() {
        let key1 = derive_key(b"correct-horse", &fast_params()).unwrap();
        let key2 = derive_key(b"correct-horse", &fast_params()).unwrap();

        assert_eq!(key1.as_bytes(), key2.as_bytes());
        assert_eq!(key1.as_bytes().len(), KEY_LEN);
    }

    #[test]
    fn test_derive_key_different_passwords() {
        let key1 = derive_key(b"correct-horse", &fast_params()).unwrap();
        let key2 = derive_key(b"wrong-pass", &fast_params()).unwrap();

        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_derive_key_different_salts() {
        let key1 = derive_key(b"correct-horse", &fast_params()).unwrap();
        let key2 = derive_key(b"correct-horse", &fast_params().with_salt(*b"pepper")).unwrap();

        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_derive_key_different_iterations() {
        let key1 = derive_key(b"correct-horse", &fast_params()).unwrap();
        let key2 = derive_key(b"correct-horse", &fast_params().with_iterations(1_001)).unwrap();

        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_empty_password_accepted() {
        let key = derive_key(b"", &fast_params()).unwrap();
        assert_eq!(key.as_bytes().len(), KEY_LEN);
    }

    #[test]
    fn test_zero_iterations_rejected() {
        let result = derive_key(b"password", &fast_params().with_iterations(0));
        assert!(matches!(result, Err(SecureEnvError::InvalidConfig(_))));
    }

    #[test]
    fn test_rfc7914_vector() {
        // PBKDF2-HMAC-SHA256 test vector from RFC 7914 section 11
        let params = KdfParams::default().with_salt(*b"salt").with_iterations(1);
        let key = derive_key(b"passwd", &params).unwrap();

        assert_eq!(
            key.as_bytes(),
            &[
                0x55, 0xac, 0x04, 0x6e, 0x56, 0xe3, 0x08, 0x9f, 0xec, 0x16, 0x91, 0xc2, 0x25,
                0x44, 0xb6, 0x05, 0xf9, 0x41, 0x85, 0x21, 0x6d, 0xde, 0x04, 0x65, 0xe6, 0x8b,
                0x9d, 0x57, 0xc2, 0x0d, 0xac, 0xbc,
            ]
        );
    }

    #[test]
    fn test_key_halves() {
        let mut raw = [0u8; KEY_LEN];
        for (i, b) in raw.iter_mut().enumerate() {
            *b = i as u8;
        }
        let key = DerivedKey::from_bytes(raw);

        assert_eq!(key.signing_key(), &raw[..16]);
        assert_eq!(key.encryption_key(), &raw[16..]);
        assert_eq!(format!("{:?}", key), "DerivedKey([REDACTED])");
    }
}
