//! Fernet Authenticated Tokens
//!
//! A token packs everything needed to decrypt except the key:
//!
//! ```text
//! [1 byte: version 0x80][8 bytes: timestamp (u64 BE)][16 bytes: IV]
//! [N*16 bytes: AES-128-CBC ciphertext, PKCS#7][32 bytes: HMAC-SHA256]
//! ```
//!
//! The HMAC covers every byte before it and is checked before the
//! ciphertext is touched. The whole token is stored as padded URL-safe
//! base64, which keeps `.env.enc` files readable by any Fernet
//! implementation.

use std::time::{SystemTime, UNIX_EPOCH};

use base64::{engine::general_purpose::URL_SAFE, Engine as _};
use cbc::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use hmac::{Hmac, Mac};
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha256;

use super::{DerivedKey, SecureBytes};
use crate::error::{Result, SecureEnvError};

type Aes128CbcEnc = cbc::Encryptor<aes::Aes128>;
type Aes128CbcDec = cbc::Decryptor<aes::Aes128>;
type HmacSha256 = Hmac<Sha256>;

/// The only token version this codec reads or writes
pub const VERSION: u8 = 0x80;

/// IV length (one AES block)
pub const IV_LEN: usize = 16;

/// AES block size; ciphertext is always a non-empty multiple of it
pub const BLOCK_LEN: usize = 16;

/// HMAC-SHA256 tag length
pub const HMAC_LEN: usize = 32;

const TIMESTAMP_LEN: usize = 8;

/// Bytes before the ciphertext: version + timestamp + IV
pub const HEADER_LEN: usize = 1 + TIMESTAMP_LEN + IV_LEN;

/// A parsed, not yet authenticated token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Creation time in seconds since the Unix epoch. Informational only.
    pub timestamp: u64,
    pub iv: [u8; IV_LEN],
    pub ciphertext: Vec<u8>,
    pub hmac: [u8; HMAC_LEN],
}

impl Token {
    /// Split raw token bytes into their fields
    ///
    /// Only structure is checked here. Any problem maps to `DecodeFailure`.
    pub fn parse(raw: &[u8]) -> Result<Self> {
        if raw.len() < HEADER_LEN + BLOCK_LEN + HMAC_LEN {
            return Err(SecureEnvError::DecodeFailure);
        }
        if raw[0] != VERSION {
            return Err(SecureEnvError::DecodeFailure);
        }

        let (signed, tag) = raw.split_at(raw.len() - HMAC_LEN);
        let ciphertext = &signed[HEADER_LEN..];
        if ciphertext.len() % BLOCK_LEN != 0 {
            return Err(SecureEnvError::DecodeFailure);
        }

        let mut timestamp = [0u8; TIMESTAMP_LEN];
        timestamp.copy_from_slice(&signed[1..1 + TIMESTAMP_LEN]);

        let mut iv = [0u8; IV_LEN];
        iv.copy_from_slice(&signed[1 + TIMESTAMP_LEN..HEADER_LEN]);

        let mut hmac = [0u8; HMAC_LEN];
        hmac.copy_from_slice(tag);

        Ok(Self {
            timestamp: u64::from_be_bytes(timestamp),
            iv,
            ciphertext: ciphertext.to_vec(),
            hmac,
        })
    }

    /// The bytes covered by the HMAC
    fn signed_bytes(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(HEADER_LEN + self.ciphertext.len());
        data.push(VERSION);
        data.extend_from_slice(&self.timestamp.to_be_bytes());
        data.extend_from_slice(&self.iv);
        data.extend_from_slice(&self.ciphertext);
        data
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut data = self.signed_bytes();
        data.extend_from_slice(&self.hmac);
        data
    }

    /// Constant-time HMAC check against the signing half of `key`
    fn verify(&self, key: &DerivedKey) -> Result<()> {
        let mut mac = HmacSha256::new_from_slice(key.signing_key())
            .map_err(|_| SecureEnvError::DecodeFailure)?;
        mac.update(&self.signed_bytes());
        mac.verify_slice(&self.hmac)
            .map_err(|_| SecureEnvError::DecodeFailure)
    }
}

/// Encrypt `plaintext` into a text token
///
/// Uses a fresh random IV and the current time on every call, so two
/// encryptions of the same data never produce the same token.
pub fn encode(key: &DerivedKey, plaintext: &[u8]) -> Result<String> {
    let mut iv = [0u8; IV_LEN];
    OsRng.fill_bytes(&mut iv);

    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();

    encode_at(key, plaintext, timestamp, iv)
}

/// Encrypt with a caller-supplied timestamp and IV
///
/// The IV must never repeat under the same key; outside of known-answer
/// tests use [`encode`].
pub fn encode_at(
    key: &DerivedKey,
    plaintext: &[u8],
    timestamp: u64,
    iv: [u8; IV_LEN],
) -> Result<String> {
    let ciphertext = Aes128CbcEnc::new_from_slices(key.encryption_key(), &iv)
        .map_err(|e| SecureEnvError::EncryptionFailed(e.to_string()))?
        .encrypt_padded_vec_mut::<Pkcs7>(plaintext);

    let mut token = Token {
        timestamp,
        iv,
        ciphertext,
        hmac: [0u8; HMAC_LEN],
    };

    let mut mac = HmacSha256::new_from_slice(key.signing_key())
        .map_err(|e| SecureEnvError::EncryptionFailed(e.to_string()))?;
    mac.update(&token.signed_bytes());
    token.hmac = mac.finalize().into_bytes().into();

    Ok(URL_SAFE.encode(token.to_bytes()))
}

/// Authenticate and decrypt a text token
///
/// Surrounding whitespace (e.g. a trailing newline) is ignored.
///
/// # Errors
/// Returns `DecodeFailure` for every kind of failure: wrong key, bad
/// base64, truncation, unknown version, flipped bits, bad padding.
pub fn decode(key: &DerivedKey, token: &[u8]) -> Result<SecureBytes> {
    let raw = URL_SAFE
        .decode(token.trim_ascii())
        .map_err(|_| SecureEnvError::DecodeFailure)?;

    let token = Token::parse(&raw)?;
    token.verify(key)?;

    let plaintext = Aes128CbcDec::new_from_slices(key.encryption_key(), &token.iv)
        .map_err(|_| SecureEnvError::DecodeFailure)?
        .decrypt_padded_vec_mut::<Pkcs7>(&token.ciphertext)
        .map_err(|_| SecureEnvError::DecodeFailure)?;

    tracing::debug!(
        created = token.timestamp,
        len = plaintext.len(),
        "token authenticated"
    );

    Ok(SecureBytes::new(plaintext))
}
