//! Restore the secrets file from its `.enc` sibling

use std::path::PathBuf;

use colored::Colorize;
use secrecy::ExposeSecret;

use crate::config::{read_token, write_atomic, FileConfig};
use crate::crypto;
use crate::error::{Result, SecureEnvError};

use super::{step, step_done, PasswordSource};

/// Decrypt `P.enc` into `P`, returning the path written
///
/// A wrong password and a damaged file fail the same way and leave `P`
/// untouched.
pub fn run(config: &FileConfig, passwords: &mut dyn PasswordSource) -> Result<PathBuf> {
    let source = config.token_path();
    if !source.exists() {
        return Err(SecureEnvError::TokenNotFound(source));
    }

    let password = passwords.read_password("Enter decryption password: ")?;

    step("Deriving encryption key... ")?;
    let key = crypto::derive_key(password.expose_secret().as_bytes(), &config.kdf)?;
    drop(password);
    step_done();

    let token = read_token(&source)?;
    let plaintext = crypto::decode(&key, &token)
        .inspect_err(|_| tracing::warn!(path = %source.display(), "token rejected"))?;

    let destination = config.plaintext_path();
    write_atomic(destination, &plaintext)?;

    tracing::info!(
        source = %source.display(),
        destination = %destination.display(),
        plaintext_len = plaintext.len(),
        "decrypted secrets file"
    );
    println!(
        "{} {}",
        "File decrypted to".green(),
        destination.display().to_string().cyan()
    );

    Ok(destination.to_path_buf())
}
