//! Seal the secrets file into its `.enc` sibling

use std::path::PathBuf;

use colored::Colorize;
use secrecy::ExposeSecret;

use crate::config::{read_plaintext, write_atomic, FileConfig};
use crate::crypto;
use crate::error::{Result, SecureEnvError};

use super::{step, step_done, PasswordSource};

/// Encrypt `P` into `P.enc`, returning the path written
///
/// The plaintext file is left in place.
pub fn run(config: &FileConfig, passwords: &mut dyn PasswordSource) -> Result<PathBuf> {
    let source = config.plaintext_path();
    if !source.exists() {
        return Err(SecureEnvError::SourceNotFound(source.to_path_buf()));
    }

    let password = passwords.read_password("Enter encryption password: ")?;
    let confirm = passwords.read_password("Confirm password: ")?;

    // A typo here would lock the file forever
    if password.expose_secret() != confirm.expose_secret() {
        tracing::info!(path = %source.display(), "password confirmation mismatch");
        return Err(SecureEnvError::PasswordMismatch);
    }
    drop(confirm);

    step("Deriving encryption key... ")?;
    let key = crypto::derive_key(password.expose_secret().as_bytes(), &config.kdf)?;
    drop(password);
    step_done();

    let plaintext = read_plaintext(source)?;
    let token = crypto::encode(&key, &plaintext)?;

    let destination = config.token_path();
    write_atomic(&destination, token.as_bytes())?;

    tracing::info!(
        source = %source.display(),
        destination = %destination.display(),
        plaintext_len = plaintext.len(),
        "encrypted secrets file"
    );
    println!(
        "{} {}",
        "File encrypted to".green(),
        destination.display().to_string().cyan()
    );

    Ok(destination)
}
