//! Reading and writing the secrets file pair
//!
//! Writes go through a temporary file in the destination directory that is
//! synced and then renamed over the target, so a failed run never leaves a
//! truncated `.env` or `.env.enc` behind.

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::crypto::SecureBytes;
use crate::error::{Result, SecureEnvError};

/// Read the whole plaintext file into zeroizing memory
pub fn read_plaintext(path: &Path) -> Result<SecureBytes> {
    if !path.exists() {
        return Err(SecureEnvError::SourceNotFound(path.to_path_buf()));
    }
    Ok(SecureBytes::new(fs::read(path)?))
}

/// Read the token file as stored (base64 text)
pub fn read_token(path: &Path) -> Result<Vec<u8>> {
    if !path.exists() {
        return Err(SecureEnvError::TokenNotFound(path.to_path_buf()));
    }
    Ok(fs::read(path)?)
}

/// Replace `path` with `data` in one rename
///
/// The new file is readable by the owner only on Unix.
pub fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(data)?;
    file.as_file().sync_all()?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(file.path(), fs::Permissions::from_mode(0o600))?;
    }

    file.persist(path).map_err(|e| SecureEnvError::Io(e.error))?;

    tracing::debug!(path = %path.display(), bytes = data.len(), "wrote file");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_new_file() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join(".env.enc");

        write_atomic(&dest, b"token").unwrap();

        assert_eq!(fs::read(&dest).unwrap(), b"token");
        // Only the destination remains; the temp file was renamed
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_write_overwrites_existing() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join(".env");
        fs::write(&dest, b"a much longer old value").unwrap();

        write_atomic(&dest, b"new").unwrap();

        assert_eq!(fs::read(&dest).unwrap(), b"new");
    }

    #[cfg(unix)]
    #[test]
    fn test_written_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let dest = dir.path().join(".env");
        write_atomic(&dest, b"SECRET=1").unwrap();

        let mode = fs::metadata(&dest).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_missing_files_map_to_distinct_errors() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope");

        assert!(matches!(
            read_plaintext(&missing),
            Err(SecureEnvError::SourceNotFound(p)) if p == missing
        ));
        assert!(matches!(
            read_token(&missing),
            Err(SecureEnvError::TokenNotFound(p)) if p == missing
        ));
    }
}
