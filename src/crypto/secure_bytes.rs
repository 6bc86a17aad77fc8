//! Zeroizing byte buffer for key material and decrypted file contents
//!
//! The buffer is wiped on drop and, on Unix, pinned in RAM for its lifetime
//! so the secrets file never ends up in swap.

use std::ops::Deref;
use zeroize::Zeroize;

pub struct SecureBytes(Vec<u8>);

impl SecureBytes {
    /// Take ownership of `data`; its allocation is locked until drop
    pub fn new(data: Vec<u8>) -> Self {
        let secure = Self(data);
        secure.lock_memory();
        secure
    }

    /// A zero-filled buffer of `len` bytes, for output parameters
    pub fn zeroed(len: usize) -> Self {
        Self::new(vec![0u8; len])
    }

    #[cfg(unix)]
    fn lock_memory(&self) {
        if self.0.capacity() == 0 {
            return;
        }
        // Best effort: mlock fails without CAP_IPC_LOCK above RLIMIT_MEMLOCK
        unsafe {
            libc::mlock(self.0.as_ptr() as *const libc::c_void, self.0.capacity());
        }
    }

    #[cfg(unix)]
    fn unlock_memory(&self) {
        if self.0.capacity() == 0 {
            return;
        }
        unsafe {
            libc::munlock(self.0.as_ptr() as *const libc::c_void, self.0.capacity());
        }
    }

    #[cfg(not(unix))]
    fn lock_memory(&self) {}

    #[cfg(not(unix))]
    fn unlock_memory(&self) {}

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.0
    }
}

impl Deref for SecureBytes {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<u8>> for SecureBytes {
    fn from(data: Vec<u8>) -> Self {
        Self::new(data)
    }
}

impl Drop for SecureBytes {
    fn drop(&mut self) {
        self.0.zeroize();
        self.unlock_memory();
    }
}

impl std::fmt::Debug for SecureBytes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecureBytes")
            .field("len", &self.0.len())
            .field("data", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_output_is_redacted() {
        let secure = SecureBytes::new(b"API_KEY=hunter2".to_vec());
        let printed = format!("{:?}", secure);

        assert!(printed.contains("REDACTED"));
        assert!(!printed.contains("hunter2"));
    }

    #[test]
    fn test_zeroed_buffer_is_writable() {
        let mut secure = SecureBytes::zeroed(4);
        assert_eq!(&*secure, &[0, 0, 0, 0]);

        secure.as_mut_slice().copy_from_slice(&[1, 2, 3, 4]);
        assert_eq!(&*secure, &[1, 2, 3, 4]);
    }

    #[test]
    fn test_empty_buffer() {
        let secure = SecureBytes::from(Vec::new());
        assert!(secure.is_empty());
    }
}
