// SPDX-License-Identifier: GPL-3.0-only

use std::fmt;
use zeroize::Zeroize;

/// Upper bound on the number of bytes a single credential attempt may hold.
pub const MAX_SECRET_LEN: usize = 1024;

/// Capability handed to the authentication oracle: hands out the current
/// secret for exactly one conversation round.
pub trait SecretSource {
    fn supply_secret(&self) -> &[u8];
}

/// Credential entry buffer.
///
/// Storage is allocated once at `MAX_SECRET_LEN` and never moves, so no copy
/// of the secret is ever left behind in a freed allocation. Input that would
/// overflow the storage is dropped. The buffer never contains a NUL byte.
pub struct SecretBuffer {
    bytes: Box<[u8]>,
    len: usize,
}

impl SecretBuffer {
    pub fn new() -> SecretBuffer {
        SecretBuffer {
            bytes: vec![0u8; MAX_SECRET_LEN].into_boxed_slice(),
            len: 0,
        }
    }

    /// Appends the UTF-8 encoding of `ch`.
    ///
    /// Returns `false` if the code point was not stored, either because it
    /// is NUL or because the buffer is full.
    pub fn append(&mut self, ch: char) -> bool {
        if ch == '\0' {
            return false;
        }
        let width = ch.len_utf8();
        if self.len + width > self.bytes.len() {
            return false;
        }
        ch.encode_utf8(&mut self.bytes[self.len..self.len + width]);
        self.len += width;
        true
    }

    /// Overwrites the whole backing storage with zeroes and empties the buffer.
    pub fn erase(&mut self) {
        self.bytes.zeroize();
        self.len = 0;
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.len
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.bytes.len()
    }

    #[cfg(test)]
    pub(crate) fn storage(&self) -> &[u8] {
        &self.bytes
    }
}

impl Default for SecretBuffer {
    fn default() -> Self {
        SecretBuffer::new()
    }
}

impl SecretSource for SecretBuffer {
    fn supply_secret(&self) -> &[u8] {
        &self.bytes[..self.len]
    }
}

impl Drop for SecretBuffer {
    fn drop(&mut self) {
        self.erase();
    }
}

impl fmt::Debug for SecretBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretBuffer")
            .field("len", &self.len)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(input: &str) -> SecretBuffer {
        let mut buffer = SecretBuffer::new();
        for ch in input.chars() {
            assert!(buffer.append(ch));
        }
        buffer
    }

    #[test]
    fn appends_utf8() {
        let buffer = filled("aé€🔒");
        assert_eq!(buffer.supply_secret(), "aé€🔒".as_bytes());
        assert_eq!(buffer.len(), 1 + 2 + 3 + 4);
    }

    #[test]
    fn ignores_nul() {
        let mut buffer = filled("ab");
        assert!(!buffer.append('\0'));
        assert_eq!(buffer.supply_secret(), b"ab");
        assert!(!buffer.supply_secret().contains(&0));
    }

    #[test]
    fn erase_zeroes_all_storage() {
        let mut buffer = filled("hunter2");
        buffer.erase();
        assert!(buffer.is_empty());
        assert!(buffer.supply_secret().is_empty());
        assert!(buffer.storage().iter().all(|b| *b == 0));
        assert_eq!(buffer.capacity(), MAX_SECRET_LEN);
    }

    #[test]
    fn stops_at_capacity() {
        let mut buffer = SecretBuffer::new();
        for _ in 0..MAX_SECRET_LEN {
            assert!(buffer.append('x'));
        }
        assert!(!buffer.append('x'));
        assert_eq!(buffer.len(), MAX_SECRET_LEN);
        assert_eq!(buffer.capacity(), MAX_SECRET_LEN);
    }

    #[test]
    fn multibyte_that_does_not_fit_is_dropped_whole() {
        let mut buffer = SecretBuffer::new();
        for _ in 0..MAX_SECRET_LEN - 2 {
            buffer.append('x');
        }
        assert!(!buffer.append('🔒'));
        assert_eq!(buffer.len(), MAX_SECRET_LEN - 2);
        assert!(buffer.append('é'));
        assert_eq!(buffer.len(), MAX_SECRET_LEN);
    }

    #[test]
    fn debug_does_not_leak() {
        let buffer = filled("topsecret");
        let debug = format!("{:?}", buffer);
        assert!(!debug.contains("topsecret"));
        assert!(debug.contains("len: 9"));
    }
}
