//! Fixed-capacity text buffer.
//!
//! Log bodies and identity prefixes are assembled on the stack. Writes past
//! the capacity are silently dropped, mirroring bounded `snprintf` semantics:
//! a buffer of capacity `N` holds at most `N - 1` bytes of content (the last
//! byte is reserved for the terminator the sink protocol historically expects).

use std::fmt;

/// A stack buffer of `N` bytes that truncates instead of growing.
///
/// Truncation always lands on a UTF-8 character boundary, so the content may
/// be a few bytes shorter than `N - 1` when a multi-byte character straddles
/// the limit.
pub struct BoundedBuf<const N: usize> {
    bytes: [u8; N],
    len: usize,
    truncated: bool,
}

impl<const N: usize> BoundedBuf<N> {
    /// Maximum number of content bytes.
    pub const MAX_CONTENT: usize = N.saturating_sub(1);

    /// Create an empty buffer.
    pub const fn new() -> Self {
        Self {
            bytes: [0; N],
            len: 0,
            truncated: false,
        }
    }

    /// The buffered text.
    pub fn as_str(&self) -> &str {
        // Only whole UTF-8 sequences are ever copied in.
        std::str::from_utf8(&self.bytes[..self.len]).unwrap_or_default()
    }

    /// Number of content bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the buffer holds no content.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether any write was cut short.
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// Append as much of `s` as fits.
    pub fn push_str(&mut self, s: &str) {
        let room = Self::MAX_CONTENT - self.len;
        let mut take = s.len().min(room);
        if take < s.len() {
            self.truncated = true;
            while !s.is_char_boundary(take) {
                take -= 1;
            }
        }
        self.bytes[self.len..self.len + take].copy_from_slice(&s.as_bytes()[..take]);
        self.len += take;
    }
}

impl<const N: usize> Default for BoundedBuf<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> fmt::Write for BoundedBuf<N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        // Never report an error: a truncated log line is still delivered.
        self.push_str(s);
        Ok(())
    }
}

impl<const N: usize> fmt::Display for BoundedBuf<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<const N: usize> fmt::Debug for BoundedBuf<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundedBuf")
            .field("capacity", &N)
            .field("content", &self.as_str())
            .field("truncated", &self.truncated)
            .finish()
    }
}
