//! Line buffer for incoming command lines

/// Maximum command line length, trailing `\r` excluded
pub const LINE_CAPACITY: usize = 128;

/// Bytes held by a [`LineBuffer`]: a full line plus the `\r` of a CR LF terminal
pub const BUFFER_CAPACITY: usize = LINE_CAPACITY + 1;

/// Line input buffer
///
/// Bytes pushed past capacity are discarded and the buffer is marked
/// overflowed until the next [`clear`](LineBuffer::clear).
pub struct LineBuffer {
    buf: [u8; BUFFER_CAPACITY],
    len: usize,
    overflowed: bool,
}

impl LineBuffer {
    /// Create empty buffer
    pub const fn new() -> Self {
        Self {
            buf: [0u8; BUFFER_CAPACITY],
            len: 0,
            overflowed: false,
        }
    }

    /// Push a byte
    ///
    /// Returns `false` if the byte did not fit.
    pub fn push(&mut self, c: u8) -> bool {
        if self.len < BUFFER_CAPACITY {
            self.buf[self.len] = c;
            self.len += 1;
            true
        } else {
            self.overflowed = true;
            false
        }
    }

    /// Push a run of bytes, stopping at capacity
    pub fn extend_from_slice(&mut self, bytes: &[u8]) {
        for &b in bytes {
            if !self.push(b) {
                break;
            }
        }
    }

    /// Clear buffer and overflow flag
    pub fn clear(&mut self) {
        self.len = 0;
        self.overflowed = false;
    }

    /// Whether input was discarded since the last clear
    pub fn is_overflowed(&self) -> bool {
        self.overflowed
    }

    /// Get buffer as string slice, empty if not UTF-8
    pub fn as_str(&self) -> &str {
        core::str::from_utf8(&self.buf[..self.len]).unwrap_or("")
    }

    /// Get buffer length
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Get raw bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::new()
    }
}
