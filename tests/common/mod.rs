//! In-memory serial double shared by the integration tests

#![allow(dead_code)]

use std::collections::VecDeque;

use rust_at_commands::{LineBuffer, LineIo};

/// Scripted input, captured wire and debug output
pub struct MemoryIo {
    input: VecDeque<u8>,
    pub wire: Vec<u8>,
    pub debug: String,
}

impl MemoryIo {
    pub fn new() -> Self {
        Self {
            input: VecDeque::new(),
            wire: Vec::new(),
            debug: String::new(),
        }
    }

    /// Queue raw bytes as if received on the serial port
    pub fn feed(&mut self, bytes: &[u8]) {
        self.input.extend(bytes.iter().copied());
    }

    pub fn wire_str(&self) -> &str {
        std::str::from_utf8(&self.wire).unwrap()
    }

    pub fn debug_contains(&self, s: &str) -> bool {
        self.debug.contains(s)
    }
}

impl LineIo for MemoryIo {
    fn poll_line(&mut self, terminator: u8, line: &mut LineBuffer) -> bool {
        while let Some(byte) = self.input.pop_front() {
            if byte == terminator {
                return true;
            }
            line.push(byte);
        }
        false
    }

    fn write_line(&mut self, payload: &[u8], terminator: &[u8]) {
        self.wire.extend_from_slice(payload);
        self.wire.extend_from_slice(terminator);
    }

    fn debug_write(&mut self, text: &str) {
        self.debug.push_str(text);
    }
}
