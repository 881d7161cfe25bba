//! Module: config
//!
//! Purpose: Grammar characters and console behaviour for the AT command set.
//!
//! Architecture:
//! - [`Grammar`]: wire grammar, fixed when the console is constructed
//! - [`Config`]: grammar plus diagnostic verbosity
//! - No runtime surface: firmware builds a `Config` once at startup
//!
//! Safety: plain data, validated by [`Grammar::validate`] before use.

use core::fmt;

use crate::command::line_buffer::LINE_CAPACITY;
use crate::logging::LogLevel;

/// Default maximum accepted line length (terminator excluded).
pub const DEFAULT_MAX_LINE_LEN: usize = LINE_CAPACITY;

/// Wire grammar of an AT-style command line.
///
/// ```text
/// AT+TESTS=hello,42,3.5
/// ^^ ^     ^     ^
/// |  |     |     separator_parameters
/// |  |     subcommand_write
/// |  separator_prefix
/// prefix
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grammar {
    /// Default: "AT", example: AT
    pub prefix: &'static str,
    /// Default: '+', example: AT+VERSION?
    pub separator_prefix: char,
    /// Default: ',', example: AT+PARAMETERS=custom,custom2
    pub separator_parameters: char,
    /// Default: '=', example: AT+PARAMETERS=custom,custom2
    pub subcommand_write: char,
    /// Default: '?', example: AT+VERSION?
    pub subcommand_read: char,
    /// Default: absent, example: AT+OFF
    pub subcommand_run: Option<char>,
    /// Line terminator on the wire.
    pub terminator: u8,
    /// Longest accepted line, terminator excluded.
    pub max_line_len: usize,
}

impl Grammar {
    /// Modem-style defaults.
    pub const DEFAULT: Grammar = Grammar {
        prefix: "AT",
        separator_prefix: '+',
        separator_parameters: ',',
        subcommand_write: '=',
        subcommand_read: '?',
        subcommand_run: None,
        terminator: b'\n',
        max_line_len: DEFAULT_MAX_LINE_LEN,
    };

    /// Check that the grammar can be parsed unambiguously.
    pub fn validate(&self) -> Result<(), GrammarError> {
        if self.prefix.is_empty() {
            return Err(GrammarError::EmptyPrefix);
        }
        if !self.prefix.is_ascii() || !self.terminator.is_ascii() {
            return Err(GrammarError::NonAscii);
        }
        if self.max_line_len == 0 || self.max_line_len > LINE_CAPACITY {
            return Err(GrammarError::LineLength(self.max_line_len));
        }

        let roles = self.roles();
        for (i, &c) in roles.iter().enumerate() {
            let Some(c) = c else { continue };
            if !c.is_ascii() {
                return Err(GrammarError::NonAscii);
            }
            if c as u32 == self.terminator as u32 {
                return Err(GrammarError::Collision(c));
            }
            if roles[i + 1..].iter().any(|&other| other == Some(c)) {
                return Err(GrammarError::Collision(c));
            }
        }

        Ok(())
    }

    /// Whether `c` ends the command name (`?`, `=` or the run character).
    pub fn is_subcommand(&self, c: char) -> bool {
        c == self.subcommand_read || c == self.subcommand_write || Some(c) == self.subcommand_run
    }

    /// Whether a command called `name` can be addressed by a line.
    ///
    /// Printable ASCII only, no subcommand character, no terminator.
    pub fn accepts_name(&self, name: &str) -> bool {
        name.bytes().all(|b| (b.is_ascii_graphic() || b == b' ') && b != self.terminator)
            && !name.chars().any(|c| self.is_subcommand(c))
    }

    fn roles(&self) -> [Option<char>; 5] {
        [
            Some(self.separator_prefix),
            Some(self.separator_parameters),
            Some(self.subcommand_write),
            Some(self.subcommand_read),
            self.subcommand_run,
        ]
    }
}

impl Default for Grammar {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Grammar rejected by [`Grammar::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrammarError {
    /// Prefix must contain at least one character
    EmptyPrefix,
    /// Grammar characters must be ASCII
    NonAscii,
    /// Two roles (or a role and the terminator) share a character
    Collision(char),
    /// Maximum line length outside `1..=LINE_CAPACITY`
    LineLength(usize),
}

impl fmt::Display for GrammarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPrefix => write!(f, "empty command prefix"),
            Self::NonAscii => write!(f, "grammar characters must be ASCII"),
            Self::Collision(c) => write!(f, "character {:?} used for more than one role", c),
            Self::LineLength(n) => {
                write!(f, "max line length {} outside 1..={}", n, LINE_CAPACITY)
            }
        }
    }
}

/// Console configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub grammar: Grammar,
    /// Most verbose level written to the debug channel.
    pub log_level: LogLevel,
    /// Append the error code to negative acknowledgements (`ERROR E05`).
    pub verbose_errors: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            grammar: Grammar::DEFAULT,
            log_level: LogLevel::Info,
            verbose_errors: false,
        }
    }
}
