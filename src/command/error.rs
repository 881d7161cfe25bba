//! Command error types

use alloc::string::String;

/// Command error with code and message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// E01: (name, kind) already registered
    DuplicateCommand,
    /// E02: No command matches the name (and kind)
    UnknownCommand,
    /// E03: Operation not allowed for the command's kind
    WrongCommandKind,
    /// E04: Parameter count differs from the declaration
    ArityMismatch { expected: usize, found: usize },
    /// E05: Parameter token does not decode as its declared type
    TypeError { parameter: String },
    /// E06: Line exceeds the maximum length
    LineTooLong,
    /// E07: Line does not follow the command grammar
    FormatError,
    /// E08: Command is valid but has no callback attached
    NoCallbackRegistered,
    /// E09: Registry growth failed
    AllocationFailure,
    /// E10: Command or parameter name is empty
    EmptyName,
    /// E11: Registration attempted after dispatch started
    RegistrySealed,
    /// E12: Command name cannot appear on a line in the configured grammar
    InvalidName,
}

impl CommandError {
    /// Get error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::DuplicateCommand => "E01",
            Self::UnknownCommand => "E02",
            Self::WrongCommandKind => "E03",
            Self::ArityMismatch { .. } => "E04",
            Self::TypeError { .. } => "E05",
            Self::LineTooLong => "E06",
            Self::FormatError => "E07",
            Self::NoCallbackRegistered => "E08",
            Self::AllocationFailure => "E09",
            Self::EmptyName => "E10",
            Self::RegistrySealed => "E11",
            Self::InvalidName => "E12",
        }
    }

    /// Get error message
    pub fn message(&self) -> &'static str {
        match self {
            Self::DuplicateCommand => "duplicate command",
            Self::UnknownCommand => "unknown command",
            Self::WrongCommandKind => "wrong command kind",
            Self::ArityMismatch { .. } => "wrong number of parameters",
            Self::TypeError { .. } => "invalid parameter value",
            Self::LineTooLong => "line too long",
            Self::FormatError => "malformed command line",
            Self::NoCallbackRegistered => "no callback registered",
            Self::AllocationFailure => "out of memory",
            Self::EmptyName => "empty name",
            Self::RegistrySealed => "registry sealed",
            Self::InvalidName => "invalid command name",
        }
    }
}

impl core::fmt::Display for CommandError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())?;
        match self {
            Self::ArityMismatch { expected, found } => {
                write!(f, " (expected {}, got {})", expected, found)
            }
            Self::TypeError { parameter } => write!(f, " ({})", parameter),
            _ => Ok(()),
        }
    }
}
