//! Line dispatch
//!
//! Parse, resolve against the registry, decode parameters positionally and
//! invoke the callback. Wire and debug output is left to the console.

use alloc::string::String;
use alloc::vec::Vec;

use super::codec::{decode, TypedValue};
use super::parser::parse_line;
use super::registry::{CommandId, CommandKind, Registry};
use super::CommandError;
use crate::config::Grammar;

/// Successful dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatched {
    /// Callback ran
    Invoked(CommandId),
    /// Command is valid but nothing is attached
    NoCallback(CommandId),
}

impl Dispatched {
    pub fn command(self) -> CommandId {
        match self {
            Self::Invoked(id) | Self::NoCallback(id) => id,
        }
    }
}

/// Response to one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Acknowledgement {
    /// `OK`
    Ok,
    /// `ERROR`
    Error(CommandError),
}

impl Acknowledgement {
    pub fn is_positive(&self) -> bool {
        matches!(self, Self::Ok)
    }

    pub fn error(&self) -> Option<&CommandError> {
        match self {
            Self::Ok => None,
            Self::Error(e) => Some(e),
        }
    }
}

/// Positive acknowledgement token
pub const OK_TOKEN: &str = "OK";

/// Negative acknowledgement token
pub const ERROR_TOKEN: &str = "ERROR";

/// Registry plus the grammar its lines are written in
#[derive(Debug)]
pub struct Dispatcher {
    grammar: Grammar,
    registry: Registry,
}

impl Dispatcher {
    pub fn new(grammar: Grammar, registry: Registry) -> Self {
        Self { grammar, registry }
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub(crate) fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    /// Dispatch one raw line (terminator removed)
    ///
    /// No callback runs unless every parameter decodes.
    pub fn dispatch(&mut self, raw: &[u8]) -> Result<Dispatched, CommandError> {
        let parsed = parse_line(raw, &self.grammar)?;

        let id = self
            .registry
            .position(parsed.name, parsed.kind)
            .ok_or(CommandError::UnknownCommand)?;

        let values = match parsed.kind {
            CommandKind::Write => self.decode_parameters(id, &parsed.tokens)?,
            CommandKind::Read | CommandKind::Run => Vec::new(),
        };

        let command = self
            .registry
            .get_mut(id)
            .ok_or(CommandError::UnknownCommand)?;

        match command.callback_mut() {
            Some(callback) => {
                callback.invoke(&values);
                Ok(Dispatched::Invoked(id))
            }
            None => Ok(Dispatched::NoCallback(id)),
        }
    }

    fn decode_parameters(
        &self,
        id: CommandId,
        tokens: &[&str],
    ) -> Result<Vec<TypedValue>, CommandError> {
        let command = self.registry.get(id).ok_or(CommandError::UnknownCommand)?;
        let params = command.parameters();

        if tokens.len() != params.len() {
            return Err(CommandError::ArityMismatch {
                expected: params.len(),
                found: tokens.len(),
            });
        }

        let mut values = Vec::new();
        values
            .try_reserve_exact(params.len())
            .map_err(|_| CommandError::AllocationFailure)?;

        for (token, spec) in tokens.iter().zip(params) {
            let value = decode(token, spec.parameter_type()).map_err(|_| {
                CommandError::TypeError {
                    parameter: String::from(spec.name()),
                }
            })?;
            values.push(value);
        }

        Ok(values)
    }
}
