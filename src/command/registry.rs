//! Command registry
//!
//! Append-only table of commands, their parameter declarations and callbacks.
//! Populated at startup, read-only once dispatch begins. Lookups are linear:
//! a firmware command set is tens of entries.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use super::codec::{ParameterType, TypedValue};
use super::CommandError;

/// Command kind, selected by the character after the name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    /// `AT+NAME=a,b` - carries positional parameters
    Write,
    /// `AT+NAME?` - queries a value
    Read,
    /// `AT+NAME` - triggers an action
    Run,
}

impl CommandKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Write => "WRITE",
            Self::Read => "READ",
            Self::Run => "RUN",
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declared positional parameter of a Write command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterSpec {
    name: String,
    ty: ParameterType,
}

impl ParameterSpec {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parameter_type(&self) -> ParameterType {
        self.ty
    }
}

/// Callback handle, one shape per command kind
pub enum Callback {
    /// Receives decoded parameters in declaration order
    Write(Box<dyn FnMut(&[TypedValue])>),
    Read(Box<dyn FnMut()>),
    Run(Box<dyn FnMut()>),
}

impl Callback {
    pub fn write(f: impl FnMut(&[TypedValue]) + 'static) -> Self {
        Self::Write(Box::new(f))
    }

    pub fn read(f: impl FnMut() + 'static) -> Self {
        Self::Read(Box::new(f))
    }

    pub fn run(f: impl FnMut() + 'static) -> Self {
        Self::Run(Box::new(f))
    }

    /// Kind of command this handle can serve
    pub fn kind(&self) -> CommandKind {
        match self {
            Self::Write(_) => CommandKind::Write,
            Self::Read(_) => CommandKind::Read,
            Self::Run(_) => CommandKind::Run,
        }
    }

    /// Invoke the handle. Read and Run ignore `values`.
    pub(crate) fn invoke(&mut self, values: &[TypedValue]) {
        match self {
            Self::Write(f) => f(values),
            Self::Read(f) | Self::Run(f) => f(),
        }
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Callback::{}", self.kind())
    }
}

/// Registered command
#[derive(Debug)]
pub struct Command {
    name: String,
    kind: CommandKind,
    parameters: Vec<ParameterSpec>,
    callback: Option<Callback>,
}

impl Command {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> CommandKind {
        self.kind
    }

    /// Parameters in positional order (empty unless Write)
    pub fn parameters(&self) -> &[ParameterSpec] {
        &self.parameters
    }

    pub fn has_callback(&self) -> bool {
        self.callback.is_some()
    }

    pub(crate) fn callback_mut(&mut self) -> Option<&mut Callback> {
        self.callback.as_mut()
    }
}

/// Stable index of a command in its registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommandId(usize);

impl CommandId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Append-only command table
#[derive(Debug, Default)]
pub struct Registry {
    commands: Vec<Command>,
}

impl Registry {
    /// Create empty registry
    pub const fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    /// Register a new command with no parameters and no callback
    ///
    /// The same name may be registered once per kind.
    pub fn register(&mut self, name: &str, kind: CommandKind) -> Result<CommandId, CommandError> {
        if name.is_empty() {
            return Err(CommandError::EmptyName);
        }
        if self.position(name, kind).is_some() {
            return Err(CommandError::DuplicateCommand);
        }

        let command = Command {
            name: owned(name)?,
            kind,
            parameters: Vec::new(),
            callback: None,
        };
        self.commands
            .try_reserve(1)
            .map_err(|_| CommandError::AllocationFailure)?;
        self.commands.push(command);

        Ok(CommandId(self.commands.len() - 1))
    }

    /// Append a parameter to the most recently registered command called `name`
    ///
    /// Returns the parameter's position.
    pub fn add_parameter(
        &mut self,
        name: &str,
        parameter: &str,
        ty: ParameterType,
    ) -> Result<usize, CommandError> {
        let command = self
            .commands
            .iter_mut()
            .rev()
            .find(|c| c.name == name)
            .ok_or(CommandError::UnknownCommand)?;

        if command.kind != CommandKind::Write {
            return Err(CommandError::WrongCommandKind);
        }
        if parameter.is_empty() {
            return Err(CommandError::EmptyName);
        }

        let spec = ParameterSpec {
            name: owned(parameter)?,
            ty,
        };
        command
            .parameters
            .try_reserve(1)
            .map_err(|_| CommandError::AllocationFailure)?;
        command.parameters.push(spec);

        Ok(command.parameters.len() - 1)
    }

    /// Attach (or replace) the callback of command (`name`, `kind`)
    pub fn set_callback(
        &mut self,
        name: &str,
        kind: CommandKind,
        callback: Callback,
    ) -> Result<(), CommandError> {
        let id = self
            .position(name, kind)
            .ok_or(CommandError::UnknownCommand)?;

        if callback.kind() != kind {
            return Err(CommandError::WrongCommandKind);
        }

        self.commands[id.0].callback = Some(callback);
        Ok(())
    }

    /// Find command by exact (name, kind)
    pub fn find(&self, name: &str, kind: CommandKind) -> Option<&Command> {
        self.commands
            .iter()
            .find(|c| c.kind == kind && c.name == name)
    }

    /// Index of command (`name`, `kind`)
    pub fn position(&self, name: &str, kind: CommandKind) -> Option<CommandId> {
        self.commands
            .iter()
            .position(|c| c.kind == kind && c.name == name)
            .map(CommandId)
    }

    pub fn get(&self, id: CommandId) -> Option<&Command> {
        self.commands.get(id.0)
    }

    pub(crate) fn get_mut(&mut self, id: CommandId) -> Option<&mut Command> {
        self.commands.get_mut(id.0)
    }

    /// All commands registered under `name`, in registration order
    pub fn named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Command> + 'a {
        self.commands.iter().filter(move |c| c.name == name)
    }

    /// All commands in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Command> {
        self.commands.iter()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// Registry-owned copy of a caller string
fn owned(s: &str) -> Result<String, CommandError> {
    let mut out = String::new();
    out.try_reserve_exact(s.len())
        .map_err(|_| CommandError::AllocationFailure)?;
    out.push_str(s);
    Ok(out)
}
