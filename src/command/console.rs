//! Main console struct integrating all components

use alloc::string::String;

use super::codec::{ParameterType, TypedValue};
use super::dispatcher::{Acknowledgement, Dispatched, Dispatcher, ERROR_TOKEN, OK_TOKEN};
use super::formatter::{format, CommandSyntax};
use super::line_buffer::LineBuffer;
use super::registry::{Callback, CommandId, CommandKind, Registry};
use super::CommandError;
use crate::config::{Config, Grammar, GrammarError};
use crate::io::LineIo;
use crate::logging::{format_to_buffer, utf8_prefix, DebugLog, LogLevel};
use crate::{diag_debug, diag_error, diag_info, diag_log, diag_trace, diag_warn};

/// Version string (set by build.rs, includes git hash)
pub const VERSION: &str = env!("VERSION_STRING");

/// AT command console
///
/// Owns the I/O collaborator and the registry. Registration happens first;
/// the first [`poll`](Console::poll) or [`dispatch`](Console::dispatch) seals
/// the registry and further registration calls are refused.
pub struct Console<IO: LineIo> {
    io: IO,
    dispatcher: Dispatcher,
    line: LineBuffer,
    log: DebugLog,
    verbose_errors: bool,
    sealed: bool,
}

impl<IO: LineIo> Console<IO> {
    /// Create console with an empty registry
    pub fn new(io: IO, config: Config) -> Result<Self, GrammarError> {
        config.grammar.validate()?;
        Ok(Self::build(io, config))
    }

    /// Create console with the default `AT+` grammar
    pub fn with_defaults(io: IO) -> Self {
        Self::build(io, Config::default())
    }

    fn build(io: IO, config: Config) -> Self {
        Self {
            io,
            dispatcher: Dispatcher::new(config.grammar, Registry::new()),
            line: LineBuffer::new(),
            log: DebugLog::new(config.log_level),
            verbose_errors: config.verbose_errors,
            sealed: false,
        }
    }

    // --- Registration ---

    /// Register a command
    ///
    /// Errors are reported on the debug channel and leave the registry unchanged.
    pub fn register_command(&mut self, name: &str, kind: CommandKind) -> Result<CommandId, CommandError> {
        let result = self
            .check_open()
            .and_then(|()| self.check_name(name))
            .and_then(|()| self.dispatcher.registry_mut().register(name, kind));

        match &result {
            Ok(id) => diag_info!(
                self.log,
                &mut self.io,
                "Command {} ({}) registered at commands[{}]",
                name,
                kind,
                id.index()
            ),
            Err(e) => self.report("register", name, e),
        }
        result
    }

    /// Append a parameter to the Write command `name`
    pub fn add_parameter(&mut self, name: &str, parameter: &str, ty: ParameterType) -> Result<(), CommandError> {
        let result = self
            .check_open()
            .and_then(|()| self.dispatcher.registry_mut().add_parameter(name, parameter, ty));

        match &result {
            Ok(position) => {
                diag_debug!(
                    self.log,
                    &mut self.io,
                    "Parameter {}:{} added to {} at position {}",
                    parameter,
                    ty,
                    name,
                    position
                );
                let repeated = self
                    .dispatcher
                    .registry()
                    .named(name)
                    .last()
                    .map(|c| c.parameters().iter().filter(|p| p.name() == parameter).count() > 1)
                    .unwrap_or(false);
                if repeated {
                    diag_warn!(self.log, &mut self.io, "Parameter {} declared twice on {}", parameter, name);
                }
            }
            Err(e) => self.report("add parameter to", name, e),
        }
        result.map(|_| ())
    }

    /// Attach a callback to (`name`, `kind`)
    pub fn set_callback(&mut self, name: &str, kind: CommandKind, callback: Callback) -> Result<(), CommandError> {
        let result = self
            .check_open()
            .and_then(|()| self.dispatcher.registry_mut().set_callback(name, kind, callback));

        match &result {
            Ok(()) => diag_debug!(self.log, &mut self.io, "Callback attached to {} ({})", name, kind),
            Err(e) => self.report("set callback on", name, e),
        }
        result
    }

    /// Attach a Write callback
    pub fn set_write_callback(
        &mut self,
        name: &str,
        f: impl FnMut(&[TypedValue]) + 'static,
    ) -> Result<(), CommandError> {
        self.set_callback(name, CommandKind::Write, Callback::write(f))
    }

    /// Attach a Read callback
    pub fn set_read_callback(&mut self, name: &str, f: impl FnMut() + 'static) -> Result<(), CommandError> {
        self.set_callback(name, CommandKind::Read, Callback::read(f))
    }

    /// Attach a Run callback
    pub fn set_run_callback(&mut self, name: &str, f: impl FnMut() + 'static) -> Result<(), CommandError> {
        self.set_callback(name, CommandKind::Run, Callback::run(f))
    }

    /// End the registration phase
    pub fn seal(&mut self) {
        if !self.sealed {
            self.sealed = true;
            diag_debug!(
                self.log,
                &mut self.io,
                "Registry sealed with {} commands",
                self.dispatcher.registry().len()
            );
        }
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    // --- Introspection ---

    /// Write the syntax of every command called `name` to the debug channel
    pub fn debug_command(&mut self, name: &str) {
        let grammar = self.dispatcher.grammar();
        let mut found = false;

        for command in self.dispatcher.registry().named(name) {
            found = true;
            diag_info!(
                self.log,
                &mut self.io,
                "{} -> {}",
                name,
                CommandSyntax::new(command, grammar)
            );
        }

        if !found {
            diag_warn!(self.log, &mut self.io, "No command named {}", name);
        }
    }

    /// Write the syntax of every registered command to the debug channel
    pub fn debug_commands(&mut self) {
        let grammar = self.dispatcher.grammar();
        for (idx, command) in self.dispatcher.registry().iter().enumerate() {
            diag_info!(
                self.log,
                &mut self.io,
                "commands[{}] {}",
                idx,
                CommandSyntax::new(command, grammar)
            );
        }
    }

    /// Syntax of command (`name`, `kind`)
    pub fn describe(&self, name: &str, kind: CommandKind) -> Option<String> {
        self.dispatcher
            .registry()
            .find(name, kind)
            .map(|c| format(c, self.dispatcher.grammar()))
    }

    // --- Run loop ---

    /// One run loop iteration
    ///
    /// Returns `None` if no complete line was available.
    pub fn poll(&mut self) -> Option<Acknowledgement> {
        self.seal();

        let terminator = self.dispatcher.grammar().terminator;
        if !self.io.poll_line(terminator, &mut self.line) {
            return None;
        }

        let line = core::mem::take(&mut self.line);
        let ack = if line.is_overflowed() {
            diag_warn!(self.log, &mut self.io, "Line discarded: {}", CommandError::LineTooLong);
            let ack = Acknowledgement::Error(CommandError::LineTooLong);
            self.acknowledge(&ack);
            Some(ack)
        } else if line.as_bytes().iter().all(|&b| b == b'\r') {
            // Blank line, nothing to answer
            None
        } else {
            Some(self.dispatch(line.as_bytes()))
        };

        self.line = line;
        self.line.clear();
        ack
    }

    /// Dispatch one line and write the acknowledgement to the wire
    pub fn dispatch(&mut self, raw: &[u8]) -> Acknowledgement {
        self.seal();

        diag_trace!(self.log, &mut self.io, "<< {}", utf8_prefix(raw));

        let ack = match self.dispatcher.dispatch(raw) {
            Ok(dispatched) => {
                let name = command_name(self.dispatcher.registry(), dispatched.command());
                match dispatched {
                    Dispatched::Invoked(_) => {
                        diag_debug!(self.log, &mut self.io, "{} handled", name)
                    }
                    Dispatched::NoCallback(_) => diag_warn!(
                        self.log,
                        &mut self.io,
                        "{}: {}",
                        name,
                        CommandError::NoCallbackRegistered
                    ),
                }
                Acknowledgement::Ok
            }
            Err(e) => {
                let level = severity(&e);
                diag_log!(level, self.log, &mut self.io, "{} rejected: {}", utf8_prefix(raw), e);
                Acknowledgement::Error(e)
            }
        };

        self.acknowledge(&ack);
        ack
    }

    /// Print welcome banner on the debug channel
    pub fn print_banner(&mut self) {
        self.io.debug_write("\r\n");
        self.io.debug_write(VERSION);
        self.io.debug_write("\r\n");
        self.debug_commands();
    }

    // --- Accessors ---

    pub fn registry(&self) -> &Registry {
        self.dispatcher.registry()
    }

    pub fn grammar(&self) -> &Grammar {
        self.dispatcher.grammar()
    }

    pub fn io(&self) -> &IO {
        &self.io
    }

    pub fn io_mut(&mut self) -> &mut IO {
        &mut self.io
    }

    pub fn into_io(self) -> IO {
        self.io
    }

    // --- Internals ---

    fn check_open(&self) -> Result<(), CommandError> {
        if self.sealed {
            Err(CommandError::RegistrySealed)
        } else {
            Ok(())
        }
    }

    /// Empty names are left to the registry (`EmptyName`)
    fn check_name(&self, name: &str) -> Result<(), CommandError> {
        if self.dispatcher.grammar().accepts_name(name) {
            Ok(())
        } else {
            Err(CommandError::InvalidName)
        }
    }

    fn report(&mut self, action: &str, name: &str, err: &CommandError) {
        diag_error!(self.log, &mut self.io, "Cannot {} {}: {}", action, name, err);
    }

    fn acknowledge(&mut self, ack: &Acknowledgement) {
        let terminator = [self.dispatcher.grammar().terminator];
        match ack {
            Acknowledgement::Ok => self.io.write_line(OK_TOKEN.as_bytes(), &terminator),
            Acknowledgement::Error(e) if self.verbose_errors => {
                let mut buf = [0u8; 16];
                let len = format_to_buffer(&mut buf, format_args!("{} {}", ERROR_TOKEN, e.code()));
                self.io.write_line(&buf[..len], &terminator);
            }
            Acknowledgement::Error(_) => self.io.write_line(ERROR_TOKEN.as_bytes(), &terminator),
        }
    }
}

fn command_name(registry: &Registry, id: CommandId) -> &str {
    registry.get(id).map(|c| c.name()).unwrap_or("?")
}

/// Log level for a rejected line
fn severity(err: &CommandError) -> LogLevel {
    match err {
        CommandError::AllocationFailure => LogLevel::Error,
        _ => LogLevel::Warn,
    }
}
