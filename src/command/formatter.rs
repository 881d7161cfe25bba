//! Command syntax rendering for diagnostics
//!
//! `AT+TESTS=<P1:STRING>,<P2:INTEGER>,<P3:FLOAT>`

use alloc::string::{String, ToString};
use core::fmt;

use super::registry::{Command, CommandKind};
use crate::config::Grammar;

/// Displays a registered command in its invocation grammar
pub struct CommandSyntax<'a> {
    command: &'a Command,
    grammar: &'a Grammar,
}

impl<'a> CommandSyntax<'a> {
    pub fn new(command: &'a Command, grammar: &'a Grammar) -> Self {
        Self { command, grammar }
    }
}

impl fmt::Display for CommandSyntax<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let g = self.grammar;
        write!(f, "{}{}{}", g.prefix, g.separator_prefix, self.command.name())?;

        match self.command.kind() {
            CommandKind::Read => write!(f, "{}", g.subcommand_read),
            CommandKind::Run => match g.subcommand_run {
                Some(c) => write!(f, "{}", c),
                None => Ok(()),
            },
            CommandKind::Write => {
                write!(f, "{}", g.subcommand_write)?;
                let params = self.command.parameters();
                if params.is_empty() {
                    return f.write_str("<no parameters>");
                }
                for (i, p) in params.iter().enumerate() {
                    if i > 0 {
                        write!(f, "{}", g.separator_parameters)?;
                    }
                    write!(f, "<{}:{}>", p.name(), p.parameter_type().type_name())?;
                }
                Ok(())
            }
        }
    }
}

/// Render `command` as a string
pub fn format(command: &Command, grammar: &Grammar) -> String {
    CommandSyntax::new(command, grammar).to_string()
}
