//! Command line parser
//!
//! `AT+NAME?` / `AT+NAME=a,b,c` / `AT+NAME` into (name, kind, raw tokens).
//! No registry knowledge: arity and types are checked by the dispatcher.

use alloc::vec::Vec;

use super::registry::CommandKind;
use super::CommandError;
use crate::config::Grammar;

/// Tokenized command line borrowing from the raw input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine<'a> {
    /// The command name, without prefix or suffix
    pub name: &'a str,
    pub kind: CommandKind,
    /// Raw parameter tokens, Write only
    pub tokens: Vec<&'a str>,
}

/// Parse one line (terminator already removed)
pub fn parse_line<'a>(raw: &'a [u8], grammar: &Grammar) -> Result<ParsedLine<'a>, CommandError> {
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    if raw.len() > grammar.max_line_len {
        return Err(CommandError::LineTooLong);
    }

    if !raw.is_ascii() {
        return Err(CommandError::FormatError);
    }
    let line = core::str::from_utf8(raw).map_err(|_| CommandError::FormatError)?;

    let rest = line
        .strip_prefix(grammar.prefix)
        .and_then(|r| r.strip_prefix(grammar.separator_prefix))
        .ok_or(CommandError::FormatError)?;

    let (name, kind, tokens) = match rest.find(|c| grammar.is_subcommand(c)) {
        None => match grammar.subcommand_run {
            None => (rest, CommandKind::Run, Vec::new()),
            // A configured run character must be present
            Some(_) => return Err(CommandError::FormatError),
        },
        Some(idx) => {
            let name = &rest[..idx];
            let mut tail = rest[idx..].chars();
            let suffix = tail.next().ok_or(CommandError::FormatError)?;
            let tail = tail.as_str();

            if suffix == grammar.subcommand_write {
                (name, CommandKind::Write, split_parameters(tail, grammar)?)
            } else if tail.is_empty() {
                let kind = if suffix == grammar.subcommand_read {
                    CommandKind::Read
                } else {
                    CommandKind::Run
                };
                (name, kind, Vec::new())
            } else {
                return Err(CommandError::FormatError);
            }
        }
    };

    if name.is_empty() {
        return Err(CommandError::FormatError);
    }

    Ok(ParsedLine { name, kind, tokens })
}

/// Split a Write remainder into tokens
///
/// An empty remainder is zero tokens. Empty tokens inside a list are rejected.
fn split_parameters<'a>(tail: &'a str, grammar: &Grammar) -> Result<Vec<&'a str>, CommandError> {
    if tail.is_empty() {
        return Ok(Vec::new());
    }

    let tokens: Vec<&str> = tail.split(grammar.separator_parameters).collect();
    if tokens.iter().any(|t| t.is_empty()) {
        return Err(CommandError::FormatError);
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_without_parameters() {
        let parsed = parse_line(b"AT+RESET=", &Grammar::DEFAULT).unwrap();
        assert_eq!(parsed.kind, CommandKind::Write);
        assert!(parsed.tokens.is_empty());
    }

    #[test]
    fn test_trailing_carriage_return_dropped() {
        let parsed = parse_line(b"AT+INFO?\r", &Grammar::DEFAULT).unwrap();
        assert_eq!(parsed.name, "INFO");
        assert_eq!(parsed.kind, CommandKind::Read);
    }

    #[test]
    fn test_configured_run_character() {
        let grammar = Grammar {
            subcommand_run: Some('!'),
            ..Grammar::DEFAULT
        };

        let parsed = parse_line(b"AT+OFF!", &grammar).unwrap();
        assert_eq!(parsed.name, "OFF");
        assert_eq!(parsed.kind, CommandKind::Run);

        assert_eq!(parse_line(b"AT+OFF", &grammar), Err(CommandError::FormatError));
        assert_eq!(parse_line(b"AT+OFF!x", &grammar), Err(CommandError::FormatError));
    }
}
