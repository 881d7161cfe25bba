//! AT-style command registry, parser and dispatcher
//!
//! Polled from the firmware main loop - no dedicated task.
//! Registry is built at startup and sealed once dispatch begins.

pub mod codec;
pub mod console;
pub mod dispatcher;
pub mod error;
pub mod formatter;
pub mod line_buffer;
pub mod parser;
pub mod registry;

pub use codec::{decode, type_name, ParameterType, TypeMismatch, TypedValue};
pub use console::{Console, VERSION};
pub use dispatcher::{Acknowledgement, Dispatched, Dispatcher};
pub use error::CommandError;
pub use formatter::{format, CommandSyntax};
pub use line_buffer::LineBuffer;
pub use parser::{parse_line, ParsedLine};
pub use registry::{Callback, Command, CommandId, CommandKind, ParameterSpec, Registry};
