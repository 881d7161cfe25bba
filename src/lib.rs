//! # RustAtCommands
//!
//! AT-style command console for serial firmware.
//!
//! ## Architecture
//!
//! ```text
//! LineIo ──line──▶ parser ──▶ dispatcher ──▶ registry ──▶ callback
//!   ▲                              │
//!   └──────────── OK / ERROR ──────┘
//! ```
//!
//! - Commands are registered once at startup, then the registry is sealed
//! - One line in, one acknowledgement out
//! - Hardware access only through [`LineIo`]

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod logging;
pub mod config;
pub mod io;
pub mod command;

#[cfg(target_os = "espidf")]
pub mod uart_io;

pub use config::{Config, Grammar, GrammarError};
pub use io::LineIo;
pub use logging::{DebugLog, LogLevel};
pub use command::{
    Acknowledgement, Callback, CommandError, CommandKind, Console, LineBuffer,
    ParameterType, Registry, TypedValue,
};
