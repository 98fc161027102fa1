//! # Kernel Boot Pipeline
//!
//! Everything between "the loader jumped to us" and "the initial thread has
//! nothing left to do":
//!
//! ```text
//! boot blob ──► args ──► options ──► collaborators init ──► page tables
//!                           │                                   │
//!                           ▼                                   ▼
//!                      BootOptions ───────────────► actions ──► shutdown
//! ```
//!
//! ## Modules
//! - [`args`]: decodes the loader's fixed-size, NUL-separated argument blob.
//! - [`options`]: turns leading `-x[=value]` tokens into [`BootOptions`].
//! - [`actions`]: runs `run`, `ls`, `cat`, … in command-line order.
//! - [`shutdown`]: flushes the file system, prints statistics, powers off.
//! - [`sequence`]: the fixed boot order and the fatal-error path.
//! - [`random`]: the seedable byte stream behind `-rs`.
//!
//! The machine and the subsystems this crate drives are reached through the
//! [`Platform`] and [`Collaborators`] traits, so the whole pipeline runs on
//! a host under `cargo test` with recording mocks.
//!
//! ## Features
//! - `filesys` (default): file-system actions, `-f`, disk statistics.
//! - `userprog` (default): `-ul`, `-threads-tests`, descriptor tables,
//!   exceptions and system calls.
//! - `vm`: virtual-memory subsystem init.

#![cfg_attr(not(any(test, doctest)), no_std)]
#![deny(unsafe_code)]

pub mod actions;
pub mod args;
mod collaborators;
mod error;
pub mod options;
mod platform;
pub mod random;
pub mod sequence;
pub mod shutdown;
mod usage;

pub use crate::actions::{ACTIONS, Action, ActionExecutor, ActionKind, dispatch};
pub use crate::args::{ArgCursor, ArgVector, CommandLineEcho, read_command_line};
pub use crate::collaborators::{Collaborators, InitStage};
pub use crate::error::BootError;
pub use crate::options::{
    BootOptions, OptionParser, ParsedCommandLine, SchedulerPolicy, parse_options,
};
pub use crate::platform::Platform;
pub use crate::random::Random;
pub use crate::sequence::{BootFailure, BootOutcome, boot, fatal, run};
pub use crate::shutdown::{StatsSource, shutdown};
pub use crate::usage::Usage;
