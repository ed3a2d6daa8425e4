//! An interactive shell built around foreground job control: every external
//! command runs in its own process group, gets the terminal for as long as it
//! runs, and hands it back when it exits, dies or stops.

pub mod cli;
pub mod common;
pub mod config;
pub mod error;
pub mod launcher;
pub mod policy;
pub mod reader;
pub mod sh;
pub mod signal;
pub mod sigsh;
pub mod terminal;
pub mod wait;

pub use error::{ConfigError, LaunchError, SessionError};
pub use launcher::{launch, CommandRequest, ForegroundJob};
pub use policy::is_protected;
pub use terminal::Session;
pub use wait::{wait_for, WaitOutcome};
