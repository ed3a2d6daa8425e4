//! Error types for the shell and its job-control core.

use nix::sys::signal::Signal;
use thiserror::Error;

/// Failure to start a foreground job. Exec failures are not reported here:
/// they happen inside the child and surface as `Exited { code: 1 }`.
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("empty command")]
    EmptyCommand,

    #[error("argument contains a nul byte: {0:?}")]
    NulByte(String),

    #[error("fork failed: {0}")]
    ForkFailed(#[source] nix::Error),
}

/// Failure while setting up the session at startup.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("{op} failed: {source}")]
    Terminal {
        op: &'static str,
        #[source]
        source: nix::Error,
    },

    #[error("cannot install disposition for {signal:?}: {source}")]
    Signal {
        signal: Signal,
        #[source]
        source: nix::Error,
    },
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("unknown option: {0}")]
    UnknownOption(String),

    #[error("option {0} requires a value")]
    MissingValue(&'static str),
}
