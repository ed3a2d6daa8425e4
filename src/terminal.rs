extern crate libc;
extern crate nix;

use nix::sys::signal::{self, Signal};
use nix::sys::termios::{self, Termios};
use nix::unistd::{self, Pid};
use std::os::unix::io::RawFd;
use tracing::{debug, info, warn};

use crate::error::SessionError;
use crate::launcher::ForegroundJob;
use crate::signal as shell_signal;
use crate::wait::{self, WaitOutcome};

/// Process-wide shell state: the shell's own process group and the terminal
/// it controls. Built once at startup and passed to every foreground run.
pub struct Session {
    shell_pgid: Pid,
    terminal: Option<RawFd>,
    saved_tmodes: Option<Termios>,
    foreground: Pid,
}

impl Session {
    /// Sets up job control for the calling process.
    ///
    /// On a terminal this waits until the shell is in the foreground, moves it
    /// into its own process group, takes the terminal and snapshots its modes.
    /// Without a terminal only the signal handlers are installed.
    pub fn init() -> Result<Session, SessionError> {
        let fd = libc::STDIN_FILENO;
        if !unistd::isatty(fd).unwrap_or(false) {
            shell_signal::install_shell_handlers()?;
            info!("stdin is not a terminal, job control disabled");
            return Ok(Session::detached());
        }

        // stop ourselves until whoever launched us puts us in the foreground
        loop {
            let pgid = unistd::getpgrp();
            let fg = unistd::tcgetpgrp(fd).map_err(|source| SessionError::Terminal {
                op: "tcgetpgrp",
                source,
            })?;
            if fg == pgid {
                break;
            }
            debug!(pgid = pgid.as_raw(), fg = fg.as_raw(), "not in foreground yet");
            signal::killpg(pgid, Signal::SIGTTIN).map_err(|source| SessionError::Terminal {
                op: "killpg",
                source,
            })?;
        }

        shell_signal::install_shell_handlers()?;

        let shell_pgid = unistd::getpid();
        if unistd::getpgrp() != shell_pgid {
            unistd::setpgid(shell_pgid, shell_pgid).map_err(|source| {
                SessionError::Terminal {
                    op: "setpgid",
                    source,
                }
            })?;
        }
        unistd::tcsetpgrp(fd, shell_pgid).map_err(|source| SessionError::Terminal {
            op: "tcsetpgrp",
            source,
        })?;
        let tmodes = termios::tcgetattr(fd).map_err(|source| SessionError::Terminal {
            op: "tcgetattr",
            source,
        })?;
        info!(pgid = shell_pgid.as_raw(), "job control enabled");

        Ok(Session {
            shell_pgid,
            terminal: Some(fd),
            saved_tmodes: Some(tmodes),
            foreground: shell_pgid,
        })
    }

    /// A session with no controlling terminal: grant and reclaim only track
    /// ownership and the interrupt mode.
    pub fn detached() -> Session {
        let shell_pgid = unistd::getpgrp();
        Session {
            shell_pgid,
            terminal: None,
            saved_tmodes: None,
            foreground: shell_pgid,
        }
    }

    pub fn shell_pgid(&self) -> Pid {
        self.shell_pgid
    }

    pub fn is_interactive(&self) -> bool {
        self.terminal.is_some()
    }

    pub fn saved_terminal_attributes(&self) -> Option<&Termios> {
        self.saved_tmodes.as_ref()
    }

    /// Process group currently holding the terminal.
    pub fn foreground_owner(&self) -> Pid {
        self.foreground
    }

    /// Hands the terminal to `job`'s process group. The group must exist.
    pub fn grant_foreground(&mut self, job: &ForegroundJob) {
        if let Some(fd) = self.terminal {
            if let Err(e) = unistd::tcsetpgrp(fd, job.pgid()) {
                warn!(pgid = job.pgid().as_raw(), error = %e, "cannot give terminal to job");
            }
        }
        self.foreground = job.pgid();
        shell_signal::set_delegated(true);
    }

    /// Takes the terminal back for the shell. Calling it while the shell
    /// already owns the terminal changes nothing.
    pub fn reclaim_foreground(&mut self) {
        if self.foreground == self.shell_pgid {
            return;
        }
        if let Some(fd) = self.terminal {
            if let Err(e) = unistd::tcsetpgrp(fd, self.shell_pgid) {
                warn!(pgid = self.shell_pgid.as_raw(), error = %e, "cannot reclaim terminal");
            }
        }
        self.foreground = self.shell_pgid;
        shell_signal::set_delegated(false);
    }

    /// grant, wait, reclaim. The terminal comes back on every outcome,
    /// including a failed wait.
    pub fn run_in_foreground(&mut self, job: &ForegroundJob) -> WaitOutcome {
        self.grant_foreground(job);
        let outcome = wait::wait_for(job);
        self.reclaim_foreground();
        outcome
    }
}
