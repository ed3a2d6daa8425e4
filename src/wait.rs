extern crate nix;

use nix::errno::Errno;
use nix::sys::signal::Signal;
use nix::sys::wait::{self, WaitPidFlag, WaitStatus};
use std::fmt;
use tracing::{debug, warn};

use crate::launcher::ForegroundJob;

/// How a foreground job left the foreground.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    Exited { code: i32 },
    /// The job is suspended and still alive; nobody will reap it.
    StoppedBySignal,
    TerminatedBySignal { signal: Signal },
    WaitFailed { errno: Errno },
}

impl fmt::Display for WaitOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WaitOutcome::Exited { code } => write!(f, "exited with status {}", code),
            WaitOutcome::StoppedBySignal => write!(f, "stopped"),
            WaitOutcome::TerminatedBySignal { signal } => {
                write!(f, "terminated by signal {}", *signal as i32)
            }
            WaitOutcome::WaitFailed { errno } => write!(f, "wait failed: {}", errno.desc()),
        }
    }
}

/// Blocks until `job` exits, dies from a signal, or stops.
///
/// EINTR is not a state change of the job, so the wait is reissued; every
/// other failure is returned as `WaitFailed`.
pub fn wait_for(job: &ForegroundJob) -> WaitOutcome {
    loop {
        match wait::waitpid(job.pid(), Some(WaitPidFlag::WUNTRACED)) {
            Ok(status) => {
                if let Some(outcome) = classify(status) {
                    debug!(pid = job.pid().as_raw(), %outcome, "foreground job changed state");
                    return outcome;
                }
                warn!(pid = job.pid().as_raw(), ?status, "ignoring unexpected wait status");
            }
            Err(e) => {
                let errno = e.as_errno().unwrap_or(Errno::UnknownErrno);
                if errno == Errno::EINTR {
                    continue;
                }
                return WaitOutcome::WaitFailed { errno };
            }
        }
    }
}

/// Maps a raw wait status onto an outcome. Statuses that need flags this
/// shell never passes (continued, ptrace, still alive) map to `None`.
pub fn classify(status: WaitStatus) -> Option<WaitOutcome> {
    match status {
        WaitStatus::Exited(_, code) => Some(WaitOutcome::Exited { code }),
        WaitStatus::Signaled(_, signal, _) => Some(WaitOutcome::TerminatedBySignal { signal }),
        WaitStatus::Stopped(_, _) => Some(WaitOutcome::StoppedBySignal),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nix::unistd::Pid;

    #[test]
    fn classify_maps_each_reportable_status() {
        let pid = Pid::from_raw(4242);
        assert_eq!(
            classify(WaitStatus::Exited(pid, 3)),
            Some(WaitOutcome::Exited { code: 3 })
        );
        assert_eq!(
            classify(WaitStatus::Signaled(pid, Signal::SIGKILL, false)),
            Some(WaitOutcome::TerminatedBySignal {
                signal: Signal::SIGKILL
            })
        );
        assert_eq!(
            classify(WaitStatus::Stopped(pid, Signal::SIGTSTP)),
            Some(WaitOutcome::StoppedBySignal)
        );
        assert_eq!(classify(WaitStatus::Continued(pid)), None);
        assert_eq!(classify(WaitStatus::StillAlive), None);
    }

    #[test]
    fn waiting_on_a_stranger_fails() {
        // pid 1 is never our child
        let job = ForegroundJob::from_raw(1, false);
        assert_eq!(
            wait_for(&job),
            WaitOutcome::WaitFailed {
                errno: Errno::ECHILD
            }
        );
    }

    #[test]
    fn display_uses_signal_numbers() {
        let outcome = WaitOutcome::TerminatedBySignal {
            signal: Signal::SIGTERM,
        };
        assert_eq!(outcome.to_string(), "terminated by signal 15");
    }
}
