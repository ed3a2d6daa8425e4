extern crate libc;
extern crate nix;

use nix::errno::Errno;
use nix::unistd::{self, ForkResult, Pid};
use std::ffi::{CStr, CString};
use tracing::debug;

use crate::error::LaunchError;
use crate::signal;

/// Exit status of a child whose exec failed.
pub const EXEC_FAILED_STATUS: i32 = 1;

/// A parsed, non-empty argument vector. Converted to C strings up front so
/// the child has nothing left to allocate between fork and exec.
#[derive(Debug, Clone)]
pub struct CommandRequest {
    args: Vec<CString>,
}

impl CommandRequest {
    pub fn new<S: AsRef<str>>(args: &[S]) -> Result<CommandRequest, LaunchError> {
        if args.is_empty() {
            return Err(LaunchError::EmptyCommand);
        }
        let args = args
            .iter()
            .map(|arg| {
                CString::new(arg.as_ref())
                    .map_err(|_| LaunchError::NulByte(arg.as_ref().to_owned()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(CommandRequest { args })
    }

    pub fn program(&self) -> &CStr {
        &self.args[0]
    }

    pub fn program_name(&self) -> String {
        self.program().to_string_lossy().into_owned()
    }

    fn argv(&self) -> Vec<&CStr> {
        self.args.iter().map(|x| x.as_c_str()).collect()
    }
}

/// One external command running in its own process group. The child's pid
/// doubles as the group id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForegroundJob {
    pid: Pid,
    protected: bool,
}

impl ForegroundJob {
    pub fn pid(&self) -> Pid {
        self.pid
    }

    pub fn pgid(&self) -> Pid {
        self.pid
    }

    pub fn is_protected(&self) -> bool {
        self.protected
    }

    #[cfg(test)]
    pub(crate) fn from_raw(pid: i32, protected: bool) -> ForegroundJob {
        ForegroundJob {
            pid: Pid::from_raw(pid),
            protected,
        }
    }
}

/// Forks `request` into a new process group and returns without waiting.
pub fn launch(request: &CommandRequest, protect: bool) -> Result<ForegroundJob, LaunchError> {
    let argv = request.argv();
    let failure_prefix = format!("{}: ", request.program_name());

    // the child sticks to async-signal-safe calls until exec
    match unsafe { unistd::fork() } {
        Ok(ForkResult::Child) => exec_child(request.program(), &argv, protect, &failure_prefix),
        Ok(ForkResult::Parent { child }) => {
            // Also done in the child; whichever runs first wins. EACCES here
            // just means the child already exec'd.
            if let Err(e) = unistd::setpgid(child, child) {
                debug!(pid = child.as_raw(), error = %e, "parent setpgid skipped");
            }
            debug!(
                pid = child.as_raw(),
                program = %request.program_name(),
                protect,
                "launched foreground job"
            );
            Ok(ForegroundJob {
                pid: child,
                protected: protect,
            })
        }
        Err(e) => Err(LaunchError::ForkFailed(e)),
    }
}

fn exec_child(program: &CStr, argv: &[&CStr], protect: bool, failure_prefix: &str) -> ! {
    // new process group first, before any disposition changes
    let _ = unistd::setpgid(Pid::from_raw(0), Pid::from_raw(0));
    signal::reset_for_child(protect);

    let e = match unistd::execvp(program, argv) {
        Ok(never) => match never {},
        Err(e) => e,
    };
    let reason = match e.as_errno() {
        Some(Errno::ENOENT) => "Command not found",
        Some(errno) => errno.desc(),
        None => "exec failed",
    };
    let _ = unistd::write(libc::STDERR_FILENO, failure_prefix.as_bytes());
    let _ = unistd::write(libc::STDERR_FILENO, reason.as_bytes());
    let _ = unistd::write(libc::STDERR_FILENO, b"\n");
    unsafe { libc::_exit(EXEC_FAILED_STATUS) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_rejects_empty_argv() {
        let args: [&str; 0] = [];
        assert!(matches!(
            CommandRequest::new(&args),
            Err(LaunchError::EmptyCommand)
        ));
    }

    #[test]
    fn request_rejects_interior_nul() {
        match CommandRequest::new(&["ec\0ho", "hi"]) {
            Err(LaunchError::NulByte(arg)) => assert_eq!(arg, "ec\0ho"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn request_keeps_argument_order() {
        let request = CommandRequest::new(&["ls", "-l", "/tmp"]).unwrap();
        assert_eq!(request.program_name(), "ls");
        let argv: Vec<_> = request
            .argv()
            .iter()
            .map(|a| a.to_str().unwrap().to_owned())
            .collect();
        assert_eq!(argv, vec!["ls", "-l", "/tmp"]);
    }
}
