extern crate libc;
extern crate nix;

use nix::sys::signal::{self, SaFlags, SigAction, SigHandler, SigSet, Signal};
use nix::unistd;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::SessionError;

/// Signals the shell never reacts to itself: the process group that owns the
/// terminal gets their real effect.
pub const SHELL_IGNORED: [Signal; 4] = [
    Signal::SIGQUIT,
    Signal::SIGTSTP,
    Signal::SIGTTIN,
    Signal::SIGTTOU,
];

const INTERRUPT_NOTICE: &[u8] = b"\n[Shell] Use 'exit' command to quit the shell.\n";

/// Set while a foreground job owns the terminal.
static DELEGATED: AtomicBool = AtomicBool::new(false);

pub fn set_delegated(delegated: bool) {
    DELEGATED.store(delegated, Ordering::SeqCst);
}

pub fn is_delegated() -> bool {
    DELEGATED.load(Ordering::SeqCst)
}

/// SIGINT in prompt mode: print a notice and let the interrupted read return
/// EINTR so the loop redraws the prompt. In delegated mode the job's group
/// owns Ctrl+C, so anything that still reaches the shell is dropped.
pub extern "C" fn handle_sigint(_signal: libc::c_int) {
    if is_delegated() {
        return;
    }
    // only async-signal-safe calls here
    let _ = unistd::write(libc::STDOUT_FILENO, INTERRUPT_NOTICE);
}

/// Installs the shell's own dispositions for the session lifetime.
///
/// SIGINT is registered without `SA_RESTART` so a blocking read on the
/// prompt comes back with EINTR instead of silently resuming.
pub fn install_shell_handlers() -> Result<(), SessionError> {
    let interrupt = SigAction::new(
        SigHandler::Handler(handle_sigint),
        SaFlags::empty(),
        SigSet::empty(),
    );
    set_disposition(Signal::SIGINT, &interrupt)?;

    let ignore = SigAction::new(SigHandler::SigIgn, SaFlags::empty(), SigSet::empty());
    for &sig in SHELL_IGNORED.iter() {
        set_disposition(sig, &ignore)?;
    }
    Ok(())
}

fn set_disposition(sig: Signal, action: &SigAction) -> Result<(), SessionError> {
    unsafe { signal::sigaction(sig, action) }
        .map(|_| ())
        .map_err(|source| SessionError::Signal {
            signal: sig,
            source,
        })
}

/// Dispositions for a freshly forked child, before exec.
///
/// SIGTSTP always goes back to default; SIGINT is ignored only when
/// `protect` is set. The ignores the shell installed for itself are undone
/// too, since ignored dispositions survive exec. Runs between fork and exec,
/// so failures are not reported.
pub fn reset_for_child(protect: bool) {
    let default = SigAction::new(SigHandler::SigDfl, SaFlags::empty(), SigSet::empty());
    let ignore = SigAction::new(SigHandler::SigIgn, SaFlags::empty(), SigSet::empty());

    unsafe {
        for &sig in SHELL_IGNORED.iter() {
            let _ = signal::sigaction(sig, &default);
        }
        let interrupt = if protect { &ignore } else { &default };
        let _ = signal::sigaction(Signal::SIGINT, interrupt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_and_background_io_are_in_the_ignored_set() {
        assert!(SHELL_IGNORED.contains(&Signal::SIGTSTP));
        assert!(SHELL_IGNORED.contains(&Signal::SIGTTIN));
        assert!(SHELL_IGNORED.contains(&Signal::SIGTTOU));
        assert!(SHELL_IGNORED.contains(&Signal::SIGQUIT));
        assert!(!SHELL_IGNORED.contains(&Signal::SIGINT));
    }
}
