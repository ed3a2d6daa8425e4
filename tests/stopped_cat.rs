//! Ctrl+Z on `cat`. Own test binary: stdin is swapped for a pipe so `cat`
//! blocks on it without touching a terminal.

use nix::sys::signal::{self, Signal};
use nix::sys::wait;
use nix::unistd;
use std::thread;
use std::time::Duration;

use sigsh::{is_protected, launch, CommandRequest, Session, WaitOutcome};

#[test]
fn test_stopped_cat_stays_alive_and_terminal_returns() {
    let (read_end, write_end) = unistd::pipe().unwrap();
    unistd::dup2(read_end, libc::STDIN_FILENO).unwrap();
    unistd::close(read_end).unwrap();

    let mut session = Session::detached();
    assert!(!is_protected("cat"));
    let request = CommandRequest::new(&["cat"]).unwrap();
    let job = launch(&request, false).unwrap();
    let pgid = job.pgid();

    let stopper = thread::spawn(move || {
        thread::sleep(Duration::from_millis(300));
        signal::killpg(pgid, Signal::SIGTSTP).unwrap();
    });
    let outcome = session.run_in_foreground(&job);
    stopper.join().unwrap();

    assert_eq!(outcome, WaitOutcome::StoppedBySignal);
    assert_eq!(session.foreground_owner(), session.shell_pgid());
    assert!(signal::kill(job.pid(), None::<Signal>).is_ok());

    let _ = signal::killpg(pgid, Signal::SIGKILL);
    let _ = wait::waitpid(job.pid(), None);
    unistd::close(write_end).unwrap();
}
