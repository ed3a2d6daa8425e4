use std::io::{self, Write};
use std::path::PathBuf;
use tracing::{debug, warn};

use crate::common::*;
use crate::config::Config;
use crate::launcher::{self, CommandRequest, ForegroundJob};
use crate::policy;
use crate::sh::Shell;
use crate::terminal::Session;
use crate::wait::WaitOutcome;

pub const BANNER: &str = "\n=== Custom Signal Handling Shell ===\n\
Type 'help' for usage information.\n\
Type 'exit' to quit.\n";

pub const HELP: &str = "
=== Custom Signal Handling Shell ===
Features:
  - Ctrl+C in shell shows message instead of exiting
  - 'sleep' commands ignore Ctrl+C (SIGINT protected)
  - Ctrl+Z suspends process directly (proper job control set up)

Built-in commands:
  help     - Show this help message
  exit     - Exit the shell
  cd <dir> - Change directory

Try these:
  sleep 10     - Try pressing Ctrl+C (won't work!)
  ls -la       - Try pressing Ctrl+C (will work)
  cat          - Try pressing Ctrl+Z (will suspend)

";

pub struct Sigsh {
    emit_prompt: bool,
    prompt: String,
    verbose: bool,
    running: bool,
    session: Session,
}

impl Sigsh {
    pub fn new(config: &Config, session: Session) -> Sigsh {
        Sigsh {
            emit_prompt: config.emit_prompt,
            prompt: config.prompt.clone(),
            verbose: config.verbose,
            running: true,
            session,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Launches one external command in the foreground and waits for it.
    fn run_external(&mut self, args: &[&str]) -> Result<(ForegroundJob, WaitOutcome), String> {
        let protect = policy::is_protected(args[0]);
        let request = CommandRequest::new(args).map_err(|e| format!("sigsh: {}\n", e))?;
        let job = launcher::launch(&request, protect).map_err(|e| format!("{}\n", e))?;

        if protect {
            println!(
                "[Shell] Process {} is protected from SIGINT (Ctrl+C won't work)",
                job.pid()
            );
            io::stdout().flush().map_err(|e| e.to_string())?;
        }
        if self.verbose {
            println!("Started job ({}) {}", job.pid(), args.join(" "));
        }
        debug!(pid = job.pid().as_raw(), "waiting for foreground job");

        let outcome = self.session.run_in_foreground(&job);
        if outcome == WaitOutcome::StoppedBySignal {
            warn!(pid = job.pid().as_raw(), "stopped job left unreaped");
        }
        Ok((job, outcome))
    }
}

/// Text shown after a foreground job leaves the foreground. A clean exit
/// prints nothing.
pub fn report(job: &ForegroundJob, outcome: &WaitOutcome) -> String {
    let pid = job.pid();
    match outcome {
        WaitOutcome::Exited { code: 0 } => String::new(),
        WaitOutcome::Exited { code } => format!("[Shell] Process exited with status {}\n", code),
        WaitOutcome::StoppedBySignal => format!(
            "\n[Shell] Process {} suspended.\n\
             [Shell] Use 'kill -CONT {}' to resume it (or a job control command in a real shell).\n",
            pid, pid
        ),
        WaitOutcome::TerminatedBySignal { signal } => {
            format!("[Shell] Process terminated by signal {}\n", *signal as i32)
        }
        WaitOutcome::WaitFailed { errno } => format!("waitpid failed: {}\n", errno.desc()),
    }
}

impl Shell for Sigsh {
    fn prompt(&self) -> CliResult {
        if self.emit_prompt {
            print!("{}", self.prompt);
            io::stdout().flush().map_err(|e| e.to_string())?;
        }
        ok("")
    }

    fn help(&self) -> CliResult {
        ok(HELP)
    }

    fn cd(&self, args: &[&str]) -> CliResult {
        let target = match args {
            [] => match dirs::home_dir() {
                Some(home) => home,
                None => return err("cd: cannot determine home directory\n"),
            },
            [dir] => PathBuf::from(dir),
            _ => return err("cd: too many arguments\n"),
        };
        if let Err(e) = std::env::set_current_dir(&target) {
            return err(format!("cd: {}: {}\n", target.display(), e));
        }
        ok("")
    }

    fn exit(&mut self) -> CliResult {
        self.running = false;
        ok("Goodbye!\n")
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn run(&mut self, args: &[&str]) -> CliResult {
        if args.is_empty() {
            return ok("");
        }
        let (job, outcome) = self.run_external(args)?;
        let text = report(&job, &outcome);
        match outcome {
            WaitOutcome::WaitFailed { .. } => Err(text),
            _ => Ok(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nix::errno::Errno;
    use nix::sys::signal::Signal;

    fn shell() -> Sigsh {
        let config = Config {
            emit_prompt: false,
            ..Config::default()
        };
        Sigsh::new(&config, Session::detached())
    }

    #[test]
    fn report_texts() {
        let job = ForegroundJob::from_raw(77, false);
        assert_eq!(report(&job, &WaitOutcome::Exited { code: 0 }), "");
        assert_eq!(
            report(&job, &WaitOutcome::Exited { code: 2 }),
            "[Shell] Process exited with status 2\n"
        );
        assert_eq!(
            report(
                &job,
                &WaitOutcome::TerminatedBySignal {
                    signal: Signal::SIGINT
                }
            ),
            "[Shell] Process terminated by signal 2\n"
        );
        let stopped = report(&job, &WaitOutcome::StoppedBySignal);
        assert!(stopped.contains("Process 77 suspended."));
        assert!(stopped.contains("kill -CONT 77"));
        assert!(report(
            &job,
            &WaitOutcome::WaitFailed {
                errno: Errno::ECHILD
            }
        )
        .starts_with("waitpid failed: "));
    }

    #[test]
    fn exit_stops_the_loop() {
        let mut sh = shell();
        assert!(sh.is_running());
        assert_eq!(sh.exit(), Ok("Goodbye!\n".to_owned()));
        assert!(!sh.is_running());
    }

    #[test]
    fn cd_rejects_extra_arguments() {
        let sh = shell();
        assert_eq!(sh.cd(&["a", "b"]), Err("cd: too many arguments\n".to_owned()));
        assert!(sh.cd(&["/definitely/not/a/dir"]).is_err());
    }

    #[test]
    fn cd_changes_directory() {
        let sh = shell();
        let before = std::env::current_dir().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().canonicalize().unwrap();

        sh.cd(&[target.to_str().unwrap()]).unwrap();
        assert_eq!(std::env::current_dir().unwrap().canonicalize().unwrap(), target);

        std::env::set_current_dir(before).unwrap();
    }

    #[test]
    fn external_commands_report_their_status() {
        let mut sh = shell();
        assert_eq!(sh.run(&["true"]), Ok("".to_owned()));
        assert_eq!(
            sh.run(&["sh", "-c", "exit 3"]),
            Ok("[Shell] Process exited with status 3\n".to_owned())
        );
        assert_eq!(
            sh.run(&["nope123"]),
            Ok("[Shell] Process exited with status 1\n".to_owned())
        );
        assert_eq!(sh.session().foreground_owner(), sh.session().shell_pgid());
    }
}
