use std::collections::HashMap;
use std::io::{self, Write};
use tracing::debug;

use crate::common::*;
use crate::reader::{LineReader, ReadOutcome};
use crate::sh::Shell;

type Builtin<'a> = Box<dyn Fn(&mut dyn Shell, &[&str]) -> CliResult + 'a>;

pub struct Cli<'a> {
    sh: Box<dyn Shell + 'a>,
    builtins: HashMap<String, Builtin<'a>>,
}

impl<'a> Cli<'a> {
    pub fn new(sh: Box<dyn Shell + 'a>) -> Cli<'a> {
        let mut cli = Cli {
            sh,
            builtins: HashMap::new(),
        };
        // register builtins
        {
            cli.builtin("help", |sh, _| sh.help());
            cli.builtin("exit", |sh, _| sh.exit());
            cli.builtin("quit", |sh, _| sh.exit());
            cli.builtin("cd", |sh, args| sh.cd(args));
        }
        cli
    }

    fn builtin<F>(&mut self, name: &str, builtin: F)
    where
        F: Fn(&mut dyn Shell, &[&str]) -> CliResult + 'a,
    {
        self.builtins.insert(name.to_owned(), Box::new(builtin));
    }

    pub fn is_builtin(&self, name: &str) -> bool {
        self.builtins.contains_key(name)
    }

    /// Runs one command line: a built-in by name, anything else as an
    /// external foreground job.
    pub fn dispatch(&mut self, line: &str) -> CliResult {
        let parts: Vec<_> = line.split_whitespace().collect();
        if parts.is_empty() {
            return ok("");
        }
        match self.builtins.get(parts[0]) {
            Some(f) => f(&mut *self.sh, &parts[1..]),
            None => self.sh.run(&parts),
        }
    }

    pub fn go(&mut self, reader: &mut LineReader) {
        while self.sh.is_running() {
            if let Err(e) = self.sh.prompt() {
                debug!(error = %e, "prompt not written");
            }
            let line = match reader.read_line() {
                ReadOutcome::Line(line) => line,
                ReadOutcome::Interrupted => continue,
                ReadOutcome::Eof => {
                    println!();
                    break;
                }
            };
            match self.dispatch(&line) {
                Ok(o) => print!("{}", o),
                Err(e) => eprint!("{}", e),
            };
            let _ = io::stdout().flush();
        }
    }
}
