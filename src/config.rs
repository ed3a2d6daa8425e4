use std::env;

use crate::error::ConfigError;

pub const USAGE: &str = "\
Usage: sigsh [-hvp] [--prompt <text>]
   -h               print this message
   -v               print additional diagnostic information
   -p               do not emit a command prompt or banner
   --prompt <text>  use <text> as the command prompt

Environment:
   SIGSH_PROMPT     command prompt
   SIGSH_VERBOSE    1 or true to enable diagnostics
   RUST_LOG         log filter, overrides -v
";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub prompt: String,
    pub emit_prompt: bool,
    pub verbose: bool,
    pub banner: bool,
    pub show_help: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            prompt: "sigshell> ".to_owned(),
            emit_prompt: true,
            verbose: false,
            banner: true,
            show_help: false,
        }
    }
}

impl Config {
    /// Defaults, then `SIGSH_*` variables, then command-line flags.
    pub fn load<I>(args: I) -> Result<Config, ConfigError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut config = Config::default();
        config.apply_env(|key| env::var(key).ok());
        config.apply_args(args)?;
        Ok(config)
    }

    fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(prompt) = lookup("SIGSH_PROMPT") {
            self.prompt = prompt;
        }
        if let Some(v) = lookup("SIGSH_VERBOSE") {
            self.verbose = v == "1" || v.eq_ignore_ascii_case("true");
        }
    }

    fn apply_args<I>(&mut self, args: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--prompt" => {
                    self.prompt = args.next().ok_or(ConfigError::MissingValue("--prompt"))?;
                }
                flags if flags.starts_with('-') && flags.len() > 1 && !flags.starts_with("--") => {
                    for c in flags.chars().skip(1) {
                        match c {
                            'h' => self.show_help = true,
                            'v' => self.verbose = true,
                            'p' => {
                                self.emit_prompt = false;
                                self.banner = false;
                            }
                            _ => return Err(ConfigError::UnknownOption(format!("-{}", c))),
                        }
                    }
                }
                other => return Err(ConfigError::UnknownOption(other.to_owned())),
            }
        }
        Ok(())
    }

    /// Filter used when `RUST_LOG` is unset.
    pub fn default_log_filter(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "warn"
        }
    }
}
