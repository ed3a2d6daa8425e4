use crate::common::CliResult;

/// Operations the command loop needs from a shell. Built-ins are dispatched
/// by name onto these; everything else goes to `run`.
pub trait Shell {
    fn prompt(&self) -> CliResult;
    fn help(&self) -> CliResult;
    fn cd(&self, args: &[&str]) -> CliResult;
    fn exit(&mut self) -> CliResult;
    fn is_running(&self) -> bool;
    fn run(&mut self, args: &[&str]) -> CliResult;
}
