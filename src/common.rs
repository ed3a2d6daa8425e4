/// Output of a built-in or of one dispatched line: text to print, or an
/// error message to print.
pub type CliResult = Result<String, String>;

pub fn ok<T: ToString>(s: T) -> CliResult {
    Ok(s.to_string())
}

pub fn err<T: ToString>(s: T) -> CliResult {
    Err(s.to_string())
}
