extern crate nix;

use nix::errno::Errno;
use nix::unistd;
use std::os::unix::io::RawFd;

/// What one attempt to read a command line produced.
#[derive(Debug, PartialEq, Eq)]
pub enum ReadOutcome {
    Line(String),
    /// A signal cut the read short; redraw the prompt.
    Interrupted,
    Eof,
}

/// Line reader on a raw fd. `std::io::Stdin` retries on EINTR, which would
/// swallow Ctrl+C at the prompt, so this goes through `read(2)` directly.
pub struct LineReader {
    fd: RawFd,
    pending: Vec<u8>,
    eof: bool,
}

impl LineReader {
    pub fn new(fd: RawFd) -> LineReader {
        LineReader {
            fd,
            pending: Vec::new(),
            eof: false,
        }
    }

    pub fn stdin() -> LineReader {
        LineReader::new(libc::STDIN_FILENO)
    }

    pub fn read_line(&mut self) -> ReadOutcome {
        let mut buf = [0u8; 1024];
        loop {
            if let Some(pos) = self.pending.iter().position(|&b| b == b'\n') {
                let line: Vec<u8> = self.pending.drain(..=pos).collect();
                return ReadOutcome::Line(String::from_utf8_lossy(&line[..pos]).into_owned());
            }
            if self.eof {
                if self.pending.is_empty() {
                    return ReadOutcome::Eof;
                }
                let line: Vec<u8> = self.pending.drain(..).collect();
                return ReadOutcome::Line(String::from_utf8_lossy(&line).into_owned());
            }
            match unistd::read(self.fd, &mut buf) {
                Ok(0) => self.eof = true,
                Ok(n) => self.pending.extend_from_slice(&buf[..n]),
                Err(e) if e.as_errno() == Some(Errno::EINTR) => {
                    // half-typed input is dropped along with the prompt
                    self.pending.clear();
                    return ReadOutcome::Interrupted;
                }
                Err(_) => self.eof = true,
            }
        }
    }
}
