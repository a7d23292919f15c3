//! The interpreter's external I/O: one buffered input and one output sink.

use std::collections::VecDeque;
use std::io::{self, BufRead, BufReader, Write};

pub struct Console<'a> {
    input: Box<dyn BufRead + 'a>,
    output: Box<dyn Write + 'a>,
    /// Tokens already read from the current input line.
    pending: VecDeque<String>,
}

impl<'a> Console<'a> {
    pub fn new(input: impl BufRead + 'a, output: impl Write + 'a) -> Self {
        Self { input: Box::new(input), output: Box::new(output), pending: VecDeque::new() }
    }

    pub fn stdio() -> Self {
        Self::new(BufReader::new(io::stdin()), io::stdout())
    }

    pub fn set_input(&mut self, input: impl BufRead + 'a) {
        self.input = Box::new(input);
        self.pending.clear();
    }

    pub fn set_output(&mut self, output: impl Write + 'a) {
        self.output = Box::new(output);
    }

    pub fn write(&mut self, text: &str) -> io::Result<()> {
        self.output.write_all(text.as_bytes())?;
        self.output.flush()
    }

    /// Next whitespace-delimited token, reading further lines as needed.
    /// `None` at end of input.
    pub fn read_token(&mut self) -> io::Result<Option<String>> {
        loop {
            if let Some(tok) = self.pending.pop_front() {
                return Ok(Some(tok));
            }
            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            self.pending.extend(line.split_whitespace().map(str::to_string));
        }
    }
}
