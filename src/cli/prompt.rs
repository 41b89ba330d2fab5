//! Line-oriented operator prompts.
//!
//! Generic over reader and writer so the menu can be driven from tests.

use crate::error::Result;
use crate::validate::is_confirmation;
use std::io::{BufRead, Write};

/// Reads answers from `input`, writes prompts to `output`.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Print `label` and read one line.
    ///
    /// The line ending is stripped; nothing else is. Returns `None` at end
    /// of input.
    ///
    /// # Errors
    ///
    /// Returns an error if reading or writing fails.
    pub fn ask(&mut self, label: &str) -> Result<Option<String>> {
        write!(self.output, "{label}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }

        Ok(Some(line.trim_end_matches(&['\r', '\n'][..]).to_string()))
    }

    /// Ask a yes/no question. End of input counts as no.
    ///
    /// # Errors
    ///
    /// Returns an error if reading or writing fails.
    pub fn confirm(&mut self, question: &str) -> Result<bool> {
        let answer = self.ask(&format!("{question} (yes/no): "))?;
        Ok(answer.is_some_and(|a| is_confirmation(&a)))
    }

    /// Writer for regular output.
    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }
}
