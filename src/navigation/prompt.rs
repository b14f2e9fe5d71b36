//! # GoTo prompt
//!
//! The `GoTo` command asks an input collaborator for a target event index. [`IndexPrompt`] is
//! that collaborator; [`StdinPrompt`] implements it over any `BufRead`/`Write` pair, and any
//! `FnMut() -> Result<i64, ShowerError>` closure can stand in for it in tests or GUIs.
//!
//! The prompt only parses: range checking is left to the controller, so an out-of-range answer
//! surfaces as [`ShowerError::InvalidIndex`] there, while unreadable input is reported here as
//! [`ShowerError::InvalidPromptInput`].
use std::io::{self, BufRead, BufReader, Write};

use crate::shower_errors::ShowerError;

/// Text written before reading the index.
pub const GOTO_PROMPT: &str = "Go To: ";

/// Source of a navigation target.
pub trait IndexPrompt {
    fn prompt_index(&mut self) -> Result<i64, ShowerError>;
}

impl<F> IndexPrompt for F
where
    F: FnMut() -> Result<i64, ShowerError>,
{
    fn prompt_index(&mut self) -> Result<i64, ShowerError> {
        self()
    }
}

/// Line-based prompt reading one integer per request.
#[derive(Debug)]
pub struct StdinPrompt<R, W> {
    input: R,
    output: W,
    line: String,
}

impl StdinPrompt<BufReader<io::Stdin>, io::Stdout> {
    /// Prompt on the process standard input and output.
    ///
    /// Standard input is locked for each read only. The prompt buffers ahead, so any other
    /// line the program needs from standard input must come through [`StdinPrompt::read_line`].
    pub fn stdio() -> Self {
        StdinPrompt::new(BufReader::new(io::stdin()), io::stdout())
    }
}

impl<R: BufRead, W: Write> StdinPrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        StdinPrompt {
            input,
            output,
            line: String::new(),
        }
    }

    /// Write `prompt`, then read one line of input.
    ///
    /// Return
    /// ----------
    /// * The trimmed line, or `None` once the input is exhausted.
    pub fn read_line(&mut self, prompt: &str) -> Result<Option<&str>, ShowerError> {
        self.output.write_all(prompt.as_bytes())?;
        self.output.flush()?;

        self.line.clear();
        if self.input.read_line(&mut self.line)? == 0 {
            return Ok(None);
        }
        Ok(Some(self.line.trim()))
    }

    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }
}

impl<R: BufRead, W: Write> IndexPrompt for StdinPrompt<R, W> {
    fn prompt_index(&mut self) -> Result<i64, ShowerError> {
        let answer = self.read_line(GOTO_PROMPT)?.ok_or_else(|| {
            ShowerError::InvalidPromptInput("end of input before an index was given".into())
        })?;
        answer
            .parse::<i64>()
            .map_err(|e| ShowerError::InvalidPromptInput(format!("{answer:?}: {e}")))
    }
}
