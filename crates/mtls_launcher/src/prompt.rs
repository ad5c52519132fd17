//! Line-based prompts with defaults.
//!
//! End of input (Ctrl+D, closed pipe) cancels the prompt and is reported as
//! `None`, never as an error.

use anyhow::Result;
use std::io::{self, BufRead, Write};

pub trait Prompter {
    /// Free-text answer; an empty line takes `default`.
    fn text(&mut self, message: &str, default: &str, instruction: &str)
        -> Result<Option<String>>;

    /// Yes/no answer; an empty line takes `default`.
    fn confirm(&mut self, message: &str, default: bool) -> Result<Option<bool>>;

    /// Tell the operator why an answer was rejected.
    fn reject(&mut self, reason: &str) -> Result<()>;
}

pub struct StdioPrompter<R: BufRead, W: Write> {
    input: R,
    output: W,
}

impl StdioPrompter<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> StdioPrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn read_answer(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

impl<R: BufRead, W: Write> Prompter for StdioPrompter<R, W> {
    fn text(
        &mut self,
        message: &str,
        default: &str,
        instruction: &str,
    ) -> Result<Option<String>> {
        if !instruction.is_empty() {
            writeln!(self.output, "  ({})", instruction)?;
        }
        write!(self.output, "? {} [{}] ", message, default)?;
        self.output.flush()?;

        Ok(self.read_answer()?.map(|answer| {
            if answer.is_empty() {
                default.to_string()
            } else {
                answer
            }
        }))
    }

    fn confirm(&mut self, message: &str, default: bool) -> Result<Option<bool>> {
        let hint = if default { "Y/n" } else { "y/N" };
        loop {
            write!(self.output, "? {} ({}) ", message, hint)?;
            self.output.flush()?;

            let Some(answer) = self.read_answer()? else {
                return Ok(None);
            };
            match answer.to_lowercase().as_str() {
                "" => return Ok(Some(default)),
                "y" | "yes" => return Ok(Some(true)),
                "n" | "no" => return Ok(Some(false)),
                _ => self.reject("Please answer y or n.")?,
            }
        }
    }

    fn reject(&mut self, reason: &str) -> Result<()> {
        writeln!(self.output, "  ⚠️ {}", reason)?;
        Ok(())
    }
}
