//! Bounded prompt/validate/re-prompt loop shared by every interactive field

use crate::utils::error::TubeloaderError;
use std::io::{BufRead, Write};
use tracing::{debug, warn};

/// Attempts allowed per field unless overridden
pub const DEFAULT_MAX_ATTEMPTS: usize = 3;

/// Description of one interactive field
#[derive(Debug, Clone)]
pub struct Field<'a> {
    /// Short name used in logs and in `RetryExhausted`
    pub name: &'a str,
    pub message: String,
    /// Substituted when the user just presses enter
    pub default: Option<String>,
    /// Printed after a rejected answer
    pub invalid: &'a str,
}

impl<'a> Field<'a> {
    pub fn new(name: &'a str, message: impl Into<String>, invalid: &'a str) -> Self {
        Self {
            name,
            message: message.into(),
            default: None,
            invalid,
        }
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }
}

/// Reads answers from `reader` and writes prompts to `writer`
pub struct Prompter<R, W> {
    reader: R,
    writer: W,
    max_attempts: usize,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self::with_max_attempts(reader, writer, DEFAULT_MAX_ATTEMPTS)
    }

    pub fn with_max_attempts(reader: R, writer: W, max_attempts: usize) -> Self {
        Self {
            reader,
            writer,
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// Print a line of informational text
    pub fn say(&mut self, text: &str) -> Result<(), TubeloaderError> {
        writeln!(self.writer, "{}", text)?;
        Ok(())
    }

    /// Print `message` and read one trimmed line; end of input is `InputClosed`
    pub fn ask(&mut self, message: &str) -> Result<String, TubeloaderError> {
        write!(self.writer, "{}", message)?;
        self.writer.flush()?;

        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            // Keep the terminal tidy when stdin hits EOF mid-prompt
            writeln!(self.writer)?;
            return Err(TubeloaderError::InputClosed);
        }
        Ok(line.trim().to_string())
    }

    /// Ask for `field` until `validate` accepts an answer or the attempt bound is hit
    pub fn prompt<T, F>(&mut self, field: &Field<'_>, mut validate: F) -> Result<T, TubeloaderError>
    where
        F: FnMut(&str) -> Option<T>,
    {
        for attempt in 1..=self.max_attempts {
            if let Some(value) = self.attempt(field, attempt, &mut validate)? {
                return Ok(value);
            }
        }

        Err(TubeloaderError::RetryExhausted {
            field: field.name.to_string(),
            attempts: self.max_attempts,
        })
    }

    /// Like `prompt`, but with no attempt bound; only end of input stops it
    pub fn prompt_until_valid<T, F>(
        &mut self,
        field: &Field<'_>,
        mut validate: F,
    ) -> Result<T, TubeloaderError>
    where
        F: FnMut(&str) -> Option<T>,
    {
        let mut attempt = 0;
        loop {
            attempt += 1;
            if let Some(value) = self.attempt(field, attempt, &mut validate)? {
                return Ok(value);
            }
        }
    }

    fn attempt<T, F>(
        &mut self,
        field: &Field<'_>,
        attempt: usize,
        validate: &mut F,
    ) -> Result<Option<T>, TubeloaderError>
    where
        F: FnMut(&str) -> Option<T>,
    {
        let answer = self.ask(&field.message)?;
        let answer = match (&field.default, answer.is_empty()) {
            (Some(default), true) => default.clone(),
            _ => answer,
        };

        if let Some(value) = validate(&answer) {
            debug!("{} accepted on attempt {}", field.name, attempt);
            return Ok(Some(value));
        }

        warn!("Rejected {} input {:?} (attempt {})", field.name, answer, attempt);
        self.say(field.invalid)?;
        Ok(None)
    }

    /// Yes/no question; anything else is re-prompted
    pub fn confirm(&mut self, name: &str, message: &str, default: bool) -> Result<bool, TubeloaderError> {
        let field = Field::new(name, message, "Please answer y or n.")
            .with_default(if default { "y" } else { "n" });
        self.prompt(&field, parse_yes_no)
    }
}

/// Accepts y/yes/n/no in any case
pub fn parse_yes_no(answer: &str) -> Option<bool> {
    match answer.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}
