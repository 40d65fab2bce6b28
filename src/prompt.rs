//! Interactive prompt for text, output path and caption

use crate::caption::Caption;
use crate::error::{Error, Result};
use crate::generator::GenerateRequest;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

/// Caption answer that skips the caption band
pub const SKIP_CAPTION: &str = "-";

/// Result of an interactive session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptOutcome {
    /// The user answered every question
    Request(GenerateRequest),
    /// Input ended before any text was given
    Cancelled,
}

/// Asks the questions over any reader/writer pair
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    /// Wrap an input and output stream.
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Ask for text, output filename and caption, in that order.
    pub fn run(&mut self, default_output: &Path) -> Result<PromptOutcome> {
        let Some(text) = self.ask("Text or URL: ")? else {
            return Ok(PromptOutcome::Cancelled);
        };
        if text.is_empty() {
            return Err(Error::InvalidInput("no text provided".to_string()));
        }

        let question = format!("Output filename (default: {}): ", default_output.display());
        let output = match self.ask(&question)? {
            Some(answer) if !answer.is_empty() => PathBuf::from(answer),
            _ => default_output.to_path_buf(),
        };

        let caption = match self.ask("Caption (Enter to reuse the text, '-' to skip): ")? {
            Some(answer) if answer == SKIP_CAPTION => Caption::Hidden,
            Some(answer) if !answer.is_empty() => Caption::Text(answer),
            _ => Caption::FromText,
        };

        Ok(PromptOutcome::Request(
            GenerateRequest::new(text)
                .with_output(output)
                .with_caption(caption),
        ))
    }

    /// Print `question` and read one trimmed line; `None` on end of input.
    fn ask(&mut self, question: &str) -> Result<Option<String>> {
        write!(self.output, "{question}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}
