//! User input handling.
//! The engine only talks to a [`Prompter`], so resolution and template
//! selection can be driven by a terminal, a pipe or an in-memory buffer.

use std::io::{BufRead, Write};

use dialoguer::{Input, Select};

use crate::error::{Error, Result};

/// Source of answers for param prompts and template selection.
pub trait Prompter {
    /// Asks `prompt` and returns the trimmed answer. A blank answer yields
    /// `default`.
    fn input(&mut self, prompt: &str, default: &str) -> Result<String>;

    /// Asks the user to pick one of `choices` and returns the answer as given.
    /// The caller checks that it is one of the choices.
    fn choose(&mut self, prompt: &str, choices: &[String]) -> Result<String>;
}

/// Line-oriented prompter over any reader and writer.
///
/// Prompts are written as `<prompt> [<default>]: ` and one line is read per answer.
pub struct LinePrompter<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> LinePrompter<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    fn read_line(&mut self) -> Result<String> {
        let mut line = String::new();
        let read = self.reader.read_line(&mut line)?;
        if read == 0 {
            return Err(Error::PromptError("unexpected end of input".into()));
        }
        Ok(line.trim().to_string())
    }
}

impl LinePrompter<std::io::StdinLock<'static>, std::io::Stdout> {
    /// Prompter over the process stdin and stdout.
    pub fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stdout())
    }
}

impl<R: BufRead, W: Write> Prompter for LinePrompter<R, W> {
    fn input(&mut self, prompt: &str, default: &str) -> Result<String> {
        write!(self.writer, "{prompt}")?;
        if !default.is_empty() {
            write!(self.writer, " [{default}]")?;
        }
        write!(self.writer, ": ")?;
        self.writer.flush()?;

        let answer = self.read_line()?;
        if answer.is_empty() {
            Ok(default.to_string())
        } else {
            Ok(answer)
        }
    }

    fn choose(&mut self, prompt: &str, choices: &[String]) -> Result<String> {
        writeln!(self.writer, "Available templates:")?;
        for choice in choices {
            writeln!(self.writer, ">  {choice}")?;
        }
        write!(self.writer, "{prompt}: ")?;
        self.writer.flush()?;
        self.read_line()
    }
}

/// Interactive terminal prompter backed by dialoguer.
#[derive(Default)]
pub struct DialoguerPrompter;

impl DialoguerPrompter {
    pub fn new() -> Self {
        Self
    }
}

impl Prompter for DialoguerPrompter {
    fn input(&mut self, prompt: &str, default: &str) -> Result<String> {
        let mut input = Input::<String>::new().with_prompt(prompt).allow_empty(true);
        if !default.is_empty() {
            input = input.default(default.to_string());
        }
        let answer = input.interact_text().map_err(|e| Error::PromptError(e.to_string()))?;
        let answer = answer.trim();
        if answer.is_empty() {
            Ok(default.to_string())
        } else {
            Ok(answer.to_string())
        }
    }

    fn choose(&mut self, prompt: &str, choices: &[String]) -> Result<String> {
        let selection = Select::new()
            .with_prompt(prompt)
            .default(0)
            .items(choices)
            .interact()
            .map_err(|e| Error::PromptError(e.to_string()))?;
        Ok(choices[selection].clone())
    }
}
