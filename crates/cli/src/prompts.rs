//! Terminal prompts for the settings form and the yes/no questions.

use std::io::{self, IsTerminal, Write};

use owo_colors::{OwoColorize, Stream};

use nixrb_lib::prompt::{PromptError, Prompter, TextField};

use crate::output;

/// Prompts on stderr and reads answers from stdin.
pub struct TerminalPrompter {
  assume_yes: bool,
}

impl TerminalPrompter {
  /// With `assume_yes`, every yes/no question is answered yes without asking.
  pub fn new(assume_yes: bool) -> Self {
    Self { assume_yes }
  }
}

fn ensure_interactive() -> Result<(), PromptError> {
  if !io::stdin().is_terminal() || !io::stderr().is_terminal() {
    return Err(PromptError::NotInteractive);
  }
  Ok(())
}

/// Read one line. End of input cancels the form.
fn read_answer() -> Result<String, PromptError> {
  let mut input = String::new();
  if io::stdin().read_line(&mut input)? == 0 {
    return Err(PromptError::Cancelled);
  }
  Ok(input.trim().to_string())
}

fn is_yes(answer: &str) -> bool {
  matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

impl Prompter for TerminalPrompter {
  fn input(&mut self, field: &TextField) -> Result<String, PromptError> {
    ensure_interactive()?;

    let mut stderr = io::stderr();
    write!(
      stderr,
      "{} {} ",
      field.title.if_supports_color(Stream::Stderr, |s| s.bold()),
      format!("({})", field.placeholder).if_supports_color(Stream::Stderr, |s| s.dimmed())
    )?;
    stderr.flush()?;

    read_answer()
  }

  fn confirm(&mut self, title: &str) -> Result<bool, PromptError> {
    if self.assume_yes {
      eprintln!("{} yes", title);
      return Ok(true);
    }

    ensure_interactive()?;

    let mut stderr = io::stderr();
    write!(stderr, "{} [y/N] ", title.if_supports_color(Stream::Stderr, |s| s.bold()))?;
    stderr.flush()?;

    Ok(is_yes(&read_answer()?))
  }

  fn report_invalid(&mut self, message: &str) {
    output::print_error(message);
  }
}
