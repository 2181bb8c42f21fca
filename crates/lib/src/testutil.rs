//! Test doubles for the runner and prompter seams.

use std::collections::VecDeque;
use std::sync::Mutex;

use crate::prompt::{PromptError, Prompter, TextField};
use crate::runner::{CommandResult, CommandRunner, RunError};

/// Answers questions from fixed scripts. Running out of answers cancels the form.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
  inputs: VecDeque<String>,
  confirms: VecDeque<bool>,
  /// Every title asked, in order.
  pub titles: Vec<String>,
  /// Every rejection message reported.
  pub invalid: Vec<String>,
}

impl ScriptedPrompter {
  pub fn new<I, S, C>(inputs: I, confirms: C) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
    C: IntoIterator<Item = bool>,
  {
    Self {
      inputs: inputs.into_iter().map(Into::into).collect(),
      confirms: confirms.into_iter().collect(),
      ..Self::default()
    }
  }
}

impl Prompter for ScriptedPrompter {
  fn input(&mut self, field: &TextField) -> Result<String, PromptError> {
    self.titles.push(field.title.clone());
    self.inputs.pop_front().ok_or(PromptError::Cancelled)
  }

  fn confirm(&mut self, title: &str) -> Result<bool, PromptError> {
    self.titles.push(title.to_string());
    self.confirms.pop_front().ok_or(PromptError::Cancelled)
  }

  fn report_invalid(&mut self, message: &str) {
    self.invalid.push(message.to_string());
  }
}

/// Records every invocation and answers from per-program rules.
///
/// Commands with no matching rule succeed with empty output.
#[derive(Debug, Default)]
pub struct RecordingRunner {
  rules: Vec<(Vec<String>, CommandResult)>,
  calls: Mutex<Vec<Vec<String>>>,
}

impl RecordingRunner {
  pub fn new() -> Self {
    Self::default()
  }

  /// Answer any command starting with `prefix` with `result`.
  pub fn respond(mut self, prefix: &[&str], result: CommandResult) -> Self {
    self
      .rules
      .push((prefix.iter().map(|s| s.to_string()).collect(), result));
    self
  }

  /// Every argv seen so far, in order.
  pub fn calls(&self) -> Vec<Vec<String>> {
    self.calls.lock().unwrap().clone()
  }

  /// Every argv seen so far, joined with spaces.
  pub fn command_lines(&self) -> Vec<String> {
    self.calls().iter().map(|argv| argv.join(" ")).collect()
  }

  fn answer(&self, argv: &[String]) -> Result<CommandResult, RunError> {
    if argv.is_empty() {
      return Err(RunError::EmptyCommand);
    }
    self.calls.lock().unwrap().push(argv.to_vec());

    let result = self
      .rules
      .iter()
      .find(|(prefix, _)| argv.starts_with(prefix))
      .map(|(_, result)| result.clone())
      .unwrap_or_else(|| CommandResult::exited(0, ""));
    Ok(result)
  }
}

impl CommandRunner for RecordingRunner {
  async fn run(&self, _title: &str, argv: &[String]) -> Result<CommandResult, RunError> {
    let mut result = self.answer(argv)?;
    result.stdout.clear();
    Ok(result)
  }

  async fn run_capturing(&self, argv: &[String]) -> Result<CommandResult, RunError> {
    self.answer(argv)
  }
}
