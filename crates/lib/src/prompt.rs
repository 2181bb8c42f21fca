//! The seam to whatever renders questions to the operator.

use thiserror::Error;

/// Errors raised while asking the operator.
#[derive(Debug, Error)]
pub enum PromptError {
  /// The operator aborted the form (end of input, interrupt).
  #[error("cancelled by user")]
  Cancelled,

  /// There is no terminal to ask on.
  #[error("cannot prompt in non-interactive mode; use --yes and set every path in the settings document")]
  NotInteractive,

  #[error("prompt failed")]
  Io(#[from] std::io::Error),
}

/// A single text question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextField {
  pub title: String,
  /// Hint shown when the field is empty.
  pub placeholder: String,
}

/// Supplies answers for the settings collector and the commit confirmation.
pub trait Prompter {
  /// Ask for a line of text.
  fn input(&mut self, field: &TextField) -> Result<String, PromptError>;

  /// Ask a yes/no question.
  fn confirm(&mut self, title: &str) -> Result<bool, PromptError>;

  /// Tell the operator why the last answer was rejected before asking again.
  fn report_invalid(&mut self, message: &str);
}
