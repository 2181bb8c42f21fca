//! CLI output formatting utilities.
//!
//! Status lines with colored symbols, plus human-readable durations.

use std::time::Duration;

use owo_colors::{OwoColorize, Stream};

pub mod symbols {
  pub const SUCCESS: &str = "✓";
  pub const ERROR: &str = "✗";
  pub const INFO: &str = "•";
}

pub fn format_duration(duration: Duration) -> String {
  let secs = duration.as_secs();
  let millis = duration.subsec_millis();

  if secs >= 60 {
    let mins = secs / 60;
    let remaining_secs = secs % 60;
    format!("{}m {}s", mins, remaining_secs)
  } else if secs > 0 {
    format!("{}.{:02}s", secs, millis / 10)
  } else {
    format!("{}ms", millis)
  }
}

pub fn print_success(message: &str) {
  println!(
    "{} {}",
    symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()),
    message
  );
}

pub fn print_error(message: &str) {
  eprintln!(
    "{} {}",
    symbols::ERROR.if_supports_color(Stream::Stderr, |s| s.red()),
    message.if_supports_color(Stream::Stderr, |s| s.red())
  );
}

pub fn print_info(message: &str) {
  println!(
    "{} {}",
    symbols::INFO.if_supports_color(Stream::Stdout, |s| s.blue()),
    message
  );
}

/// Indented, dimmed line on stderr (captured command output).
pub fn print_detail(line: &str) {
  eprintln!("  {}", line.if_supports_color(Stream::Stderr, |s| s.dimmed()));
}

/// Print a unified diff, coloring added and removed lines.
pub fn print_diff(diff: &str) {
  for line in diff.lines() {
    if line.starts_with("+++") || line.starts_with("---") {
      println!("{}", line.if_supports_color(Stream::Stdout, |s| s.bold()));
    } else if line.starts_with('+') {
      println!("{}", line.if_supports_color(Stream::Stdout, |s| s.green()));
    } else if line.starts_with('-') {
      println!("{}", line.if_supports_color(Stream::Stdout, |s| s.red()));
    } else if line.starts_with("@@") {
      println!("{}", line.if_supports_color(Stream::Stdout, |s| s.cyan()));
    } else {
      println!("{}", line);
    }
  }
}
