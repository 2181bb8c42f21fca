//! Implementation of the `nixrb init` command.

use std::path::Path;

use anyhow::{Context, Result, bail};

use nixrb_lib::settings::Configuration;

use crate::output::print_success;

/// Write a settings document with default values to `path`.
///
/// # Errors
///
/// Returns an error if a file already exists at `path` or it cannot be written.
pub fn cmd_init(path: &Path) -> Result<()> {
  if path.exists() {
    bail!("{} already exists", path.display());
  }

  if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
    std::fs::create_dir_all(parent).with_context(|| format!("Failed to create {}", parent.display()))?;
  }

  Configuration::default_document()
    .save(path)
    .context("Failed to write settings document")?;

  print_success(&format!("Wrote settings document to {}", path.display()));
  Ok(())
}
