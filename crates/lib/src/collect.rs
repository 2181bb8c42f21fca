//! Settings collection.
//!
//! Walks a fixed sequence of prompt groups. Each group is shown only when its
//! visibility predicate holds for the settings collected so far, and each path
//! answer must resolve before the next group is shown. A rejected answer is
//! reported and asked again; only cancelling the form ends collection early.

use tracing::{debug, warn};

use crate::consts::{CONFIGURATION_NIX, FLAKE_NIX, HOME_NIX, PATH_PLACEHOLDER};
use crate::paths::PathResolver;
use crate::prompt::{PromptError, Prompter, TextField};
use crate::settings::RebuildSettings;

/// Title of the final go/no-go question.
pub const REBUILD_QUESTION: &str = "Rebuild?";

/// Result of a completed form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collected {
  pub settings: RebuildSettings,
  pub should_rebuild: bool,
  /// True when any path was filled in by the operator.
  pub changed: bool,
}

struct PathGroup {
  required_file: &'static str,
  visible: fn(&RebuildSettings) -> bool,
  field: fn(&mut RebuildSettings) -> &mut String,
}

const PATH_GROUPS: [PathGroup; 3] = [
  PathGroup {
    required_file: CONFIGURATION_NIX,
    visible: |s| is_blank(&s.configuration_path),
    field: |s| &mut s.configuration_path,
  },
  PathGroup {
    required_file: HOME_NIX,
    visible: |s| s.using_home_manager && is_blank(&s.home_manager_path),
    field: |s| &mut s.home_manager_path,
  },
  PathGroup {
    required_file: FLAKE_NIX,
    visible: |s| s.using_flakes && is_blank(&s.flake_path),
    field: |s| &mut s.flake_path,
  },
];

fn is_blank(value: &str) -> bool {
  value.trim().is_empty()
}

/// Complete `settings` by asking for every missing path, then ask whether to rebuild.
pub fn collect_settings<P: Prompter>(
  mut settings: RebuildSettings,
  resolver: &PathResolver,
  prompter: &mut P,
) -> Result<Collected, PromptError> {
  let mut changed = false;

  for group in &PATH_GROUPS {
    if !(group.visible)(&settings) {
      debug!(file = group.required_file, "path already set, skipping prompt");
      continue;
    }

    let field = TextField {
      title: format!("Enter the path to '{}':", group.required_file),
      placeholder: PATH_PLACEHOLDER.to_string(),
    };

    let answer = loop {
      let answer = prompter.input(&field)?;
      match resolver.resolve(&answer, group.required_file) {
        Ok(path) => {
          debug!(path = %path.display(), "accepted path");
          break answer.trim().to_string();
        }
        Err(e) => {
          warn!(error = %e, "rejected path");
          prompter.report_invalid(&e.to_string());
        }
      }
    };

    *(group.field)(&mut settings) = answer;
    changed = true;
  }

  let should_rebuild = prompter.confirm(REBUILD_QUESTION)?;

  Ok(Collected {
    settings,
    should_rebuild,
    changed,
  })
}
