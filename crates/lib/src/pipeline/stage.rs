//! Rebuild stages and their argument vectors.

use std::path::Path;

use crate::paths::ResolvedPaths;
use crate::settings::RebuildSettings;

/// One external command of the rebuild, constructed fresh for each run.
#[derive(Debug, Clone)]
pub struct Stage {
  pub title: String,
  pub argv: Vec<String>,
  /// The stage does not run when this holds.
  pub skip: fn(&RebuildSettings) -> bool,
  /// Logged at info when the command succeeds.
  pub success_message: &'static str,
  /// Reported when the command fails.
  pub failure_message: &'static str,
}

impl Stage {
  pub fn is_skipped(&self, settings: &RebuildSettings) -> bool {
    (self.skip)(settings)
  }
}

fn never(_: &RebuildSettings) -> bool {
  false
}

fn argv(parts: &[&str]) -> Vec<String> {
  parts.iter().map(|s| s.to_string()).collect()
}

fn display(path: Option<&Path>, fallback: &str) -> String {
  path.map(|p| p.display().to_string()).unwrap_or_else(|| fallback.to_string())
}

/// The rebuild stages in execution order, before the commit stage.
pub fn rebuild_stages(settings: &RebuildSettings, paths: &ResolvedPaths) -> Vec<Stage> {
  let flake = display(paths.flake_dir(), &settings.flake_path);

  let system_rebuild = if settings.using_flakes {
    argv(&["sudo", "nixos-rebuild", "switch", "--flake", &flake])
  } else {
    let configuration = display(Some(paths.configuration.as_path()), &settings.configuration_path);
    argv(&["sudo", "nixos-rebuild", "switch", &configuration])
  };

  let user_rebuild = if settings.using_flakes {
    argv(&["home-manager", "switch", "--flake", &flake])
  } else {
    let home = display(paths.home_manager.as_deref(), &settings.home_manager_path);
    argv(&["home-manager", "switch", &home])
  };

  vec![
    Stage {
      title: "Staging changes".to_string(),
      argv: argv(&["git", "add", "."]),
      skip: never,
      success_message: "Changes staged.",
      failure_message: "Could not stage changes.",
    },
    Stage {
      title: "Rebuilding NixOS".to_string(),
      argv: system_rebuild,
      skip: never,
      success_message: "NixOS rebuild OK!",
      failure_message: "Could not rebuild NixOS.",
    },
    Stage {
      title: "Rebuilding Home Manager".to_string(),
      argv: user_rebuild,
      skip: |s| !s.using_home_manager,
      success_message: "Home Manager rebuild OK!",
      failure_message: "Could not rebuild Home Manager.",
    },
    Stage {
      title: "Updating flake".to_string(),
      argv: argv(&["nix", "flake", "update"]),
      skip: |s| !s.using_flakes,
      success_message: "Flake update OK!",
      failure_message: "Could not update Flake.",
    },
  ]
}
