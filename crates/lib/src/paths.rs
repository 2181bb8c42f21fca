//! Path resolution for collected settings.
//!
//! Users type path fragments like `~`, `~/.dotfiles`, `/etc/nixos` or `nixos`.
//! A fragment names the directory holding a required file (`flake.nix`,
//! `home.nix`, `configuration.nix`) and is only accepted when that file exists.

use std::path::{Component, Path, PathBuf};

use thiserror::Error;

use crate::consts::{APP_NAME, CONFIGURATION_NIX, FLAKE_NIX, HOME_NIX};
use crate::settings::RebuildSettings;

/// Errors resolving a path fragment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
  #[error("{file} does not exist at {path}")]
  NotFound { file: String, path: PathBuf },

  #[error("could not determine the home directory")]
  NoHomeDirectory,
}

/// Returns the directory for configuration files for the application
pub fn config_dir() -> PathBuf {
  let config_home = std::env::var("XDG_CONFIG_HOME")
    .map(PathBuf::from)
    .ok()
    .or_else(dirs::config_dir)
    .unwrap_or_else(|| PathBuf::from(".config"));
  config_home.join(APP_NAME)
}

/// Resolves fragments against a home and a working directory.
#[derive(Debug, Clone)]
pub struct PathResolver {
  home: Option<PathBuf>,
  cwd: PathBuf,
}

impl PathResolver {
  pub fn new(home: impl Into<PathBuf>, cwd: impl Into<PathBuf>) -> Self {
    Self {
      home: Some(home.into()),
      cwd: cwd.into(),
    }
  }

  /// Resolver for the running process.
  ///
  /// A missing home directory only fails fragments that start with `~`.
  pub fn from_env() -> std::io::Result<Self> {
    Ok(Self {
      home: dirs::home_dir(),
      cwd: std::env::current_dir()?,
    })
  }

  /// Resolve `fragment` to the location of `required_file` and check that it exists.
  ///
  /// - `~` resolves to `<home>/<required_file>`
  /// - `~/rest` resolves to `<home>/rest/<required_file>`
  /// - `/abs` resolves to `/abs/<required_file>`
  /// - anything else is relative to the working directory
  ///
  /// A fragment that already ends in `required_file` is not joined again.
  pub fn resolve(&self, fragment: &str, required_file: &str) -> Result<PathBuf, ResolveError> {
    let fragment = fragment.trim();

    let base = if fragment == "~" {
      self.home()?.to_path_buf()
    } else if let Some(rest) = fragment.strip_prefix("~/") {
      self.home()?.join(rest)
    } else if fragment.starts_with('/') {
      PathBuf::from(fragment)
    } else {
      self.cwd.join(fragment)
    };

    let base = normalize_path(&base);
    let path = if base.file_name().is_some_and(|name| name == required_file) {
      base
    } else {
      base.join(required_file)
    };

    if !path.exists() {
      return Err(ResolveError::NotFound {
        file: required_file.to_string(),
        path,
      });
    }

    Ok(path)
  }

  /// Resolve every path the settings need for a rebuild.
  ///
  /// The configuration path is always required; the home-manager and flake
  /// paths only when their workflow is enabled.
  pub fn resolve_settings(&self, settings: &RebuildSettings) -> Result<ResolvedPaths, ResolveError> {
    let configuration = self.resolve(&settings.configuration_path, CONFIGURATION_NIX)?;

    let home_manager = if settings.using_home_manager {
      Some(self.resolve(&settings.home_manager_path, HOME_NIX)?)
    } else {
      None
    };

    let flake = if settings.using_flakes {
      Some(self.resolve(&settings.flake_path, FLAKE_NIX)?)
    } else {
      None
    };

    Ok(ResolvedPaths {
      configuration,
      home_manager,
      flake,
    })
  }

  fn home(&self) -> Result<&Path, ResolveError> {
    self.home.as_deref().ok_or(ResolveError::NoHomeDirectory)
  }
}

/// Validated locations of the files a rebuild uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
  /// Path to `configuration.nix`.
  pub configuration: PathBuf,
  /// Path to `home.nix`, when home-manager is in use.
  pub home_manager: Option<PathBuf>,
  /// Path to `flake.nix`, when flakes are in use.
  pub flake: Option<PathBuf>,
}

impl ResolvedPaths {
  /// The flake reference handed to `--flake`: the directory holding `flake.nix`.
  pub fn flake_dir(&self) -> Option<&Path> {
    self.flake.as_deref().and_then(Path::parent)
  }
}

/// Normalize a path by resolving `.` and `..` components without requiring the path to exist
fn normalize_path(path: &Path) -> PathBuf {
  let mut components = Vec::new();

  for component in path.components() {
    match component {
      Component::ParentDir => {
        if matches!(components.last(), Some(Component::Normal(_))) {
          components.pop();
        }
      }
      Component::CurDir => {}
      other => components.push(other),
    }
  }

  components.iter().collect()
}
