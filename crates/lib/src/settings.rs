//! The settings document.
//!
//! A YAML file with two sections: `LoggingSettings` controls how log lines look,
//! `RebuildSettings` holds the paths and flags the rebuild workflow runs with.
//! Every field is optional in the document and falls back to its default.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::consts::{DEFAULT_TRACKED_GLOB, SETTINGS_FILENAME};
use crate::paths::config_dir;

/// Errors reading or writing the settings document.
#[derive(Debug, Error)]
pub enum SettingsError {
  /// No settings document could be located.
  #[error("settings document not found: {path}")]
  NotFound { path: String },

  /// The document exists but could not be read.
  #[error("could not read settings document {path}")]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  /// The document is not valid YAML for this layout.
  #[error("could not load settings document {path}")]
  Parse {
    path: PathBuf,
    #[source]
    source: serde_yaml::Error,
  },

  #[error("could not serialize settings")]
  Serialize(#[from] serde_yaml::Error),

  /// Writing the document back failed.
  #[error("could not write settings document {path}")]
  Write {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
}

/// Presentation of log lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
  /// strftime-style format for timestamps. Empty uses the subscriber default.
  #[serde(rename = "TimeFormat")]
  pub time_format: String,
  /// Text written before every log line.
  #[serde(rename = "Prefix")]
  pub prefix: String,
  #[serde(rename = "ReportTimestamp")]
  pub report_timestamp: bool,
  /// Include source file and line of the log call.
  #[serde(rename = "ReportCaller")]
  pub report_caller: bool,
}

impl Default for LoggingSettings {
  fn default() -> Self {
    Self {
      time_format: "%H:%M:%S".to_string(),
      prefix: String::new(),
      report_timestamp: true,
      report_caller: false,
    }
  }
}

/// Paths and flags for one rebuild run.
///
/// Loaded from the document, amended by the settings collector, then read-only
/// for the rest of the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RebuildSettings {
  /// Directory (or `~` fragment) holding `configuration.nix`.
  #[serde(rename = "ConfigurationNixPath")]
  pub configuration_path: String,
  #[serde(rename = "UsingHomeManager")]
  pub using_home_manager: bool,
  /// Directory (or `~` fragment) holding `home.nix`.
  #[serde(rename = "HomeNixPath")]
  pub home_manager_path: String,
  #[serde(rename = "UsingFlakes")]
  pub using_flakes: bool,
  /// Directory (or `~` fragment) holding `flake.nix`.
  #[serde(rename = "FlakeNixPath")]
  pub flake_path: String,
  /// Pathspec glob handed to `git diff` when looking for changes.
  #[serde(rename = "TrackedGlob")]
  pub tracked_glob: String,
  /// End the run without rebuilding when the tracked files are unchanged.
  #[serde(rename = "SkipWhenUnchanged")]
  pub skip_when_unchanged: bool,
}

impl Default for RebuildSettings {
  fn default() -> Self {
    Self {
      configuration_path: String::new(),
      using_home_manager: false,
      home_manager_path: String::new(),
      using_flakes: false,
      flake_path: String::new(),
      tracked_glob: DEFAULT_TRACKED_GLOB.to_string(),
      skip_when_unchanged: false,
    }
  }
}

/// The whole settings document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
  #[serde(rename = "LoggingSettings")]
  pub logging: LoggingSettings,
  #[serde(rename = "RebuildSettings")]
  pub rebuild: RebuildSettings,
}

impl Configuration {
  /// Load and parse the document at `path`.
  pub fn load(path: &Path) -> Result<Self, SettingsError> {
    let content = fs::read_to_string(path).map_err(|source| SettingsError::Read {
      path: path.to_path_buf(),
      source,
    })?;

    let configuration = serde_yaml::from_str(&content).map_err(|source| SettingsError::Parse {
      path: path.to_path_buf(),
      source,
    })?;

    debug!(path = %path.display(), "loaded settings document");
    Ok(configuration)
  }

  /// Write the document to `path`.
  ///
  /// The content goes to a temporary file next to `path` which is then renamed
  /// over it, so an interrupted write never leaves a truncated document behind.
  pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
    let yaml = serde_yaml::to_string(self)?;

    let dir = match path.parent() {
      Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
      _ => PathBuf::from("."),
    };
    let write_err = |source: std::io::Error| SettingsError::Write {
      path: path.to_path_buf(),
      source,
    };

    let mut temp = tempfile::NamedTempFile::new_in(&dir).map_err(write_err)?;
    temp.write_all(yaml.as_bytes()).map_err(write_err)?;
    temp.persist(path).map_err(|e| write_err(e.error))?;

    debug!(path = %path.display(), "saved settings document");
    Ok(())
  }

  /// Copy the paths entered in the settings form into the document and write it to `path`.
  ///
  /// Only the three path fields are taken from `entered`; flags set for a single
  /// run stay out of the document. Nothing is written unless `changed` holds.
  /// Returns whether the document was written.
  pub fn save_entered_paths(
    &mut self,
    path: &Path,
    entered: &RebuildSettings,
    changed: bool,
  ) -> Result<bool, SettingsError> {
    if !changed {
      return Ok(false);
    }

    self.rebuild.configuration_path = entered.configuration_path.clone();
    self.rebuild.home_manager_path = entered.home_manager_path.clone();
    self.rebuild.flake_path = entered.flake_path.clone();
    self.save(path)?;
    Ok(true)
  }

  /// The document written by `nixrb init`.
  pub fn default_document() -> Self {
    Self {
      logging: LoggingSettings::default(),
      rebuild: RebuildSettings {
        configuration_path: "/etc/nixos".to_string(),
        ..RebuildSettings::default()
      },
    }
  }
}

/// Find the settings document, with fallback resolution.
///
/// Priority order:
/// 1. Explicit path if provided (must exist)
/// 2. `./configuration.yaml` in the current directory
/// 3. `~/.config/nixrb/configuration.yaml` (user config dir)
pub fn find_config_path(explicit: Option<&Path>) -> Result<PathBuf, SettingsError> {
  if let Some(path) = explicit {
    if path.exists() {
      return Ok(path.to_path_buf());
    }
    return Err(SettingsError::NotFound {
      path: path.display().to_string(),
    });
  }

  let cwd_config = PathBuf::from(SETTINGS_FILENAME);
  if cwd_config.exists() {
    return Ok(cwd_config);
  }

  let user_config = config_dir().join(SETTINGS_FILENAME);
  if user_config.exists() {
    return Ok(user_config);
  }

  Err(SettingsError::NotFound {
    path: format!(
      "{} (tried ./{} and {})",
      SETTINGS_FILENAME,
      SETTINGS_FILENAME,
      user_config.display()
    ),
  })
}
