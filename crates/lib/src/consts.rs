/// Name used for the user configuration directory.
pub const APP_NAME: &str = "nixrb";

/// File name of the settings document.
pub const SETTINGS_FILENAME: &str = "configuration.yaml";

/// Default glob of tracked declarative configuration files.
pub const DEFAULT_TRACKED_GLOB: &str = "*.nix";

/// Required file names for each collected path.
pub const CONFIGURATION_NIX: &str = "configuration.nix";
pub const HOME_NIX: &str = "home.nix";
pub const FLAKE_NIX: &str = "flake.nix";

/// Hint shown next to path prompts.
pub const PATH_PLACEHOLDER: &str = ".dotfiles";
