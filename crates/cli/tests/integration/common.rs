//! Shared test helpers for CLI integration tests.
//!
//! Each test gets a temporary directory holding a settings document, a NixOS
//! configuration, and a `bin/` directory of shell scripts standing in for
//! `git`, `sudo`, `nixos-rebuild`, `home-manager` and `nix`. Every script
//! appends its command line to a log file so tests can assert on the exact
//! commands issued.

use std::path::PathBuf;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

const GIT: &str = r#"#!/bin/sh
echo "git $*" >> "$NIXRB_TEST_LOG"
case "$1 $2" in
  "diff --quiet") exit "${FAKE_GIT_DIFF_EXIT:-1}" ;;
  "diff -U0") echo "+  services.openssh.enable = true;" ;;
  "commit -am") exit "${FAKE_GIT_COMMIT_EXIT:-0}" ;;
esac
exit 0
"#;

const SUDO: &str = r#"#!/bin/sh
echo "sudo $*" >> "$NIXRB_TEST_LOG"
exec "$@"
"#;

const NIXOS_REBUILD: &str = r#"#!/bin/sh
echo "nixos-rebuild $*" >> "$NIXRB_TEST_LOG"
case "$1" in
  switch)
    if [ "${FAKE_SWITCH_EXIT:-0}" != "0" ]; then
      echo "error: attribute 'foo' missing" >&2
      exit "$FAKE_SWITCH_EXIT"
    fi
    ;;
  list-generations)
    printf 'Generation  Build-date           NixOS version\n'
    printf '11          2024-05-31 08:00:00  24.05\n'
    printf '12 current  2024-06-01 09:00:00  24.05\n'
    ;;
esac
exit 0
"#;

const LOGGING_ONLY: &str = r#"#!/bin/sh
echo "${0##*/} $*" >> "$NIXRB_TEST_LOG"
exit 0
"#;

/// Isolated test environment.
pub struct TestEnv {
  pub temp: TempDir,
  pub config_path: PathBuf,
}

impl TestEnv {
  /// Environment whose settings document points at an existing `configuration.nix`.
  pub fn new() -> Self {
    let env = Self::bare();
    env.write_file("nixos/configuration.nix", "{ ... }: { }\n");
    env.write_settings(&format!(
      "RebuildSettings:\n  ConfigurationNixPath: {}\n",
      env.path("nixos").display()
    ));
    env
  }

  /// Environment with fake tools but no settings document.
  pub fn bare() -> Self {
    let temp = TempDir::new().unwrap();
    let config_path = temp.path().join("configuration.yaml");
    let env = Self { temp, config_path };

    env.install_tool("git", GIT);
    env.install_tool("sudo", SUDO);
    env.install_tool("nixos-rebuild", NIXOS_REBUILD);
    env.install_tool("home-manager", LOGGING_ONLY);
    env.install_tool("nix", LOGGING_ONLY);
    env
  }

  /// Absolute path inside the temp directory.
  pub fn path(&self, relative_path: &str) -> PathBuf {
    self.temp.path().join(relative_path)
  }

  /// Write a file relative to the temp directory.
  pub fn write_file(&self, relative_path: &str, content: &str) {
    let path = self.path(relative_path);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
  }

  /// Replace the settings document. Timestamps are always off for stable output.
  pub fn write_settings(&self, rebuild_section: &str) {
    self.write_document(&format!("LoggingSettings:\n  ReportTimestamp: false\n{}", rebuild_section));
  }

  /// Replace the settings document with `content` as given.
  pub fn write_document(&self, content: &str) {
    std::fs::write(&self.config_path, content).unwrap();
  }

  fn install_tool(&self, name: &str, script: &str) {
    use std::os::unix::fs::PermissionsExt;

    let path = self.path("bin").join(name);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, script).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
  }

  /// Commands issued so far, one per line.
  pub fn issued(&self) -> Vec<String> {
    std::fs::read_to_string(self.path("commands.log"))
      .unwrap_or_default()
      .lines()
      .map(str::to_string)
      .collect()
  }

  /// Get a pre-configured Command for the nixrb binary.
  ///
  /// Runs inside the temp directory with only the fake tools on `PATH`, plain
  /// progress lines, and the settings document passed via `--config`.
  pub fn nixrb_cmd(&self) -> Command {
    let mut cmd: Command = cargo_bin_cmd!("nixrb");
    cmd.current_dir(self.temp.path());
    cmd.env("PATH", self.path("bin"));
    cmd.env("HOME", self.temp.path());
    cmd.env("NIXRB_TEST_LOG", self.path("commands.log"));
    cmd.env("ACCESSIBLE", "1");
    cmd.env_remove("RUST_LOG");
    cmd.arg("--config").arg(&self.config_path);
    cmd
  }
}
