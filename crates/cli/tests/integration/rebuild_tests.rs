//! Rebuild command integration tests.

use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn rebuild_and_commit_issues_commands_in_order() {
  let env = TestEnv::new();
  let configuration = env.path("nixos").join("configuration.nix");

  env
    .nixrb_cmd()
    .arg("rebuild")
    .arg("--yes")
    .assert()
    .success()
    .stdout(predicate::str::contains(
      "committed generation: 12 current 2024-06-01 09:00:00 24.05",
    ))
    .stderr(predicate::str::contains("Rebuilding NixOS in progress"))
    .stderr(predicate::str::contains("Rebuilding NixOS done"))
    .stderr(predicate::str::contains("NixOS rebuild OK!"));

  assert_eq!(
    env.issued(),
    vec![
      "git diff --quiet *.nix".to_string(),
      "git diff -U0 *.nix".to_string(),
      "git add .".to_string(),
      format!("sudo nixos-rebuild switch {}", configuration.display()),
      format!("nixos-rebuild switch {}", configuration.display()),
      "nixos-rebuild list-generations".to_string(),
      "git commit -am 12 current 2024-06-01 09:00:00 24.05".to_string(),
    ]
  );
}

#[test]
fn flake_and_home_manager_run_every_stage() {
  let env = TestEnv::new();
  env.write_file("dots/flake.nix", "{ outputs = _: { }; }\n");
  env.write_file("dots/home.nix", "{ ... }: { }\n");
  env.write_settings(&format!(
    "RebuildSettings:\n  ConfigurationNixPath: {}\n  UsingHomeManager: true\n  HomeNixPath: ~/dots\n  UsingFlakes: true\n  FlakeNixPath: ~/dots\n",
    env.path("nixos").display()
  ));
  let flake = env.path("dots");

  env.nixrb_cmd().arg("rebuild").arg("--yes").assert().success();

  let issued = env.issued();
  assert_eq!(issued[2], "git add .");
  assert_eq!(issued[3], format!("sudo nixos-rebuild switch --flake {}", flake.display()));
  assert_eq!(issued[5], format!("home-manager switch --flake {}", flake.display()));
  assert_eq!(issued[6], "nix flake update");
  assert_eq!(issued[8], "git commit -am 12 current 2024-06-01 09:00:00 24.05");
}

#[test]
fn failed_system_rebuild_stops_before_commit() {
  let env = TestEnv::new();

  env
    .nixrb_cmd()
    .arg("rebuild")
    .arg("--yes")
    .env("FAKE_SWITCH_EXIT", "1")
    .assert()
    .failure()
    .stderr(predicate::str::contains("Could not rebuild NixOS."))
    .stderr(predicate::str::contains("Rebuilding NixOS failed"))
    .stderr(predicate::str::contains("attribute 'foo' missing"));

  let issued = env.issued();
  assert!(!issued.iter().any(|c| c.starts_with("git commit")));
  assert!(!issued.iter().any(|c| c.contains("list-generations")));
}

#[test]
fn failed_commit_is_reported() {
  let env = TestEnv::new();

  env
    .nixrb_cmd()
    .arg("rebuild")
    .arg("--yes")
    .env("FAKE_GIT_COMMIT_EXIT", "1")
    .assert()
    .failure()
    .stderr(predicate::str::contains("could not commit changes"));
}

#[test]
fn unchanged_tree_is_skipped_on_request() {
  let env = TestEnv::new();

  env
    .nixrb_cmd()
    .arg("rebuild")
    .arg("--yes")
    .arg("--skip-unchanged")
    .env("FAKE_GIT_DIFF_EXIT", "0")
    .assert()
    .success()
    .stdout(predicate::str::contains("rebuild skipped"));

  assert_eq!(env.issued(), vec!["git diff --quiet *.nix"]);
}

#[test]
fn unchanged_tree_still_rebuilds_by_default() {
  let env = TestEnv::new();

  env
    .nixrb_cmd()
    .arg("rebuild")
    .arg("--yes")
    .env("FAKE_GIT_DIFF_EXIT", "0")
    .assert()
    .success();

  let issued = env.issued();
  assert_eq!(issued[0], "git diff --quiet *.nix");
  assert_eq!(issued[1], "git add .");
}

#[test]
fn missing_tool_is_reported() {
  let env = TestEnv::new();
  std::fs::remove_file(env.path("bin").join("sudo")).unwrap();

  env
    .nixrb_cmd()
    .arg("rebuild")
    .arg("--yes")
    .assert()
    .failure()
    .stderr(predicate::str::contains("failed to execute 'sudo'"));

  assert!(!env.issued().iter().any(|c| c.starts_with("git commit")));
}

#[test]
fn log_prefix_is_applied() {
  let env = TestEnv::new();
  env.write_document(&format!(
    "LoggingSettings:\n  Prefix: \"[nixrb]\"\n  ReportTimestamp: false\nRebuildSettings:\n  ConfigurationNixPath: {}\n",
    env.path("nixos").display()
  ));

  env
    .nixrb_cmd()
    .arg("rebuild")
    .arg("--yes")
    .assert()
    .success()
    .stderr(predicate::str::contains("[nixrb]"))
    .stderr(predicate::str::contains("NixOS rebuild OK!"));
}
