//! Lifecycle command integration tests.

use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn up_creates_all_machines() {
  let env = TestEnv::from_fixture("two_machines.toml");

  env
    .vessel_cmd()
    .arg("up")
    .assert()
    .success()
    .stdout(predicate::str::contains("web: running 'up'"))
    .stdout(predicate::str::contains("db: 'up' complete"));

  assert!(env.state_file("web").exists());
  assert!(env.state_file("db").exists());
}

#[test]
fn up_single_machine() {
  let env = TestEnv::from_fixture("two_machines.toml");

  env.vessel_cmd().args(["up", "db"]).assert().success();

  assert!(env.state_file("db").exists());
  assert!(!env.state_file("web").exists());
}

#[test]
fn halt_before_up_fails() {
  let env = TestEnv::from_fixture("two_machines.toml");

  env
    .vessel_cmd()
    .args(["halt", "web"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("is not created"));
}

#[test]
fn destroy_removes_state() {
  let env = TestEnv::from_fixture("two_machines.toml");

  env.vessel_cmd().args(["up", "web"]).assert().success();
  assert!(env.state_file("web").exists());

  env.vessel_cmd().args(["destroy", "web"]).assert().success();
  assert!(!env.state_file("web").exists());
}

#[test]
fn destroy_is_idempotent() {
  let env = TestEnv::from_fixture("two_machines.toml");

  env.vessel_cmd().arg("destroy").assert().success();
  env.vessel_cmd().arg("destroy").assert().success();
}

#[test]
fn unsupported_action_is_reported() {
  let env = TestEnv::from_fixture("two_machines.toml");

  env
    .vessel_cmd()
    .args(["run", "suspend", "web"])
    .assert()
    .failure()
    .stderr(predicate::str::contains(
      "the Dummy provider does not implement the 'suspend' action",
    ))
    .stdout(predicate::str::contains("running").not());
}

#[test]
fn run_accepts_builtin_actions() {
  let env = TestEnv::from_fixture("two_machines.toml");

  env.vessel_cmd().args(["run", "up", "web"]).assert().success();
  assert!(env.state_file("web").exists());
}

#[test]
fn invalid_action_name_is_rejected() {
  let env = TestEnv::from_fixture("two_machines.toml");

  env
    .vessel_cmd()
    .args(["run", "no such action"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("invalid action name"));
}

#[test]
fn unknown_machine_is_rejected() {
  let env = TestEnv::from_fixture("two_machines.toml");

  env
    .vessel_cmd()
    .args(["up", "cache"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("no machine named 'cache'"));
}

#[test]
fn unknown_provider_is_rejected() {
  let env = TestEnv::from_fixture("unknown_provider.toml");

  env
    .vessel_cmd()
    .arg("up")
    .assert()
    .failure()
    .stderr(predicate::str::contains("unknown provider 'virtualbox'"));
}

#[test]
fn empty_environment_is_a_noop() {
  let env = TestEnv::from_fixture("empty.toml");

  env
    .vessel_cmd()
    .arg("up")
    .assert()
    .success()
    .stdout(predicate::str::contains("No machines defined"));
}

#[test]
fn machine_names_must_be_identifiers() {
  let env = TestEnv::from_fixture("escaping_name.toml");
  let victim = env.temp.path().join("victim");
  std::fs::create_dir_all(&victim).unwrap();

  env
    .vessel_cmd()
    .arg("destroy")
    .assert()
    .failure()
    .stderr(predicate::str::contains("invalid machine name '../victim'"));

  assert!(victim.exists());
}

#[test]
fn destroy_cleans_up_corrupt_state() {
  let env = TestEnv::from_fixture("two_machines.toml");
  env.vessel_cmd().args(["up", "web"]).assert().success();
  std::fs::write(env.state_file("web"), "{ garbage").unwrap();

  env.vessel_cmd().args(["status", "web"]).assert().failure();
  env.vessel_cmd().args(["destroy", "web"]).assert().success();

  assert!(!env.state_file("web").exists());
  env
    .vessel_cmd()
    .args(["status", "web"])
    .assert()
    .success()
    .stdout(predicate::str::contains("web: not_created"));
}
