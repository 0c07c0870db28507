//! CLI 集成测试
//!
//! 只覆盖不需要 V-REP 服务端的路径：帮助、配置管理、参数校验、后端加载失败。

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn cli(config_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("vrepsim-cli").unwrap();
    cmd.env("VREPSIM_CONFIG", config_dir.path().join("config.toml"));
    cmd.env_remove("VREPSIM_REMOTE_API");
    cmd
}

#[test]
fn test_help_lists_commands() {
    let dir = TempDir::new().unwrap();
    cli(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("config"))
        .stdout(predicate::str::contains("step"))
        .stdout(predicate::str::contains("pose"))
        .stdout(predicate::str::contains("--addr"));
}

#[test]
fn test_config_path_honours_env() {
    let dir = TempDir::new().unwrap();
    let expected = dir.path().join("config.toml");
    cli(&dir)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(expected.to_string_lossy().as_ref()));
}

#[test]
fn test_config_defaults() {
    let dir = TempDir::new().unwrap();
    cli(&dir)
        .args(["config", "get", "port"])
        .assert()
        .success()
        .stdout("19997\n");
    cli(&dir)
        .args(["config", "get", "address"])
        .assert()
        .success()
        .stdout("127.0.0.1\n");
}

#[test]
fn test_config_set_then_get() {
    let dir = TempDir::new().unwrap();
    cli(&dir)
        .args(["config", "set", "--addr", "192.168.1.20", "--port", "20000"])
        .assert()
        .success();

    assert!(dir.path().join("config.toml").exists());

    cli(&dir)
        .args(["config", "get", "port"])
        .assert()
        .success()
        .stdout("20000\n");
    cli(&dir)
        .args(["config", "get"])
        .assert()
        .success()
        .stdout(predicate::str::contains("address = \"192.168.1.20\""));
}

#[test]
fn test_config_rejects_invalid_values() {
    let dir = TempDir::new().unwrap();
    cli(&dir)
        .args(["config", "set", "--port", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("port"));
    cli(&dir)
        .args(["config", "get", "colour"])
        .assert()
        .failure();
}

#[test]
fn test_step_zero_is_rejected() {
    let dir = TempDir::new().unwrap();
    cli(&dir).args(["step", "-n", "0"]).assert().failure();
}

#[test]
fn test_load_missing_scene_file() {
    let dir = TempDir::new().unwrap();
    cli(&dir)
        .args(["load", "does-not-exist.ttt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does-not-exist.ttt"));
}

#[test]
fn test_missing_remote_api_library() {
    let dir = TempDir::new().unwrap();
    cli(&dir)
        .args(["--library", "/nonexistent/remoteApi.so", "info"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("remote API library"));
}
