//! 以子进程方式运行`save_graph`，检查退出码与固定的输出位置

mod common;

use common::*;
use std::process::Command;
use tempfile::TempDir;

fn save_graph(cwd: &std::path::Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_save_graph"));
    cmd.current_dir(cwd).env("RUST_LOG", "warn");
    cmd
}

#[test]
fn test_success_writes_tmp_graph_pbtxt() {
    let root = TempDir::new().unwrap();
    let model_dir = write_model(root.path(), SMALL_RESNET, None);

    let output = save_graph(root.path())
        .arg("--saved-model-dir")
        .arg(&model_dir)
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let text = std::fs::read_to_string(root.path().join("tmp").join("graph.pbtxt")).unwrap();
    assert!(text.contains("versions {"));
}

#[test]
fn test_summary_goes_to_stdout() {
    let root = TempDir::new().unwrap();
    let model_dir = write_model(root.path(), LINEAR_W_ONLY, None);

    let output = save_graph(root.path())
        .arg("--saved-model-dir")
        .arg(&model_dir)
        .arg("--summary")
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("总参数量: 19"));
}

#[test]
fn test_missing_arguments_fail() {
    let root = TempDir::new().unwrap();
    let output = save_graph(root.path()).output().unwrap();
    assert!(!output.status.success());
    assert!(!root.path().join("tmp").exists());
}

#[test]
fn test_conflicting_arguments_fail() {
    let root = TempDir::new().unwrap();
    let model_dir = write_model(root.path(), LINEAR_W_ONLY, None);
    let output = save_graph(root.path())
        .arg("--saved-model-dir")
        .arg(&model_dir)
        .arg("--model-config-json")
        .arg(model_dir.join("model.config.json"))
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(!root.path().join("tmp").exists());
}

#[test]
fn test_missing_checkpoint_fails() {
    let root = TempDir::new().unwrap();
    let model_dir = write_config(root.path(), LINEAR_W_ONLY);
    let output = save_graph(root.path())
        .arg("--saved-model-dir")
        .arg(&model_dir)
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(!root.path().join("tmp").join("graph.pbtxt").exists());
}
