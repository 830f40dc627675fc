//! 集成测试共用的模型目录搭建工具

#![allow(dead_code)]

use save_graph::checkpoint::{CheckpointPrefix, Saver};
use save_graph::cli::{ExportArgs, ModelLoadArgs};
use save_graph::config::ModelConfig;
use save_graph::export::build_graph;
use save_graph::session::{Init, Session};
use std::path::{Path, PathBuf};

pub const SMALL_RESNET: &str = r#"{
    "version": 8,
    "trunk_num_channels": 8,
    "mid_num_channels": 8,
    "regular_num_channels": 4,
    "gpool_num_channels": 4,
    "block_kind": [["rconv1", "regular"], ["rconv2", "gpool"]],
    "p1_num_channels": 4,
    "g1_num_channels": 4,
    "v1_num_channels": 4,
    "v2_size": 6
}"#;

pub const LINEAR_W_ONLY: &str = r#"{
    "version": 8,
    "architecture": "linear",
    "use_bias": false
}"#;

/// 按`--saved-model-dir`的目录布局写出配置文件；返回模型目录
pub fn write_config(root: &Path, config_json: &str) -> PathBuf {
    let model_dir = root.join("model");
    std::fs::create_dir_all(&model_dir).unwrap();
    std::fs::write(model_dir.join("model.config.json"), config_json).unwrap();
    model_dir
}

pub fn variables_prefix(model_dir: &Path) -> CheckpointPrefix {
    CheckpointPrefix::new(model_dir.join("saved_model").join("variables").join("variables"))
}

/// 建图、初始化变量并保存检查点（变量名与同一命名空间下建出的图一致）
pub fn write_checkpoint(model_dir: &Path, name_scope: Option<&str>, init: Init) {
    let config = ModelConfig::load(model_dir.join("model.config.json")).unwrap();
    let (graph, _model) = build_graph(&config, name_scope).unwrap();
    let mut saver = Saver::builder().build(&graph).unwrap();
    let mut session = Session::new(graph);
    session.initialize_variables(init, 42).unwrap();
    saver
        .save(&session, &variables_prefix(model_dir), None)
        .unwrap();
}

/// 配置 + 检查点俱全的模型目录
pub fn write_model(root: &Path, config_json: &str, name_scope: Option<&str>) -> PathBuf {
    let model_dir = write_config(root, config_json);
    write_checkpoint(
        &model_dir,
        name_scope,
        Init::Normal {
            mean: 0.0,
            std: 0.1,
        },
    );
    model_dir
}

pub fn export_args(model_dir: &Path, name_scope: Option<&str>) -> ExportArgs {
    ExportArgs {
        model: ModelLoadArgs {
            saved_model_dir: Some(model_dir.to_path_buf()),
            ..Default::default()
        },
        name_scope: name_scope.map(str::to_string),
        summary: false,
    }
}

/// 文本图定义中全部节点的名字（按出现顺序）
pub fn node_names(pbtxt: &str) -> Vec<String> {
    pbtxt
        .lines()
        .filter_map(|line| line.trim().strip_prefix("name: \""))
        .map(|rest| rest.trim_end_matches('"').to_string())
        .collect()
}

pub fn count_op(pbtxt: &str, op: &str) -> usize {
    let needle = format!("op: \"{op}\"");
    pbtxt.lines().filter(|line| line.trim() == needle).count()
}
