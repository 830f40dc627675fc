/*
 * @Author       : 老董
 * @Date         : 2026-10-17
 * @Description  : 恢复检查点并导出计算图
 *
 * 流程：解析路径 -> 读取配置 -> 建图 -> 会话中恢复变量 -> 写出图定义。
 * 任一步失败都直接返回错误，恢复失败时不会产生输出文件。
 */

use crate::checkpoint::{CheckpointPrefix, Saver};
use crate::cli::ExportArgs;
use crate::config::ModelConfig;
use crate::errors::ExportError;
use crate::model::{Model, ModelInputs, POS_LEN};
use crate::nn::{Graph, GraphError, write_graph};
use crate::session::Session;
use std::path::{Path, PathBuf};

/// 图定义的输出目录（相对于当前工作目录）
pub const OUTPUT_DIR: &str = "./tmp";
pub const OUTPUT_FILENAME: &str = "graph.pbtxt";

/// 按配置建图；`name_scope`只影响节点命名
pub fn build_graph(
    config: &ModelConfig,
    name_scope: Option<&str>,
) -> Result<(Graph, Model), GraphError> {
    let mut graph = Graph::new();
    let model = Model::build(
        &mut graph,
        config,
        POS_LEN,
        &ModelInputs::export_defaults(),
        name_scope,
    )?;
    Ok((graph, model))
}

/// 在会话中从`prefix`恢复`graph`的全部变量，再把图结构写到`{output_dir}/{filename}`
///
/// 会话在函数返回时释放，无论成功与否。
pub fn export<P: AsRef<Path>>(
    graph: Graph,
    prefix: &CheckpointPrefix,
    output_dir: P,
    filename: &str,
) -> Result<PathBuf, ExportError> {
    let saver = Saver::builder()
        .max_to_keep(10000)
        .save_relative_paths(true)
        .build(&graph)?;
    let mut session = Session::new(graph);
    saver.restore(&mut session, prefix)?;
    write_graph(&session.graph().describe(), output_dir, filename, true)
}

/// 完整流程，输出固定为`./tmp/graph.pbtxt`
pub fn run(args: &ExportArgs) -> Result<PathBuf, ExportError> {
    run_with_output(args, OUTPUT_DIR)
}

/// 同[`run`]，但输出到指定目录
pub fn run_with_output<P: AsRef<Path>>(
    args: &ExportArgs,
    output_dir: P,
) -> Result<PathBuf, ExportError> {
    let paths = args.model.resolve()?;
    let config = ModelConfig::load(&paths.config_json)?;
    let (graph, model) = build_graph(&config, args.name_scope.as_deref())?;
    tracing::debug!(
        outputs = ?model.outputs().keys().collect::<Vec<_>>(),
        "网络输出节点"
    );
    if args.summary {
        print!("{}", graph.summary_string());
    }
    export(
        graph,
        &CheckpointPrefix::new(paths.variables_prefix),
        output_dir,
        OUTPUT_FILENAME,
    )
}
