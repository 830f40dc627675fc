/*
 * @Author       : 老董
 * @Date         : 2026-10-14
 * @Description  : 命令行参数与模型路径解析
 *
 * 模型路径有两种给法（二选一）：
 * - `--saved-model-dir D`：参数前缀为`D/saved_model/variables/variables`，
 *   配置文件为`D/model.config.json`
 * - `--model-variables-prefix P --model-config-json F`：分别显式给出
 */

use crate::config::ConfigError;
use clap::{Args, Parser};
use std::path::PathBuf;

/// 加载模型所需的参数
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelLoadArgs {
    /// 训练端导出的 saved model 目录
    #[arg(long, value_name = "DIR")]
    pub saved_model_dir: Option<PathBuf>,

    /// 检查点前缀（如`.../variables/variables`）
    #[arg(long, value_name = "PREFIX")]
    pub model_variables_prefix: Option<PathBuf>,

    /// 模型配置文件（model.config.json）
    #[arg(long, value_name = "FILE")]
    pub model_config_json: Option<PathBuf>,
}

/// 解析后的模型路径
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelPaths {
    pub variables_prefix: PathBuf,
    pub config_json: PathBuf,
}

impl ModelLoadArgs {
    pub fn resolve(&self) -> Result<ModelPaths, ConfigError> {
        let paths = match (
            &self.saved_model_dir,
            &self.model_variables_prefix,
            &self.model_config_json,
        ) {
            (Some(dir), None, None) => ModelPaths {
                variables_prefix: dir.join("saved_model").join("variables").join("variables"),
                config_json: dir.join("model.config.json"),
            },
            (Some(_), _, _) => {
                return Err(ConfigError::ConflictingArguments(
                    "--saved-model-dir 不能与 --model-variables-prefix / --model-config-json 同时使用"
                        .to_string(),
                ));
            }
            (None, Some(prefix), Some(config)) => ModelPaths {
                variables_prefix: prefix.clone(),
                config_json: config.clone(),
            },
            (None, None, Some(_)) => {
                return Err(ConfigError::MissingArgument(
                    "--model-variables-prefix".to_string(),
                ));
            }
            (None, Some(_), None) => {
                return Err(ConfigError::MissingArgument("--model-config-json".to_string()));
            }
            (None, None, None) => {
                return Err(ConfigError::MissingArgument(
                    "--saved-model-dir，或 --model-variables-prefix 与 --model-config-json"
                        .to_string(),
                ));
            }
        };

        tracing::info!(
            variables_prefix = %paths.variables_prefix.display(),
            config_json = %paths.config_json.display(),
            "模型路径已解析"
        );
        Ok(paths)
    }
}

/// 从检查点恢复网络，并把计算图写到 ./tmp/graph.pbtxt
#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub struct ExportArgs {
    #[command(flatten)]
    pub model: ModelLoadArgs,

    /// 模型变量所在的命名空间
    #[arg(long, value_name = "SCOPE")]
    pub name_scope: Option<String>,

    /// 同时在标准输出打印计算图摘要
    #[arg(long)]
    pub summary: bool,
}
