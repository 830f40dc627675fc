/*
 * @Author       : 老董
 * @Date         : 2026-10-14
 * @Description  : 模型配置（model.config.json）的读取与校验
 *
 * 配置只解析一次，解析后立即校验；任何格式或取值问题都在建图之前报错。
 * 未写`architecture`字段时按 resnet 处理，这样训练端原样导出的配置文件可以直接使用。
 */

mod version;

pub use version::ModelChannels;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("缺少参数：{0}")]
    MissingArgument(String),

    #[error("参数冲突：{0}")]
    ConflictingArguments(String),

    #[error("无法读取模型配置文件{}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("模型配置{origin}格式错误")]
    Parse {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("不支持的模型版本：{0}")]
    UnsupportedVersion(u32),

    #[error("模型配置非法：{0}")]
    Invalid(String),
}

/// 模型配置
///
/// 只能经由 [`ModelConfig::load`] 或 [`ModelConfig::from_json`] 得到，二者都会做校验。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelConfig {
    pub version: u32,
    #[serde(flatten)]
    pub architecture: Architecture,
}

/// 网络结构
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "architecture", rename_all = "snake_case")]
pub enum Architecture {
    Resnet(ResnetConfig),
    Linear(LinearConfig),
}

/// 残差网络各部分的通道数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResnetConfig {
    pub trunk_num_channels: usize,
    pub mid_num_channels: usize,
    pub regular_num_channels: usize,
    pub gpool_num_channels: usize,
    /// 按顺序排列的残差块：[名字, 种类]
    pub block_kind: Vec<BlockSpec>,
    pub p1_num_channels: usize,
    pub g1_num_channels: usize,
    pub v1_num_channels: usize,
    pub v2_size: usize,
}

/// 一个残差块，JSON 中写作`["rconv1", "regular"]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockSpec(pub String, pub BlockKind);

impl BlockSpec {
    pub fn name(&self) -> &str {
        &self.0
    }

    pub const fn kind(&self) -> BlockKind {
        self.1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    /// 两层 3×3 卷积加跳连
    Regular,
    /// 在 regular 的基础上，用全局池化的结果给第一层卷积加偏置
    Gpool,
}

/// 单层线性模型：global_inputs × w (+ b)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearConfig {
    #[serde(default = "default_num_outputs")]
    pub num_outputs: usize,
    #[serde(default = "default_use_bias")]
    pub use_bias: bool,
    #[serde(default = "default_weight_name")]
    pub weight_name: String,
    #[serde(default = "default_bias_name")]
    pub bias_name: String,
}

const fn default_num_outputs() -> usize {
    1
}

const fn default_use_bias() -> bool {
    true
}

fn default_weight_name() -> String {
    "w".to_string()
}

fn default_bias_name() -> String {
    "b".to_string()
}

impl Default for LinearConfig {
    fn default() -> Self {
        Self {
            num_outputs: default_num_outputs(),
            use_bias: default_use_bias(),
            weight_name: default_weight_name(),
            bias_name: default_bias_name(),
        }
    }
}

#[derive(Deserialize)]
struct ConfigHeader {
    version: u32,
    #[serde(default)]
    architecture: ArchitectureKind,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "snake_case")]
enum ArchitectureKind {
    #[default]
    Resnet,
    Linear,
}

impl ModelConfig {
    /// 读取、解析并校验配置文件
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&text, &path.display().to_string())?;
        tracing::info!(
            path = %path.display(),
            version = config.version,
            architecture = config.architecture_name(),
            "模型配置已加载"
        );
        Ok(config)
    }

    /// 从 JSON 文本解析并校验
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Self::parse(text, "<json>")
    }

    fn parse(text: &str, origin: &str) -> Result<Self, ConfigError> {
        let parse_err = |source: serde_json::Error| ConfigError::Parse {
            origin: origin.to_string(),
            source,
        };
        let value: serde_json::Value = serde_json::from_str(text).map_err(parse_err)?;
        let header: ConfigHeader = serde_json::from_value(value.clone()).map_err(parse_err)?;
        let architecture = match header.architecture {
            ArchitectureKind::Resnet => {
                Architecture::Resnet(serde_json::from_value(value).map_err(parse_err)?)
            }
            ArchitectureKind::Linear => {
                Architecture::Linear(serde_json::from_value(value).map_err(parse_err)?)
            }
        };

        let config = Self {
            version: header.version,
            architecture,
        };
        config.validate()?;
        Ok(config)
    }

    /// 校验取值；通过后可放心用于建图
    pub fn validate(&self) -> Result<(), ConfigError> {
        ModelChannels::for_version(self.version)?;
        match &self.architecture {
            Architecture::Resnet(resnet) => resnet.validate(),
            Architecture::Linear(linear) => linear.validate(),
        }
    }

    /// 该版本对应的输入输出通道数
    pub fn channels(&self) -> Result<ModelChannels, ConfigError> {
        ModelChannels::for_version(self.version)
    }

    pub const fn architecture_name(&self) -> &'static str {
        match self.architecture {
            Architecture::Resnet(_) => "resnet",
            Architecture::Linear(_) => "linear",
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl ResnetConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        let channels = [
            ("trunk_num_channels", self.trunk_num_channels),
            ("mid_num_channels", self.mid_num_channels),
            ("regular_num_channels", self.regular_num_channels),
            ("gpool_num_channels", self.gpool_num_channels),
            ("p1_num_channels", self.p1_num_channels),
            ("g1_num_channels", self.g1_num_channels),
            ("v1_num_channels", self.v1_num_channels),
            ("v2_size", self.v2_size),
        ];
        if let Some((field, _)) = channels.iter().find(|(_, n)| *n == 0) {
            return Err(ConfigError::Invalid(format!("{field} 必须大于 0")));
        }

        if self.block_kind.is_empty() {
            return Err(ConfigError::Invalid("block_kind 不能为空".to_string()));
        }
        let mut seen = HashSet::new();
        for block in &self.block_kind {
            if block.name().is_empty() || block.name().contains('/') {
                return Err(ConfigError::Invalid(format!(
                    "残差块名`{}`非法：不能为空，也不能含有`/`",
                    block.name()
                )));
            }
            if !seen.insert(block.name()) {
                return Err(ConfigError::Invalid(format!(
                    "残差块名`{}`重复",
                    block.name()
                )));
            }
        }
        Ok(())
    }
}

impl LinearConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.num_outputs == 0 {
            return Err(ConfigError::Invalid("num_outputs 必须大于 0".to_string()));
        }
        for (field, name) in [("weight_name", &self.weight_name), ("bias_name", &self.bias_name)] {
            if name.is_empty() {
                return Err(ConfigError::Invalid(format!("{field} 不能为空")));
            }
        }
        if self.use_bias && self.weight_name == self.bias_name {
            return Err(ConfigError::Invalid(format!(
                "weight_name 与 bias_name 不能相同（都是`{}`）",
                self.weight_name
            )));
        }
        Ok(())
    }
}
