use super::{CheckpointError, CheckpointPrefix, STATE_FILENAME};
use crate::utils::text_format::{TextWriter, parse_string_field};
use std::path::{Path, PathBuf};

/// 检查点状态文件的内容
///
/// 以文本格式存放：
/// ```text
/// model_checkpoint_path: "model-300"
/// all_model_checkpoint_paths: "model-200"
/// all_model_checkpoint_paths: "model-300"
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CheckpointState {
    pub model_checkpoint_path: String,
    pub all_model_checkpoint_paths: Vec<String>,
}

impl CheckpointState {
    pub fn to_text(&self) -> String {
        let mut w = TextWriter::new();
        w.field_str("model_checkpoint_path", &self.model_checkpoint_path);
        for path in &self.all_model_checkpoint_paths {
            w.field_str("all_model_checkpoint_paths", path);
        }
        w.finish()
    }

    /// 解析状态文件文本；`origin`只用于错误信息
    pub fn parse(text: &str, origin: &Path) -> Result<Self, CheckpointError> {
        let mut latest = None;
        let mut all = Vec::new();
        for (line_no, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let (key, value) = parse_string_field(line).ok_or_else(|| {
                CheckpointError::corrupted(origin, format!("第{}行无法解析", line_no + 1))
            })?;
            match key {
                "model_checkpoint_path" => latest = Some(value),
                "all_model_checkpoint_paths" => all.push(value),
                other => tracing::debug!(key = other, "忽略状态文件中的未知字段"),
            }
        }
        let model_checkpoint_path = latest
            .ok_or_else(|| CheckpointError::corrupted(origin, "缺少 model_checkpoint_path"))?;
        Ok(Self {
            model_checkpoint_path,
            all_model_checkpoint_paths: all,
        })
    }

    /// 读取`dir`下的状态文件；文件不存在时返回`None`
    pub fn read(dir: &Path) -> Result<Option<Self>, CheckpointError> {
        let path = dir.join(STATE_FILENAME);
        match std::fs::read_to_string(&path) {
            Ok(text) => Self::parse(&text, &path).map(Some),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CheckpointError::io(path, e)),
        }
    }

    pub fn write(&self, dir: &Path) -> Result<(), CheckpointError> {
        let path = dir.join(STATE_FILENAME);
        std::fs::write(&path, self.to_text())
            .map_err(|e| CheckpointError::io(path, e))
    }
}

/// 把状态文件中的路径还原为前缀：相对路径相对于状态文件所在目录
fn resolve(dir: &Path, recorded: &str) -> CheckpointPrefix {
    let recorded = PathBuf::from(recorded);
    if recorded.is_absolute() {
        CheckpointPrefix::new(recorded)
    } else {
        CheckpointPrefix::new(dir.join(recorded))
    }
}

/// 读取`dir`中最近一次保存的检查点前缀；没有状态文件时返回`None`
pub fn latest_checkpoint(
    dir: impl AsRef<Path>,
) -> Result<Option<CheckpointPrefix>, CheckpointError> {
    let dir = dir.as_ref();
    Ok(CheckpointState::read(dir)?.map(|state| resolve(dir, &state.model_checkpoint_path)))
}
