/*
 * @Author       : 老董
 * @Date         : 2026-10-16
 * @Description  : 检查点：变量数值的保存与恢复
 *
 * 前缀为`P`的一个检查点由两个文件组成：
 * - `P.index`：JSON 索引，记录每个变量的名字、类型与形状
 * - `P.data-00000-of-00001`：二进制数据，按索引顺序存放 f32 数值
 * 同一目录下的`checkpoint`状态文件记录最近保存过的检查点。
 */

mod error;
mod format;
mod saver;
mod state;


pub use error::CheckpointError;
pub use format::{CheckpointIndex, IndexEntry};
pub use saver::{Saver, SaverBuilder};
pub use state::{CheckpointState, latest_checkpoint};

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

pub const INDEX_SUFFIX: &str = ".index";
pub const DATA_SUFFIX: &str = ".data-00000-of-00001";
pub const STATE_FILENAME: &str = "checkpoint";

/// 检查点前缀，如`model/saved_model/variables/variables`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CheckpointPrefix(PathBuf);

impl CheckpointPrefix {
    pub fn new(prefix: impl Into<PathBuf>) -> Self {
        Self(prefix.into())
    }

    /// 带训练步数的前缀：`P` -> `P-<step>`
    pub fn with_global_step(&self, step: u64) -> Self {
        Self(self.with_suffix(&format!("-{step}")))
    }

    pub fn path(&self) -> &Path {
        &self.0
    }

    pub fn index_path(&self) -> PathBuf {
        self.with_suffix(INDEX_SUFFIX)
    }

    pub fn data_path(&self) -> PathBuf {
        self.with_suffix(DATA_SUFFIX)
    }

    /// 所在目录（前缀没有目录部分时为当前目录）
    pub fn dir(&self) -> &Path {
        match self.0.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    /// 去掉目录后的前缀名
    pub fn file_name(&self) -> String {
        self.0
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// 索引与数据文件是否都存在
    pub fn exists(&self) -> bool {
        self.index_path().is_file() && self.data_path().is_file()
    }

    fn with_suffix(&self, suffix: &str) -> PathBuf {
        let mut s = OsString::from(self.0.as_os_str());
        s.push(suffix);
        PathBuf::from(s)
    }
}

impl fmt::Display for CheckpointPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

impl From<PathBuf> for CheckpointPrefix {
    fn from(path: PathBuf) -> Self {
        Self(path)
    }
}

impl From<&Path> for CheckpointPrefix {
    fn from(path: &Path) -> Self {
        Self(path.to_path_buf())
    }
}

impl From<&str> for CheckpointPrefix {
    fn from(path: &str) -> Self {
        Self(PathBuf::from(path))
    }
}
