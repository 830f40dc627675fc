use std::path::PathBuf;

use thiserror::Error;

use crate::nn::{DType, GraphError};

/// 检查点读写（保存/恢复）过程中的错误
#[derive(Error, Debug)]
pub enum CheckpointError {
    #[error("检查点文件不存在: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("检查点文件{}已损坏: {reason}", path.display())]
    Corrupted { path: PathBuf, reason: String },

    #[error("检查点中缺少变量{0}")]
    MissingVariable(String),

    #[error("变量{name}的形状不符：图中为{expected:?}，检查点中为{got:?}")]
    ShapeMismatch {
        name: String,
        expected: Vec<usize>,
        got: Vec<usize>,
    },

    #[error("变量{name}的类型不符：图中为{expected}，检查点中为{got}")]
    DTypeMismatch {
        name: String,
        expected: DType,
        got: DType,
    },

    #[error("变量{0}尚未赋值，无法保存")]
    Uninitialized(String),

    #[error("计算图中没有任何变量可供保存或恢复")]
    NoVariables,

    #[error("读写{}失败", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Graph(#[from] GraphError),
}

impl CheckpointError {
    pub(super) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(super) fn corrupted(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Corrupted {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
