use std::path::PathBuf;

use thiserror::Error;

use crate::checkpoint::CheckpointError;
use crate::config::ConfigError;
use crate::nn::GraphError;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TensorError {
    #[error("数据长度{data_len}与形状{shape:?}所需的元素个数{expected}不一致")]
    DataShapeMismatch {
        data_len: usize,
        shape: Vec<usize>,
        expected: usize,
    },
}

/// 导出流程中可能出现的全部错误
///
/// 各阶段的错误原样向上传递，不在本地处理，也不重试。
#[derive(Error, Debug)]
pub enum ExportError {
    #[error(transparent)]
    Configuration(#[from] ConfigError),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Restore(#[from] CheckpointError),

    #[error("无法写入{}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("图定义编码失败")]
    Encode(#[source] bincode::Error),
}
