/*
 * @Author       : 老董
 * @Date         : 2026-01-27
 * @Description  : Graph 模块的错误类型
 */

use crate::nn::nodes::{DType, NodeId};
use crate::nn::shape::DynamicShape;
use thiserror::Error;

/// Graph 操作错误类型
#[derive(Error, Debug, PartialEq, Eq)]
pub enum GraphError {
    #[error("节点{0:?}不存在")]
    NodeNotFound(NodeId),

    #[error("非法操作：{0}")]
    InvalidOperation(String),

    #[error("形状不匹配：期望{expected}，实际{got}。{message}")]
    ShapeMismatch {
        expected: DynamicShape,
        got: DynamicShape,
        message: String,
    },

    #[error("数据类型不匹配：期望{expected}，实际{got}。{message}")]
    DTypeMismatch {
        expected: DType,
        got: DType,
        message: String,
    },

    #[error("节点名重复：{0}")]
    DuplicateNodeName(String),
}
