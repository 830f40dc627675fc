mod input;
mod ops;
mod variable;

pub use input::{ConstantInput, ScalarValue};
pub use ops::{Padding, ReduceKind};

pub(in crate::nn::nodes) use input::{Constant, Placeholder};
pub(in crate::nn::nodes) use ops::*;
pub(in crate::nn::nodes) use variable::Variable;

use super::{DType, NodeHandle};
use crate::nn::descriptor::AttrValue;
use crate::nn::{DynamicShape, GraphError};
use enum_dispatch::enum_dispatch;
use std::collections::BTreeMap;

#[enum_dispatch]
#[derive(Clone, Debug)]
pub(in crate::nn::nodes) enum NodeType {
    Placeholder(Placeholder),
    Constant(Constant),
    Variable(Variable),
    Conv2d(Conv2d),
    MatMul(MatMul),
    Add(Add),
    BiasAdd(BiasAdd),
    Multiply(Multiply),
    Relu(Relu),
    FusedBatchNorm(FusedBatchNorm),
    Reduce(Reduce),
    Concat(Concat),
    Reshape(Reshape),
    Identity(Identity),
}

#[enum_dispatch(NodeType)]
pub(in crate::nn::nodes) trait TraitNode {
    /// 图定义文件中的算子名，如`Conv2D`、`VariableV2`
    fn op(&self) -> &'static str;

    fn dtype(&self) -> DType {
        DType::Float
    }

    /// 建图时推断出的静态输出形状
    fn output_shape(&self) -> &DynamicShape;

    /// 算子的静态属性（不含任何参数数值）
    fn attrs(&self) -> BTreeMap<String, AttrValue> {
        let mut attrs = BTreeMap::new();
        attrs.insert("T".to_string(), AttrValue::Type(self.dtype()));
        attrs
    }
}

// ----------------------以下是各算子共用的校验----------------------

/// 校验父节点数量
pub(in crate::nn::nodes) fn check_parents_count(
    op: &str,
    parents: &[&NodeHandle],
    expected: usize,
) -> Result<(), GraphError> {
    if parents.len() != expected {
        return Err(GraphError::InvalidOperation(format!(
            "{op} 节点需要 {expected} 个父节点，但收到了 {} 个",
            parents.len()
        )));
    }
    Ok(())
}

/// 校验父节点的数据类型
pub(in crate::nn::nodes) fn check_dtype(
    op: &str,
    parent: &NodeHandle,
    expected: DType,
) -> Result<(), GraphError> {
    if parent.dtype() != expected {
        return Err(GraphError::DTypeMismatch {
            expected,
            got: parent.dtype(),
            message: format!("{op} 的输入{parent}类型不符"),
        });
    }
    Ok(())
}

/// 校验父节点的阶数
pub(in crate::nn::nodes) fn check_rank(
    op: &str,
    parent: &NodeHandle,
    expected: usize,
) -> Result<(), GraphError> {
    let shape = parent.output_shape();
    if shape.ndim() != expected {
        return Err(GraphError::ShapeMismatch {
            expected: DynamicShape::new(&vec![None; expected]),
            got: shape.clone(),
            message: format!("{op} 的输入{parent}必须是 {expected} 维"),
        });
    }
    Ok(())
}

/// 两个维度是否可能相等（任一方未知时视为相等）
pub(in crate::nn::nodes) fn dims_agree(a: Option<usize>, b: Option<usize>) -> bool {
    match (a, b) {
        (Some(x), Some(y)) => x == y,
        _ => true,
    }
}
