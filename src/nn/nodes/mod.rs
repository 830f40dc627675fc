/*
 * @Author       : 老董
 * @Date         : 2026-10-12
 * @Description  : 计算图节点：NodeId、数据类型与节点句柄
 *
 * 节点只描述结构（算子类型、输出形状、静态属性），不持有任何数值；
 * 变量的具体数值由 Session 持有。
 */

pub(crate) mod raw_node;

pub use raw_node::{ConstantInput, Padding, ReduceKind, ScalarValue};

use self::raw_node::{
    Add, BiasAdd, Concat, Constant, Conv2d, FusedBatchNorm, Identity, MatMul, Multiply, NodeType,
    Placeholder, Reduce, Relu, Reshape, TraitNode, Variable,
};
use super::descriptor::AttrValue;
use super::{DynamicShape, GraphError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u64);

/// 节点输出的数据类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DType {
    Float,
    Bool,
}

impl DType {
    /// 图定义文件中的类型名
    pub const fn tf_name(&self) -> &'static str {
        match self {
            Self::Float => "DT_FLOAT",
            Self::Bool => "DT_BOOL",
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tf_name())
    }
}

#[derive(Clone, Debug)]
pub(crate) struct NodeHandle {
    name: Option<String>,
    raw_node: NodeType,
}

impl NodeHandle {
    fn from_raw<T: Into<NodeType>>(raw_node: T) -> Self {
        Self {
            name: None,
            raw_node: raw_node.into(),
        }
    }

    pub(in crate::nn) fn new_placeholder(
        dtype: DType,
        shape: DynamicShape,
    ) -> Result<Self, GraphError> {
        Ok(Self::from_raw(Placeholder::new(dtype, shape)))
    }

    pub(in crate::nn) fn new_constant(input: &ConstantInput) -> Result<Self, GraphError> {
        Ok(Self::from_raw(Constant::new(input)?))
    }

    pub(in crate::nn) fn new_variable(
        shape: &[usize],
        trainable: bool,
    ) -> Result<Self, GraphError> {
        Ok(Self::from_raw(Variable::new(shape, trainable)?))
    }

    pub(in crate::nn) fn new_conv2d(
        parents: &[&NodeHandle],
        stride: usize,
        padding: Padding,
    ) -> Result<Self, GraphError> {
        Ok(Self::from_raw(Conv2d::new(parents, stride, padding)?))
    }

    pub(in crate::nn) fn new_mat_mul(parents: &[&NodeHandle]) -> Result<Self, GraphError> {
        Ok(Self::from_raw(MatMul::new(parents)?))
    }

    pub(in crate::nn) fn new_add(parents: &[&NodeHandle]) -> Result<Self, GraphError> {
        Ok(Self::from_raw(Add::new(parents)?))
    }

    pub(in crate::nn) fn new_bias_add(parents: &[&NodeHandle]) -> Result<Self, GraphError> {
        Ok(Self::from_raw(BiasAdd::new(parents)?))
    }

    pub(in crate::nn) fn new_multiply(parents: &[&NodeHandle]) -> Result<Self, GraphError> {
        Ok(Self::from_raw(Multiply::new(parents)?))
    }

    pub(in crate::nn) fn new_relu(parents: &[&NodeHandle]) -> Result<Self, GraphError> {
        Ok(Self::from_raw(Relu::new(parents)?))
    }

    pub(in crate::nn) fn new_fused_batch_norm(
        parents: &[&NodeHandle],
        epsilon: f32,
    ) -> Result<Self, GraphError> {
        Ok(Self::from_raw(FusedBatchNorm::new(parents, epsilon)?))
    }

    pub(in crate::nn) fn new_reduce(
        parents: &[&NodeHandle],
        kind: ReduceKind,
        axes: &[usize],
    ) -> Result<Self, GraphError> {
        Ok(Self::from_raw(Reduce::new(parents, kind, axes)?))
    }

    pub(in crate::nn) fn new_concat(
        parents: &[&NodeHandle],
        axis: usize,
    ) -> Result<Self, GraphError> {
        Ok(Self::from_raw(Concat::new(parents, axis)?))
    }

    pub(in crate::nn) fn new_reshape(
        parents: &[&NodeHandle],
        target_shape: &[i64],
    ) -> Result<Self, GraphError> {
        Ok(Self::from_raw(Reshape::new(parents, target_shape)?))
    }

    pub(in crate::nn) fn new_identity(parents: &[&NodeHandle]) -> Result<Self, GraphError> {
        Ok(Self::from_raw(Identity::new(parents)?))
    }

    pub(in crate::nn) fn bind_name(&mut self, name: &str) {
        self.name = Some(name.to_string());
    }

    pub(crate) fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    pub(crate) fn op(&self) -> &'static str {
        self.raw_node.op()
    }

    pub(crate) fn dtype(&self) -> DType {
        self.raw_node.dtype()
    }

    pub(crate) fn output_shape(&self) -> &DynamicShape {
        self.raw_node.output_shape()
    }

    pub(crate) fn attrs(&self) -> BTreeMap<String, AttrValue> {
        self.raw_node.attrs()
    }

    pub(crate) fn is_variable(&self) -> bool {
        matches!(self.raw_node, NodeType::Variable(_))
    }

    pub(crate) fn is_trainable(&self) -> bool {
        match &self.raw_node {
            NodeType::Variable(v) => v.trainable(),
            _ => false,
        }
    }
}

impl fmt::Display for NodeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "节点[{}]（{}）", self.name(), self.op())
    }
}
