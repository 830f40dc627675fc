use crate::nn::GraphError;
use crate::nn::nodes::raw_node::{TraitNode, check_dtype, check_parents_count};
use crate::nn::nodes::{DType, NodeHandle};
use crate::nn::shape::DynamicShape;

/// 逐元素相乘（支持广播），用于按通道缩放输入特征
#[derive(Clone, Debug)]
pub(crate) struct Multiply {
    shape: DynamicShape,
}

impl Multiply {
    pub(crate) fn new(parents: &[&NodeHandle]) -> Result<Self, GraphError> {
        check_parents_count("Mul", parents, 2)?;
        check_dtype("Mul", parents[0], DType::Float)?;
        check_dtype("Mul", parents[1], DType::Float)?;

        let (a, b) = (parents[0].output_shape(), parents[1].output_shape());
        let shape = a.broadcast_with(b).ok_or_else(|| GraphError::ShapeMismatch {
            expected: a.clone(),
            got: b.clone(),
            message: format!("Mul 的输入{}与{}无法广播", parents[0], parents[1]),
        })?;

        Ok(Self { shape })
    }
}

impl TraitNode for Multiply {
    fn op(&self) -> &'static str {
        "Mul"
    }

    fn output_shape(&self) -> &DynamicShape {
        &self.shape
    }
}
