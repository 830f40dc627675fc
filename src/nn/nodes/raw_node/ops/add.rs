use crate::nn::GraphError;
use crate::nn::nodes::raw_node::{TraitNode, check_dtype, check_parents_count};
use crate::nn::nodes::{DType, NodeHandle};
use crate::nn::shape::DynamicShape;

/// 逐元素相加（支持广播）
#[derive(Clone, Debug)]
pub(crate) struct Add {
    shape: DynamicShape,
}

impl Add {
    pub(crate) fn new(parents: &[&NodeHandle]) -> Result<Self, GraphError> {
        // 1. 必要的验证
        // 1.1 父节点数量与类型
        check_parents_count("AddV2", parents, 2)?;
        check_dtype("AddV2", parents[0], DType::Float)?;
        check_dtype("AddV2", parents[1], DType::Float)?;

        // 1.2 两个父节点的形状须可广播
        let (a, b) = (parents[0].output_shape(), parents[1].output_shape());
        let shape = a.broadcast_with(b).ok_or_else(|| GraphError::ShapeMismatch {
            expected: a.clone(),
            got: b.clone(),
            message: format!("AddV2 的输入{}与{}无法广播", parents[0], parents[1]),
        })?;

        // 2. 返回
        Ok(Self { shape })
    }
}

impl TraitNode for Add {
    fn op(&self) -> &'static str {
        "AddV2"
    }

    fn output_shape(&self) -> &DynamicShape {
        &self.shape
    }
}
