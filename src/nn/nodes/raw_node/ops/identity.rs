use crate::nn::GraphError;
use crate::nn::nodes::raw_node::{TraitNode, check_parents_count};
use crate::nn::nodes::{DType, NodeHandle};
use crate::nn::shape::DynamicShape;

/// 恒等节点：给某个输出起一个稳定的名字（如`policy_output`）
#[derive(Clone, Debug)]
pub(crate) struct Identity {
    dtype: DType,
    shape: DynamicShape,
}

impl Identity {
    pub(crate) fn new(parents: &[&NodeHandle]) -> Result<Self, GraphError> {
        check_parents_count("Identity", parents, 1)?;
        Ok(Self {
            dtype: parents[0].dtype(),
            shape: parents[0].output_shape().clone(),
        })
    }
}

impl TraitNode for Identity {
    fn op(&self) -> &'static str {
        "Identity"
    }

    fn dtype(&self) -> DType {
        self.dtype
    }

    fn output_shape(&self) -> &DynamicShape {
        &self.shape
    }
}
