use crate::nn::GraphError;
use crate::nn::nodes::raw_node::{TraitNode, check_dtype, check_parents_count};
use crate::nn::nodes::{DType, NodeHandle};
use crate::nn::shape::DynamicShape;

#[derive(Clone, Debug)]
pub(crate) struct Relu {
    shape: DynamicShape,
}

impl Relu {
    pub(crate) fn new(parents: &[&NodeHandle]) -> Result<Self, GraphError> {
        check_parents_count("Relu", parents, 1)?;
        check_dtype("Relu", parents[0], DType::Float)?;
        Ok(Self {
            shape: parents[0].output_shape().clone(),
        })
    }
}

impl TraitNode for Relu {
    fn op(&self) -> &'static str {
        "Relu"
    }

    fn output_shape(&self) -> &DynamicShape {
        &self.shape
    }
}
