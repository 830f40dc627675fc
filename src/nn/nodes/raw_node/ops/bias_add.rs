use crate::nn::GraphError;
use crate::nn::descriptor::AttrValue;
use crate::nn::nodes::raw_node::{
    TraitNode, check_dtype, check_parents_count, check_rank, dims_agree,
};
use crate::nn::nodes::{DType, NodeHandle};
use crate::nn::shape::DynamicShape;
use std::collections::BTreeMap;

/// 沿最后一维加偏置：x[..., C] + b[C]
#[derive(Clone, Debug)]
pub(crate) struct BiasAdd {
    shape: DynamicShape,
}

impl BiasAdd {
    pub(crate) fn new(parents: &[&NodeHandle]) -> Result<Self, GraphError> {
        check_parents_count("BiasAdd", parents, 2)?;
        check_dtype("BiasAdd", parents[0], DType::Float)?;
        check_dtype("BiasAdd", parents[1], DType::Float)?;
        check_rank("BiasAdd", parents[1], 1)?;

        let (x, bias) = (parents[0].output_shape(), parents[1].output_shape());
        if x.ndim() < 2 {
            return Err(GraphError::ShapeMismatch {
                expected: DynamicShape::new(&[None, bias.dim(0)]),
                got: x.clone(),
                message: format!("BiasAdd 的输入{}至少需要 2 维", parents[0]),
            });
        }
        if !dims_agree(x.last_dim(), bias.dim(0)) {
            return Err(GraphError::ShapeMismatch {
                expected: DynamicShape::new(&[x.last_dim()]),
                got: bias.clone(),
                message: format!(
                    "BiasAdd 的偏置{}长度与输入{}的最后一维不一致",
                    parents[1], parents[0]
                ),
            });
        }

        Ok(Self { shape: x.clone() })
    }
}

impl TraitNode for BiasAdd {
    fn op(&self) -> &'static str {
        "BiasAdd"
    }

    fn output_shape(&self) -> &DynamicShape {
        &self.shape
    }

    fn attrs(&self) -> BTreeMap<String, AttrValue> {
        let mut attrs = BTreeMap::new();
        attrs.insert("T".to_string(), AttrValue::Type(DType::Float));
        attrs.insert("data_format".to_string(), AttrValue::Str("NHWC".to_string()));
        attrs
    }
}
