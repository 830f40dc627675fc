use crate::nn::GraphError;
use crate::nn::descriptor::AttrValue;
use crate::nn::nodes::raw_node::{
    TraitNode, check_dtype, check_parents_count, check_rank, dims_agree,
};
use crate::nn::nodes::{DType, NodeHandle};
use crate::nn::shape::DynamicShape;
use std::collections::BTreeMap;

/// 矩阵乘法：[M, K] × [K, N] -> [M, N]
#[derive(Clone, Debug)]
pub(crate) struct MatMul {
    shape: DynamicShape,
}

impl MatMul {
    pub(crate) fn new(parents: &[&NodeHandle]) -> Result<Self, GraphError> {
        // 1. 必要的验证
        check_parents_count("MatMul", parents, 2)?;
        for parent in parents {
            check_dtype("MatMul", parent, DType::Float)?;
            check_rank("MatMul", parent, 2)?;
        }
        let (a, b) = (parents[0].output_shape(), parents[1].output_shape());
        if !dims_agree(a.dim(1), b.dim(0)) {
            return Err(GraphError::ShapeMismatch {
                expected: DynamicShape::new(&[a.dim(1), None]),
                got: b.clone(),
                message: format!(
                    "MatMul 的第一个输入{}的列数与第二个输入{}的行数不一致",
                    parents[0], parents[1]
                ),
            });
        }

        // 2. 返回
        Ok(Self {
            shape: DynamicShape::new(&[a.dim(0), b.dim(1)]),
        })
    }
}

impl TraitNode for MatMul {
    fn op(&self) -> &'static str {
        "MatMul"
    }

    fn output_shape(&self) -> &DynamicShape {
        &self.shape
    }

    fn attrs(&self) -> BTreeMap<String, AttrValue> {
        let mut attrs = BTreeMap::new();
        attrs.insert("T".to_string(), AttrValue::Type(DType::Float));
        attrs.insert("transpose_a".to_string(), AttrValue::Bool(false));
        attrs.insert("transpose_b".to_string(), AttrValue::Bool(false));
        attrs
    }
}
