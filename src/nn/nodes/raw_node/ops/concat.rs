use crate::nn::GraphError;
use crate::nn::descriptor::AttrValue;
use crate::nn::nodes::raw_node::{TraitNode, check_dtype};
use crate::nn::nodes::{DType, NodeHandle};
use crate::nn::shape::DynamicShape;
use std::collections::BTreeMap;

/// 沿某个轴拼接多个张量
#[derive(Clone, Debug)]
pub(crate) struct Concat {
    axis: usize,
    inputs_count: usize,
    shape: DynamicShape,
}

impl Concat {
    pub(crate) fn new(parents: &[&NodeHandle], axis: usize) -> Result<Self, GraphError> {
        // 1. 必要的验证
        if parents.len() < 2 {
            return Err(GraphError::InvalidOperation(
                "ConcatV2 节点至少需要 2 个父节点".to_string(),
            ));
        }
        let first = parents[0].output_shape();
        if axis >= first.ndim() {
            return Err(GraphError::InvalidOperation(format!(
                "ConcatV2 的拼接轴 {axis} 超出了输入{}的维数 {}",
                parents[0],
                first.ndim()
            )));
        }

        // 2. 非拼接轴须一致，拼接轴求和（任一未知则结果未知）
        let mut dims = first.dims().to_vec();
        for parent in &parents[1..] {
            check_dtype("ConcatV2", parent, parents[0].dtype())?;
            let shape = parent.output_shape();
            let compatible = shape.ndim() == first.ndim()
                && (0..first.ndim()).filter(|&i| i != axis).all(|i| {
                    match (dims[i], shape.dim(i)) {
                        (Some(x), Some(y)) => x == y,
                        _ => true,
                    }
                });
            if !compatible {
                return Err(GraphError::ShapeMismatch {
                    expected: first.clone(),
                    got: shape.clone(),
                    message: format!("ConcatV2 的输入{parent}除第 {axis} 维外形状须一致"),
                });
            }
            for i in 0..dims.len() {
                dims[i] = if i == axis {
                    dims[i].zip(shape.dim(i)).map(|(x, y)| x + y)
                } else {
                    dims[i].or(shape.dim(i))
                };
            }
        }

        // 3. 返回
        Ok(Self {
            axis,
            inputs_count: parents.len(),
            shape: DynamicShape::new(&dims),
        })
    }
}

impl TraitNode for Concat {
    fn op(&self) -> &'static str {
        "ConcatV2"
    }

    fn output_shape(&self) -> &DynamicShape {
        &self.shape
    }

    fn attrs(&self) -> BTreeMap<String, AttrValue> {
        let mut attrs = BTreeMap::new();
        attrs.insert("T".to_string(), AttrValue::Type(DType::Float));
        attrs.insert("N".to_string(), AttrValue::Int(self.inputs_count as i64));
        attrs.insert("axis".to_string(), AttrValue::Int(self.axis as i64));
        attrs
    }
}
