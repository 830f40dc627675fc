use crate::nn::GraphError;
use crate::nn::descriptor::AttrValue;
use crate::nn::nodes::raw_node::{TraitNode, check_dtype, check_parents_count};
use crate::nn::nodes::{DType, NodeHandle};
use crate::nn::shape::DynamicShape;
use std::collections::BTreeMap;

/// 改变形状。目标形状中至多一个 -1，表示由元素总数推断
#[derive(Clone, Debug)]
pub(crate) struct Reshape {
    target: Vec<i64>,
    shape: DynamicShape,
}

impl Reshape {
    pub(crate) fn new(parents: &[&NodeHandle], target: &[i64]) -> Result<Self, GraphError> {
        // 1. 必要的验证
        check_parents_count("Reshape", parents, 1)?;
        check_dtype("Reshape", parents[0], DType::Float)?;

        let inferred = target.iter().filter(|&&d| d == -1).count();
        if inferred > 1 || target.iter().any(|&d| d == 0 || d < -1) {
            return Err(GraphError::InvalidOperation(format!(
                "Reshape 的目标形状{target:?}非法：维度须为正数，且至多一个 -1"
            )));
        }

        // 2. 输入的已知维度须与目标形状相容
        let known: usize = target
            .iter()
            .filter(|&&d| d > 0)
            .map(|&d| d as usize)
            .product();
        let input = parents[0].output_shape();
        let known_input: usize = input.dims().iter().flatten().product();
        let mismatch = match (input.num_elements(), inferred) {
            (Some(total), 0) => total != known,
            (Some(total), _) => total % known != 0,
            // 输入含未知维度、目标全部已知：目标须是已知部分的整数倍
            (None, 0) => known.checked_rem(known_input) != Some(0),
            // 未知维度整体并入 -1，其余已知元素须能被目标的已知部分整除
            (None, _) => known_input.checked_rem(known) != Some(0),
        };
        if mismatch {
            return Err(GraphError::ShapeMismatch {
                expected: DynamicShape::from_signed_dims(target),
                got: input.clone(),
                message: format!("Reshape 无法把{}变为{target:?}", parents[0]),
            });
        }

        let mut shape = DynamicShape::from_signed_dims(target);
        if let (Some(total), 1) = (input.num_elements(), inferred) {
            let dims: Vec<usize> = target
                .iter()
                .map(|&d| if d == -1 { total / known } else { d as usize })
                .collect();
            shape = DynamicShape::fixed(&dims);
        }

        // 3. 返回
        Ok(Self {
            target: target.to_vec(),
            shape,
        })
    }
}

impl TraitNode for Reshape {
    fn op(&self) -> &'static str {
        "Reshape"
    }

    fn output_shape(&self) -> &DynamicShape {
        &self.shape
    }

    fn attrs(&self) -> BTreeMap<String, AttrValue> {
        let mut attrs = BTreeMap::new();
        attrs.insert("T".to_string(), AttrValue::Type(DType::Float));
        attrs.insert("shape".to_string(), AttrValue::Ints(self.target.clone()));
        attrs
    }
}
