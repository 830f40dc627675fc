/*
 * @Author       : 老董
 * @Date         : 2026-10-12
 * @Description  : 批归一化节点（只有偏移 beta，没有缩放 gamma）
 *
 * 父节点：
 * - parents[0]: 输入 [batch, H, W, C]
 * - parents[1]: beta [C]
 * - parents[2]: moving_mean [C]
 * - parents[3]: moving_variance [C]
 * - parents[4]: is_training 布尔标量，决定使用批统计量还是滑动统计量
 */

use crate::nn::GraphError;
use crate::nn::descriptor::AttrValue;
use crate::nn::nodes::raw_node::{
    TraitNode, check_dtype, check_parents_count, check_rank, dims_agree,
};
use crate::nn::nodes::{DType, NodeHandle};
use crate::nn::shape::DynamicShape;
use std::collections::BTreeMap;

#[derive(Clone, Debug)]
pub(crate) struct FusedBatchNorm {
    shape: DynamicShape,
    epsilon: f32,
}

impl FusedBatchNorm {
    pub(crate) fn new(parents: &[&NodeHandle], epsilon: f32) -> Result<Self, GraphError> {
        // 1. 必要的验证
        // 1.1 父节点数量与类型
        check_parents_count("FusedBatchNormV3", parents, 5)?;
        for parent in &parents[..4] {
            check_dtype("FusedBatchNormV3", parent, DType::Float)?;
        }
        check_dtype("FusedBatchNormV3", parents[4], DType::Bool)?;
        if !parents[4].output_shape().dims().is_empty() {
            return Err(GraphError::ShapeMismatch {
                expected: DynamicShape::scalar(),
                got: parents[4].output_shape().clone(),
                message: format!("FusedBatchNormV3 的{}必须是标量", parents[4]),
            });
        }

        // 1.2 各统计量须是长度为通道数的向量
        let input = parents[0].output_shape();
        for parent in &parents[1..4] {
            check_rank("FusedBatchNormV3", parent, 1)?;
            if !dims_agree(parent.output_shape().dim(0), input.last_dim()) {
                return Err(GraphError::ShapeMismatch {
                    expected: DynamicShape::new(&[input.last_dim()]),
                    got: parent.output_shape().clone(),
                    message: format!(
                        "FusedBatchNormV3 的{}长度与输入{}的通道数不一致",
                        parent, parents[0]
                    ),
                });
            }
        }
        if !(epsilon > 0.0) {
            return Err(GraphError::InvalidOperation(format!(
                "FusedBatchNormV3 的 epsilon 必须为正数，得到 {epsilon}"
            )));
        }

        // 2. 返回
        Ok(Self {
            shape: input.clone(),
            epsilon,
        })
    }
}

impl TraitNode for FusedBatchNorm {
    fn op(&self) -> &'static str {
        "FusedBatchNormV3"
    }

    fn output_shape(&self) -> &DynamicShape {
        &self.shape
    }

    fn attrs(&self) -> BTreeMap<String, AttrValue> {
        let mut attrs = BTreeMap::new();
        attrs.insert("T".to_string(), AttrValue::Type(DType::Float));
        attrs.insert("epsilon".to_string(), AttrValue::Float(self.epsilon));
        attrs.insert("data_format".to_string(), AttrValue::Str("NHWC".to_string()));
        attrs
    }
}
