/*
 * @Author       : 老董
 * @Date         : 2026-10-12
 * @Description  : 2D 卷积节点（NHWC 布局）
 *
 * 父节点：
 * - parents[0]: 输入 [batch, H, W, C_in]，batch 可为动态
 * - parents[1]: 卷积核 [kH, kW, C_in, C_out]
 */

use crate::nn::GraphError;
use crate::nn::descriptor::AttrValue;
use crate::nn::nodes::raw_node::{
    TraitNode, check_dtype, check_parents_count, check_rank, dims_agree,
};
use crate::nn::nodes::{DType, NodeHandle};
use crate::nn::shape::DynamicShape;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// 卷积的填充方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Padding {
    /// 输出空间尺寸为 ceil(H / stride)
    Same,
    /// 不填充，输出空间尺寸为 (H - kH) / stride + 1
    Valid,
}

impl Padding {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Same => "SAME",
            Self::Valid => "VALID",
        }
    }

    fn output_len(&self, input: usize, kernel: usize, stride: usize) -> Option<usize> {
        match self {
            Self::Same => Some(input.div_ceil(stride)),
            Self::Valid => input.checked_sub(kernel).map(|d| d / stride + 1),
        }
    }
}

impl fmt::Display for Padding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Conv2d {
    shape: DynamicShape,
    stride: usize,
    padding: Padding,
}

impl Conv2d {
    pub(crate) fn new(
        parents: &[&NodeHandle],
        stride: usize,
        padding: Padding,
    ) -> Result<Self, GraphError> {
        // 1. 必要的验证
        // 1.1 父节点数量、类型与阶数
        check_parents_count("Conv2D", parents, 2)?;
        check_dtype("Conv2D", parents[0], DType::Float)?;
        check_dtype("Conv2D", parents[1], DType::Float)?;
        check_rank("Conv2D", parents[0], 4)?;
        check_rank("Conv2D", parents[1], 4)?;
        if stride == 0 {
            return Err(GraphError::InvalidOperation(
                "Conv2D 的步长不能为 0".to_string(),
            ));
        }

        let input = parents[0].output_shape();
        let filter = parents[1].output_shape();

        // 1.2 卷积核必须是固定形状
        let filter_dims = filter.to_vec_fixed().ok_or_else(|| {
            GraphError::InvalidOperation(format!("Conv2D 的卷积核{}形状必须完全确定", parents[1]))
        })?;
        let (kernel_h, kernel_w, in_channels, out_channels) =
            (filter_dims[0], filter_dims[1], filter_dims[2], filter_dims[3]);

        // 1.3 输入通道数须与卷积核一致
        if !dims_agree(input.dim(3), Some(in_channels)) {
            return Err(GraphError::ShapeMismatch {
                expected: DynamicShape::new(&[None, None, None, Some(in_channels)]),
                got: input.clone(),
                message: format!(
                    "Conv2D 输入{}的通道数与卷积核{}不一致",
                    parents[0], parents[1]
                ),
            });
        }

        // 2. 推断输出形状
        let spatial = |dim: Option<usize>, kernel: usize| -> Result<Option<usize>, GraphError> {
            match dim {
                None => Ok(None),
                Some(len) => padding.output_len(len, kernel, stride).map(Some).ok_or_else(|| {
                    GraphError::InvalidOperation(format!(
                        "Conv2D 输入{}的空间尺寸 {len} 小于卷积核尺寸 {kernel}",
                        parents[0]
                    ))
                }),
            }
        };
        let out_h = spatial(input.dim(1), kernel_h)?;
        let out_w = spatial(input.dim(2), kernel_w)?;
        let shape = DynamicShape::new(&[input.dim(0), out_h, out_w, Some(out_channels)]);

        // 3. 返回
        Ok(Self {
            shape,
            stride,
            padding,
        })
    }
}

impl TraitNode for Conv2d {
    fn op(&self) -> &'static str {
        "Conv2D"
    }

    fn output_shape(&self) -> &DynamicShape {
        &self.shape
    }

    fn attrs(&self) -> BTreeMap<String, AttrValue> {
        let stride = self.stride as i64;
        let mut attrs = BTreeMap::new();
        attrs.insert("T".to_string(), AttrValue::Type(DType::Float));
        attrs.insert("strides".to_string(), AttrValue::Ints(vec![1, stride, stride, 1]));
        attrs.insert("dilations".to_string(), AttrValue::Ints(vec![1, 1, 1, 1]));
        attrs.insert(
            "padding".to_string(),
            AttrValue::Str(self.padding.as_str().to_string()),
        );
        attrs.insert("data_format".to_string(), AttrValue::Str("NHWC".to_string()));
        attrs.insert("use_cudnn_on_gpu".to_string(), AttrValue::Bool(true));
        attrs
    }
}
