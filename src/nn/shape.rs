/*
 * DynamicShape: 支持动态维度的形状系统
 *
 * 类似 TensorFlow 的 (None, 19, 19, 22) 设计，允许某些维度在建图时未知。
 * 导出的图定义中，未知维度写作 -1。
 *
 * # 示例
 * ```
 * use save_graph::nn::DynamicShape;
 *
 * let fixed = DynamicShape::fixed(&[5, 5, 22, 96]);
 * assert_eq!(fixed.to_string(), "[5, 5, 22, 96]");
 *
 * let batch = DynamicShape::with_dynamic_batch(&[19, 19, 22]);
 * assert_eq!(batch.to_string(), "[?, 19, 19, 22]");
 * assert_eq!(batch.to_signed_dims(), vec![-1, 19, 19, 22]);
 * ```
 */

use serde::{Deserialize, Serialize};
use std::fmt;

/// 维度值：Some(n) 表示固定值 n，None 表示动态（任意值）
pub type Dim = Option<usize>;

/// 动态形状：支持动态维度的形状表示
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct DynamicShape {
    dims: Vec<Dim>,
}

impl DynamicShape {
    pub fn new(dims: &[Dim]) -> Self {
        Self {
            dims: dims.to_vec(),
        }
    }

    /// 从固定形状创建（所有维度都是确定的）
    pub fn fixed(dims: &[usize]) -> Self {
        Self {
            dims: dims.iter().map(|&d| Some(d)).collect(),
        }
    }

    /// 标量形状`[]`
    pub fn scalar() -> Self {
        Self { dims: Vec::new() }
    }

    /// 第一维是 None（动态 batch），其余维度固定
    pub fn with_dynamic_batch(feature_dims: &[usize]) -> Self {
        let mut dims = vec![None];
        dims.extend(feature_dims.iter().map(|&d| Some(d)));
        Self { dims }
    }

    /// 由带符号维度创建，负数（-1）表示动态维度
    pub fn from_signed_dims(dims: &[i64]) -> Self {
        Self {
            dims: dims
                .iter()
                .map(|&d| usize::try_from(d).ok())
                .collect(),
        }
    }

    /// 获取维度数量
    pub fn ndim(&self) -> usize {
        self.dims.len()
    }

    /// 获取指定维度的值
    ///
    /// 返回 Some(n) 如果维度固定，None 如果维度动态或越界
    pub fn dim(&self, index: usize) -> Dim {
        self.dims.get(index).copied().flatten()
    }

    /// 最后一维（通道维，NHWC）
    pub fn last_dim(&self) -> Dim {
        self.dims.last().copied().flatten()
    }

    /// 检查是否有任何动态维度
    pub fn has_dynamic_dims(&self) -> bool {
        self.dims.iter().any(|d| d.is_none())
    }

    /// 元素总数；含动态维度时为 None
    pub fn num_elements(&self) -> Option<usize> {
        self.dims.iter().try_fold(1usize, |acc, d| d.map(|n| acc * n))
    }

    /// 检查此形状是否与另一个形状兼容
    ///
    /// 兼容规则：维度数量相同，且每个维度要么至少一方是 None，要么值相等
    pub fn is_compatible(&self, other: &DynamicShape) -> bool {
        if self.dims.len() != other.dims.len() {
            return false;
        }
        self.dims
            .iter()
            .zip(other.dims.iter())
            .all(|(a, b)| match (a, b) {
                (None, _) | (_, None) => true,
                (Some(x), Some(y)) => x == y,
            })
    }

    /// 检查此形状是否与实际张量形状兼容
    pub fn is_compatible_with_tensor(&self, tensor_shape: &[usize]) -> bool {
        self.is_compatible(&DynamicShape::fixed(tensor_shape))
    }

    /// 计算两个形状按 numpy 规则广播后的形状
    ///
    /// 右对齐，缺失的维度按 1 处理；固定维度不相等且都不为 1 时不可广播，返回 None。
    pub fn broadcast_with(&self, other: &DynamicShape) -> Option<DynamicShape> {
        let max_ndim = self.dims.len().max(other.dims.len());
        let pad = |s: &DynamicShape| -> Vec<Dim> {
            std::iter::repeat(Some(1))
                .take(max_ndim - s.dims.len())
                .chain(s.dims.iter().copied())
                .collect()
        };

        let dims = pad(self)
            .into_iter()
            .zip(pad(other))
            .map(|(a, b)| match (a, b) {
                (Some(x), Some(y)) if x == y => Some(Some(x)),
                (Some(1), other) | (other, Some(1)) => Some(other),
                (None, Some(n)) | (Some(n), None) => Some(Some(n)),
                (None, None) => Some(None),
                (Some(_), Some(_)) => None,
            })
            .collect::<Option<Vec<Dim>>>()?;

        Some(DynamicShape { dims })
    }

    /// 转换为固定形状向量（如果所有维度都是固定的）
    pub fn to_vec_fixed(&self) -> Option<Vec<usize>> {
        self.dims.iter().copied().collect()
    }

    /// 转换为带符号维度，动态维度写作 -1
    pub fn to_signed_dims(&self) -> Vec<i64> {
        self.dims
            .iter()
            .map(|d| d.map_or(-1, |n| n as i64))
            .collect()
    }

    /// 获取内部维度数组的引用
    pub fn dims(&self) -> &[Dim] {
        &self.dims
    }

    /// 转换为用于显示的字符串（动态维度显示为 ?）
    pub fn to_display_string(&self) -> String {
        let parts: Vec<String> = self
            .dims
            .iter()
            .map(|d| match d {
                Some(n) => n.to_string(),
                None => "?".to_string(),
            })
            .collect();
        format!("[{}]", parts.join(", "))
    }
}

impl fmt::Display for DynamicShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_display_string())
    }
}

impl From<&[usize]> for DynamicShape {
    fn from(shape: &[usize]) -> Self {
        DynamicShape::fixed(shape)
    }
}

impl From<Vec<usize>> for DynamicShape {
    fn from(shape: Vec<usize>) -> Self {
        DynamicShape::fixed(&shape)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dynamic_shape_creation() {
        let fixed = DynamicShape::fixed(&[32, 128]);
        assert_eq!(fixed.ndim(), 2);
        assert!(!fixed.has_dynamic_dims());
        assert_eq!(fixed.dim(0), Some(32));
        assert_eq!(fixed.num_elements(), Some(32 * 128));

        let dynamic_batch = DynamicShape::with_dynamic_batch(&[128]);
        assert!(dynamic_batch.has_dynamic_dims());
        assert_eq!(dynamic_batch.dim(0), None);
        assert_eq!(dynamic_batch.dim(1), Some(128));
        assert_eq!(dynamic_batch.last_dim(), Some(128));
        assert_eq!(dynamic_batch.num_elements(), None);

        assert_eq!(DynamicShape::scalar().ndim(), 0);
        assert_eq!(DynamicShape::scalar().num_elements(), Some(1));
    }

    #[test]
    fn test_dynamic_shape_display() {
        assert_eq!(DynamicShape::fixed(&[32, 128]).to_string(), "[32, 128]");
        assert_eq!(
            DynamicShape::new(&[None, Some(10), None]).to_string(),
            "[?, 10, ?]"
        );
        assert_eq!(DynamicShape::scalar().to_string(), "[]");
    }

    #[test]
    fn test_signed_dims() {
        let shape = DynamicShape::from_signed_dims(&[-1, 1, 1, 64]);
        assert_eq!(shape, DynamicShape::new(&[None, Some(1), Some(1), Some(64)]));
        assert_eq!(shape.to_signed_dims(), vec![-1, 1, 1, 64]);
    }

    #[test]
    fn test_dynamic_shape_compatibility() {
        let dynamic = DynamicShape::new(&[None, Some(128)]);
        assert!(dynamic.is_compatible(&DynamicShape::fixed(&[32, 128])));
        assert!(!dynamic.is_compatible(&DynamicShape::fixed(&[32, 64])));
        assert!(!dynamic.is_compatible(&DynamicShape::fixed(&[32, 128, 10])));
        assert!(dynamic.is_compatible_with_tensor(&[1, 128]));
    }

    #[test]
    fn test_broadcast_with() {
        // 残差相加：[?, 19, 19, 96] + [?, 1, 1, 96]
        let a = DynamicShape::new(&[None, Some(19), Some(19), Some(96)]);
        let b = DynamicShape::new(&[None, Some(1), Some(1), Some(96)]);
        assert_eq!(a.broadcast_with(&b).unwrap().to_string(), "[?, 19, 19, 96]");

        // 维度数不同时右对齐
        let c = DynamicShape::fixed(&[22]);
        let d = DynamicShape::new(&[None, Some(19), Some(19), Some(22)]);
        assert_eq!(c.broadcast_with(&d).unwrap(), d);

        // 动态维度与固定维度
        let e = DynamicShape::new(&[None, Some(5)]);
        let f = DynamicShape::fixed(&[3, 5]);
        assert_eq!(e.broadcast_with(&f).unwrap().to_string(), "[3, 5]");

        // 不可广播
        let g = DynamicShape::fixed(&[2, 3]);
        let h = DynamicShape::fixed(&[4, 3]);
        assert!(g.broadcast_with(&h).is_none());
    }

    #[test]
    fn test_to_vec_fixed() {
        assert_eq!(DynamicShape::fixed(&[32, 128]).to_vec_fixed(), Some(vec![32, 128]));
        assert_eq!(DynamicShape::with_dynamic_batch(&[128]).to_vec_fixed(), None);
    }
}
