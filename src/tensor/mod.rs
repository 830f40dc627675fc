/*
 * @Author       : 老董
 * @Date         : 2026-10-12
 * @Description  : 张量：会话中变量缓冲的载体，也是检查点读写的基本单位
 */

use approx::AbsDiffEq;
use ndarray::{Array, IxDyn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::errors::TensorError;

#[cfg(test)]
mod tests;

/// 定义张量的结构体。其可以是标量、向量、矩阵或更高维度的数组。
/// 注：只要通Tensor初始化的都是张量（即使标量也是张量）。
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    data: Array<f32, IxDyn>,
}

impl Tensor {
    /// 创建一个张量。`data`的长度必须和`shape`中所有元素的乘积相等，否则panic；
    /// 数据来自外部（如文件）时请用[`Tensor::from_vec`]。
    pub fn new(data: &[f32], shape: &[usize]) -> Self {
        match Self::from_vec(data.to_vec(), shape) {
            Ok(tensor) => tensor,
            Err(e) => panic!("{e}"),
        }
    }

    /// 由数据和形状创建张量，二者不匹配时返回错误
    pub fn from_vec(data: Vec<f32>, shape: &[usize]) -> Result<Self, TensorError> {
        let expected: usize = shape.iter().product();
        if data.len() != expected {
            return Err(TensorError::DataShapeMismatch {
                data_len: data.len(),
                shape: shape.to_vec(),
                expected,
            });
        }
        let data = Array::from_shape_vec(IxDyn(shape), data).map_err(|_| {
            TensorError::DataShapeMismatch {
                data_len: expected,
                shape: shape.to_vec(),
                expected,
            }
        })?;
        Ok(Self { data })
    }

    pub fn zeros(shape: &[usize]) -> Self {
        Self {
            data: Array::zeros(IxDyn(shape)),
        }
    }

    /// 所有元素都等于`value`的张量
    pub fn filled(value: f32, shape: &[usize]) -> Self {
        Self {
            data: Array::from_elem(IxDyn(shape), value),
        }
    }

    /// 创建一个服从正态分布的随机张量（固定种子，保证可重复）
    pub fn normal_seeded(mean: f32, std_dev: f32, shape: &[usize], seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let data_len = shape.iter().product::<usize>();
        let mut data = Vec::with_capacity(data_len);

        // Box-Muller
        while data.len() < data_len {
            let u1: f32 = rng.r#gen();
            let u2: f32 = rng.r#gen();
            let r = (-2.0 * u1.ln()).sqrt();
            let theta = 2.0 * std::f32::consts::PI * u2;
            let z0 = mean + std_dev * r * theta.cos();
            let z1 = mean + std_dev * r * theta.sin();

            if z0.is_finite() {
                data.push(z0);
            }
            if data.len() < data_len && z1.is_finite() {
                data.push(z1);
            }
        }

        Self::new(&data, shape)
    }

    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    /// 张量中所有元素的数量
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// 按行优先（C 顺序）遍历所有元素
    pub fn iter(&self) -> impl Iterator<Item = f32> + '_ {
        self.data.iter().copied()
    }

    pub fn to_vec(&self) -> Vec<f32> {
        self.iter().collect()
    }
}

impl AbsDiffEq for Tensor {
    type Epsilon = f32;

    fn default_epsilon() -> f32 {
        f32::EPSILON
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.shape() == other.shape()
            && self
                .iter()
                .zip(other.iter())
                .all(|(a, b)| a.abs_diff_eq(&b, epsilon))
    }
}
