use super::super::TraitNode;
use crate::nn::GraphError;
use crate::nn::descriptor::AttrValue;
use crate::nn::nodes::DType;
use crate::nn::shape::DynamicShape;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// 常量的填充值：整个常量张量的所有元素都等于它
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ScalarValue {
    Float(f32),
    Bool(bool),
}

impl ScalarValue {
    pub const fn dtype(&self) -> DType {
        match self {
            Self::Float(_) => DType::Float,
            Self::Bool(_) => DType::Bool,
        }
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Float(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
        }
    }
}

/// 建图时即可确定的输入：固定形状 + 填充值
///
/// 对应`tf.constant(1.0, shape=[1, 5], dtype=tf.float32)`这类写法。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstantInput {
    pub shape: Vec<usize>,
    pub value: ScalarValue,
}

impl ConstantInput {
    pub fn new(value: ScalarValue, shape: &[usize]) -> Self {
        Self {
            shape: shape.to_vec(),
            value,
        }
    }

    /// 布尔标量
    pub fn bool_scalar(value: bool) -> Self {
        Self::new(ScalarValue::Bool(value), &[])
    }

    /// 填充为`value`的浮点张量
    pub fn float_filled(value: f32, shape: &[usize]) -> Self {
        Self::new(ScalarValue::Float(value), shape)
    }

    pub const fn dtype(&self) -> DType {
        self.value.dtype()
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Constant {
    input: ConstantInput,
    shape: DynamicShape,
}

impl Constant {
    pub(crate) fn new(input: &ConstantInput) -> Result<Self, GraphError> {
        if input.shape.iter().any(|&d| d == 0) {
            return Err(GraphError::InvalidOperation(format!(
                "常量的形状{:?}中不能有为 0 的维度",
                input.shape
            )));
        }
        Ok(Self {
            input: input.clone(),
            shape: DynamicShape::fixed(&input.shape),
        })
    }
}

impl TraitNode for Constant {
    fn op(&self) -> &'static str {
        "Const"
    }

    fn dtype(&self) -> DType {
        self.input.dtype()
    }

    fn output_shape(&self) -> &DynamicShape {
        &self.shape
    }

    fn attrs(&self) -> BTreeMap<String, AttrValue> {
        let mut attrs = BTreeMap::new();
        attrs.insert("dtype".to_string(), AttrValue::Type(self.dtype()));
        attrs.insert(
            "value".to_string(),
            AttrValue::Fill {
                dtype: self.dtype(),
                shape: self.shape.clone(),
                value: self.input.value,
            },
        );
        attrs
    }
}
