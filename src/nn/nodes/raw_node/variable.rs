use super::TraitNode;
use crate::nn::GraphError;
use crate::nn::descriptor::AttrValue;
use crate::nn::nodes::DType;
use crate::nn::shape::DynamicShape;
use std::collections::BTreeMap;

/// 模型参数节点
///
/// 图中只记录参数的名字、形状与是否可训练，数值在 Session 里，
/// 由检查点恢复或按初始化方式填充。
#[derive(Clone, Debug)]
pub(crate) struct Variable {
    shape: DynamicShape,
    trainable: bool,
}

impl Variable {
    pub(crate) fn new(shape: &[usize], trainable: bool) -> Result<Self, GraphError> {
        // 参数的形状必须完全确定
        if shape.iter().any(|&d| d == 0) {
            return Err(GraphError::InvalidOperation(format!(
                "变量的形状{shape:?}中不能有为 0 的维度"
            )));
        }
        Ok(Self {
            shape: DynamicShape::fixed(shape),
            trainable,
        })
    }

    pub(crate) const fn trainable(&self) -> bool {
        self.trainable
    }
}

impl TraitNode for Variable {
    fn op(&self) -> &'static str {
        "VariableV2"
    }

    fn output_shape(&self) -> &DynamicShape {
        &self.shape
    }

    fn attrs(&self) -> BTreeMap<String, AttrValue> {
        let mut attrs = BTreeMap::new();
        attrs.insert("dtype".to_string(), AttrValue::Type(DType::Float));
        attrs.insert("shape".to_string(), AttrValue::Shape(self.shape.clone()));
        attrs.insert("trainable".to_string(), AttrValue::Bool(self.trainable));
        attrs
    }
}
