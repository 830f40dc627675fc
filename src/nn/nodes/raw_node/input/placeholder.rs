use super::super::TraitNode;
use crate::nn::descriptor::AttrValue;
use crate::nn::nodes::DType;
use crate::nn::shape::DynamicShape;
use std::collections::BTreeMap;

#[derive(Clone, Debug)]
pub(crate) struct Placeholder {
    dtype: DType,
    shape: DynamicShape,
}

impl Placeholder {
    pub(crate) fn new(dtype: DType, shape: DynamicShape) -> Self {
        Self { dtype, shape }
    }
}

impl TraitNode for Placeholder {
    fn op(&self) -> &'static str {
        "Placeholder"
    }

    fn dtype(&self) -> DType {
        self.dtype
    }

    fn output_shape(&self) -> &DynamicShape {
        &self.shape
    }

    fn attrs(&self) -> BTreeMap<String, AttrValue> {
        let mut attrs = BTreeMap::new();
        attrs.insert("dtype".to_string(), AttrValue::Type(self.dtype));
        attrs.insert("shape".to_string(), AttrValue::Shape(self.shape.clone()));
        attrs
    }
}
