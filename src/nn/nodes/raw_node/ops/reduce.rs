use crate::nn::GraphError;
use crate::nn::descriptor::AttrValue;
use crate::nn::nodes::raw_node::{TraitNode, check_dtype, check_parents_count};
use crate::nn::nodes::{DType, NodeHandle};
use crate::nn::shape::DynamicShape;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 归约方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReduceKind {
    Mean,
    Max,
}

/// 沿指定轴归约（不保留被归约的维度）
#[derive(Clone, Debug)]
pub(crate) struct Reduce {
    kind: ReduceKind,
    axes: Vec<usize>,
    shape: DynamicShape,
}

impl Reduce {
    pub(crate) fn new(
        parents: &[&NodeHandle],
        kind: ReduceKind,
        axes: &[usize],
    ) -> Result<Self, GraphError> {
        check_parents_count("Reduce", parents, 1)?;
        check_dtype("Reduce", parents[0], DType::Float)?;

        let input = parents[0].output_shape();
        let mut axes = axes.to_vec();
        axes.sort_unstable();
        axes.dedup();
        if axes.is_empty() {
            return Err(GraphError::InvalidOperation(
                "Reduce 至少需要一个归约轴".to_string(),
            ));
        }
        if let Some(&axis) = axes.iter().find(|&&axis| axis >= input.ndim()) {
            return Err(GraphError::InvalidOperation(format!(
                "Reduce 的归约轴 {axis} 超出了输入{}的维数 {}",
                parents[0],
                input.ndim()
            )));
        }

        let kept: Vec<_> = input
            .dims()
            .iter()
            .enumerate()
            .filter(|(i, _)| !axes.contains(i))
            .map(|(_, &d)| d)
            .collect();

        Ok(Self {
            kind,
            axes,
            shape: DynamicShape::new(&kept),
        })
    }
}

impl TraitNode for Reduce {
    fn op(&self) -> &'static str {
        match self.kind {
            ReduceKind::Mean => "Mean",
            ReduceKind::Max => "Max",
        }
    }

    fn output_shape(&self) -> &DynamicShape {
        &self.shape
    }

    fn attrs(&self) -> BTreeMap<String, AttrValue> {
        let mut attrs = BTreeMap::new();
        attrs.insert("T".to_string(), AttrValue::Type(DType::Float));
        attrs.insert(
            "reduction_indices".to_string(),
            AttrValue::Ints(self.axes.iter().map(|&a| a as i64).collect()),
        );
        attrs.insert("keep_dims".to_string(), AttrValue::Bool(false));
        attrs
    }
}
