/*
 * @Author       : 老董
 * @Date         : 2025-12-27
 * @Description  : 图描述符（Graph Descriptor）
 *                 统一的中间表示（IR），用于序列化、文本图定义导出和调试输出。
 *                 描述符只有结构，不含任何参数数值
 */

use super::nodes::{DType, ScalarValue};
use super::shape::DynamicShape;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 文本图定义中`versions { producer }`的取值
pub const GRAPH_DEF_PRODUCER: u32 = 1;

/// 图的可序列化描述
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphDescriptor {
    /// 格式版本（用于向后兼容）
    pub version: String,
    /// 图名称
    pub name: String,
    pub producer: u32,
    /// 所有节点描述，按节点 ID 升序（即创建顺序）
    pub nodes: Vec<NodeDescriptor>,
}

/// 节点描述
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDescriptor {
    pub id: u64,
    /// 节点全名（含命名空间前缀）
    pub name: String,
    /// 算子名，如`Conv2D`
    pub op: String,
    /// 输入节点的全名（定义拓扑，顺序即输入顺序）
    pub inputs: Vec<String>,
    pub dtype: DType,
    pub output_shape: DynamicShape,
    /// 静态属性，按键名排序
    pub attrs: BTreeMap<String, AttrValue>,
    /// 参数数量（仅变量节点有意义）
    pub param_count: Option<usize>,
}

/// 节点属性值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttrValue {
    Type(DType),
    Shape(DynamicShape),
    Int(i64),
    Ints(Vec<i64>),
    Float(f32),
    Bool(bool),
    Str(String),
    /// 常量张量：所有元素都等于`value`
    Fill {
        dtype: DType,
        shape: DynamicShape,
        value: ScalarValue,
    },
}

impl GraphDescriptor {
    /// 创建新的图描述符
    pub fn new(name: &str) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            name: name.to_string(),
            producer: GRAPH_DEF_PRODUCER,
            nodes: Vec::new(),
        }
    }

    /// 添加节点描述
    pub fn add_node(&mut self, node: NodeDescriptor) {
        self.nodes.push(node);
    }

    /// 获取总参数量
    pub fn total_params(&self) -> usize {
        self.nodes.iter().filter_map(|n| n.param_count).sum()
    }

    /// 按全名查找节点
    pub fn node(&self, name: &str) -> Option<&NodeDescriptor> {
        self.nodes.iter().find(|n| n.name == name)
    }

    /// 所有变量节点（按创建顺序）
    pub fn variable_nodes(&self) -> impl Iterator<Item = &NodeDescriptor> {
        self.nodes.iter().filter(|n| n.param_count.is_some())
    }

    /// 转换为 JSON 字符串
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// 从 JSON 字符串解析
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// 二进制编码（用于非文本格式的图定义输出）
    pub fn to_bytes(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, bincode::Error> {
        bincode::deserialize(bytes)
    }
}

impl NodeDescriptor {
    /// 创建新的节点描述
    pub fn new(
        id: u64,
        name: &str,
        op: &str,
        inputs: Vec<String>,
        dtype: DType,
        output_shape: DynamicShape,
        attrs: BTreeMap<String, AttrValue>,
    ) -> Self {
        let param_count = if op == "VariableV2" {
            output_shape.num_elements()
        } else {
            None
        };

        Self {
            id,
            name: name.to_string(),
            op: op.to_string(),
            inputs,
            dtype,
            output_shape,
            attrs,
            param_count,
        }
    }
}
