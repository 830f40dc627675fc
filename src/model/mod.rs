/*
 * @Author       : 老董
 * @Date         : 2026-10-14
 * @Description  : 模型构建：按配置在计算图中（可选地在某个命名空间下）搭出整个网络
 *
 * 构建只产生结构：占位输入、常量输入、变量声明与各算子节点。
 * 变量的数值之后由 Saver 从检查点按名字恢复。
 */

mod inputs;
mod layers;
mod linear;
mod resnet;

pub use inputs::{INCLUDE_HISTORY, IS_TRAINING, ModelInputs};
pub use layers::BN_EPSILON;

use crate::config::{Architecture, ModelConfig};
use crate::nn::{Graph, GraphError, NameScope, NodeId};
use layers::Layers;
use std::collections::BTreeMap;

/// 棋盘边长
pub const POS_LEN: usize = 19;

/// 构建好的模型：图中各关键节点的 ID
#[derive(Debug, Clone)]
pub struct Model {
    name_scope: NameScope,
    inputs: BTreeMap<String, NodeId>,
    placeholders: BTreeMap<String, NodeId>,
    outputs: BTreeMap<String, NodeId>,
    variables: Vec<NodeId>,
    trainable_variables: Vec<NodeId>,
}

impl Model {
    /// 在`graph`中搭建网络
    ///
    /// `name_scope`为`Some("net1")`时所有节点名都以`net1/`开头；为`None`时不加前缀。
    /// 失败时图中可能残留部分已创建的节点，调用方应丢弃该图。
    pub fn build(
        graph: &mut Graph,
        config: &ModelConfig,
        pos_len: usize,
        inputs: &ModelInputs,
        name_scope: Option<&str>,
    ) -> Result<Self, GraphError> {
        if pos_len == 0 {
            return Err(GraphError::InvalidOperation("棋盘边长不能为 0".to_string()));
        }
        let channels = config
            .channels()
            .map_err(|e| GraphError::InvalidOperation(e.to_string()))?;
        let scope = NameScope::new(name_scope);
        let mut layers = Layers::new(graph);

        // 1. 常量输入
        let mut input_ids = BTreeMap::new();
        for (name, input) in inputs.iter() {
            let id = layers.constant(&scope, name, input)?;
            input_ids.insert(name.to_string(), id);
        }

        // 2. 网络本体
        let outputs = match &config.architecture {
            Architecture::Resnet(resnet) => {
                resnet::build(&mut layers, &scope, resnet, &channels, pos_len, &input_ids)?
            }
            Architecture::Linear(linear) => linear::build(&mut layers, &scope, linear, &channels)?,
        };
        let (placeholders, variables, trainable_variables) = layers.finish();

        tracing::info!(
            architecture = config.architecture_name(),
            name_scope = %scope,
            nodes = graph.nodes_count(),
            variables = variables.len(),
            trainable_variables = trainable_variables.len(),
            "模型已构建"
        );
        Ok(Self {
            name_scope: scope,
            inputs: input_ids,
            placeholders,
            outputs,
            variables,
            trainable_variables,
        })
    }

    pub fn name_scope(&self) -> &NameScope {
        &self.name_scope
    }

    /// 常量输入节点（键为不带命名空间的输入名）
    pub fn inputs(&self) -> &BTreeMap<String, NodeId> {
        &self.inputs
    }

    /// 占位输入节点（键为不带命名空间的名字）
    pub fn placeholders(&self) -> &BTreeMap<String, NodeId> {
        &self.placeholders
    }

    pub fn outputs(&self) -> &BTreeMap<String, NodeId> {
        &self.outputs
    }

    pub fn output(&self, name: &str) -> Option<NodeId> {
        self.outputs.get(name).copied()
    }

    /// 全部变量（Saver 据此恢复），按创建顺序
    pub fn variables(&self) -> &[NodeId] {
        &self.variables
    }

    pub fn trainable_variables(&self) -> &[NodeId] {
        &self.trainable_variables
    }
}

#[cfg(test)]
mod tests;
