/*
 * @Author       : 老董
 * @Date         : 2026-01-27
 * @Description  : Graph 核心操作
 */

use super::{Graph, GraphError};
use crate::nn::nodes::{DType, NodeHandle, NodeId};
use crate::nn::shape::DynamicShape;
use std::collections::HashMap;

impl Graph {
    // ========== 创建 ==========

    pub fn new() -> Self {
        Self::with_name("default_graph")
    }

    pub fn with_name(name: &str) -> Self {
        Self {
            name: name.to_string(),
            nodes: HashMap::new(),
            forward_edges: HashMap::new(),
            backward_edges: HashMap::new(),
            next_id: 0,
        }
    }

    // ========== 基础访问器 ==========

    pub fn name(&self) -> &str {
        &self.name
    }

    /// 所有节点 ID（按创建顺序）
    pub fn nodes(&self) -> Vec<NodeId> {
        let mut ids: Vec<_> = self.nodes.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn nodes_count(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn get_node(&self, id: NodeId) -> Result<&NodeHandle, GraphError> {
        self.nodes.get(&id).ok_or(GraphError::NodeNotFound(id))
    }

    pub(crate) fn get_nodes(&self, ids: &[NodeId]) -> Result<Vec<&NodeHandle>, GraphError> {
        ids.iter().map(|&id| self.get_node(id)).collect()
    }

    pub fn get_node_parents(&self, id: NodeId) -> Result<Vec<NodeId>, GraphError> {
        // 先检查节点是否存在
        let _ = self.get_node(id)?;
        Ok(self.backward_edges.get(&id).cloned().unwrap_or_default())
    }

    pub fn get_node_children(&self, id: NodeId) -> Result<Vec<NodeId>, GraphError> {
        let _ = self.get_node(id)?;
        Ok(self.forward_edges.get(&id).cloned().unwrap_or_default())
    }

    pub fn get_node_name(&self, id: NodeId) -> Result<&str, GraphError> {
        Ok(self.get_node(id)?.name())
    }

    pub fn get_node_op(&self, id: NodeId) -> Result<&'static str, GraphError> {
        Ok(self.get_node(id)?.op())
    }

    pub fn get_node_dtype(&self, id: NodeId) -> Result<DType, GraphError> {
        Ok(self.get_node(id)?.dtype())
    }

    pub fn get_node_shape(&self, id: NodeId) -> Result<&DynamicShape, GraphError> {
        Ok(self.get_node(id)?.output_shape())
    }

    /// 按全名查找节点
    pub fn find_node_by_name(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .find(|(_, node)| node.name() == name)
            .map(|(&id, _)| id)
    }

    pub fn is_variable(&self, id: NodeId) -> Result<bool, GraphError> {
        Ok(self.get_node(id)?.is_variable())
    }

    /// 获取所有变量节点（按创建顺序）
    pub fn variable_nodes(&self) -> Vec<NodeId> {
        self.nodes()
            .into_iter()
            .filter(|id| self.nodes[id].is_variable())
            .collect()
    }

    /// 获取所有可训练的变量节点（按创建顺序）
    pub fn trainable_variable_nodes(&self) -> Vec<NodeId> {
        self.nodes()
            .into_iter()
            .filter(|id| self.nodes[id].is_trainable())
            .collect()
    }

    // ========== ID/名称生成 ==========

    pub(in crate::nn::graph) fn generate_valid_node_id(&mut self) -> NodeId {
        // 生成唯一的节点ID（先递增再返回，所以第一个节点 ID 是 1）
        self.next_id += 1;
        NodeId(self.next_id)
    }

    pub(in crate::nn::graph) fn check_duplicate_node_name(
        &self,
        name: &str,
    ) -> Result<(), GraphError> {
        if self.nodes.values().any(|node| node.name() == name) {
            return Err(GraphError::DuplicateNodeName(format!(
                "节点{}在图{}中重复",
                name,
                self.name()
            )));
        }
        Ok(())
    }

    /// 返回图中尚未使用的名字：`base`，或依次尝试`base_1`、`base_2`…
    pub fn unique_name(&self, base: &str) -> String {
        if self.check_duplicate_node_name(base).is_ok() {
            return base.to_string();
        }
        let mut counter = 1;
        loop {
            let name = format!("{base}_{counter}");
            if self.check_duplicate_node_name(&name).is_ok() {
                return name;
            }
            counter += 1;
        }
    }

    pub(in crate::nn::graph) fn generate_valid_new_node_name(
        &self,
        base_name: &str,
        node_type: &str,
    ) -> Result<String, GraphError> {
        if !base_name.is_empty() {
            self.check_duplicate_node_name(base_name)?;
            return Ok(base_name.to_string());
        }

        let mut counter = 1;
        loop {
            let name = format!("{node_type}_{counter}");
            if self.check_duplicate_node_name(&name).is_ok() {
                return Ok(name);
            }
            counter += 1;
        }
    }
}
