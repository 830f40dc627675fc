/*
 * @Author       : 老董
 * @Date         : 2026-01-27
 * @Description  : Graph 模块：计算图的核心实现
 *
 * 各 impl 块分散在子模块中：
 * - core.rs: 基础访问 + ID/名称生成
 * - node_builders.rs: new_*_node
 * - describe.rs: describe/summary
 * - model_io.rs: write_graph 图定义文件输出
 */

mod core;
mod describe;
mod error;
mod model_io;
mod node_builders;

pub use error::GraphError;
pub use model_io::write_graph;

use crate::nn::nodes::{NodeHandle, NodeId};
use std::collections::HashMap;

/// 计算图（只有结构，不含参数数值）
///
/// 节点一旦加入便不可修改或删除；参数的数值由 [`crate::session::Session`] 持有。
#[derive(Debug, Default)]
pub struct Graph {
    name: String,
    nodes: HashMap<NodeId, NodeHandle>,
    /// 正向边：parent_id -> child_ids（父节点指向子节点）
    forward_edges: HashMap<NodeId, Vec<NodeId>>,
    /// 反向边：child_id -> parent_ids（子节点指向父节点，顺序即输入顺序）
    backward_edges: HashMap<NodeId, Vec<NodeId>>,
    next_id: u64,
}
