/*
 * @Author       : 老董
 * @Date         : 2024-01-31 20:23:53
 * @LastEditors  : 老董
 * @LastEditTime : 2026-10-13 19:37:27
 * @Description  : 负责计算图（computation graph）的构建与描述
 */

mod descriptor;
mod graph;
mod nodes;
mod pbtxt;
mod scope;
mod shape;

pub use descriptor::{AttrValue, GRAPH_DEF_PRODUCER, GraphDescriptor, NodeDescriptor};
pub use graph::{Graph, GraphError, write_graph};
pub use nodes::{ConstantInput, DType, NodeId, Padding, ReduceKind, ScalarValue};
pub use scope::NameScope;
pub use shape::{Dim, DynamicShape};

#[cfg(test)]
mod tests;
