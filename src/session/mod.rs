/*
 * @Author       : 老董
 * @Date         : 2026-10-15
 * @Description  : 会话：计算图在运行期的执行上下文
 *
 * 会话在创建时接管计算图，并持有全部变量的数值缓冲；
 * 离开作用域（正常结束或经`?`提前返回）时由 Drop 统一释放。
 * 会话是显式构造的普通值，不存在任何全局默认会话。
 */

use crate::nn::{DynamicShape, Graph, GraphError, NodeId};
use crate::tensor::Tensor;
use std::collections::HashMap;

/// 变量初始化方式
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Init {
    /// 常数初始化
    Constant(f32),
    /// 全零
    Zeros,
    /// 正态分布
    Normal { mean: f32, std: f32 },
}

impl Init {
    /// 生成初始化后的 Tensor（固定种子，保证可重复）
    pub fn generate(&self, shape: &[usize], seed: u64) -> Tensor {
        match self {
            Self::Constant(v) => Tensor::filled(*v, shape),
            Self::Zeros => Tensor::zeros(shape),
            Self::Normal { mean, std } => Tensor::normal_seeded(*mean, *std, shape, seed),
        }
    }
}

#[derive(Debug)]
pub struct Session {
    graph: Graph,
    variables: HashMap<NodeId, Tensor>,
}

impl Session {
    pub fn new(graph: Graph) -> Self {
        tracing::info!(
            graph = graph.name(),
            nodes = graph.nodes_count(),
            variables = graph.variable_nodes().len(),
            "会话已创建"
        );
        Self {
            graph,
            variables: HashMap::new(),
        }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn variable_value(&self, id: NodeId) -> Option<&Tensor> {
        self.variables.get(&id)
    }

    pub fn variable_value_by_name(&self, name: &str) -> Option<&Tensor> {
        self.graph
            .find_node_by_name(name)
            .and_then(|id| self.variable_value(id))
    }

    /// 已赋值的变量个数
    pub fn initialized_count(&self) -> usize {
        self.variables.len()
    }

    /// 尚未赋值的变量（按创建顺序）
    pub fn uninitialized_variables(&self) -> Vec<NodeId> {
        self.graph
            .variable_nodes()
            .into_iter()
            .filter(|id| !self.variables.contains_key(id))
            .collect()
    }

    /// 给变量赋值，数值的形状必须与变量声明的形状完全一致
    pub fn bind_variable(&mut self, id: NodeId, value: Tensor) -> Result<(), GraphError> {
        if !self.graph.is_variable(id)? {
            return Err(GraphError::InvalidOperation(format!(
                "节点{}不是变量，不能赋值",
                self.graph.get_node_name(id)?
            )));
        }
        let expected = self.graph.get_node_shape(id)?;
        if expected != &DynamicShape::fixed(value.shape()) {
            return Err(GraphError::ShapeMismatch {
                expected: expected.clone(),
                got: DynamicShape::fixed(value.shape()),
                message: format!("变量{}的数值形状不符", self.graph.get_node_name(id)?),
            });
        }
        self.variables.insert(id, value);
        Ok(())
    }

    /// 按`init`给所有变量赋值；每个变量的种子由`seed`与节点 ID 派生
    pub fn initialize_variables(&mut self, init: Init, seed: u64) -> Result<(), GraphError> {
        for id in self.graph.variable_nodes() {
            let shape = self
                .graph
                .get_node_shape(id)?
                .to_vec_fixed()
                .ok_or_else(|| {
                    GraphError::InvalidOperation(format!("变量{id:?}的形状不完整"))
                })?;
            let value = init.generate(&shape, seed.wrapping_add(id.0));
            self.bind_variable(id, value)?;
        }
        tracing::debug!(count = self.variables.len(), ?init, "变量已初始化");
        Ok(())
    }

    /// 显式结束会话，释放变量缓冲并交还计算图
    pub fn close(mut self) -> Graph {
        std::mem::take(&mut self.graph)
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        let released = self.variables.len();
        self.variables.clear();
        tracing::debug!(released, "会话已释放");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_err;
    use crate::nn::{ConstantInput, DType};
    use approx::assert_abs_diff_eq;

    fn graph_with_two_variables() -> Graph {
        let mut graph = Graph::with_name("g");
        graph.new_variable_node(&[2, 3], true, Some("w")).unwrap();
        graph.new_variable_node(&[3], false, Some("moving_mean")).unwrap();
        graph
            .new_constant_node(&ConstantInput::bool_scalar(false), Some("is_training"))
            .unwrap();
        graph
    }

    #[test]
    fn test_bind_variable_checks_shape_and_kind() {
        let graph = graph_with_two_variables();
        let w = graph.find_node_by_name("w").unwrap();
        let flag = graph.find_node_by_name("is_training").unwrap();
        let mut session = Session::new(graph);

        assert_err!(
            session.bind_variable(w, Tensor::zeros(&[3, 2])),
            GraphError::ShapeMismatch { .. }
        );
        assert_err!(
            session.bind_variable(flag, Tensor::zeros(&[])),
            GraphError::InvalidOperation(_)
        );
        assert_eq!(session.initialized_count(), 0);

        session
            .bind_variable(w, Tensor::filled(0.5, &[2, 3]))
            .unwrap();
        assert_eq!(session.variable_value(w), Some(&Tensor::filled(0.5, &[2, 3])));
        assert_eq!(session.uninitialized_variables().len(), 1);
    }

    #[test]
    fn test_initialize_variables_is_reproducible() {
        let mut first = Session::new(graph_with_two_variables());
        first
            .initialize_variables(Init::Normal { mean: 0.0, std: 1.0 }, 7)
            .unwrap();
        let mut second = Session::new(graph_with_two_variables());
        second
            .initialize_variables(Init::Normal { mean: 0.0, std: 1.0 }, 7)
            .unwrap();

        assert_eq!(first.initialized_count(), 2);
        assert!(first.uninitialized_variables().is_empty());
        let a = first.variable_value_by_name("w").unwrap();
        let b = second.variable_value_by_name("w").unwrap();
        assert_abs_diff_eq!(a, b);
        assert_eq!(a.shape(), &[2, 3]);
    }

    #[test]
    fn test_constant_init() {
        let mut session = Session::new(graph_with_two_variables());
        session
            .initialize_variables(Init::Constant(2.0), 0)
            .unwrap();
        let mean = session.variable_value_by_name("moving_mean").unwrap();
        assert!(mean.iter().all(|v| v == 2.0));
    }

    #[test]
    fn test_close_returns_graph() {
        let mut session = Session::new(graph_with_two_variables());
        session.initialize_variables(Init::Zeros, 0).unwrap();
        let graph = session.close();
        assert_eq!(graph.name(), "g");
        assert_eq!(graph.nodes_count(), 3);
        assert_eq!(
            graph.get_node_dtype(graph.find_node_by_name("is_training").unwrap()).unwrap(),
            DType::Bool
        );
    }
}
