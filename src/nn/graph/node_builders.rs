/*
 * @Author       : 老董
 * @Date         : 2026-01-27
 * @Description  : Graph 节点构建方法（new_*_node）
 *
 * 每个方法先由父节点推断并校验输出形状，校验通过后才把节点加入图中；
 * 失败时图保持不变。
 */

use super::{Graph, GraphError};
use crate::nn::nodes::{ConstantInput, DType, NodeHandle, NodeId, Padding, ReduceKind};
use crate::nn::shape::DynamicShape;

impl Graph {
    /// 添加节点到列表
    pub(in crate::nn::graph) fn add_node_to_list(
        &mut self,
        mut node_handle: NodeHandle,
        name: Option<&str>,
        node_type: &str,
        parents: &[NodeId],
    ) -> Result<NodeId, GraphError> {
        let node_name = self.generate_valid_new_node_name(name.unwrap_or(""), node_type)?;
        let node_id = self.generate_valid_node_id();

        for &parent_id in parents {
            self.forward_edges
                .entry(parent_id)
                .or_default()
                .push(node_id);
        }
        self.backward_edges
            .entry(node_id)
            .or_default()
            .extend(parents);

        node_handle.bind_name(&node_name);
        self.nodes.insert(node_id, node_handle);
        Ok(node_id)
    }

    /// 创建占位输入节点（推理时喂入数据）
    pub fn new_placeholder_node(
        &mut self,
        dtype: DType,
        shape: DynamicShape,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let node = NodeHandle::new_placeholder(dtype, shape)?;
        self.add_node_to_list(node, name, "placeholder", &[])
    }

    /// 创建常量节点
    pub fn new_constant_node(
        &mut self,
        input: &ConstantInput,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let node = NodeHandle::new_constant(input)?;
        self.add_node_to_list(node, name, "const", &[])
    }

    /// 创建变量（参数）节点
    pub fn new_variable_node(
        &mut self,
        shape: &[usize],
        trainable: bool,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let node = NodeHandle::new_variable(shape, trainable)?;
        self.add_node_to_list(node, name, "variable", &[])
    }

    /// 创建 2D 卷积节点（NHWC）
    pub fn new_conv2d_node(
        &mut self,
        input: NodeId,
        filter: NodeId,
        stride: usize,
        padding: Padding,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let parents = [input, filter];
        let node = NodeHandle::new_conv2d(&self.get_nodes(&parents)?, stride, padding)?;
        self.add_node_to_list(node, name, "conv2d", &parents)
    }

    pub fn new_mat_mul_node(
        &mut self,
        a: NodeId,
        b: NodeId,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let parents = [a, b];
        let node = NodeHandle::new_mat_mul(&self.get_nodes(&parents)?)?;
        self.add_node_to_list(node, name, "mat_mul", &parents)
    }

    pub fn new_add_node(
        &mut self,
        a: NodeId,
        b: NodeId,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let parents = [a, b];
        let node = NodeHandle::new_add(&self.get_nodes(&parents)?)?;
        self.add_node_to_list(node, name, "add", &parents)
    }

    pub fn new_bias_add_node(
        &mut self,
        x: NodeId,
        bias: NodeId,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let parents = [x, bias];
        let node = NodeHandle::new_bias_add(&self.get_nodes(&parents)?)?;
        self.add_node_to_list(node, name, "bias_add", &parents)
    }

    pub fn new_multiply_node(
        &mut self,
        a: NodeId,
        b: NodeId,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let parents = [a, b];
        let node = NodeHandle::new_multiply(&self.get_nodes(&parents)?)?;
        self.add_node_to_list(node, name, "multiply", &parents)
    }

    pub fn new_relu_node(&mut self, x: NodeId, name: Option<&str>) -> Result<NodeId, GraphError> {
        let node = NodeHandle::new_relu(&self.get_nodes(&[x])?)?;
        self.add_node_to_list(node, name, "relu", &[x])
    }

    /// 创建批归一化节点
    ///
    /// `is_training`须是布尔标量节点
    #[allow(clippy::too_many_arguments)]
    pub fn new_fused_batch_norm_node(
        &mut self,
        x: NodeId,
        beta: NodeId,
        moving_mean: NodeId,
        moving_variance: NodeId,
        is_training: NodeId,
        epsilon: f32,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let parents = [x, beta, moving_mean, moving_variance, is_training];
        let node = NodeHandle::new_fused_batch_norm(&self.get_nodes(&parents)?, epsilon)?;
        self.add_node_to_list(node, name, "fused_batch_norm", &parents)
    }

    pub fn new_reduce_node(
        &mut self,
        x: NodeId,
        kind: ReduceKind,
        axes: &[usize],
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let node = NodeHandle::new_reduce(&self.get_nodes(&[x])?, kind, axes)?;
        self.add_node_to_list(node, name, "reduce", &[x])
    }

    pub fn new_concat_node(
        &mut self,
        inputs: &[NodeId],
        axis: usize,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let node = NodeHandle::new_concat(&self.get_nodes(inputs)?, axis)?;
        self.add_node_to_list(node, name, "concat", inputs)
    }

    pub fn new_reshape_node(
        &mut self,
        x: NodeId,
        target_shape: &[i64],
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let node = NodeHandle::new_reshape(&self.get_nodes(&[x])?, target_shape)?;
        self.add_node_to_list(node, name, "reshape", &[x])
    }

    pub fn new_identity_node(
        &mut self,
        x: NodeId,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let node = NodeHandle::new_identity(&self.get_nodes(&[x])?)?;
        self.add_node_to_list(node, name, "identity", &[x])
    }
}
