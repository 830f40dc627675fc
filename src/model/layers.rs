/*
 * @Author       : 老董
 * @Date         : 2026-10-14
 * @Description  : 建图用的层级辅助：卷积、批归一化、全局池化、全连接等
 *
 * 每个辅助函数在`scope/name`下创建自己的变量与算子节点，并记录创建的变量，
 * 以便模型构建完后交给 Saver 恢复。
 */

use crate::nn::{
    ConstantInput, DType, DynamicShape, Graph, GraphError, NameScope, NodeId, Padding, ReduceKind,
};
use std::collections::BTreeMap;

/// 批归一化的 epsilon
pub const BN_EPSILON: f32 = 0.001;

pub(super) struct Layers<'g> {
    graph: &'g mut Graph,
    placeholders: BTreeMap<String, NodeId>,
    variables: Vec<NodeId>,
    trainable_variables: Vec<NodeId>,
}

impl<'g> Layers<'g> {
    pub(super) fn new(graph: &'g mut Graph) -> Self {
        Self {
            graph,
            placeholders: BTreeMap::new(),
            variables: Vec::new(),
            trainable_variables: Vec::new(),
        }
    }

    pub(super) fn graph(&mut self) -> &mut Graph {
        self.graph
    }

    /// 拆出记录的占位输入、全部变量和可训练变量
    pub(super) fn finish(self) -> (BTreeMap<String, NodeId>, Vec<NodeId>, Vec<NodeId>) {
        (self.placeholders, self.variables, self.trainable_variables)
    }

    pub(super) fn placeholder(
        &mut self,
        scope: &NameScope,
        name: &str,
        shape: DynamicShape,
    ) -> Result<NodeId, GraphError> {
        let id = self
            .graph
            .new_placeholder_node(DType::Float, shape, Some(&scope.name(name)))?;
        self.placeholders.insert(name.to_string(), id);
        Ok(id)
    }

    pub(super) fn constant(
        &mut self,
        scope: &NameScope,
        name: &str,
        input: &ConstantInput,
    ) -> Result<NodeId, GraphError> {
        self.graph.new_constant_node(input, Some(&scope.name(name)))
    }

    pub(super) fn variable(
        &mut self,
        scope: &NameScope,
        name: &str,
        shape: &[usize],
        trainable: bool,
    ) -> Result<NodeId, GraphError> {
        let id = self
            .graph
            .new_variable_node(shape, trainable, Some(&scope.name(name)))?;
        self.variables.push(id);
        if trainable {
            self.trainable_variables.push(id);
        }
        Ok(id)
    }

    /// k×k 卷积（步长 1，SAME 填充），变量为`{name}/w`
    pub(super) fn conv(
        &mut self,
        scope: &NameScope,
        name: &str,
        x: NodeId,
        kernel: usize,
        in_channels: usize,
        out_channels: usize,
    ) -> Result<NodeId, GraphError> {
        let s = scope.sub(name);
        let w = self.variable(&s, "w", &[kernel, kernel, in_channels, out_channels], true)?;
        self.graph
            .new_conv2d_node(x, w, 1, Padding::Same, Some(&s.name("conv2d")))
    }

    /// 批归一化：beta 可训练，滑动均值与方差不可训练（但同样存于检查点）
    pub(super) fn batch_norm(
        &mut self,
        scope: &NameScope,
        name: &str,
        x: NodeId,
        channels: usize,
        is_training: NodeId,
    ) -> Result<NodeId, GraphError> {
        let s = scope.sub(name);
        let beta = self.variable(&s, "beta", &[channels], true)?;
        let moving_mean = self.variable(&s, "moving_mean", &[channels], false)?;
        let moving_variance = self.variable(&s, "moving_variance", &[channels], false)?;
        self.graph.new_fused_batch_norm_node(
            x,
            beta,
            moving_mean,
            moving_variance,
            is_training,
            BN_EPSILON,
            Some(&s.name("bn")),
        )
    }

    pub(super) fn relu(
        &mut self,
        scope: &NameScope,
        name: &str,
        x: NodeId,
    ) -> Result<NodeId, GraphError> {
        self.graph.new_relu_node(x, Some(&scope.name(name)))
    }

    /// 批归一化后接 ReLU
    pub(super) fn batch_norm_relu(
        &mut self,
        scope: &NameScope,
        name: &str,
        x: NodeId,
        channels: usize,
        is_training: NodeId,
    ) -> Result<NodeId, GraphError> {
        let normed = self.batch_norm(scope, name, x, channels, is_training)?;
        self.relu(&scope.sub(name), "relu", normed)
    }

    /// 全连接：[N, in] × w[in, out]，变量为`{name}/w`
    pub(super) fn matmul(
        &mut self,
        scope: &NameScope,
        name: &str,
        x: NodeId,
        in_size: usize,
        out_size: usize,
    ) -> Result<NodeId, GraphError> {
        let s = scope.sub(name);
        let w = self.variable(&s, "w", &[in_size, out_size], true)?;
        self.graph.new_mat_mul_node(x, w, Some(&s.name("matmul")))
    }

    /// 加偏置，变量为`{name}/b`
    pub(super) fn bias(
        &mut self,
        scope: &NameScope,
        name: &str,
        x: NodeId,
        size: usize,
    ) -> Result<NodeId, GraphError> {
        let s = scope.sub(name);
        let b = self.variable(&s, "b", &[size], true)?;
        self.graph.new_bias_add_node(x, b, Some(&s.name("bias_add")))
    }

    /// 全局池化：[N, H, W, C] -> [N, 3C]
    ///
    /// 三组特征依次为：均值、按棋盘边长缩放的均值、最大值。
    /// 缩放系数为 (pos_len - 14) / 10。
    pub(super) fn global_pool(
        &mut self,
        scope: &NameScope,
        name: &str,
        x: NodeId,
        pos_len: usize,
    ) -> Result<NodeId, GraphError> {
        let s = scope.sub(name);
        let mean = self
            .graph
            .new_reduce_node(x, ReduceKind::Mean, &[1, 2], Some(&s.name("mean")))?;
        let scale = self.constant(
            &s,
            "board_scale",
            &ConstantInput::float_filled((pos_len as f32 - 14.0) / 10.0, &[]),
        )?;
        let scaled_mean = self
            .graph
            .new_multiply_node(mean, scale, Some(&s.name("scaled_mean")))?;
        let max = self
            .graph
            .new_reduce_node(x, ReduceKind::Max, &[1, 2], Some(&s.name("max")))?;
        self.graph
            .new_concat_node(&[mean, scaled_mean, max], 1, Some(&s.name("concat")))
    }

    /// 把 [N, C] 变成 [N, 1, 1, C]，以便按通道加到特征图上
    pub(super) fn to_channel_bias(
        &mut self,
        scope: &NameScope,
        name: &str,
        x: NodeId,
        channels: usize,
    ) -> Result<NodeId, GraphError> {
        self.graph
            .new_reshape_node(x, &[-1, 1, 1, channels as i64], Some(&scope.name(name)))
    }
}
