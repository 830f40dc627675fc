/*
 * @Author       : 老董
 * @Date         : 2026-10-14
 * @Description  : 残差网络（主干 + 策略头 + 价值头）
 *
 * 输入：
 * - spatial_inputs [N, pos, pos, C_s]：逐点特征，其中第 9..14 通道是历史特征
 * - global_inputs  [N, C_g]：全局特征
 * 输出（均为 Identity 节点）：
 * - policy_output      [N, pos*pos + 1, 2]：各点与 pass 的策略 logits
 * - value_output       [N, 3]：胜/负/和
 * - miscvalues_output  [N, C_sv]：目差等辅助值
 * - ownership_output   [N, pos, pos, 1]：归属
 */

use super::inputs::{INCLUDE_HISTORY, IS_TRAINING};
use super::layers::Layers;
use crate::config::{BlockKind, ModelChannels, ResnetConfig};
use crate::nn::{ConstantInput, DynamicShape, GraphError, NameScope, NodeId};
use std::collections::BTreeMap;

/// 历史特征在 spatial_inputs 中的起始通道
const HISTORY_START: usize = 9;
/// 历史特征的通道数（即 include_history 的宽度）
const HISTORY_LEN: usize = 5;
/// 策略头每个位置的输出数
const POLICY_CHANNELS: usize = 2;

pub(super) fn build(
    layers: &mut Layers<'_>,
    scope: &NameScope,
    config: &ResnetConfig,
    channels: &ModelChannels,
    pos_len: usize,
    inputs: &BTreeMap<String, NodeId>,
) -> Result<BTreeMap<String, NodeId>, GraphError> {
    let is_training = required_input(inputs, IS_TRAINING)?;
    let include_history = required_input(inputs, INCLUDE_HISTORY)?;
    let trunk_channels = config.trunk_num_channels;

    // 1. 输入
    let spatial = layers.placeholder(
        scope,
        "spatial_inputs",
        DynamicShape::with_dynamic_batch(&[pos_len, pos_len, channels.spatial_inputs]),
    )?;
    let global = layers.placeholder(
        scope,
        "global_inputs",
        DynamicShape::with_dynamic_batch(&[channels.global_inputs]),
    )?;
    let history_scale = history_scale(layers, scope, include_history, channels.spatial_inputs)?;
    let spatial = layers.graph().new_multiply_node(
        spatial,
        history_scale,
        Some(&scope.name("scaled_spatial_inputs")),
    )?;

    // 2. 主干：5×5 卷积 + 全局特征投影
    let conv1 = layers.conv(scope, "conv1", spatial, 5, channels.spatial_inputs, trunk_channels)?;
    let ginput = layers.matmul(scope, "ginputw", global, channels.global_inputs, trunk_channels)?;
    let ginput = layers.to_channel_bias(&scope.sub("ginputw"), "reshape", ginput, trunk_channels)?;
    let mut trunk = layers
        .graph()
        .new_add_node(conv1, ginput, Some(&scope.name("trunk_input")))?;

    for block in &config.block_kind {
        let block_scope = scope.sub(block.name());
        trunk = match block.kind() {
            BlockKind::Regular => {
                regular_block(layers, &block_scope, config, trunk, is_training)?
            }
            BlockKind::Gpool => {
                gpool_block(layers, &block_scope, config, trunk, is_training, pos_len)?
            }
        };
    }
    let trunk = layers.batch_norm_relu(scope, "trunk", trunk, trunk_channels, is_training)?;

    // 3. 输出头
    let mut outputs = BTreeMap::new();
    let policy = policy_head(layers, scope, config, trunk, is_training, pos_len)?;
    outputs.insert("policy_output".to_string(), policy);
    outputs.extend(value_head(
        layers,
        scope,
        config,
        channels,
        trunk,
        is_training,
        pos_len,
    )?);
    Ok(outputs)
}

fn required_input(inputs: &BTreeMap<String, NodeId>, name: &str) -> Result<NodeId, GraphError> {
    inputs.get(name).copied().ok_or_else(|| {
        GraphError::InvalidOperation(format!("resnet 模型缺少输入`{name}`"))
    })
}

/// 由 include_history [1, 5] 拼出 [1, 1, 1, C_s] 的逐通道系数，历史以外的通道系数为 1
fn history_scale(
    layers: &mut Layers<'_>,
    scope: &NameScope,
    include_history: NodeId,
    spatial_channels: usize,
) -> Result<NodeId, GraphError> {
    let s = scope.sub("history");
    let after = spatial_channels
        .checked_sub(HISTORY_START + HISTORY_LEN)
        .filter(|&n| n > 0)
        .ok_or_else(|| {
            GraphError::InvalidOperation(format!(
                "spatial_inputs 只有 {spatial_channels} 个通道，放不下历史特征"
            ))
        })?;
    let ones_before = ConstantInput::float_filled(1.0, &[1, HISTORY_START]);
    let before = layers.constant(&s, "ones_before", &ones_before)?;
    let ones_after = ConstantInput::float_filled(1.0, &[1, after]);
    let after = layers.constant(&s, "ones_after", &ones_after)?;
    let scale = layers.graph().new_concat_node(
        &[before, include_history, after],
        1,
        Some(&s.name("concat")),
    )?;
    layers.graph().new_reshape_node(
        scale,
        &[1, 1, 1, spatial_channels as i64],
        Some(&s.name("scale")),
    )
}

/// BN-ReLU-conv3×3-BN-ReLU-conv3×3，再加上跳连
fn regular_block(
    layers: &mut Layers<'_>,
    scope: &NameScope,
    config: &ResnetConfig,
    x: NodeId,
    is_training: NodeId,
) -> Result<NodeId, GraphError> {
    let (trunk, mid) = (config.trunk_num_channels, config.mid_num_channels);
    let h = layers.batch_norm_relu(scope, "norm1", x, trunk, is_training)?;
    let h = layers.conv(scope, "conv1", h, 3, trunk, mid)?;
    let h = layers.batch_norm_relu(scope, "norm2", h, mid, is_training)?;
    let h = layers.conv(scope, "conv2", h, 3, mid, trunk)?;
    layers.graph().new_add_node(x, h, Some(&scope.name("add")))
}

/// 第一层卷积分成 regular 与 gpool 两支，gpool 支经全局池化后给 regular 支加逐通道偏置
fn gpool_block(
    layers: &mut Layers<'_>,
    scope: &NameScope,
    config: &ResnetConfig,
    x: NodeId,
    is_training: NodeId,
    pos_len: usize,
) -> Result<NodeId, GraphError> {
    let trunk = config.trunk_num_channels;
    let regular = config.regular_num_channels;
    let gpool = config.gpool_num_channels;

    let h = layers.batch_norm_relu(scope, "norm1", x, trunk, is_training)?;
    let a = layers.conv(scope, "conv1a", h, 3, trunk, regular)?;
    let b = layers.conv(scope, "conv1b", h, 3, trunk, gpool)?;
    let b = layers.batch_norm_relu(scope, "norm1b", b, gpool, is_training)?;
    let pooled = layers.global_pool(scope, "gpool", b, pos_len)?;
    let bias = layers.matmul(scope, "gpool_to_bias", pooled, 3 * gpool, regular)?;
    let bias = layers.to_channel_bias(&scope.sub("gpool_to_bias"), "reshape", bias, regular)?;
    let a = layers
        .graph()
        .new_add_node(a, bias, Some(&scope.name("biased")))?;

    let h = layers.batch_norm_relu(scope, "norm2", a, regular, is_training)?;
    let h = layers.conv(scope, "conv2", h, 3, regular, trunk)?;
    layers.graph().new_add_node(x, h, Some(&scope.name("add")))
}

fn policy_head(
    layers: &mut Layers<'_>,
    scope: &NameScope,
    config: &ResnetConfig,
    trunk: NodeId,
    is_training: NodeId,
    pos_len: usize,
) -> Result<NodeId, GraphError> {
    let trunk_channels = config.trunk_num_channels;
    let (p1_channels, g1_channels) = (config.p1_num_channels, config.g1_num_channels);

    let p1 = layers.conv(scope, "p1", trunk, 1, trunk_channels, p1_channels)?;
    let g1 = layers.conv(scope, "g1", trunk, 1, trunk_channels, g1_channels)?;
    let g1 = layers.batch_norm_relu(&scope.sub("g1"), "norm", g1, g1_channels, is_training)?;
    let g1_pooled = layers.global_pool(&scope.sub("g1"), "gpool", g1, pos_len)?;

    let g2 = layers.matmul(scope, "matmulg2w", g1_pooled, 3 * g1_channels, p1_channels)?;
    let g2 = layers.to_channel_bias(&scope.sub("matmulg2w"), "reshape", g2, p1_channels)?;
    let p1 = layers
        .graph()
        .new_add_node(p1, g2, Some(&scope.name("p1/biased")))?;
    let p1 = layers.batch_norm_relu(&scope.sub("p1"), "norm", p1, p1_channels, is_training)?;

    let board = (pos_len * pos_len) as i64;
    let p2 = layers.conv(scope, "p2", p1, 1, p1_channels, POLICY_CHANNELS)?;
    let p2 = layers.graph().new_reshape_node(
        p2,
        &[-1, board, POLICY_CHANNELS as i64],
        Some(&scope.name("p2/reshape")),
    )?;
    let pass = layers.matmul(scope, "matmulpass", g1_pooled, 3 * g1_channels, POLICY_CHANNELS)?;
    let pass = layers.graph().new_reshape_node(
        pass,
        &[-1, 1, POLICY_CHANNELS as i64],
        Some(&scope.name("matmulpass/reshape")),
    )?;
    let policy = layers
        .graph()
        .new_concat_node(&[p2, pass], 1, Some(&scope.name("policy")))?;
    layers
        .graph()
        .new_identity_node(policy, Some(&scope.name("policy_output")))
}

fn value_head(
    layers: &mut Layers<'_>,
    scope: &NameScope,
    config: &ResnetConfig,
    channels: &ModelChannels,
    trunk: NodeId,
    is_training: NodeId,
    pos_len: usize,
) -> Result<BTreeMap<String, NodeId>, GraphError> {
    let (v1_channels, v2_size) = (config.v1_num_channels, config.v2_size);

    let v1 = layers.conv(scope, "v1", trunk, 1, config.trunk_num_channels, v1_channels)?;
    let v1 = layers.batch_norm_relu(&scope.sub("v1"), "norm", v1, v1_channels, is_training)?;
    let v1_pooled = layers.global_pool(&scope.sub("v1"), "gpool", v1, pos_len)?;

    let v2 = layers.matmul(scope, "v2", v1_pooled, 3 * v1_channels, v2_size)?;
    let v2 = layers.bias(scope, "v2", v2, v2_size)?;
    let v2 = layers.relu(&scope.sub("v2"), "relu", v2)?;

    let mut outputs = BTreeMap::new();
    for (layer, size, output) in [
        ("v3", channels.value, "value_output"),
        ("sv3", channels.score_value, "miscvalues_output"),
    ] {
        let h = layers.matmul(scope, layer, v2, v2_size, size)?;
        let h = layers.bias(scope, layer, h, size)?;
        let id = layers
            .graph()
            .new_identity_node(h, Some(&scope.name(output)))?;
        outputs.insert(output.to_string(), id);
    }

    let ownership = layers.conv(scope, "vownership", v1, 1, v1_channels, channels.ownership)?;
    let id = layers
        .graph()
        .new_identity_node(ownership, Some(&scope.name("ownership_output")))?;
    outputs.insert("ownership_output".to_string(), id);
    Ok(outputs)
}
