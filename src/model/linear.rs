use super::layers::Layers;
use crate::config::{LinearConfig, ModelChannels};
use crate::nn::{DynamicShape, GraphError, NameScope, NodeId};
use std::collections::BTreeMap;

/// global_inputs [N, C_g] × w [C_g, num_outputs] (+ b) -> output
pub(super) fn build(
    layers: &mut Layers<'_>,
    scope: &NameScope,
    config: &LinearConfig,
    channels: &ModelChannels,
) -> Result<BTreeMap<String, NodeId>, GraphError> {
    let global = layers.placeholder(
        scope,
        "global_inputs",
        DynamicShape::with_dynamic_batch(&[channels.global_inputs]),
    )?;
    let w = layers.variable(
        scope,
        &config.weight_name,
        &[channels.global_inputs, config.num_outputs],
        true,
    )?;
    let mut y = layers
        .graph()
        .new_mat_mul_node(global, w, Some(&scope.name("matmul")))?;
    if config.use_bias {
        let b = layers.variable(scope, &config.bias_name, &[config.num_outputs], true)?;
        y = layers
            .graph()
            .new_bias_add_node(y, b, Some(&scope.name("bias_add")))?;
    }
    let output = layers
        .graph()
        .new_identity_node(y, Some(&scope.name("output")))?;

    Ok(BTreeMap::from([("output".to_string(), output)]))
}
