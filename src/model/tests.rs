use super::*;
use crate::assert_err;
use crate::config::ModelConfig;
use crate::nn::{ConstantInput, DType, DynamicShape};
use serde_json::json;

fn resnet_config(version: u32) -> ModelConfig {
    let value = json!({
        "version": version,
        "trunk_num_channels": 8,
        "mid_num_channels": 6,
        "regular_num_channels": 4,
        "gpool_num_channels": 2,
        "block_kind": [["rconv1", "regular"], ["rconv2", "gpool"], ["rconv3", "regular"]],
        "p1_num_channels": 4,
        "g1_num_channels": 3,
        "v1_num_channels": 3,
        "v2_size": 5
    });
    ModelConfig::from_json(&value.to_string()).unwrap()
}

fn linear_config(use_bias: bool) -> ModelConfig {
    let value = json!({"version": 8, "architecture": "linear", "use_bias": use_bias});
    ModelConfig::from_json(&value.to_string()).unwrap()
}

#[test]
fn test_resnet_outputs_and_shapes() -> Result<(), GraphError> {
    let mut graph = Graph::new();
    let model = Model::build(
        &mut graph,
        &resnet_config(8),
        POS_LEN,
        &ModelInputs::export_defaults(),
        None,
    )?;

    let shape = |name: &str| {
        graph
            .get_node_shape(model.output(name).unwrap())
            .unwrap()
            .clone()
    };
    assert_eq!(shape("policy_output"), DynamicShape::new(&[None, Some(362), Some(2)]));
    assert_eq!(shape("value_output"), DynamicShape::new(&[None, Some(3)]));
    assert_eq!(shape("miscvalues_output"), DynamicShape::new(&[None, Some(4)]));
    assert_eq!(
        shape("ownership_output"),
        DynamicShape::new(&[None, Some(19), Some(19), Some(1)])
    );

    let spatial = model.placeholders()["spatial_inputs"];
    assert_eq!(
        graph.get_node_shape(spatial)?,
        &DynamicShape::new(&[None, Some(19), Some(19), Some(22)])
    );
    let global = model.placeholders()["global_inputs"];
    assert_eq!(graph.get_node_shape(global)?.last_dim(), Some(19));
    Ok(())
}

#[test]
fn test_resnet_variables() -> Result<(), GraphError> {
    let mut graph = Graph::new();
    let model = Model::build(
        &mut graph,
        &resnet_config(9),
        POS_LEN,
        &ModelInputs::export_defaults(),
        None,
    )?;

    assert_eq!(model.variables(), graph.variable_nodes().as_slice());
    assert_eq!(model.trainable_variables(), graph.trainable_variable_nodes().as_slice());
    assert!(model.trainable_variables().len() < model.variables().len());

    let w = graph.find_node_by_name("conv1/w").unwrap();
    assert_eq!(graph.get_node_shape(w)?, &DynamicShape::fixed(&[5, 5, 22, 8]));
    let w1 = graph.find_node_by_name("rconv1/conv1/w").unwrap();
    assert_eq!(graph.get_node_shape(w1)?, &DynamicShape::fixed(&[3, 3, 8, 6]));
    let g2b = graph.find_node_by_name("rconv2/gpool_to_bias/w").unwrap();
    assert_eq!(graph.get_node_shape(g2b)?, &DynamicShape::fixed(&[6, 4]));
    let sv3 = graph.find_node_by_name("sv3/b").unwrap();
    assert_eq!(graph.get_node_shape(sv3)?, &DynamicShape::fixed(&[6]));

    let mean = graph.find_node_by_name("trunk/moving_mean").unwrap();
    assert!(graph.is_variable(mean)?);
    assert!(!model.trainable_variables().contains(&mean));
    Ok(())
}

#[test]
fn test_inputs_become_constants() -> Result<(), GraphError> {
    let mut graph = Graph::new();
    let inputs = ModelInputs::export_defaults()
        .with("symmetries", ConstantInput::bool_scalar(false));
    let model = Model::build(&mut graph, &resnet_config(8), POS_LEN, &inputs, Some("net1"))?;

    assert_eq!(model.inputs().len(), 3);
    let is_training = model.inputs()[IS_TRAINING];
    assert_eq!(graph.get_node_name(is_training)?, "net1/is_training");
    assert_eq!(graph.get_node_op(is_training)?, "Const");
    assert_eq!(graph.get_node_dtype(is_training)?, DType::Bool);
    assert!(graph.find_node_by_name("net1/symmetries").is_some());
    Ok(())
}

#[test]
fn test_name_scope_prefixes_every_node() -> Result<(), GraphError> {
    let mut graph = Graph::new();
    Model::build(
        &mut graph,
        &resnet_config(8),
        POS_LEN,
        &ModelInputs::export_defaults(),
        Some("net1"),
    )?;
    let desc = graph.describe();
    assert!(desc.nodes.iter().all(|n| n.name.starts_with("net1/")));

    let mut plain = Graph::new();
    Model::build(
        &mut plain,
        &resnet_config(8),
        POS_LEN,
        &ModelInputs::export_defaults(),
        None,
    )?;
    let plain_desc = plain.describe();
    assert!(plain_desc.nodes.iter().all(|n| !n.name.starts_with("net1/")));
    assert_eq!(desc.nodes.len(), plain_desc.nodes.len());
    Ok(())
}

#[test]
fn test_resnet_requires_its_inputs() {
    let mut graph = Graph::new();
    let inputs = ModelInputs::new().with(IS_TRAINING, ConstantInput::bool_scalar(false));
    assert_err!(
        Model::build(&mut graph, &resnet_config(8), POS_LEN, &inputs, None),
        GraphError::InvalidOperation(msg) if msg.contains(INCLUDE_HISTORY)
    );

    // include_history 宽度不对时形状校验失败
    let mut graph = Graph::new();
    let inputs = ModelInputs::export_defaults()
        .with(INCLUDE_HISTORY, ConstantInput::float_filled(1.0, &[1, 4]));
    assert_err!(Model::build(&mut graph, &resnet_config(8), POS_LEN, &inputs, None));
}

#[test]
fn test_linear_model() -> Result<(), GraphError> {
    let mut graph = Graph::new();
    let model = Model::build(
        &mut graph,
        &linear_config(false),
        POS_LEN,
        &ModelInputs::new(),
        None,
    )?;

    assert_eq!(model.variables().len(), 1);
    let w = model.variables()[0];
    assert_eq!(graph.get_node_name(w)?, "w");
    assert_eq!(graph.get_node_shape(w)?, &DynamicShape::fixed(&[19, 1]));
    let output = model.output("output").unwrap();
    assert_eq!(graph.get_node_shape(output)?, &DynamicShape::new(&[None, Some(1)]));

    let mut graph = Graph::new();
    let model = Model::build(&mut graph, &linear_config(true), POS_LEN, &ModelInputs::new(), None)?;
    assert_eq!(model.variables().len(), 2);
    assert!(graph.find_node_by_name("b").is_some());
    Ok(())
}

#[test]
fn test_build_is_deterministic() -> Result<(), GraphError> {
    let build = || -> Result<String, GraphError> {
        let mut graph = Graph::new();
        Model::build(
            &mut graph,
            &resnet_config(8),
            POS_LEN,
            &ModelInputs::export_defaults(),
            Some("swa_model"),
        )?;
        Ok(graph.describe().to_pbtxt())
    };
    assert_eq!(build()?, build()?);
    Ok(())
}
