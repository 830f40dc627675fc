use crate::assert_err;
use crate::nn::{ConstantInput, DType, DynamicShape, Graph, GraphError, NodeId};

#[test]
fn test_graph_creation() {
    // 测试默认创建
    let graph = Graph::new();
    assert_eq!(graph.name(), "default_graph");
    assert_eq!(graph.nodes_count(), 0);

    // 测试指定名称创建
    let named_graph = Graph::with_name("custom_graph");
    assert_eq!(named_graph.name(), "custom_graph");
    assert_eq!(named_graph.nodes_count(), 0);
}

#[test]
fn test_new_node_error_handling() {
    let mut graph = Graph::new();

    // 1. 测试节点未找到错误
    let invalid_id = NodeId(999);
    assert_err!(
        graph.get_node_name(invalid_id),
        GraphError::NodeNotFound(id) if *id == invalid_id
    );

    // 2. 测试重复节点名称错误
    graph
        .new_variable_node(&[2, 2], true, Some("duplicate"))
        .unwrap();
    assert_err!(
        graph.new_variable_node(&[2, 2], true, Some("duplicate")),
        GraphError::DuplicateNodeName(_)
    );
    // 失败的构建不改变图
    assert_eq!(graph.nodes_count(), 1);
}

#[test]
fn test_node_ids_follow_creation_order() -> Result<(), GraphError> {
    let mut graph = Graph::new();
    let a = graph.new_variable_node(&[3], true, Some("a"))?;
    let b = graph.new_variable_node(&[3], true, Some("b"))?;
    let c = graph.new_add_node(a, b, Some("c"))?;

    assert_eq!(a, NodeId(1));
    assert_eq!(graph.nodes(), vec![a, b, c]);
    assert_eq!(graph.get_node_parents(c)?, vec![a, b]);
    assert_eq!(graph.get_node_children(a)?, vec![c]);
    assert_eq!(graph.find_node_by_name("c"), Some(c));
    assert_eq!(graph.find_node_by_name("missing"), None);
    Ok(())
}

#[test]
fn test_generated_node_names() -> Result<(), GraphError> {
    let mut graph = Graph::new();
    let x = graph.new_variable_node(&[2], true, None)?;
    let y = graph.new_variable_node(&[2], true, None)?;
    assert_eq!(graph.get_node_name(x)?, "variable_1");
    assert_eq!(graph.get_node_name(y)?, "variable_2");
    Ok(())
}

#[test]
fn test_unique_name() -> Result<(), GraphError> {
    let mut graph = Graph::new();
    assert_eq!(graph.unique_name("w"), "w");
    graph.new_variable_node(&[1], true, Some("w"))?;
    assert_eq!(graph.unique_name("w"), "w_1");
    graph.new_variable_node(&[1], true, Some("w_1"))?;
    assert_eq!(graph.unique_name("w"), "w_2");
    Ok(())
}

#[test]
fn test_variable_queries() -> Result<(), GraphError> {
    let mut graph = Graph::new();
    let is_training = graph.new_constant_node(&ConstantInput::bool_scalar(false), Some("t"))?;
    let beta = graph.new_variable_node(&[4], true, Some("beta"))?;
    let mean = graph.new_variable_node(&[4], false, Some("moving_mean"))?;

    assert_eq!(graph.variable_nodes(), vec![beta, mean]);
    assert_eq!(graph.trainable_variable_nodes(), vec![beta]);
    assert!(!graph.is_variable(is_training)?);
    assert_eq!(graph.get_node_dtype(is_training)?, DType::Bool);
    assert_eq!(graph.get_node_op(mean)?, "VariableV2");
    Ok(())
}

#[test]
fn test_zero_sized_variable_is_rejected() {
    let mut graph = Graph::new();
    assert_err!(
        graph.new_variable_node(&[3, 0], true, Some("w")),
        GraphError::InvalidOperation(_)
    );
    assert_eq!(graph.nodes_count(), 0);
}

#[test]
fn test_placeholder_keeps_dynamic_batch() -> Result<(), GraphError> {
    let mut graph = Graph::new();
    let x = graph.new_placeholder_node(
        DType::Float,
        DynamicShape::with_dynamic_batch(&[19, 19, 22]),
        Some("x"),
    )?;
    let shape = graph.get_node_shape(x)?;
    assert_eq!(shape.dim(0), None);
    assert_eq!(shape.to_signed_dims(), vec![-1, 19, 19, 22]);
    Ok(())
}
