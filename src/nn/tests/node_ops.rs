/*
 * @Author       : 老董
 * @Date         : 2026-10-13
 * @Description  : 其余算子节点的形状推断与校验
 */

use crate::assert_err;
use crate::nn::{
    AttrValue, ConstantInput, DType, DynamicShape, Graph, GraphError, NodeId, ReduceKind,
};

fn batch_input(graph: &mut Graph, dims: &[usize], name: &str) -> Result<NodeId, GraphError> {
    graph.new_placeholder_node(DType::Float, DynamicShape::with_dynamic_batch(dims), Some(name))
}

#[test]
fn test_mat_mul_shape() -> Result<(), GraphError> {
    let mut graph = Graph::new();
    let x = batch_input(&mut graph, &[19], "x")?;
    let w = graph.new_variable_node(&[19, 32], true, Some("w"))?;
    let y = graph.new_mat_mul_node(x, w, Some("y"))?;
    assert_eq!(graph.get_node_shape(y)?, &DynamicShape::new(&[None, Some(32)]));

    let bad = graph.new_variable_node(&[18, 32], true, Some("bad"))?;
    assert_err!(
        graph.new_mat_mul_node(x, bad, None),
        GraphError::ShapeMismatch { .. }
    );
    Ok(())
}

#[test]
fn test_add_broadcasts() -> Result<(), GraphError> {
    let mut graph = Graph::new();
    let x = batch_input(&mut graph, &[19, 19, 8], "x")?;
    let g = batch_input(&mut graph, &[8], "g")?;
    let g4 = graph.new_reshape_node(g, &[-1, 1, 1, 8], Some("g4"))?;
    let sum = graph.new_add_node(x, g4, Some("sum"))?;
    assert_eq!(
        graph.get_node_shape(sum)?,
        &DynamicShape::new(&[None, Some(19), Some(19), Some(8)])
    );

    let wrong = graph.new_variable_node(&[7], true, Some("wrong"))?;
    assert_err!(graph.new_add_node(x, wrong, None), GraphError::ShapeMismatch { .. });
    Ok(())
}

#[test]
fn test_bias_add_checks_channels() -> Result<(), GraphError> {
    let mut graph = Graph::new();
    let x = batch_input(&mut graph, &[3], "x")?;
    let b = graph.new_variable_node(&[3], true, Some("b"))?;
    let y = graph.new_bias_add_node(x, b, Some("y"))?;
    assert_eq!(graph.get_node_shape(y)?.last_dim(), Some(3));

    let b2 = graph.new_variable_node(&[4], true, Some("b2"))?;
    assert_err!(graph.new_bias_add_node(x, b2, None), GraphError::ShapeMismatch { .. });
    Ok(())
}

#[test]
fn test_fused_batch_norm() -> Result<(), GraphError> {
    let mut graph = Graph::new();
    let x = batch_input(&mut graph, &[19, 19, 16], "x")?;
    let beta = graph.new_variable_node(&[16], true, Some("beta"))?;
    let mean = graph.new_variable_node(&[16], false, Some("moving_mean"))?;
    let var = graph.new_variable_node(&[16], false, Some("moving_variance"))?;
    let is_training = graph.new_constant_node(&ConstantInput::bool_scalar(false), Some("t"))?;

    let bn = graph.new_fused_batch_norm_node(x, beta, mean, var, is_training, 0.001, Some("bn"))?;
    assert_eq!(graph.get_node_shape(bn)?, graph.get_node_shape(x)?);
    assert_eq!(
        graph.describe().node("bn").unwrap().attrs["epsilon"],
        AttrValue::Float(0.001)
    );

    // is_training 必须是布尔
    let not_bool = graph.new_constant_node(&ConstantInput::float_filled(0.0, &[]), Some("f"))?;
    assert_err!(
        graph.new_fused_batch_norm_node(x, beta, mean, var, not_bool, 0.001, None),
        GraphError::DTypeMismatch { expected: DType::Bool, .. }
    );

    // 统计量长度须等于通道数
    let short = graph.new_variable_node(&[15], false, Some("short"))?;
    assert_err!(
        graph.new_fused_batch_norm_node(x, beta, short, var, is_training, 0.001, None),
        GraphError::ShapeMismatch { .. }
    );
    Ok(())
}

#[test]
fn test_reduce_drops_axes() -> Result<(), GraphError> {
    let mut graph = Graph::new();
    let x = batch_input(&mut graph, &[19, 19, 32], "x")?;
    let mean = graph.new_reduce_node(x, ReduceKind::Mean, &[1, 2], Some("mean"))?;
    let max = graph.new_reduce_node(x, ReduceKind::Max, &[2, 1], Some("max"))?;

    assert_eq!(graph.get_node_shape(mean)?, &DynamicShape::new(&[None, Some(32)]));
    assert_eq!(graph.get_node_op(mean)?, "Mean");
    assert_eq!(graph.get_node_op(max)?, "Max");
    assert_err!(
        graph.new_reduce_node(x, ReduceKind::Mean, &[4], None),
        GraphError::InvalidOperation(_)
    );
    Ok(())
}

#[test]
fn test_concat_sums_axis() -> Result<(), GraphError> {
    let mut graph = Graph::new();
    let a = batch_input(&mut graph, &[32], "a")?;
    let b = batch_input(&mut graph, &[32], "b")?;
    let c = batch_input(&mut graph, &[1], "c")?;
    let cat = graph.new_concat_node(&[a, b, c], 1, Some("cat"))?;
    assert_eq!(graph.get_node_shape(cat)?, &DynamicShape::new(&[None, Some(65)]));
    assert_eq!(graph.describe().node("cat").unwrap().attrs["N"], AttrValue::Int(3));

    let flag = graph.new_constant_node(&ConstantInput::bool_scalar(true), Some("flag"))?;
    assert_err!(graph.new_concat_node(&[a], 1, None), GraphError::InvalidOperation(_));
    assert_err!(graph.new_concat_node(&[a, flag], 0, None));
    Ok(())
}

#[test]
fn test_reshape() -> Result<(), GraphError> {
    let mut graph = Graph::new();
    let ones = graph.new_constant_node(&ConstantInput::float_filled(1.0, &[1, 22]), Some("ones"))?;
    let r = graph.new_reshape_node(ones, &[-1, 1, 1, 22], Some("r"))?;
    assert_eq!(graph.get_node_shape(r)?, &DynamicShape::fixed(&[1, 1, 1, 22]));

    assert_err!(
        graph.new_reshape_node(ones, &[1, 21], None),
        GraphError::ShapeMismatch { .. }
    );
    assert_err!(
        graph.new_reshape_node(ones, &[-1, -1], None),
        GraphError::InvalidOperation(_)
    );

    // 动态 batch 的输入保持 -1 为未知
    let x = batch_input(&mut graph, &[8], "x")?;
    let x4 = graph.new_reshape_node(x, &[-1, 1, 1, 8], Some("x4"))?;
    assert_eq!(graph.get_node_shape(x4)?.dim(0), None);

    // 动态 batch 的输入：已知维度同样须与目标相容
    assert_err!(
        graph.new_reshape_node(x, &[-1, 1, 1, 7], None),
        GraphError::ShapeMismatch { .. }
    );
    assert_err!(
        graph.new_reshape_node(x, &[3, 5], None),
        GraphError::ShapeMismatch { .. }
    );
    let flat = graph.new_reshape_node(x, &[-1, 2, 2], Some("flat"))?;
    assert_eq!(graph.get_node_shape(flat)?.dim(2), Some(2));
    Ok(())
}

#[test]
fn test_identity_and_relu_keep_shape() -> Result<(), GraphError> {
    let mut graph = Graph::new();
    let x = batch_input(&mut graph, &[5], "x")?;
    let r = graph.new_relu_node(x, Some("r"))?;
    let out = graph.new_identity_node(r, Some("out"))?;
    assert_eq!(graph.get_node_shape(out)?, graph.get_node_shape(x)?);
    assert_eq!(graph.get_node_op(out)?, "Identity");
    Ok(())
}
