/*
 * Input 模块：接收外部数据的节点
 *
 * - Placeholder: 推理时由调用方喂入的特征（形状可含动态 batch）
 * - Constant: 建图时就确定的输入（如 is_training、include_history），
 *             只记录填充值，不是可训练参数
 */

mod constant;
mod placeholder;

pub use constant::{ConstantInput, ScalarValue};
pub(crate) use constant::Constant;
pub(crate) use placeholder::Placeholder;
