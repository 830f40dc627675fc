/*
 * @Author       : 老董
 * @Date         : 2026-10-12
 * @Description  : 各算子节点。每个节点只在构造时推断输出形状、校验输入，
 *                 不做任何数值计算
 */

mod add;
mod bias_add;
mod concat;
mod conv2d;
mod fused_batch_norm;
mod identity;
mod mat_mul;
mod multiply;
mod reduce;
mod relu;
mod reshape;

pub(crate) use add::Add;
pub(crate) use bias_add::BiasAdd;
pub(crate) use concat::Concat;
pub use conv2d::Padding;
pub(crate) use conv2d::Conv2d;
pub(crate) use fused_batch_norm::FusedBatchNorm;
pub(crate) use identity::Identity;
pub(crate) use mat_mul::MatMul;
pub(crate) use multiply::Multiply;
pub use reduce::ReduceKind;
pub(crate) use reduce::Reduce;
pub(crate) use relu::Relu;
pub(crate) use reshape::Reshape;
