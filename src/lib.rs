//! # Save Graph
//!
//! `save_graph`负责把一个训练好的网络从检查点（checkpoint）中恢复出来，
//! 再把它的计算图结构写成可读的文本图定义文件（`graph.pbtxt`），以便后续检查或部署。
//!
//! 整体流程是单次、顺序执行的：
//! 1. 解析命令行，得到参数前缀与模型配置文件路径（[`cli`]）；
//! 2. 读取并校验模型配置（[`config`]）；
//! 3. 按配置（可选地在某个命名空间下）构建计算图（[`model`]、[`nn`]）；
//! 4. 在会话（[`session`]）中恢复参数（[`checkpoint`]），并导出图结构（[`export`]）。
//!

pub mod checkpoint;
pub mod cli;
pub mod config;
pub mod errors;
pub mod export;
pub mod model;
pub mod nn;
pub mod session;
pub mod tensor;
pub(crate) mod utils;
