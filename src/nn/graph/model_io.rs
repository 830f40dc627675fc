/*
 * @Author       : 老董
 * @Date         : 2026-01-27
 * @Description  : 图定义文件输出（write_graph）
 *
 * 只输出结构（节点、连接、属性），不输出任何参数数值。
 * - 文本模式：protobuf 文本格式的图定义（如 graph.pbtxt）
 * - 二进制模式：图描述符的 bincode 编码
 */

use super::Graph;
use crate::errors::ExportError;
use crate::nn::descriptor::GraphDescriptor;
use std::fs;
use std::path::{Path, PathBuf};

/// 把图定义写入`{logdir}/{name}`，返回写入的文件路径
///
/// `logdir`不存在时会被创建；同名文件会被覆盖。
pub fn write_graph<P: AsRef<Path>>(
    descriptor: &GraphDescriptor,
    logdir: P,
    name: &str,
    as_text: bool,
) -> Result<PathBuf, ExportError> {
    let logdir = logdir.as_ref();
    fs::create_dir_all(logdir).map_err(|source| ExportError::Io {
        path: logdir.to_path_buf(),
        source,
    })?;

    let path = logdir.join(name);
    let bytes = if as_text {
        descriptor.to_pbtxt().into_bytes()
    } else {
        descriptor.to_bytes().map_err(ExportError::Encode)?
    };
    fs::write(&path, bytes).map_err(|source| ExportError::Io {
        path: path.clone(),
        source,
    })?;

    tracing::info!(
        path = %path.display(),
        nodes = descriptor.nodes.len(),
        as_text,
        "图定义已写入"
    );
    Ok(path)
}

impl Graph {
    /// 生成描述符并写出图定义，见 [`write_graph`]
    ///
    /// # 示例
    /// ```ignore
    /// let path = graph.write_graph("./tmp", "graph.pbtxt", true)?;
    /// ```
    pub fn write_graph<P: AsRef<Path>>(
        &self,
        logdir: P,
        name: &str,
        as_text: bool,
    ) -> Result<PathBuf, ExportError> {
        write_graph(&self.describe(), logdir, name, as_text)
    }
}
