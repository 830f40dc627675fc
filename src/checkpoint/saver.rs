/*
 * @Author       : 老董
 * @Date         : 2026-10-16
 * @Description  : Saver：按变量名保存/恢复会话中的变量数值
 */

use super::format::{read_data, write_data};
use super::{CheckpointError, CheckpointIndex, CheckpointPrefix, CheckpointState, IndexEntry};
use crate::nn::{Graph, GraphError, NodeId};
use crate::session::Session;
use crate::tensor::Tensor;
use std::collections::HashMap;

/// Saver 的构建器
#[derive(Debug, Clone)]
pub struct SaverBuilder {
    max_to_keep: usize,
    save_relative_paths: bool,
}

impl Default for SaverBuilder {
    fn default() -> Self {
        Self {
            max_to_keep: 5,
            save_relative_paths: false,
        }
    }
}

impl SaverBuilder {
    /// 最多保留的检查点个数，0 表示全部保留
    pub fn max_to_keep(mut self, n: usize) -> Self {
        self.max_to_keep = n;
        self
    }

    /// 状态文件中是否记录相对路径（便于整体搬迁模型目录）
    pub fn save_relative_paths(mut self, relative: bool) -> Self {
        self.save_relative_paths = relative;
        self
    }

    /// 以`graph`中的全部变量（可训练与否）作为变量列表
    pub fn build(self, graph: &Graph) -> Result<Saver, CheckpointError> {
        let var_names = graph
            .variable_nodes()
            .into_iter()
            .map(|id| graph.get_node_name(id).map(str::to_string))
            .collect::<Result<Vec<_>, _>>()?;
        if var_names.is_empty() {
            return Err(CheckpointError::NoVariables);
        }
        Ok(Saver {
            var_names,
            max_to_keep: self.max_to_keep,
            save_relative_paths: self.save_relative_paths,
            last_checkpoints: Vec::new(),
        })
    }
}

#[derive(Debug)]
pub struct Saver {
    var_names: Vec<String>,
    max_to_keep: usize,
    save_relative_paths: bool,
    last_checkpoints: Vec<CheckpointPrefix>,
}

impl Saver {
    pub fn builder() -> SaverBuilder {
        SaverBuilder::default()
    }

    pub fn var_names(&self) -> &[String] {
        &self.var_names
    }

    pub const fn max_to_keep(&self) -> usize {
        self.max_to_keep
    }

    /// 本 Saver 保存过且仍保留着的检查点（旧的在前）
    pub fn last_checkpoints(&self) -> &[CheckpointPrefix] {
        &self.last_checkpoints
    }

    /// 保存会话中全部变量；给定`global_step`时前缀加上`-<step>`后缀
    pub fn save(
        &mut self,
        session: &Session,
        prefix: &CheckpointPrefix,
        global_step: Option<u64>,
    ) -> Result<CheckpointPrefix, CheckpointError> {
        let prefix = match global_step {
            Some(step) => prefix.with_global_step(step),
            None => prefix.clone(),
        };
        let dir = prefix.dir().to_path_buf();
        std::fs::create_dir_all(&dir).map_err(|e| CheckpointError::io(&dir, e))?;

        let mut values: Vec<(&str, &Tensor)> = Vec::with_capacity(self.var_names.len());
        let mut entries = Vec::with_capacity(self.var_names.len());
        for name in &self.var_names {
            let id = lookup(session, name)?;
            let value = session
                .variable_value(id)
                .ok_or_else(|| CheckpointError::Uninitialized(name.clone()))?;
            entries.push(IndexEntry {
                name: name.clone(),
                dtype: session.graph().get_node_dtype(id)?,
                shape: value.shape().to_vec(),
            });
            values.push((name.as_str(), value));
        }

        write_data(&prefix.data_path(), &values)?;
        CheckpointIndex::new(entries).write(&prefix.index_path())?;

        self.last_checkpoints.retain(|p| p != &prefix);
        self.last_checkpoints.push(prefix.clone());
        if self.max_to_keep > 0 {
            while self.last_checkpoints.len() > self.max_to_keep {
                let stale = self.last_checkpoints.remove(0);
                delete_checkpoint_files(&stale)?;
            }
        }

        let state = CheckpointState {
            model_checkpoint_path: self.recorded_path(&prefix),
            all_model_checkpoint_paths: self
                .last_checkpoints
                .iter()
                .map(|p| self.recorded_path(p))
                .collect(),
        };
        state.write(&dir)?;

        tracing::info!(prefix = %prefix, variables = self.var_names.len(), "检查点已保存");
        Ok(prefix)
    }

    /// 从`prefix`恢复全部变量；任何一个变量缺失、类型或形状不符都会整体失败
    pub fn restore(
        &self,
        session: &mut Session,
        prefix: &CheckpointPrefix,
    ) -> Result<(), CheckpointError> {
        tracing::info!(prefix = %prefix, "开始恢复检查点");
        for path in [prefix.index_path(), prefix.data_path()] {
            if !path.is_file() {
                return Err(CheckpointError::NotFound { path });
            }
        }

        let index_path = prefix.index_path();
        let index = CheckpointIndex::read(&index_path)?;

        // 先对照索引检查，数据文件还没读就能发现缺失、类型与形状问题
        let mut targets = Vec::with_capacity(self.var_names.len());
        for name in &self.var_names {
            let id = lookup(session, name)?;
            let entry = index
                .entry(name)
                .ok_or_else(|| CheckpointError::MissingVariable(name.clone()))?;
            let expected_dtype = session.graph().get_node_dtype(id)?;
            if entry.dtype != expected_dtype {
                return Err(CheckpointError::DTypeMismatch {
                    name: name.clone(),
                    expected: expected_dtype,
                    got: entry.dtype,
                });
            }
            let expected = session
                .graph()
                .get_node_shape(id)?
                .to_vec_fixed()
                .ok_or_else(|| GraphError::InvalidOperation(format!("变量{name}的形状不完整")))?;
            if entry.shape != expected {
                return Err(CheckpointError::ShapeMismatch {
                    name: name.clone(),
                    expected,
                    got: entry.shape.clone(),
                });
            }
            targets.push((id, name));
        }

        let data_path = prefix.data_path();
        let data = read_data(&data_path)?;
        if data.len() != index.entries.len() {
            return Err(CheckpointError::corrupted(
                &data_path,
                format!(
                    "数据文件有{}个条目，索引有{}个",
                    data.len(),
                    index.entries.len()
                ),
            ));
        }
        let mut by_name: HashMap<String, Tensor> = HashMap::with_capacity(data.len());
        for ((name, tensor), entry) in data.into_iter().zip(&index.entries) {
            if name != entry.name || tensor.shape() != entry.shape.as_slice() {
                return Err(CheckpointError::corrupted(
                    &data_path,
                    format!("条目{name}与索引不一致"),
                ));
            }
            by_name.insert(name, tensor);
        }

        for (id, name) in targets {
            let tensor = by_name.remove(name.as_str()).ok_or_else(|| {
                CheckpointError::corrupted(&data_path, format!("缺少条目{name}"))
            })?;
            tracing::debug!(variable = name.as_str(), shape = ?tensor.shape(), "恢复变量");
            session.bind_variable(id, tensor)?;
        }
        for extra in by_name.keys() {
            tracing::debug!(entry = extra.as_str(), "忽略检查点中多余的条目");
        }

        tracing::info!(variables = self.var_names.len(), "检查点恢复完成");
        Ok(())
    }

    fn recorded_path(&self, prefix: &CheckpointPrefix) -> String {
        if self.save_relative_paths {
            prefix.file_name()
        } else {
            prefix.path().display().to_string()
        }
    }
}

fn lookup(session: &Session, name: &str) -> Result<NodeId, CheckpointError> {
    session.graph().find_node_by_name(name).ok_or_else(|| {
        GraphError::InvalidOperation(format!("会话的计算图中没有变量{name}")).into()
    })
}

fn delete_checkpoint_files(prefix: &CheckpointPrefix) -> Result<(), CheckpointError> {
    for path in [prefix.index_path(), prefix.data_path()] {
        match std::fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(CheckpointError::io(path, e)),
        }
    }
    tracing::debug!(prefix = %prefix, "删除过旧的检查点");
    Ok(())
}
