use crate::nn::ConstantInput;
use std::collections::BTreeMap;

/// 推理/训练开关，布尔标量
pub const IS_TRAINING: &str = "is_training";
/// 历史特征的缩放系数，形状 [1, 5]
pub const INCLUDE_HISTORY: &str = "include_history";

/// 建图时就确定的模型输入：名字 -> 常量
///
/// 每一项都会成为图中的一个`Const`节点（位于命名空间内，名字即键名）。
/// 集合本身是开放的，模型不认识的项也会原样放进图里。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelInputs {
    entries: BTreeMap<String, ConstantInput>,
}

impl ModelInputs {
    pub fn new() -> Self {
        Self::default()
    }

    /// 导出图时使用的输入：不训练、保留全部历史特征
    pub fn export_defaults() -> Self {
        Self::new()
            .with(IS_TRAINING, ConstantInput::bool_scalar(false))
            .with(INCLUDE_HISTORY, ConstantInput::float_filled(1.0, &[1, 5]))
    }

    pub fn with(mut self, name: &str, input: ConstantInput) -> Self {
        self.insert(name, input);
        self
    }

    pub fn insert(&mut self, name: &str, input: ConstantInput) -> Option<ConstantInput> {
        self.entries.insert(name.to_string(), input)
    }

    pub fn get(&self, name: &str) -> Option<&ConstantInput> {
        self.entries.get(name)
    }

    /// 按名字排序遍历
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConstantInput)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
