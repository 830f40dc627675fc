use super::ConfigError;

/// 某个模型版本的输入特征数与各输出头的通道数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelChannels {
    pub spatial_inputs: usize,
    pub global_inputs: usize,
    pub value: usize,
    pub ownership: usize,
    pub score_value: usize,
}

impl ModelChannels {
    pub fn for_version(version: u32) -> Result<Self, ConfigError> {
        let (spatial_inputs, global_inputs, score_value) = match version {
            5 => (22, 14, 2),
            8 => (22, 19, 4),
            v if v >= 9 => (22, 19, 6),
            v => return Err(ConfigError::UnsupportedVersion(v)),
        };
        Ok(Self {
            spatial_inputs,
            global_inputs,
            value: 3,
            ownership: 1,
            score_value,
        })
    }
}
