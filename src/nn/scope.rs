/*
 * @Author       : 老董
 * @Date         : 2026-10-13
 * @Description  : 命名空间（name scope）
 *
 * 命名空间只是一个显式传递的名字前缀，不是全局状态：
 * 建图代码把它一层层往下传，所有节点名都经由它生成。
 */

use std::fmt;

/// 节点名前缀，如`swa_model/rconv1`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameScope {
    prefix: Option<String>,
}

impl NameScope {
    /// 无前缀的根命名空间
    pub fn root() -> Self {
        Self::default()
    }

    /// 由可选的命名空间字符串创建；首尾的`/`会被去掉，空串视为根
    pub fn new(scope: Option<&str>) -> Self {
        let prefix = scope
            .map(|s| s.trim_matches('/'))
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        Self { prefix }
    }

    /// 进入子命名空间
    pub fn sub(&self, name: &str) -> Self {
        Self {
            prefix: Some(self.name(name)),
        }
    }

    /// 在当前命名空间下生成节点全名
    pub fn name(&self, leaf: &str) -> String {
        match &self.prefix {
            Some(prefix) => format!("{prefix}/{leaf}"),
            None => leaf.to_string(),
        }
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    pub const fn is_root(&self) -> bool {
        self.prefix.is_none()
    }
}

impl fmt::Display for NameScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix.as_deref().unwrap_or("<root>"))
    }
}
