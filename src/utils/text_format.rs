/*
 * @Author       : 老董
 * @Date         : 2026-10-12
 * @Description  : protobuf 文本格式（text format）的简易读写
 *
 * 只覆盖本crate用到的子集：嵌套消息块、标量字段、带引号的字符串字段。
 * 图定义文件（graph.pbtxt）和检查点状态文件（checkpoint）都用它来生成。
 */

use std::fmt::Display;

/// 文本格式写入器，每层嵌套缩进 2 个空格
#[derive(Debug, Default)]
pub(crate) struct TextWriter {
    out: String,
    depth: usize,
}

impl TextWriter {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// 写入`field {`并进入下一层
    pub(crate) fn open(&mut self, field: &str) -> &mut Self {
        self.indent();
        self.out.push_str(field);
        self.out.push_str(" {\n");
        self.depth += 1;
        self
    }

    /// 写入`}`并回到上一层
    pub(crate) fn close(&mut self) -> &mut Self {
        debug_assert!(self.depth > 0, "close() 多于 open()");
        self.depth = self.depth.saturating_sub(1);
        self.indent();
        self.out.push_str("}\n");
        self
    }

    /// 写入不带引号的标量字段，如`size: 19`、`type: DT_FLOAT`
    pub(crate) fn field<T: Display>(&mut self, key: &str, value: T) -> &mut Self {
        self.indent();
        self.out.push_str(&format!("{key}: {value}\n"));
        self
    }

    /// 写入带引号的字符串字段，如`name: "conv1/w"`
    pub(crate) fn field_str(&mut self, key: &str, value: &str) -> &mut Self {
        self.indent();
        self.out.push_str(&format!("{key}: \"{}\"\n", escape(value)));
        self
    }

    pub(crate) fn finish(self) -> String {
        self.out
    }

    fn indent(&mut self) {
        for _ in 0..self.depth {
            self.out.push_str("  ");
        }
    }
}

pub(crate) fn escape(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\t' => escaped.push_str("\\t"),
            _ => escaped.push(c),
        }
    }
    escaped
}

pub(crate) fn unescape(s: &str) -> Option<String> {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next()? {
            '\\' => out.push('\\'),
            '"' => out.push('"'),
            'n' => out.push('\n'),
            't' => out.push('\t'),
            _ => return None,
        }
    }
    Some(out)
}

/// 解析单行字符串字段`key: "value"`，返回`(key, value)`
///
/// 不是该形式的行（空行、嵌套块、注释）返回`None`。
pub(crate) fn parse_string_field(line: &str) -> Option<(&str, String)> {
    let line = line.trim();
    if line.starts_with('#') {
        return None;
    }
    let (key, rest) = line.split_once(':')?;
    let rest = rest.trim();
    let quoted = rest.strip_prefix('"')?.strip_suffix('"')?;
    Some((key.trim(), unescape(quoted)?))
}
