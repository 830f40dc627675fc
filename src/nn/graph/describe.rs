/*
 * @Author       : 老董
 * @Date         : 2026-01-27
 * @Description  : Graph describe/summary 相关方法
 */

use super::Graph;
use crate::nn::descriptor::{GraphDescriptor, NodeDescriptor};

impl Graph {
    // ========== 图描述（describe）==========

    /// 导出图的描述符（用于序列化、文本图定义导出、调试）
    ///
    /// 节点按 ID（即创建顺序）排列，同一张图多次调用结果完全相同
    pub fn describe(&self) -> GraphDescriptor {
        let mut descriptor = GraphDescriptor::new(&self.name);

        for node_id in self.nodes() {
            let node = &self.nodes[&node_id];
            let inputs = self
                .backward_edges
                .get(&node_id)
                .map(|ids| {
                    ids.iter()
                        .map(|id| self.nodes[id].name().to_string())
                        .collect()
                })
                .unwrap_or_default();

            descriptor.add_node(NodeDescriptor::new(
                node_id.0,
                node.name(),
                node.op(),
                inputs,
                node.dtype(),
                node.output_shape().clone(),
                node.attrs(),
            ));
        }

        descriptor
    }

    // ========== 模型摘要（summary）==========

    /// 返回模型摘要字符串（Unicode 文本表格，用于控制台输出）
    pub fn summary_string(&self) -> String {
        let desc = self.describe();
        let trainable_params: usize = self
            .trainable_variable_nodes()
            .iter()
            .filter_map(|id| self.nodes[id].output_shape().num_elements())
            .sum();

        // 计算各列宽度
        let name_width = desc
            .nodes
            .iter()
            .map(|n| display_width(&n.name))
            .max()
            .unwrap_or(8)
            .max(8);
        let op_width = desc
            .nodes
            .iter()
            .map(|n| n.op.len())
            .max()
            .unwrap_or(8)
            .max(8);
        let shape_width = desc
            .nodes
            .iter()
            .map(|n| n.output_shape.to_display_string().len())
            .max()
            .unwrap_or(8)
            .max(8);
        let param_width = 10;
        let input_width = desc
            .nodes
            .iter()
            .map(|n| display_width(&format_inputs(&n.inputs)))
            .max()
            .unwrap_or(8)
            .max(6);

        // 边框和间距
        let total_width = name_width + op_width + shape_width + param_width + input_width + 16;

        let rule = |left: &str, mid: &str, right: &str| {
            format!(
                "{left}{}{mid}{}{mid}{}{mid}{}{mid}{}{right}\n",
                "─".repeat(name_width + 2),
                "─".repeat(op_width + 2),
                "─".repeat(shape_width + 2),
                "─".repeat(param_width + 2),
                "─".repeat(input_width + 2),
            )
        };

        let mut output = String::new();

        // 表头
        output.push_str(&format!("模型摘要: {}\n", desc.name));
        output.push_str(&rule("┌", "┬", "┐"));
        output.push_str(&format!(
            "│ {} │ {} │ {} │ {} │ {} │\n",
            pad_right("节点名称", name_width),
            pad_right("算子", op_width),
            pad_right("输出形状", shape_width),
            pad_right("参数量", param_width),
            pad_right("输入", input_width),
        ));
        output.push_str(&rule("├", "┼", "┤"));

        // 节点行
        for node in &desc.nodes {
            let param_str = node
                .param_count
                .map_or_else(|| "-".to_string(), format_number);

            output.push_str(&format!(
                "│ {} │ {:<op_w$} │ {:<shape_w$} │ {:>param_w$} │ {} │\n",
                pad_right(&node.name, name_width),
                node.op,
                node.output_shape.to_display_string(),
                param_str,
                pad_right(&format_inputs(&node.inputs), input_width),
                op_w = op_width,
                shape_w = shape_width,
                param_w = param_width,
            ));
        }

        // 分隔线
        output.push_str(&rule("├", "┴", "┤"));

        // 统计信息
        let lines = [
            format!("总参数量: {}", format_number(desc.total_params())),
            format!("可训练参数: {}", format_number(trainable_params)),
        ];
        for line in lines {
            output.push_str(&format!("│ {} │\n", pad_right(&line, total_width - 4)));
        }

        // 底边
        output.push_str(&format!("└{}┘\n", "─".repeat(total_width - 2)));

        output
    }
}

/// 格式化数字为千分位分隔形式
fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

fn format_inputs(inputs: &[String]) -> String {
    if inputs.is_empty() {
        "-".to_string()
    } else {
        inputs.join(", ")
    }
}

/// 计算字符串显示宽度（考虑中文字符）
fn display_width(s: &str) -> usize {
    s.chars().map(|c| if c.is_ascii() { 1 } else { 2 }).sum()
}

/// 按显示宽度右侧补空格
fn pad_right(s: &str, width: usize) -> String {
    let pad = width.saturating_sub(display_width(s));
    format!("{s}{}", " ".repeat(pad))
}
