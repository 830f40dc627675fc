/*
 * @Author       : 老董
 * @Date         : 2026-10-13
 * @Description  : 把图描述符渲染为文本图定义（graph.pbtxt）
 *
 * 输出格式：
 *   node {
 *     name: "swa_model/conv1/w"
 *     op: "VariableV2"
 *     input: "..."
 *     attr { key: "..." value { ... } }
 *   }
 *   ...
 *   versions {
 *     producer: 1
 *   }
 */

use super::descriptor::{AttrValue, GraphDescriptor, NodeDescriptor};
use super::nodes::ScalarValue;
use super::shape::DynamicShape;
use crate::utils::text_format::TextWriter;

impl GraphDescriptor {
    /// 生成文本图定义。对同一个描述符，输出逐字节确定
    pub fn to_pbtxt(&self) -> String {
        let mut w = TextWriter::new();
        for node in &self.nodes {
            write_node(&mut w, node);
        }
        w.open("versions").field("producer", self.producer).close();
        w.finish()
    }
}

fn write_node(w: &mut TextWriter, node: &NodeDescriptor) {
    w.open("node");
    w.field_str("name", &node.name).field_str("op", &node.op);
    for input in &node.inputs {
        w.field_str("input", input);
    }
    // BTreeMap 保证属性按键名排序输出
    for (key, value) in &node.attrs {
        w.open("attr").field_str("key", key).open("value");
        write_attr_value(w, value);
        w.close().close();
    }
    w.close();
}

fn write_attr_value(w: &mut TextWriter, value: &AttrValue) {
    match value {
        AttrValue::Type(dtype) => {
            w.field("type", dtype.tf_name());
        }
        AttrValue::Shape(shape) => write_shape(w, "shape", shape),
        AttrValue::Int(i) => {
            w.field("i", i);
        }
        AttrValue::Ints(ints) => {
            w.open("list");
            for i in ints {
                w.field("i", i);
            }
            w.close();
        }
        AttrValue::Float(f) => {
            w.field("f", f);
        }
        AttrValue::Bool(b) => {
            w.field("b", b);
        }
        AttrValue::Str(s) => {
            w.field_str("s", s);
        }
        AttrValue::Fill {
            dtype,
            shape,
            value,
        } => {
            w.open("tensor").field("dtype", dtype.tf_name());
            write_shape(w, "tensor_shape", shape);
            match value {
                ScalarValue::Float(v) => w.field("float_val", v),
                ScalarValue::Bool(v) => w.field("bool_val", v),
            };
            w.close();
        }
    }
}

/// 动态维度写为`size: -1`，标量写为空的`shape {}`
fn write_shape(w: &mut TextWriter, field: &str, shape: &DynamicShape) {
    w.open(field);
    for size in shape.to_signed_dims() {
        w.open("dim").field("size", size).close();
    }
    w.close();
}
