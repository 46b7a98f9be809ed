// ==========================================
// Shopify 订单配送桥接系统 - 点号路径解析器
// ==========================================
// 职责: 在订单 JSON 上解析 "a.b.c" 形式的源字段路径
// 红线: 全系统共用这一个解析器(嵌套取值/全局映射/电话源),
//       禁止各处各写一份导致语义漂移
// 缺失语义: 任何中间键缺失 → None,由调用方降级为空串
// ==========================================

use serde_json::Value;

/// 解析点号路径,返回命中的 JSON 节点
///
/// 规则:
/// - 首段为 "order" 时视为根别名(源字段习惯写 "order.tags")
/// - 对象按键取值;数组段必须是数字下标
/// - 任何一步未命中 → None
pub fn resolve_path<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.').peekable();

    // "order." 前缀指向根本身
    if segments.peek() == Some(&"order") {
        segments.next();
    }

    let mut current = root;
    for seg in segments {
        if seg.is_empty() {
            return None;
        }
        current = match current {
            Value::Object(map) => map.get(seg)?,
            Value::Array(items) => {
                let idx: usize = seg.parse().ok()?;
                items.get(idx)?
            }
            _ => return None,
        };
    }
    Some(current)
}

/// 将叶子节点转为字符串
///
/// 契约: 字符串原样;数字/布尔转写;null 与复合值(对象/数组)
/// 均视为"未解析",返回空串
pub fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Object(_) | Value::Array(_) => String::new(),
    }
}

/// 解析并字符串化,未命中降级为空串
pub fn resolve_to_string(root: &Value, path: &str) -> String {
    resolve_path(root, path).map(stringify).unwrap_or_default()
}
