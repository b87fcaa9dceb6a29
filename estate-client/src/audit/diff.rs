//! 审计日志 JSON diff 计算
//!
//! 通过比较更新前后的 JSON 值生成字段级变更列表，再渲染为 `field: old -> new` 文本。
//! 浮点数使用容差比较避免精度问题。

use std::collections::BTreeSet;

use serde::Serialize;
use serde_json::Value;

/// 浮点数比较容差 (用于处理序列化/反序列化精度损失)
const FLOAT_EPSILON: f64 = 1e-9;

/// 空值显示标记
pub const EMPTY_MARKER: &str = "(空)";

/// 递归比较两个 JSON 值是否相等（浮点数使用容差比较）
fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(fa), Some(fb)) => (fa - fb).abs() < FLOAT_EPSILON,
            _ => a == b,
        },
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(va, vb)| values_equal(va, vb))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(key, va)| b.get(key).is_some_and(|vb| values_equal(va, vb)))
        }
        _ => a == b,
    }
}

/// 字段变更记录
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FieldChange {
    /// 字段名（嵌套字段以 `.` 连接）
    pub field: String,
    /// 变更前的值
    pub from: Value,
    /// 变更后的值
    pub to: Value,
}

/// 审计快照配置
#[derive(Debug, Clone)]
pub struct AuditConfig {
    /// 要排除的字段
    pub exclude_fields: &'static [&'static str],
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            exclude_fields: &["id"],
        }
    }
}

/// 获取模块的审计配置
pub fn get_config(module: &str) -> AuditConfig {
    match module {
        shared::modules::USER => AuditConfig {
            exclude_fields: &["password"],
        },
        _ => AuditConfig::default(),
    }
}

/// 计算两个 JSON 值的差异（递归，字段按名称排序）
fn diff_json_recursive(from: &Value, to: &Value, path: &str, changes: &mut Vec<FieldChange>) {
    match (from, to) {
        (Value::Object(from_obj), Value::Object(to_obj)) => {
            let all_keys: BTreeSet<&String> = from_obj.keys().chain(to_obj.keys()).collect();

            for key in all_keys {
                let field_path = if path.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", path, key)
                };

                let f = from_obj.get(key).unwrap_or(&Value::Null);
                let t = to_obj.get(key).unwrap_or(&Value::Null);
                diff_json_recursive(f, t, &field_path, changes);
            }
        }
        (f, t) => {
            if !values_equal(f, t) {
                changes.push(FieldChange {
                    field: path.to_string(),
                    from: f.clone(),
                    to: t.clone(),
                });
            }
        }
    }
}

/// 过滤 JSON 对象中的敏感字段
fn filter_fields(value: &mut Value, exclude: &[&str]) {
    if let Value::Object(obj) = value {
        for field in exclude {
            obj.remove(*field);
        }
    }
}

fn to_filtered_json<T: Serialize>(value: &T, config: &AuditConfig) -> Option<Value> {
    match serde_json::to_value(value) {
        Ok(mut json) => {
            filter_fields(&mut json, config.exclude_fields);
            Some(json)
        }
        Err(e) => {
            tracing::error!("Failed to serialize audit snapshot: {:?}", e);
            None
        }
    }
}

// ============================================================================
// 公共 API
// ============================================================================

/// 新建记录的快照（已过滤字段）
pub fn create_snapshot<T: Serialize>(value: &T, module: &str) -> Value {
    to_filtered_json(value, &get_config(module)).unwrap_or(Value::Null)
}

/// 更新前后的字段变更列表；无变化时为空
pub fn create_diff<T: Serialize>(from: &T, to: &T, module: &str) -> Vec<FieldChange> {
    let config = get_config(module);
    let (Some(from_json), Some(to_json)) =
        (to_filtered_json(from, &config), to_filtered_json(to, &config))
    else {
        return Vec::new();
    };

    let mut changes = Vec::new();
    diff_json_recursive(&from_json, &to_json, "", &mut changes);
    changes
}

/// 显示用的值文本（字符串不带引号，null 显示为 `(空)`）
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => EMPTY_MARKER.to_string(),
        Value::String(s) if s.is_empty() => EMPTY_MARKER.to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// `field: old -> new, field: old -> new`
pub fn render_changes(changes: &[FieldChange]) -> String {
    changes
        .iter()
        .map(|c| format!("{}: {} -> {}", c.field, display_value(&c.from), display_value(&c.to)))
        .collect::<Vec<_>>()
        .join(", ")
}

/// `field: value, field: value`（跳过空值）
pub fn render_snapshot(snapshot: &Value) -> String {
    match snapshot {
        Value::Object(obj) => obj
            .iter()
            .filter(|(_, v)| !v.is_null())
            .map(|(k, v)| format!("{}: {}", k, display_value(v)))
            .collect::<Vec<_>>()
            .join(", "),
        other => display_value(other),
    }
}
