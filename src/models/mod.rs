//! 数据模型模块

pub mod account;
pub mod auth;
pub mod category;
pub mod item;
pub mod terms;

/// 去除首尾空白后为空则视为缺失
pub(crate) fn trimmed(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// 可选字段：去除空白，空串归一为 None
pub(crate) fn trimmed_opt(value: Option<String>) -> Option<String> {
    value.as_deref().and_then(trimmed)
}
