//! 操作数集合
//!
//! 不可变的键值复合参数包，由调用方构造后原样传递给分发层，
//! 本核心不解释也不持有其内容

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// 操作数集合
///
/// 构造完成后不可变；分发路径只做只读转发。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OperandSet {
    entries: BTreeMap<String, Value>,
}

impl OperandSet {
    /// 创建空的操作数集合
    pub fn empty() -> Self {
        Self::default()
    }

    /// 创建操作数集合构建器
    pub fn builder() -> OperandSetBuilder {
        OperandSetBuilder::default()
    }

    /// 按键读取操作数
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// 是否包含指定键
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// 操作数个数
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 遍历全部操作数
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// 操作数集合构建器
#[derive(Debug, Default)]
pub struct OperandSetBuilder {
    entries: BTreeMap<String, Value>,
}

impl OperandSetBuilder {
    /// 添加一个操作数
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    /// 完成构建
    pub fn build(self) -> OperandSet {
        OperandSet {
            entries: self.entries,
        }
    }
}
