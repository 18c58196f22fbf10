//! 类型身份数据模型
//!
//! 提供类型ID与类型记录的定义，注册与查询逻辑位于 `type-registry` crate

use serde::{Deserialize, Serialize};
use std::fmt;

/// 类型ID
///
/// 进程内唯一的整数句柄，每个具体类型一个；0 为无效哨兵值。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeId(u32);

impl TypeId {
    /// 无效哨兵值
    pub const INVALID: Self = Self(0);

    /// 动态分配区间起点
    ///
    /// 显式注册的固定ID必须小于该值，动态分配的ID从该值开始递增，
    /// 两个区间永不相交。
    pub const DYNAMIC_BASE: Self = Self(0x10000);

    /// 从原始整数创建类型ID
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// 获取原始整数值
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// 是否为有效ID（非哨兵值）
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }
}

impl Default for TypeId {
    fn default() -> Self {
        Self::INVALID
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 类型记录
///
/// 每个具体类型一条，在首次分发前注册且注册后不再变更；
/// 通过 `parent` 形成以通用根记录为终点的无环单父链。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeRecord {
    /// 类型ID
    pub id: TypeId,
    /// 类型名称
    pub name: String,
    /// 直接父类型ID，根记录为 [`TypeId::INVALID`]
    pub parent: TypeId,
}

impl TypeRecord {
    /// 创建新的类型记录
    pub fn new(id: TypeId, name: impl Into<String>, parent: TypeId) -> Self {
        Self {
            id,
            name: name.into(),
            parent,
        }
    }

    /// 是否为根记录
    pub fn is_root(&self) -> bool {
        !self.parent.is_valid()
    }
}
