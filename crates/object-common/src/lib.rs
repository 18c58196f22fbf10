//! # Object Common
//!
//! 这个 crate 提供了 Geode 对象模型核心的公共类型和错误定义。
//!
//! ## 核心组件
//!
//! - [`TypeId`] / [`TypeRecord`] - 类型身份数据模型
//! - [`Primitive`] - 图元抽象句柄 trait
//! - [`StaticTyped`] - 每个可分发类型必须提供的静态身份绑定
//! - [`OperandSet`] - 不可变的键值操作数包
//!
//! ## 设计原则
//!
//! - 基于 Rust 类型系统的编译时安全：缺少 [`StaticTyped`] 绑定的类型
//!   无法进入类型化分发路径
//! - 同步优先：身份查询与分发路径不含任何阻塞点
//! - 错误集中定义，按关注点分组

pub mod errors;
pub mod identity;
pub mod operands;
pub mod primitive;

pub use errors::*;
pub use identity::*;
pub use operands::*;
pub use primitive::*;
