//! # Op Dispatch
//!
//! 这个 crate 实现了 Geode 对象模型核心的类型化分发组件。
//!
//! ## 核心组件
//!
//! - [`PrimitiveOp`] - 命名、可描述的图元算子 trait
//! - [`TypedModifier`] - 算子作者实现的类型化回调
//! - [`TypedPrimitiveOp`] - 按具体类型实例化的通用收窄适配器
//!
//! ## 并发模型
//!
//! 分发路径完全同步且不含共享可变状态；对不同图元实例的并发
//! `apply` 调用彼此独立，无需协调。

pub mod operation;
pub mod typed;

pub use operation::*;
pub use typed::*;
