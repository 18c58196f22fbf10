//! # Type Registry
//!
//! 这个 crate 实现了 Geode 对象模型核心的类型注册表组件。
//!
//! ## 核心组件
//!
//! - [`TypeRegistry`] - 类型身份注册与祖先链查询
//! - [`Bootstrap`] - 有序的注册引导阶段与启动自检
//! - [`global_registry`] - 进程级全局注册表
//!
//! ## 并发模型
//!
//! 写入只发生在引导阶段；[`TypeRegistry::seal`] 之后注册表只读，
//! 任意多工作线程可并发查询而无需额外协调。

pub mod bootstrap;
pub mod registry;

pub use bootstrap::*;
pub use registry::*;
