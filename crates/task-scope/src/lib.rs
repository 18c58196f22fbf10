//! # Task Scope
//!
//! 这个 crate 实现了 Geode 对象模型核心的并发作用域控制器。
//!
//! ## 核心组件
//!
//! - [`TaskScope`] - 并发作用域，管理进程级有界工作线程池的生命周期
//! - [`ScopeToken`] - 受护资源令牌，销毁时保证释放线程池
//! - [`ScopeOptions`] - serde 反序列化的构造配置
//!
//! ## 资源模型
//!
//! 底层线程池是进程级单例，同一时刻只允许一个作用域处于已进入状态；
//! 释放阻塞至工作线程排空，不提供取消或超时语义。

pub mod options;
pub mod scope;

pub use options::*;
pub use scope::*;
