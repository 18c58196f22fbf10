//! 错误类型定义

use crate::identity::TypeId;
use thiserror::Error;

/// 类型注册表错误类型
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("类型名称已注册: {name}")]
    DuplicateRegistration { name: String },

    #[error("类型ID已占用: {id}, 已绑定类型: {existing}")]
    DuplicateTypeId { id: TypeId, existing: String },

    #[error("父类型未注册: {parent}")]
    UnknownParent { parent: TypeId },

    #[error("显式类型ID不在固定ID区间内: {id}")]
    ReservedTypeId { id: TypeId },

    #[error("动态类型ID空间已耗尽")]
    TypeIdSpaceExhausted,

    #[error("注册表已封闭，禁止继续注册: {name}")]
    RegistrySealed { name: String },

    #[error("可分发类型缺少身份绑定或绑定与注册记录不一致: {kind}")]
    UnboundSpecialization { kind: String },
}

/// 分发错误类型
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("类型契约违规: 算子 {op} 期望 {expected}, 实际 {actual}")]
    ContractViolation {
        op: String,
        expected: String,
        actual: String,
    },

    #[error("算子执行失败: {op}, 原因: {source}")]
    OpFailed {
        op: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl DispatchError {
    /// 创建算子执行失败错误
    pub fn op_failed(
        op: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::OpFailed {
            op: op.into(),
            source: source.into(),
        }
    }
}

/// 并发作用域错误类型
#[derive(Error, Debug)]
pub enum ScopeError {
    #[error("max_threads 必须为 automatic 哨兵值或正整数: {value}")]
    Configuration { value: i64 },

    #[error("进程级工作线程池已被其他作用域占用")]
    PoolInUse,

    #[error("工作线程池创建失败: {message}")]
    PoolBuild { message: String },
}

/// 对象模型核心错误类型
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("类型注册表错误: {source}")]
    Registry {
        #[from]
        source: RegistryError,
    },

    #[error("分发错误: {source}")]
    Dispatch {
        #[from]
        source: DispatchError,
    },

    #[error("并发作用域错误: {source}")]
    Scope {
        #[from]
        source: ScopeError,
    },
}

/// 结果类型别名
pub type RegistryResult<T> = Result<T, RegistryError>;
pub type DispatchResult<T> = Result<T, DispatchError>;
pub type ScopeResult<T> = Result<T, ScopeError>;
pub type CoreResult<T> = Result<T, CoreError>;
