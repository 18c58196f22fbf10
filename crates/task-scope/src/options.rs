//! 作用域配置选项

use crate::scope::{TaskScope, AUTOMATIC};
use object_common::ScopeResult;
use serde::{Deserialize, Serialize};

/// 并发作用域配置
///
/// 唯一的配置项是 `max_threads`，默认取自动哨兵值；合法取值为
/// 哨兵值或任意正整数。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScopeOptions {
    /// 最大工作线程数，[`AUTOMATIC`] 表示由运行时决定
    #[serde(default = "default_max_threads")]
    pub max_threads: i64,
}

fn default_max_threads() -> i64 {
    AUTOMATIC
}

impl Default for ScopeOptions {
    fn default() -> Self {
        Self {
            max_threads: AUTOMATIC,
        }
    }
}

impl ScopeOptions {
    /// 按配置构建并发作用域
    ///
    /// 与 [`TaskScope::new`] 使用同一套校验规则。
    pub fn into_scope(self) -> ScopeResult<TaskScope> {
        TaskScope::new(self.max_threads)
    }
}
