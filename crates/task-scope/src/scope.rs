//! 并发作用域控制器
//!
//! 把进程级有界工作线程池的生命周期管理为一个受护资源：进入作用域
//! 时创建线程池并占用全局槽位，令牌销毁时无条件释放——包括保护块
//! 正在传播 panic 的退出路径，且从不吞掉正在传播的错误。

use chrono::{DateTime, Utc};
use object_common::{ScopeError, ScopeResult};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{debug, error, info};
use uuid::Uuid;

/// 自动线程数哨兵值
///
/// 表示由运行时按可用核心数决定工作线程数量。
pub const AUTOMATIC: i64 = -1;

/// 进程级工作线程池槽位
///
/// 线程池是单一的进程级资源，由当前进入的作用域引用而非拥有。
static WORKER_POOL: Lazy<Mutex<Option<Arc<rayon::ThreadPool>>>> = Lazy::new(|| Mutex::new(None));

/// 当前是否有作用域占用着工作线程池
pub fn pool_in_use() -> bool {
    WORKER_POOL.lock().is_some()
}

/// 工作线程预算
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WorkerBudget {
    /// 由运行时决定
    Automatic,
    /// 固定线程数
    Fixed(usize),
}

impl WorkerBudget {
    /// 校验原始配置值
    ///
    /// 只接受 [`AUTOMATIC`] 哨兵值或严格正整数，其余值在触碰任何底层
    /// 资源之前即被拒绝。
    fn from_raw(value: i64) -> ScopeResult<Self> {
        if value == AUTOMATIC {
            return Ok(Self::Automatic);
        }
        match usize::try_from(value) {
            Ok(n) if n > 0 => Ok(Self::Fixed(n)),
            _ => Err(ScopeError::Configuration { value }),
        }
    }

    /// 换算为 rayon 的线程数参数（0 表示自动）
    fn num_threads(self) -> usize {
        match self {
            Self::Automatic => 0,
            Self::Fixed(n) => n,
        }
    }
}

/// 并发作用域
///
/// 两个状态：未进入与已进入。[`enter`](TaskScope::enter) 以 `&mut self`
/// 借用整个令牌存活期，同一实例在匹配释放前的重复进入在编译期即不可
/// 表达；并发进入两个独立作用域按既定策略在运行期被拒绝。
#[derive(Debug)]
pub struct TaskScope {
    budget: WorkerBudget,
}

impl TaskScope {
    /// 创建新的并发作用域
    ///
    /// `max_threads` 为 [`AUTOMATIC`] 或严格正整数，其余值返回
    /// [`ScopeError::Configuration`]。
    pub fn new(max_threads: i64) -> ScopeResult<Self> {
        Ok(Self {
            budget: WorkerBudget::from_raw(max_threads)?,
        })
    }

    /// 创建线程数由运行时决定的作用域
    pub fn automatic() -> Self {
        Self {
            budget: WorkerBudget::Automatic,
        }
    }

    /// 进入作用域
    ///
    /// 创建绑定到线程预算的工作线程池并占用进程级槽位；返回引用本
    /// 作用域的令牌作为受护资源句柄。槽位已被其他作用域占用时返回
    /// [`ScopeError::PoolInUse`]。
    pub fn enter(&mut self) -> ScopeResult<ScopeToken<'_>> {
        let mut slot = WORKER_POOL.lock();
        if slot.is_some() {
            return Err(ScopeError::PoolInUse);
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.budget.num_threads())
            .thread_name(|index| format!("geode-worker-{index}"))
            .build()
            .map_err(|e| ScopeError::PoolBuild {
                message: e.to_string(),
            })?;
        let pool = Arc::new(pool);
        *slot = Some(Arc::clone(&pool));
        drop(slot);

        let token = ScopeToken {
            pool: Some(pool),
            scope_id: Uuid::new_v4(),
            entered_at: Utc::now(),
            _scope: PhantomData,
        };
        info!(
            "进入并发作用域 {} (工作线程数: {})",
            token.scope_id,
            token.pool.as_ref().map_or(0, |p| p.current_num_threads())
        );
        Ok(token)
    }
}

/// 作用域令牌
///
/// 受护资源句柄：存活期内保护块可通过它向线程池提交并行工作；
/// 销毁时无条件归还线程池并阻塞等待工作线程退出。
pub struct ScopeToken<'a> {
    pool: Option<Arc<rayon::ThreadPool>>,
    scope_id: Uuid,
    entered_at: DateTime<Utc>,
    _scope: PhantomData<&'a mut TaskScope>,
}

impl ScopeToken<'_> {
    /// 作用域实例ID
    pub fn scope_id(&self) -> Uuid {
        self.scope_id
    }

    /// 进入时刻
    pub fn entered_at(&self) -> DateTime<Utc> {
        self.entered_at
    }

    /// 访问底层工作线程池
    ///
    /// 借用与令牌绑定，引用无法越过作用域退出继续存活。
    pub fn pool(&self) -> &rayon::ThreadPool {
        self.pool
            .as_ref()
            .expect("令牌存活期内线程池恒存在")
            .as_ref()
    }

    /// 在作用域的线程池内执行闭包
    pub fn run<R, F>(&self, f: F) -> R
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        self.pool().install(f)
    }

    /// 显式退出作用域
    ///
    /// 等价于销毁令牌；提供给偏好成对 enter/exit 书写的调用方。
    pub fn exit(self) {
        drop(self);
    }

    /// 释放线程池
    ///
    /// 槽位引用与令牌引用全部归还后独占拆解线程池；整个拆解过程持有
    /// 槽位锁，排空完成之前并发的 `enter` 无法取得槽位。若仍有外部
    /// 引用残留，池无法完成排空，属中止级故障。
    fn release(&mut self) {
        let Some(pool) = self.pool.take() else {
            return;
        };

        // 锁跨越整个排空过程
        let mut slot = WORKER_POOL.lock();
        drop(slot.take());

        match Arc::try_unwrap(pool) {
            Ok(pool) => {
                // 阻塞等待在途任务完成后归还线程
                drop(pool);
                debug!("并发作用域 {} 已释放工作线程池", self.scope_id);
            }
            Err(_) => {
                error!(
                    "并发作用域 {} 退出时工作线程池仍被外部引用持有，无法完成释放",
                    self.scope_id
                );
                std::process::abort();
            }
        }
    }
}

impl Drop for ScopeToken<'_> {
    fn drop(&mut self) {
        // 所有退出路径（含 panic 传播）都经过这里；释放本身不吞错误
        self.release();
    }
}
