//! 并发作用域控制器的集成测试

use object_common::ScopeError;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use task_scope::{pool_in_use, ScopeOptions, TaskScope, AUTOMATIC};

/// 进程级线程池槽位是单例，涉及进入作用域的测试之间需要串行
static SCOPE_TEST_GUARD: Mutex<()> = Mutex::new(());

#[test]
fn test_construction_validation() {
    // 非法取值同步失败
    assert!(matches!(
        TaskScope::new(0),
        Err(ScopeError::Configuration { value: 0 })
    ));
    assert!(matches!(
        TaskScope::new(-5),
        Err(ScopeError::Configuration { value: -5 })
    ));

    // 哨兵值与正整数成功
    assert!(TaskScope::new(AUTOMATIC).is_ok());
    assert!(TaskScope::new(4).is_ok());
}

#[test]
fn test_enter_exit_releases_pool() {
    let _guard = SCOPE_TEST_GUARD.lock();

    let mut scope = TaskScope::new(2).unwrap();
    let token = scope.enter().unwrap();
    assert!(pool_in_use());
    assert_eq!(token.pool().current_num_threads(), 2);

    // 在作用域内执行并行工作
    let sum = token.run(|| (1..=100).sum::<i64>());
    assert_eq!(sum, 5050);

    token.exit();
    assert!(!pool_in_use());

    // 匹配退出后同一实例可再次进入
    let token = scope.enter().unwrap();
    assert!(pool_in_use());
    drop(token);
    assert!(!pool_in_use());
}

#[test]
fn test_panic_in_scope_releases_pool_and_propagates() {
    let _guard = SCOPE_TEST_GUARD.lock();

    let result = std::panic::catch_unwind(|| {
        let mut scope = TaskScope::automatic();
        let _token = scope.enter().unwrap();
        panic!("保护块内的故障");
    });

    // 原始错误未被吞掉
    let payload = result.unwrap_err();
    let message = payload.downcast_ref::<&str>().copied().unwrap_or_default();
    assert_eq!(message, "保护块内的故障");

    // 释放仍然恰好执行了一次
    assert!(!pool_in_use());
}

#[test]
fn test_release_serializes_with_concurrent_entry() {
    let _guard = SCOPE_TEST_GUARD.lock();

    static DRAINED: AtomicBool = AtomicBool::new(false);
    DRAINED.store(false, Ordering::SeqCst);

    let mut first = TaskScope::new(1).unwrap();
    let token = first.enter().unwrap();

    // 让一个在途任务拖住第一个线程池的排空
    token.pool().spawn(|| {
        std::thread::sleep(Duration::from_millis(400));
        DRAINED.store(true, Ordering::SeqCst);
    });

    std::thread::scope(|s| {
        s.spawn(move || token.exit());

        // 等退出线程开始排空后再尝试进入第二个作用域
        std::thread::sleep(Duration::from_millis(100));
        let mut second = TaskScope::new(1).unwrap();
        let entered = loop {
            match second.enter() {
                Ok(entered) => break entered,
                Err(ScopeError::PoolInUse) => {
                    std::thread::sleep(Duration::from_millis(10));
                }
                Err(e) => panic!("进入作用域失败: {e}"),
            }
        };

        // 第一个线程池排空完成之前，第二个作用域不可能进入
        assert!(DRAINED.load(Ordering::SeqCst));
        drop(entered);
    });

    assert!(!pool_in_use());
}

#[test]
fn test_concurrent_scope_entry_rejected() {
    let _guard = SCOPE_TEST_GUARD.lock();

    let mut first = TaskScope::new(1).unwrap();
    let token = first.enter().unwrap();

    let mut second = TaskScope::new(1).unwrap();
    assert!(matches!(second.enter(), Err(ScopeError::PoolInUse)));

    token.exit();
    // 第一个作用域退出后第二个可以进入
    let token = second.enter().unwrap();
    drop(token);
}

#[test]
fn test_scope_options_defaults_and_validation() {
    // 默认取自动哨兵值
    let options = ScopeOptions::default();
    assert_eq!(options.max_threads, AUTOMATIC);

    // 缺省字段反序列化为哨兵值
    let options: ScopeOptions = serde_json::from_str("{}").unwrap();
    assert_eq!(options.max_threads, AUTOMATIC);
    assert!(options.into_scope().is_ok());

    // 非法配置沿用同一套校验
    let options: ScopeOptions = serde_json::from_str(r#"{"max_threads": -2}"#).unwrap();
    assert!(matches!(
        options.into_scope(),
        Err(ScopeError::Configuration { value: -2 })
    ));
}
