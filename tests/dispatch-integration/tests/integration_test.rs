//! 对象模型核心的跨组件集成测试

use object_common::{
    static_typed, DispatchError, DispatchResult, OperandSet, Primitive, TypeId,
};
use op_dispatch::TypedPrimitiveOp;
use parking_lot::Mutex;
use rayon::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use task_scope::{pool_in_use, TaskScope};
use type_registry::{Bootstrap, TypeRegistry, ROOT_TYPE_ID};

/// 进程级线程池槽位是单例，涉及进入作用域的测试之间需要串行
static SCOPE_TEST_GUARD: Mutex<()> = Mutex::new(());

const PRIMITIVE_OP_ID: TypeId = TypeId::new(7);
const MESH_ID: TypeId = TypeId::new(101);
const CURVES_ID: TypeId = TypeId::new(102);

/// 网格类型
#[derive(Debug, Default)]
struct Mesh {
    positions: Vec<[f64; 3]>,
}

static_typed!(Mesh, id = MESH_ID, name = "Mesh", parent = PRIMITIVE_OP_ID);

/// 曲线类型，与网格同父
#[derive(Debug, Default)]
struct Curves {
    knots: Vec<f64>,
}

static_typed!(Curves, id = CURVES_ID, name = "Curves", parent = PRIMITIVE_OP_ID);

/// 搭建含 PrimitiveOp/Mesh/Curves 层级的注册表
fn build_registry() -> TypeRegistry {
    let registry = TypeRegistry::new();
    Bootstrap::run(&registry, |b| {
        b.register_with_id(PRIMITIVE_OP_ID, "PrimitiveOp", ROOT_TYPE_ID)?;
        b.register_kind::<Mesh>()?;
        b.register_kind::<Curves>()?;
        Ok(())
    })
    .unwrap();
    registry
}

#[test]
fn test_mesh_dispatch_scenario() {
    let registry = build_registry();

    // 注册结果与静态绑定一致
    let record = registry.record(MESH_ID).unwrap();
    assert_eq!(record.name, "Mesh");
    assert_eq!(record.parent, PRIMITIVE_OP_ID);

    static CALLS: AtomicUsize = AtomicUsize::new(0);
    let op = TypedPrimitiveOp::new(
        "smoothMesh",
        "对网格做一次平滑",
        |mesh: &mut Mesh, operands: &OperandSet| -> DispatchResult<()> {
            CALLS.fetch_add(1, Ordering::SeqCst);
            assert_eq!(operands.len(), 1);
            assert_eq!(
                operands.get("iterations").and_then(serde_json::Value::as_u64),
                Some(3)
            );
            mesh.positions.push([1.0, 2.0, 3.0]);
            Ok(())
        },
    );
    assert_eq!(op.primitive_type(), MESH_ID);

    // 上游校验层会先确认适用性再调用 apply
    let mut mesh = Mesh::default();
    assert!(registry.is_instance_of(&mesh, op.primitive_type()));

    let operands = OperandSet::builder().with("iterations", 3_u64).build();
    let snapshot = operands.clone();
    op.apply(&mut mesh, &operands).unwrap();

    // 回调恰好执行一次、作用于同一实例、操作数包原样
    assert_eq!(CALLS.load(Ordering::SeqCst), 1);
    assert_eq!(mesh.positions.len(), 1);
    assert_eq!(operands, snapshot);
}

#[test]
fn test_mesh_dispatch_rejects_wrong_kind() {
    let registry = build_registry();

    let op = TypedPrimitiveOp::new(
        "smoothMesh",
        "对网格做一次平滑",
        |_: &mut Mesh, _: &OperandSet| -> DispatchResult<()> { Ok(()) },
    );

    // 上游的适用性预检查本应拦下曲线实例
    let curves = Curves::default();
    assert!(!registry.is_instance_of(&curves, op.primitive_type()));

    // 越过预检查直接 apply 属于上游校验缺陷
    let mut curves = curves;
    if cfg!(debug_assertions) {
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _ = op.apply(&mut curves, &OperandSet::empty());
        }));
        assert!(result.is_err(), "调试构建下应触发契约断言");
    } else {
        let err = op.apply(&mut curves, &OperandSet::empty()).unwrap_err();
        assert!(matches!(err, DispatchError::ContractViolation { .. }));
    }
    assert!(curves.knots.is_empty());
}

#[test]
fn test_scope_exit_runs_once_and_error_propagates() {
    let _guard = SCOPE_TEST_GUARD.lock();

    let result = std::panic::catch_unwind(|| {
        let mut scope = TaskScope::new(2).unwrap();
        let token = scope.enter().unwrap();
        assert!(pool_in_use());
        let _ = token.run(|| 21 * 2);
        panic!("受保护块内抛出的原始错误");
    });

    // 原始错误原样到达调用方
    let payload = result.unwrap_err();
    let message = payload.downcast_ref::<&str>().copied().unwrap_or_default();
    assert_eq!(message, "受保护块内抛出的原始错误");

    // 令牌销毁恰好释放了一次线程池
    assert!(!pool_in_use());
}

#[test]
fn test_concurrent_identity_queries_match_baseline() {
    let _guard = SCOPE_TEST_GUARD.lock();

    let registry = build_registry();
    let mesh = Mesh::default();
    let targets = [
        MESH_ID,
        CURVES_ID,
        PRIMITIVE_OP_ID,
        ROOT_TYPE_ID,
        TypeId::new(9999),
        TypeId::INVALID,
    ];

    // 单线程基准
    let baseline: Vec<bool> = targets
        .iter()
        .map(|&target| registry.is_instance_of(&mesh, target))
        .collect();

    let mut scope = TaskScope::new(4).unwrap();
    let token = scope.enter().unwrap();

    let registry = &registry;
    let mesh = &mesh;
    let worker_results: Vec<Vec<bool>> = token.run(|| {
        (0..8)
            .into_par_iter()
            .map(|_| {
                let mut results = Vec::new();
                for _ in 0..10_000 {
                    assert_eq!(mesh.type_id(), MESH_ID);
                    for &target in &targets {
                        results.push(registry.is_instance_of(mesh, target));
                    }
                }
                results
            })
            .collect()
    });

    token.exit();

    // 封闭后的注册表只读，并发查询结果与单线程基准一致
    for results in worker_results {
        for (index, value) in results.iter().enumerate() {
            assert_eq!(*value, baseline[index % targets.len()]);
        }
    }
}
