//! # 示例应用程序
//!
//! 演示如何使用 Geode 对象模型核心：类型注册引导、类型化分发
//! 和并发作用域

use clap::{Parser, ValueEnum};
use object_common::{static_typed, DispatchResult, OperandSet, Primitive, TypeId};
use op_dispatch::{PrimitiveOp, TypedPrimitiveOp};
use task_scope::{TaskScope, AUTOMATIC};
use tracing::info;
use type_registry::{bootstrap_global, global_registry, ROOT_TYPE_ID};

/// 命令行参数
#[derive(Parser, Debug)]
#[command(name = "example-app")]
#[command(about = "Geode 对象模型核心示例应用")]
struct Args {
    /// 最大工作线程数（-1 表示由运行时决定）
    #[arg(long, default_value_t = AUTOMATIC)]
    max_threads: i64,

    /// 日志级别
    #[arg(long, value_enum, default_value = "info")]
    log_level: LogLevel,
}

/// 日志级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// 换算为 tracing 级别
    fn as_tracing(self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

/// 图元基类的固定ID
const PRIMITIVE_TYPE_ID: TypeId = TypeId::new(2);
/// 网格图元的固定ID
const MESH_TYPE_ID: TypeId = TypeId::new(100);
/// 点云图元的固定ID
const POINTS_TYPE_ID: TypeId = TypeId::new(101);

/// 网格图元
#[derive(Debug, Default, Clone)]
struct MeshPrimitive {
    /// 顶点坐标
    positions: Vec<[f64; 3]>,
}

static_typed!(
    MeshPrimitive,
    id = MESH_TYPE_ID,
    name = "MeshPrimitive",
    parent = PRIMITIVE_TYPE_ID
);

/// 点云图元
#[derive(Debug, Default, Clone)]
struct PointsPrimitive {
    /// 点坐标
    positions: Vec<[f64; 3]>,
}

static_typed!(
    PointsPrimitive,
    id = POINTS_TYPE_ID,
    name = "PointsPrimitive",
    parent = PRIMITIVE_TYPE_ID
);

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 初始化日志
    tracing_subscriber::fmt()
        .with_max_level(args.log_level.as_tracing())
        .init();

    info!("启动 Geode 对象模型核心示例应用");

    // 引导类型注册
    bootstrap_registry()?;

    // 演示身份查询
    demonstrate_identity_queries();

    // 演示并发作用域内的类型化分发
    demonstrate_scoped_dispatch(args.max_threads)?;

    info!("示例应用结束");
    Ok(())
}

/// 引导类型注册
fn bootstrap_registry() -> anyhow::Result<()> {
    bootstrap_global(|b| {
        b.register_with_id(PRIMITIVE_TYPE_ID, "Primitive", ROOT_TYPE_ID)?;
        b.register_kind::<MeshPrimitive>()?;
        b.register_kind::<PointsPrimitive>()?;
        Ok(())
    })?;
    Ok(())
}

/// 演示身份查询
fn demonstrate_identity_queries() {
    let registry = global_registry();
    let mesh = MeshPrimitive::default();

    info!(
        "网格图元: id={}, name={}",
        mesh.type_id(),
        mesh.type_name()
    );
    info!(
        "网格是否继承自 Primitive: {}",
        registry.is_instance_of(&mesh, PRIMITIVE_TYPE_ID)
    );
    info!(
        "按名称查询: MeshPrimitive 是 Object 的后代: {}",
        registry.is_instance_of_name(&mesh, "Object")
    );
    info!(
        "无实例的静态形式: PointsPrimitive 继承自 Primitive: {}",
        registry.kind_inherits_from::<PointsPrimitive>(PRIMITIVE_TYPE_ID)
    );
}

/// 演示并发作用域内的类型化分发
fn demonstrate_scoped_dispatch(max_threads: i64) -> anyhow::Result<()> {
    // 平移网格顶点的类型化算子
    let translate = TypedPrimitiveOp::new(
        "translateMesh",
        "按操作数中的偏移量平移网格顶点",
        |mesh: &mut MeshPrimitive, operands: &OperandSet| -> DispatchResult<()> {
            let offset = operands
                .get("offset")
                .and_then(serde_json::Value::as_f64)
                .unwrap_or(0.0);
            for position in &mut mesh.positions {
                position[0] += offset;
                position[1] += offset;
                position[2] += offset;
            }
            Ok(())
        },
    );
    info!(
        "构建算子 {} (作用类型ID: {})",
        translate.name(),
        translate.primitive_type()
    );

    let operands = OperandSet::builder().with("offset", 1.5).build();

    let mut meshes: Vec<MeshPrimitive> = (0..8)
        .map(|i| MeshPrimitive {
            positions: vec![[f64::from(i), 0.0, 0.0]; 64],
        })
        .collect();

    // 进入并发作用域并在线程池内并行应用算子
    let mut scope = TaskScope::new(max_threads)?;
    let token = scope.enter()?;
    info!(
        "作用域 {} 已进入, 工作线程数: {}",
        token.scope_id(),
        token.pool().current_num_threads()
    );

    let translate = &translate;
    let operands = &operands;
    token.run(|| {
        rayon::scope(|s| {
            for mesh in &mut meshes {
                s.spawn(move |_| {
                    if let Err(e) = translate.apply(mesh, operands) {
                        tracing::error!("算子执行失败: {}", e);
                    }
                });
            }
        });
    });

    token.exit();
    info!("作用域已退出，线程池已释放");

    info!(
        "平移后首个网格的首个顶点: {:?}",
        meshes.first().and_then(|m| m.positions.first())
    );
    Ok(())
}
