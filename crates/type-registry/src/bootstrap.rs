//! 类型注册引导
//!
//! 以一个有明确顺序的引导阶段取代分散的静态初始化：先注册根记录，
//! 再执行调用方的注册逻辑，随后对所有声明的可分发类型做绑定自检，
//! 最后封闭注册表。自检失败是致命错误，绝不会退化为"永远返回 false"
//! 的祖先链查询结果。

use crate::registry::{global_registry, TypeRegistry, ROOT_TYPE_ID, ROOT_TYPE_NAME};
use object_common::{RegistryResult, StaticTyped, TypeId};
use tracing::{error, info};

/// 绑定自检函数类型
type BindingCheck = fn(&TypeRegistry) -> RegistryResult<()>;

/// 类型注册引导器
///
/// 仅在引导阶段内存在，向调用方暴露受控的注册入口。
pub struct Bootstrap<'a> {
    registry: &'a TypeRegistry,
    checks: Vec<BindingCheck>,
}

impl<'a> Bootstrap<'a> {
    /// 在指定注册表上运行完整的引导阶段
    pub fn run<F>(registry: &'a TypeRegistry, f: F) -> RegistryResult<()>
    where
        F: FnOnce(&mut Bootstrap<'a>) -> RegistryResult<()>,
    {
        info!("开始类型注册引导");

        // 根记录
        if registry.record(ROOT_TYPE_ID).is_none() {
            registry.register_with_id(ROOT_TYPE_ID, ROOT_TYPE_NAME, TypeId::INVALID)?;
        }

        let mut bootstrap = Bootstrap {
            registry,
            checks: Vec::new(),
        };
        if let Err(e) = f(&mut bootstrap) {
            error!("类型注册失败: {}", e);
            return Err(e);
        }

        // 启动自检：所有声明的可分发类型必须持有有效绑定
        for check in &bootstrap.checks {
            if let Err(e) = check(registry) {
                error!("类型绑定自检失败: {}", e);
                return Err(e);
            }
        }

        registry.seal();
        info!("类型注册引导完成");
        Ok(())
    }

    /// 注册一个类型并由注册表分配动态ID
    pub fn register(&mut self, name: &str, parent: TypeId) -> RegistryResult<TypeId> {
        self.registry.register(name, parent)
    }

    /// 以显式固定ID注册一个类型
    pub fn register_with_id(
        &mut self,
        id: TypeId,
        name: &str,
        parent: TypeId,
    ) -> RegistryResult<()> {
        self.registry.register_with_id(id, name, parent)
    }

    /// 按静态绑定注册一个可分发类型，并自动排入绑定自检
    pub fn register_kind<K: StaticTyped>(&mut self) -> RegistryResult<()> {
        self.registry.register_with_id(
            K::static_type_id(),
            K::static_type_name(),
            K::parent_type_id(),
        )?;
        self.verify::<K>();
        Ok(())
    }

    /// 声明一个可分发类型，要求引导结束前其绑定必须有效
    pub fn verify<K: StaticTyped>(&mut self) {
        self.checks.push(check_binding::<K>);
    }
}

fn check_binding<K: StaticTyped>(registry: &TypeRegistry) -> RegistryResult<()> {
    registry.verify_binding::<K>()
}

/// 在全局注册表上运行引导阶段
pub fn bootstrap_global<F>(f: F) -> RegistryResult<()>
where
    F: FnOnce(&mut Bootstrap<'_>) -> RegistryResult<()>,
{
    Bootstrap::run(global_registry(), f)
}
