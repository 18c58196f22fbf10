//! 类型注册表实现
//!
//! 为每个具体类型绑定唯一身份（ID + 名称），并回答身份与祖先链查询。
//! 注册只发生在引导阶段；封闭后注册表只读，多线程并发查询无需调用方
//! 做任何同步约定。

use object_common::{Primitive, RegistryError, RegistryResult, StaticTyped, TypeId, TypeRecord};
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::{debug, info};

/// 通用根类型的固定ID
pub const ROOT_TYPE_ID: TypeId = TypeId::new(1);

/// 通用根类型名称
pub const ROOT_TYPE_NAME: &str = "Object";

/// 注册表内部状态
#[derive(Debug)]
struct RegistryState {
    /// 按ID索引的类型记录
    records: HashMap<TypeId, TypeRecord>,
    /// 按名称索引的类型ID
    by_name: HashMap<String, TypeId>,
    /// 下一个待分配的动态ID
    next_dynamic: u32,
    /// 是否已封闭
    sealed: bool,
}

impl Default for RegistryState {
    fn default() -> Self {
        Self {
            records: HashMap::new(),
            by_name: HashMap::new(),
            next_dynamic: TypeId::DYNAMIC_BASE.raw(),
            sealed: false,
        }
    }
}

/// 类型注册表
///
/// 写入仅发生在引导阶段，`seal` 之后转为只读；祖先链查询通过记录中的
/// `parent` 字段逐级迭代完成，不依赖宿主语言的继承机制。
#[derive(Debug, Default)]
pub struct TypeRegistry {
    state: RwLock<RegistryState>,
}

impl TypeRegistry {
    /// 创建新的空注册表
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册一个新类型，由注册表从动态区间分配ID
    ///
    /// 名称已绑定时返回 [`RegistryError::DuplicateRegistration`]；
    /// 父类型必须已注册。
    pub fn register(&self, name: &str, parent: TypeId) -> RegistryResult<TypeId> {
        let mut state = self.state.write();
        Self::check_open(&state, name)?;
        Self::check_name_free(&state, name)?;
        if !parent.is_valid() || !state.records.contains_key(&parent) {
            return Err(RegistryError::UnknownParent { parent });
        }

        let raw = state.next_dynamic;
        if raw == u32::MAX {
            return Err(RegistryError::TypeIdSpaceExhausted);
        }
        state.next_dynamic += 1;

        let id = TypeId::new(raw);
        Self::insert(&mut state, TypeRecord::new(id, name, parent));
        debug!("注册类型: {} (动态ID {})", name, id);
        Ok(id)
    }

    /// 以显式固定ID注册一个新类型
    ///
    /// 固定ID必须有效且小于动态区间起点；父类型为无效哨兵值时仅允许
    /// 注册首条记录（根记录）。
    pub fn register_with_id(&self, id: TypeId, name: &str, parent: TypeId) -> RegistryResult<()> {
        let mut state = self.state.write();
        Self::check_open(&state, name)?;
        Self::check_name_free(&state, name)?;
        if !id.is_valid() || id >= TypeId::DYNAMIC_BASE {
            return Err(RegistryError::ReservedTypeId { id });
        }
        if let Some(existing) = state.records.get(&id) {
            return Err(RegistryError::DuplicateTypeId {
                id,
                existing: existing.name.clone(),
            });
        }
        if parent.is_valid() {
            if !state.records.contains_key(&parent) {
                return Err(RegistryError::UnknownParent { parent });
            }
        } else if !state.records.is_empty() {
            return Err(RegistryError::UnknownParent { parent });
        }

        Self::insert(&mut state, TypeRecord::new(id, name, parent));
        debug!("注册类型: {} (固定ID {})", name, id);
        Ok(())
    }

    /// 封闭注册表，结束引导阶段
    ///
    /// 封闭后所有注册请求被拒绝，查询路径视注册表为只读数据。
    pub fn seal(&self) {
        let mut state = self.state.write();
        state.sealed = true;
        info!("类型注册表已封闭，共 {} 条记录", state.records.len());
    }

    /// 是否已封闭
    pub fn is_sealed(&self) -> bool {
        self.state.read().sealed
    }

    /// 已注册的类型数量
    pub fn len(&self) -> usize {
        self.state.read().records.len()
    }

    /// 是否没有任何注册记录
    pub fn is_empty(&self) -> bool {
        self.state.read().records.is_empty()
    }

    /// 按ID查询类型记录
    pub fn record(&self, id: TypeId) -> Option<TypeRecord> {
        self.state.read().records.get(&id).cloned()
    }

    /// 按名称查询类型ID
    pub fn id_of(&self, name: &str) -> Option<TypeId> {
        self.state.read().by_name.get(name).copied()
    }

    /// 按ID查询类型名称
    pub fn name_of(&self, id: TypeId) -> Option<String> {
        self.state
            .read()
            .records
            .get(&id)
            .map(|record| record.name.clone())
    }

    /// 类型级祖先链查询（静态形式，无需实例）
    ///
    /// 自 `kind` 起沿父链逐级上溯，命中 `target` 返回 true；
    /// 链走空仍未命中返回 false。查询对自身是自反的。
    pub fn inherits_from(&self, kind: TypeId, target: TypeId) -> bool {
        if !kind.is_valid() || !target.is_valid() {
            return false;
        }

        let state = self.state.read();
        let mut current = kind;
        while current.is_valid() {
            if current == target {
                return true;
            }
            match state.records.get(&current) {
                Some(record) => current = record.parent,
                None => return false,
            }
        }
        false
    }

    /// 类型级祖先链查询（按名称）
    pub fn inherits_from_name(&self, kind: TypeId, target: &str) -> bool {
        match self.id_of(target) {
            Some(target_id) => self.inherits_from(kind, target_id),
            None => false,
        }
    }

    /// 按静态绑定发起的类型级祖先链查询
    pub fn kind_inherits_from<K: StaticTyped>(&self, target: TypeId) -> bool {
        self.inherits_from(K::static_type_id(), target)
    }

    /// 实例级身份查询
    ///
    /// 以实例自身的动态类型ID为起点沿父链判定。
    pub fn is_instance_of(&self, instance: &dyn Primitive, target: TypeId) -> bool {
        self.inherits_from(instance.type_id(), target)
    }

    /// 实例级身份查询（按名称）
    pub fn is_instance_of_name(&self, instance: &dyn Primitive, target: &str) -> bool {
        match self.id_of(target) {
            Some(target_id) => self.is_instance_of(instance, target_id),
            None => false,
        }
    }

    /// 校验某个可分发类型的静态绑定
    ///
    /// 绑定缺失、ID无效或与注册记录不一致均视为
    /// [`RegistryError::UnboundSpecialization`]，属引导阶段的致命错误。
    pub fn verify_binding<K: StaticTyped>(&self) -> RegistryResult<()> {
        let kind = K::static_type_name();
        let id = K::static_type_id();
        if !id.is_valid() {
            return Err(RegistryError::UnboundSpecialization {
                kind: kind.to_string(),
            });
        }

        let record = self
            .record(id)
            .ok_or_else(|| RegistryError::UnboundSpecialization {
                kind: kind.to_string(),
            })?;
        if record.name != kind || record.parent != K::parent_type_id() {
            return Err(RegistryError::UnboundSpecialization {
                kind: kind.to_string(),
            });
        }
        Ok(())
    }

    fn check_open(state: &RegistryState, name: &str) -> RegistryResult<()> {
        if state.sealed {
            return Err(RegistryError::RegistrySealed {
                name: name.to_string(),
            });
        }
        Ok(())
    }

    fn check_name_free(state: &RegistryState, name: &str) -> RegistryResult<()> {
        if state.by_name.contains_key(name) {
            return Err(RegistryError::DuplicateRegistration {
                name: name.to_string(),
            });
        }
        Ok(())
    }

    fn insert(state: &mut RegistryState, record: TypeRecord) {
        state.by_name.insert(record.name.clone(), record.id);
        state.records.insert(record.id, record);
    }
}

/// 全局类型注册表
static GLOBAL_TYPE_REGISTRY: once_cell::sync::Lazy<TypeRegistry> =
    once_cell::sync::Lazy::new(TypeRegistry::new);

/// 获取进程级全局类型注册表
pub fn global_registry() -> &'static TypeRegistry {
    &GLOBAL_TYPE_REGISTRY
}
