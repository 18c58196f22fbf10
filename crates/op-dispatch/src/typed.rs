//! 类型化分发适配器
//!
//! 把"收窄 + 契约检查"的样板逻辑收拢进一个按具体类型实例化的通用
//! 适配器：新算子的作者只实现类型化回调，算子种类 × 图元种类的组合
//! 保持加法增长而不是乘法样板。

use crate::operation::PrimitiveOp;
use object_common::{
    DispatchError, DispatchResult, OperandSet, Primitive, StaticTyped, TypeId,
};
use std::marker::PhantomData;
use tracing::trace;

/// 类型化修改回调 trait
///
/// 具体类型的算子作者唯一需要实现的接口。
pub trait TypedModifier<T>: Send + Sync {
    /// 对已收窄的图元执行类型特定的修改
    fn modify_typed(&self, primitive: &mut T, operands: &OperandSet) -> DispatchResult<()>;
}

impl<T, F> TypedModifier<T> for F
where
    F: Fn(&mut T, &OperandSet) -> DispatchResult<()> + Send + Sync,
{
    fn modify_typed(&self, primitive: &mut T, operands: &OperandSet) -> DispatchResult<()> {
        self(primitive, operands)
    }
}

/// 类型化图元算子
///
/// 每个具体类型一个实例化的通用适配器：先按动态类型ID确认身份，
/// 再经受检的 [`Any`](std::any::Any) 访问收窄到具体类型，随后恰好
/// 调用一次类型化回调。
pub struct TypedPrimitiveOp<T, M> {
    name: String,
    description: String,
    modifier: M,
    _kind: PhantomData<fn(&mut T)>,
}

impl<T, M> TypedPrimitiveOp<T, M>
where
    T: Primitive + StaticTyped,
    M: TypedModifier<T>,
{
    /// 创建新的类型化算子
    pub fn new(name: impl Into<String>, description: impl Into<String>, modifier: M) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            modifier,
            _kind: PhantomData,
        }
    }

    /// 算子所作用的具体图元类型ID
    pub fn primitive_type(&self) -> TypeId {
        T::static_type_id()
    }

    /// 收窄并调用类型化回调
    ///
    /// 前置条件：`primitive` 的动态类型与本算子绑定的类型一致，
    /// 由上游校验层保证。违反前置条件说明上游存在校验缺陷：
    /// 调试构建触发断言，受检路径返回
    /// [`DispatchError::ContractViolation`]。
    pub fn apply(
        &self,
        primitive: &mut dyn Primitive,
        operands: &OperandSet,
    ) -> DispatchResult<()> {
        if primitive.type_id() != T::static_type_id() {
            let actual = primitive.type_name();
            debug_assert!(
                false,
                "上游校验缺陷: 算子 {} 期望 {}, 实际 {}",
                self.name,
                T::static_type_name(),
                actual
            );
            return Err(self.contract_violation(actual));
        }

        let typed = primitive
            .as_any_mut()
            .downcast_mut::<T>()
            .ok_or_else(|| self.contract_violation("<非具体类型句柄>"))?;

        trace!("分发算子 {} -> {}", self.name, T::static_type_name());
        self.modifier.modify_typed(typed, operands)
    }

    fn contract_violation(&self, actual: &str) -> DispatchError {
        DispatchError::ContractViolation {
            op: self.name.clone(),
            expected: T::static_type_name().to_string(),
            actual: actual.to_string(),
        }
    }
}

impl<T, M> PrimitiveOp for TypedPrimitiveOp<T, M>
where
    T: Primitive + StaticTyped,
    M: TypedModifier<T>,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn primitive_type(&self) -> TypeId {
        T::static_type_id()
    }

    fn modify_primitive(
        &self,
        primitive: &mut dyn Primitive,
        operands: &OperandSet,
    ) -> DispatchResult<()> {
        self.apply(primitive, operands)
    }
}
