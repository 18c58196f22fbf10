//! 算子抽象
//!
//! 算子是命名、可描述的图元变更单元；按调用逐次构造，本核心不持有。

use object_common::{DispatchResult, OperandSet, Primitive, TypeId};

/// 图元算子 trait
///
/// 上游的校验与参数绑定层通过 [`primitive_type`](PrimitiveOp::primitive_type)
/// 在调用前判断适用性；[`modify_primitive`](PrimitiveOp::modify_primitive)
/// 的前置条件是图元动态类型与声明类型一致。
pub trait PrimitiveOp: Send + Sync {
    /// 算子名称
    fn name(&self) -> &str;

    /// 算子描述
    fn description(&self) -> &str;

    /// 算子所作用的具体图元类型ID
    fn primitive_type(&self) -> TypeId;

    /// 就地修改图元
    ///
    /// 操作数包只读转发；回调产生的错误原样向上传播。
    fn modify_primitive(
        &self,
        primitive: &mut dyn Primitive,
        operands: &OperandSet,
    ) -> DispatchResult<()>;
}
