//! 图元句柄与静态类型绑定
//!
//! 提供图元抽象句柄 trait 和每个可分发类型必须实现的静态身份绑定

use crate::identity::TypeId;
use std::any::Any;

/// 静态类型绑定 trait
///
/// 每个可分发的具体类型都必须提供此绑定；未绑定的类型无法实例化
/// 类型化分发适配器，在编译期即被拒绝。绑定声明的记录是否真正
/// 注册，由引导阶段的自检负责校验。
pub trait StaticTyped: 'static {
    /// 该类型的静态类型ID
    fn static_type_id() -> TypeId;

    /// 该类型的静态类型名称
    fn static_type_name() -> &'static str;

    /// 直接父类型ID
    fn parent_type_id() -> TypeId;
}

/// 图元 trait
///
/// 指向具体数据对象的抽象句柄，携带自身的动态类型身份。
/// 本核心从不创建或销毁图元实例，实例生命周期由构造方负责。
pub trait Primitive: Send + Sync {
    /// 实例的动态类型ID
    fn type_id(&self) -> TypeId;

    /// 实例的动态类型名称
    fn type_name(&self) -> &'static str;

    /// 以 [`Any`] 形式访问实例（只读）
    fn as_any(&self) -> &dyn Any;

    /// 以 [`Any`] 形式访问实例（可变）
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// 为具体图元类型实现 [`StaticTyped`] 与 [`Primitive`] 的声明宏
///
/// 动态身份直接取自静态绑定，消除每个类型重复的样板实现。
#[macro_export]
macro_rules! static_typed {
    ($ty:ty, id = $id:expr, name = $name:expr, parent = $parent:expr) => {
        impl $crate::StaticTyped for $ty {
            fn static_type_id() -> $crate::TypeId {
                $id
            }

            fn static_type_name() -> &'static str {
                $name
            }

            fn parent_type_id() -> $crate::TypeId {
                $parent
            }
        }

        impl $crate::Primitive for $ty {
            fn type_id(&self) -> $crate::TypeId {
                <$ty as $crate::StaticTyped>::static_type_id()
            }

            fn type_name(&self) -> &'static str {
                <$ty as $crate::StaticTyped>::static_type_name()
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
                self
            }
        }
    };
}
