//! 模型元数据模块
//!
//! 模型通过显式声明的字段描述符列表暴露自己的结构，在模型注册
//! （derive 展开）时构建一次，映射层只消费这份描述符，不在运行时
//! 反射对象状态。

use crate::value::SqlValue;

/// 字段的语义类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    BigInt,
    Int,
    SmallInt,
    Double,
    Float,
    Bool,
    Text,
    Timestamp,
}

/// 字段元数据，由 derive(Model) 生成
#[derive(Debug, Clone, Copy)]
pub struct FieldMeta {
    pub name: &'static str,
    pub kind: FieldKind,
    /// 是否主键
    pub primary_key: bool,
    /// 是否自增（由连接的自增策略决定是否真正生效）
    pub auto_increment: bool,
}

/// Model trait 定义了模型的基本元数据
///
/// 表名不在这里声明：映射层绑定模型时用 `MODEL_NAME` 通过命名规则
/// 推导，表名永远不由使用方直接提供。
pub trait Model {
    /// 模型类型名，表名由它推导
    const MODEL_NAME: &'static str;
    /// 主键字段名
    const PK: &'static str = "id";

    /// 声明的字段描述符列表
    fn fields() -> &'static [FieldMeta];

    /// 按字段名读取当前值，字段不存在或值缺失（`Option` 为 `None`）时
    /// 返回 `None`
    fn field_value(&self, name: &str) -> Option<SqlValue>;

    /// 按字段名写回一个值，未知字段或类型不匹配的值被忽略
    fn set_field(&mut self, name: &str, value: SqlValue);

    fn has_field(name: &str) -> bool {
        Self::fields().iter().any(|f| f.name == name)
    }
}
