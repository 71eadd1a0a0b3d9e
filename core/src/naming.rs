//! 表名推导模块
//!
//! 按照命名约定从模型类型名推导表名：实体名的复数小写形式。
//! 例如 `Product` 模型类 => `products` 表。

use crate::error::{DaoError, Result};

/// 从模型类型名推导表名
///
/// 将 PascalCase 的类型名转换为复数蛇形命名：位置 0 之后的每个大写字母
/// 前插入一个下划线，整体追加 `s` 后全部转为小写。
///
/// 连续大写字母会在每一个前面都插入下划线（`ABCModel` => `a_b_c_models`），
/// 这是既有命名约定的一部分，不做缩写词特殊处理。
///
/// ```
/// use sqldao::naming::table_name;
///
/// assert_eq!(table_name("Product").unwrap(), "products");
/// assert_eq!(table_name("OrderItem").unwrap(), "order_items");
/// ```
pub fn table_name(model_name: &str) -> Result<String> {
    if !model_name.chars().any(|c| c.is_uppercase()) {
        return Err(DaoError::Naming(model_name.to_string()));
    }

    let mut name = String::with_capacity(model_name.len() + 4);
    for (i, c) in model_name.chars().enumerate() {
        if c.is_uppercase() && i > 0 {
            name.push('_');
        }
        name.push(c.to_ascii_lowercase());
    }
    name.push('s');
    Ok(name)
}
