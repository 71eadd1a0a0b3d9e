//! 数据库方言模块
//!
//! 为支持的数据库引擎提供统一的接口：占位符格式、URL 识别、
//! 最后插入 ID 的查询语句与结果提取规则。每个方言自带自己的分支，
//! 不做统一抽象。

use crate::error::{DaoError, Result};
use crate::value::FieldMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    MySql,
    Postgres,
    Oracle,
    Sqlite,
}

impl Dialect {
    /// 从数据库 URL 识别方言
    pub fn from_url(url: &str) -> Result<Self> {
        if url.starts_with("mysql://") || url.starts_with("mariadb://") {
            Ok(Dialect::MySql)
        } else if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            Ok(Dialect::Postgres)
        } else if url.starts_with("oracle://") {
            Ok(Dialect::Oracle)
        } else if url.starts_with("sqlite://") || url.starts_with("sqlite:") {
            Ok(Dialect::Sqlite)
        } else {
            Err(DaoError::UnsupportedDatabase(url.to_string()))
        }
    }

    /// 获取占位符字符串
    ///
    /// * MySQL/SQLite: `"?"`
    /// * PostgreSQL: `"$1"`, `"$2"`, ... (index + 1)
    /// * Oracle: `":1"`, `":2"`, ... (index + 1)
    pub fn placeholder(&self, index: usize) -> String {
        match self {
            Dialect::MySql | Dialect::Sqlite => "?".to_string(),
            Dialect::Postgres => format!("${}", index + 1),
            Dialect::Oracle => format!(":{}", index + 1),
        }
    }

    /// 查询最后插入 ID 的语句
    ///
    /// 大多数方言按 id 倒序取第一行，Oracle 直接取 MAX 聚合。
    pub fn last_insert_id_sql(&self, table: &str) -> String {
        match self {
            Dialect::MySql | Dialect::Postgres | Dialect::Sqlite => {
                format!("SELECT id FROM {} ORDER BY id DESC LIMIT 1", table)
            }
            Dialect::Oracle => format!("SELECT MAX(id) FROM {}", table),
        }
    }

    /// 从结果行中提取最后插入 ID
    ///
    /// MySQL/PostgreSQL 按列名 `id` 取值，Oracle/SQLite 按位置取第一列。
    /// 两条路径必须保持分开，列名在聚合查询下并不是 `id`。
    pub fn extract_last_insert_id(&self, row: &FieldMap) -> Option<i64> {
        match self {
            Dialect::MySql | Dialect::Postgres => row.get("id").and_then(|v| v.as_i64()),
            Dialect::Oracle | Dialect::Sqlite => row.first().and_then(|(_, v)| v.as_i64()),
        }
    }
}
