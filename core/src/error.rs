use thiserror::Error;

#[derive(Debug, Error)]
pub enum DaoError {
    /// 模型名中没有任何大写字母，无法推导表名
    #[error("Cannot derive table name from model name: {0}")]
    Naming(String),
    /// 操作执行时映射器没有绑定连接
    #[error("No connection bound to the mapper")]
    Unbound,
    /// 字段映射中的键不属于当前绑定的模型
    #[error("Field '{field}' does not exist in model '{model}'")]
    FieldMismatch { field: String, model: &'static str },
    /// 底层连接执行 SQL 失败（语法、约束、连接中断等）
    #[error("SQL execution failed: {0}")]
    Execution(String),
    #[error("Unsupported database URL: {0}")]
    UnsupportedDatabase(String),
    #[error("No connection pool available for dialect")]
    NoPoolAvailable,
}

impl From<sqlx::Error> for DaoError {
    fn from(e: sqlx::Error) -> Self {
        DaoError::Execution(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DaoError>;
