pub mod connection;
pub mod db_pool;
pub mod dialect;
pub mod error;
pub mod mapper;
pub mod model;
pub mod naming;
pub mod statement;
pub mod value;

pub use connection::Connection;
pub use db_pool::DbPool;
pub use dialect::Dialect;
pub use error::{DaoError, Result};
pub use mapper::RecordMapper;
pub use model::{FieldKind, FieldMeta, Model};
pub use statement::Statement;
pub use value::{FieldMap, SqlValue};

// 重新导出 derive 的所有公共 API（宏）
pub use sqldao_derive::*;
