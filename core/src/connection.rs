//! 连接能力抽象
//!
//! 映射层不管理连接生命周期，只通过这个 trait 消费外部提供的连接。
//! 内置的 [`DbPool`](crate::db_pool::DbPool) 实现了它，其他数据库
//! （如 Oracle）由使用方自行实现。

use crate::dialect::Dialect;
use crate::error::Result;
use crate::statement::Statement;
use crate::value::FieldMap;

/// 数据库连接能力
///
/// 每次调用都是一次同步完成的往返，没有重试、没有事务语义。
/// 超时与取消由实现方自己负责。
#[async_trait::async_trait]
pub trait Connection: Send + Sync {
    /// 连接的方言
    fn dialect(&self) -> Dialect;

    /// 主键自增策略是否开启
    ///
    /// 开启时，insert 会跳过模型中标记为自增的字段，由数据库赋值。
    fn auto_increment(&self) -> bool;

    /// 执行查询并取回全部结果行
    async fn fetch(&self, stmt: &Statement) -> Result<Vec<FieldMap>>;

    /// 执行语句，返回受影响的行数
    async fn execute(&self, stmt: &Statement) -> Result<u64>;
}
