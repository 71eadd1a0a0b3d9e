//! 记录映射器
//!
//! 把平面模型对象映射到关系表：绑定模型类型时推导一次表名，按操作
//! 拼装 SQL 语句，通过注入的连接能力执行，并把自增主键回填到调用方
//! 的对象上。映射器自身不持有连接生命周期，也没有任何缓存。
//!
//! 绑定的表名是可变共享状态且不加锁，多任务并发访问请为每个任务
//! 建一个映射器。

use std::marker::PhantomData;

use tracing::debug;

use crate::connection::Connection;
use crate::error::{DaoError, Result};
use crate::model::Model;
use crate::naming;
use crate::statement::Statement;
use crate::value::{FieldMap, SqlValue};

/// 面向单个模型类型的通用 DAO
///
/// ```rust,ignore
/// let pool = DbPool::connect("sqlite::memory:").await?;
/// let mapper = RecordMapper::<Product>::new(&pool)?;
///
/// let mut product = Product { name: Some("CD".into()), price: Some(21.0), ..Default::default() };
/// mapper.insert(&mut product).await?;          // product.id 已回填
/// let rows = mapper.select(&["name", "price"], "price > 10").await?;
/// ```
pub struct RecordMapper<'c, M: Model> {
    connection: Option<&'c dyn Connection>,
    table: String,
    _model: PhantomData<M>,
}

impl<'c, M: Model> RecordMapper<'c, M> {
    /// 绑定连接和模型类型，表名在此推导一次
    pub fn new(connection: &'c dyn Connection) -> Result<Self> {
        Ok(Self {
            connection: Some(connection),
            table: naming::table_name(M::MODEL_NAME)?,
            _model: PhantomData,
        })
    }

    /// 创建未绑定连接的映射器，之后可用 [`attach`](Self::attach) 绑定
    pub fn detached() -> Result<Self> {
        Ok(Self {
            connection: None,
            table: naming::table_name(M::MODEL_NAME)?,
            _model: PhantomData,
        })
    }

    pub fn attach(&mut self, connection: &'c dyn Connection) {
        self.connection = Some(connection);
    }

    /// 推导出的表名
    pub fn table_name(&self) -> &str {
        &self.table
    }

    /// 换绑到另一个模型类型，重新推导表名
    pub fn rebind<N: Model>(self) -> Result<RecordMapper<'c, N>> {
        Ok(RecordMapper {
            connection: self.connection,
            table: naming::table_name(N::MODEL_NAME)?,
            _model: PhantomData,
        })
    }

    fn connection(&self) -> Result<&'c dyn Connection> {
        self.connection.ok_or(DaoError::Unbound)
    }

    /// 校验字段映射的每个键都是绑定模型声明过的字段
    ///
    /// 空映射返回 false。
    pub fn check_field_map(&self, map: &FieldMap) -> bool {
        !map.is_empty() && map.keys().all(M::has_field)
    }

    fn ensure_field_map(&self, map: &FieldMap) -> Result<()> {
        for key in map.keys() {
            if !M::has_field(key) {
                return Err(DaoError::FieldMismatch {
                    field: key.to_string(),
                    model: M::MODEL_NAME,
                });
            }
        }
        Ok(())
    }

    /// 查询若干行
    ///
    /// `fields` 为空时查询所有列。`where_clause` 非空时按原样追加为
    /// WHERE 子句，不做任何转义，子句安全性由调用方负责。
    pub async fn select(&self, fields: &[&str], where_clause: &str) -> Result<Vec<FieldMap>> {
        let conn = self.connection()?;
        let columns = if fields.is_empty() {
            "*".to_string()
        } else {
            fields.join(", ")
        };
        let mut sql = format!("SELECT {} FROM {}", columns, self.table);
        if !where_clause.is_empty() {
            sql = format!("{} WHERE {}", sql, where_clause);
        }
        let stmt = Statement::new(sql);
        debug!(sql = %stmt.sql, "select");
        conn.fetch(&stmt).await
    }

    /// 插入一个模型实例
    ///
    /// 连接开启自增策略时跳过标记为自增的字段，值缺失的字段不参与插入。
    /// 成功后把新分配的主键回填到 `obj` 上。
    pub async fn insert(&self, obj: &mut M) -> Result<()> {
        let conn = self.connection()?;
        let dialect = conn.dialect();

        let mut columns = Vec::new();
        let mut binds = Vec::new();
        for meta in M::fields() {
            if conn.auto_increment() && meta.auto_increment {
                continue;
            }
            if let Some(value) = obj.field_value(meta.name) {
                columns.push(meta.name);
                binds.push(value);
            }
        }
        if columns.is_empty() {
            debug!(table = %self.table, "insert skipped, no field values present");
            return Ok(());
        }

        let placeholders: Vec<String> = (0..binds.len()).map(|i| dialect.placeholder(i)).collect();
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.table,
            columns.join(", "),
            placeholders.join(", ")
        );
        let stmt = Statement::with_binds(sql, binds);
        debug!(sql = %stmt.sql, "insert");
        conn.execute(&stmt).await?;

        if let Some(id) = self.last_insert_id().await? {
            obj.set_field(M::PK, SqlValue::BigInt(id));
        }
        Ok(())
    }

    /// 用字段映射插入一条记录
    ///
    /// 每个键都必须是绑定模型声明过的字段，否则返回
    /// [`DaoError::FieldMismatch`]。成功后把新分配的主键写入
    /// `fields["id"]`。空映射不做任何事。
    pub async fn insert_map(&self, fields: &mut FieldMap) -> Result<()> {
        let conn = self.connection()?;
        if fields.is_empty() {
            return Ok(());
        }
        self.ensure_field_map(fields)?;
        let dialect = conn.dialect();

        let mut columns = Vec::new();
        let mut binds = Vec::new();
        for (name, value) in fields.iter() {
            columns.push(name.to_string());
            binds.push(value.clone());
        }

        let placeholders: Vec<String> = (0..binds.len()).map(|i| dialect.placeholder(i)).collect();
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.table,
            columns.join(", "),
            placeholders.join(", ")
        );
        let stmt = Statement::with_binds(sql, binds);
        debug!(sql = %stmt.sql, "insert");
        conn.execute(&stmt).await?;

        if let Some(id) = self.last_insert_id().await? {
            fields.insert(M::PK, SqlValue::BigInt(id));
        }
        Ok(())
    }

    /// 按对象更新：SET 覆盖每个有值的非主键字段，条件取对象自己的主键
    pub async fn update(&self, obj: &M) -> Result<()> {
        let conn = self.connection()?;
        let dialect = conn.dialect();
        let id = obj.field_value(M::PK).ok_or(DaoError::FieldMismatch {
            field: M::PK.to_string(),
            model: M::MODEL_NAME,
        })?;

        let mut sets = Vec::new();
        let mut binds = Vec::new();
        for meta in M::fields() {
            if meta.name == M::PK {
                continue;
            }
            if let Some(value) = obj.field_value(meta.name) {
                sets.push(format!("{} = {}", meta.name, dialect.placeholder(binds.len())));
                binds.push(value);
            }
        }
        if sets.is_empty() {
            return Ok(());
        }

        let sql = format!(
            "UPDATE {} SET {} WHERE {} = {}",
            self.table,
            sets.join(", "),
            M::PK,
            dialect.placeholder(binds.len())
        );
        binds.push(id);
        let stmt = Statement::with_binds(sql, binds);
        debug!(sql = %stmt.sql, "update");
        conn.execute(&stmt).await?;
        Ok(())
    }

    /// 按字段映射更新
    ///
    /// `fields` 提供 SET 子句，`where_map` 提供 AND 连接的等值条件。
    /// 空的 `where_map` 意味着更新全表，这是沿用的既有语义。
    pub async fn update_map(&self, fields: &FieldMap, where_map: &FieldMap) -> Result<()> {
        let conn = self.connection()?;
        if fields.is_empty() {
            return Ok(());
        }
        self.ensure_field_map(fields)?;
        let dialect = conn.dialect();

        let mut sets = Vec::new();
        let mut binds = Vec::new();
        for (name, value) in fields.iter() {
            sets.push(format!("{} = {}", name, dialect.placeholder(binds.len())));
            binds.push(value.clone());
        }
        let mut sql = format!("UPDATE {} SET {}", self.table, sets.join(", "));

        if !where_map.is_empty() {
            self.ensure_field_map(where_map)?;
            let mut predicates = Vec::new();
            for (name, value) in where_map.iter() {
                predicates.push(format!("{} = {}", name, dialect.placeholder(binds.len())));
                binds.push(value.clone());
            }
            sql = format!("{} WHERE {}", sql, predicates.join(" AND "));
        }

        let stmt = Statement::with_binds(sql, binds);
        debug!(sql = %stmt.sql, "update");
        conn.execute(&stmt).await?;
        Ok(())
    }

    /// 按对象删除，条件只取主键，对象的其他字段值不参与
    pub async fn delete(&self, obj: &M) -> Result<()> {
        let conn = self.connection()?;
        let dialect = conn.dialect();
        let id = obj.field_value(M::PK).ok_or(DaoError::FieldMismatch {
            field: M::PK.to_string(),
            model: M::MODEL_NAME,
        })?;

        let sql = format!(
            "DELETE FROM {} WHERE {} = {}",
            self.table,
            M::PK,
            dialect.placeholder(0)
        );
        let stmt = Statement::with_binds(sql, vec![id]);
        debug!(sql = %stmt.sql, "delete");
        conn.execute(&stmt).await?;
        Ok(())
    }

    /// 按字段映射删除，AND 连接的等值条件
    ///
    /// 空映射不做任何事，不会变成全表删除。
    pub async fn delete_map(&self, where_map: &FieldMap) -> Result<()> {
        let conn = self.connection()?;
        if where_map.is_empty() {
            return Ok(());
        }
        self.ensure_field_map(where_map)?;
        let dialect = conn.dialect();

        let mut predicates = Vec::new();
        let mut binds = Vec::new();
        for (name, value) in where_map.iter() {
            predicates.push(format!("{} = {}", name, dialect.placeholder(binds.len())));
            binds.push(value.clone());
        }
        let sql = format!(
            "DELETE FROM {} WHERE {}",
            self.table,
            predicates.join(" AND ")
        );
        let stmt = Statement::with_binds(sql, binds);
        debug!(sql = %stmt.sql, "delete");
        conn.execute(&stmt).await?;
        Ok(())
    }

    /// 查询表中最后插入的主键值
    ///
    /// 语句模板和结果提取方式都按方言分支，表为空时返回 `Ok(None)`。
    pub async fn last_insert_id(&self) -> Result<Option<i64>> {
        let conn = self.connection()?;
        let dialect = conn.dialect();
        let stmt = Statement::new(dialect.last_insert_id_sql(&self.table));
        let rows = conn.fetch(&stmt).await?;
        Ok(rows.first().and_then(|row| dialect.extract_last_insert_id(row)))
    }

    /// 按对象的主键重读整行，把每一列写回对象
    ///
    /// 主键缺失或没有绑定连接时静默返回，不算错误。
    pub async fn fill(&self, obj: &mut M) -> Result<()> {
        let conn = match self.connection {
            Some(conn) => conn,
            None => return Ok(()),
        };
        let id = match obj.field_value(M::PK) {
            Some(id) => id,
            None => return Ok(()),
        };
        let dialect = conn.dialect();

        let sql = format!(
            "SELECT * FROM {} WHERE {} = {}",
            self.table,
            M::PK,
            dialect.placeholder(0)
        );
        let stmt = Statement::with_binds(sql, vec![id]);
        debug!(sql = %stmt.sql, "fill");
        let rows = conn.fetch(&stmt).await?;
        if let Some(row) = rows.first() {
            for (name, value) in row.iter() {
                obj.set_field(name, value.clone());
            }
        }
        Ok(())
    }

    /// 按字段映射的主键重读整行，把每一列写回映射
    ///
    /// 映射未通过字段校验或缺少主键时静默返回。
    pub async fn fill_map(&self, fields: &mut FieldMap) -> Result<()> {
        let conn = match self.connection {
            Some(conn) => conn,
            None => return Ok(()),
        };
        if !self.check_field_map(fields) {
            return Ok(());
        }
        let id = match fields.get(M::PK) {
            Some(id) => id.clone(),
            None => return Ok(()),
        };
        let dialect = conn.dialect();

        let sql = format!(
            "SELECT * FROM {} WHERE {} = {}",
            self.table,
            M::PK,
            dialect.placeholder(0)
        );
        let stmt = Statement::with_binds(sql, vec![id]);
        debug!(sql = %stmt.sql, "fill");
        let rows = conn.fetch(&stmt).await?;
        if let Some(row) = rows.first() {
            for (name, value) in row.iter() {
                fields.insert(name.to_string(), value.clone());
            }
        }
        Ok(())
    }
}
