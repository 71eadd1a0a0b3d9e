//! SQL 语句模块
//!
//! 语句由占位符形式的 SQL 文本和按序排列的绑定值组成，
//! 执行时由连接按方言绑定参数。

use crate::value::SqlValue;

/// 一条待执行的 SQL 语句
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub binds: Vec<SqlValue>,
}

impl Statement {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            binds: Vec::new(),
        }
    }

    pub fn with_binds(sql: impl Into<String>, binds: Vec<SqlValue>) -> Self {
        Self {
            sql: sql.into(),
            binds,
        }
    }

    /// 将绑定值代入占位符，得到完整的 SQL 文本
    ///
    /// 支持 `?`（按出现顺序）、`$n` 和 `:n`（按编号）三种占位符。
    /// 只用于日志和语句形状检查，不作为执行路径。
    pub fn inline_sql(&self) -> String {
        let mut out = String::with_capacity(self.sql.len() + 16 * self.binds.len());
        let mut chars = self.sql.chars().peekable();
        let mut next = 0usize;
        while let Some(c) = chars.next() {
            match c {
                '?' if next < self.binds.len() => {
                    out.push_str(&self.binds[next].to_sql_value());
                    next += 1;
                }
                '$' | ':' if chars.peek().is_some_and(|d| d.is_ascii_digit()) => {
                    let mut n = 0usize;
                    while let Some(d) = chars.peek().and_then(|c| c.to_digit(10)) {
                        n = n * 10 + d as usize;
                        chars.next();
                    }
                    match self.binds.get(n - 1) {
                        Some(v) => out.push_str(&v.to_sql_value()),
                        None => {
                            out.push(c);
                            out.push_str(&n.to_string());
                        }
                    }
                }
                _ => out.push(c),
            }
        }
        out
    }
}
