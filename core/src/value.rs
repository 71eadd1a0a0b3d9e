//! 值与字段映射模块
//!
//! `SqlValue` 是本层支持的列值的封闭集合，`FieldMap` 是保持插入顺序的
//! 字段名到值的映射，用于代替模型实例参与 insert/update/delete 条件。

use chrono::NaiveDateTime;
use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// 列值，用于语句绑定和结果行解码
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Text(String),
    BigInt(i64),
    Int(i32),
    SmallInt(i16),
    Double(f64),
    Float(f32),
    Bool(bool),
    Timestamp(NaiveDateTime),
    Null,
}

impl SqlValue {
    /// 渲染为 SQL 字面量，仅用于日志和语句形状展示，执行路径始终走参数绑定
    ///
    /// 序列化约定沿用旧有行为：`Bool(false)` => `'0'`、`Bool(true)` => `'1'`、
    /// `Null` => `'NULL'`（带引号）。
    pub fn to_sql_value(&self) -> String {
        match self {
            SqlValue::Text(s) => format!("'{}'", s.replace('\'', "''")),
            SqlValue::BigInt(i) => i.to_string(),
            SqlValue::Int(i) => i.to_string(),
            SqlValue::SmallInt(i) => i.to_string(),
            SqlValue::Double(f) => f.to_string(),
            SqlValue::Float(f) => f.to_string(),
            SqlValue::Bool(true) => "'1'".to_string(),
            SqlValue::Bool(false) => "'0'".to_string(),
            SqlValue::Timestamp(t) => format!("'{}'", t),
            SqlValue::Null => "'NULL'".to_string(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }

    /// 整数宽化读取，用于回填模型字段
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            SqlValue::BigInt(i) => Some(*i),
            SqlValue::Int(i) => Some(*i as i64),
            SqlValue::SmallInt(i) => Some(*i as i64),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            SqlValue::Double(f) => Some(*f),
            SqlValue::Float(f) => Some(*f as f64),
            SqlValue::BigInt(i) => Some(*i as f64),
            SqlValue::Int(i) => Some(*i as f64),
            SqlValue::SmallInt(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// 布尔读取，兼容以 0/1 整数存储布尔列的数据库（如 SQLite）
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SqlValue::Bool(b) => Some(*b),
            SqlValue::BigInt(0) | SqlValue::Int(0) | SqlValue::SmallInt(0) => Some(false),
            SqlValue::BigInt(1) | SqlValue::Int(1) | SqlValue::SmallInt(1) => Some(true),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            SqlValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        match self {
            SqlValue::Timestamp(t) => Some(*t),
            _ => None,
        }
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::BigInt(v)
    }
}

impl From<i32> for SqlValue {
    fn from(v: i32) -> Self {
        SqlValue::Int(v)
    }
}

impl From<i16> for SqlValue {
    fn from(v: i16) -> Self {
        SqlValue::SmallInt(v)
    }
}

impl From<f64> for SqlValue {
    fn from(v: f64) -> Self {
        SqlValue::Double(v)
    }
}

impl From<f32> for SqlValue {
    fn from(v: f32) -> Self {
        SqlValue::Float(v)
    }
}

impl From<bool> for SqlValue {
    fn from(v: bool) -> Self {
        SqlValue::Bool(v)
    }
}

impl From<NaiveDateTime> for SqlValue {
    fn from(v: NaiveDateTime) -> Self {
        SqlValue::Timestamp(v)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => SqlValue::Null,
        }
    }
}

impl Serialize for SqlValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            SqlValue::Text(s) => serializer.serialize_str(s),
            SqlValue::BigInt(i) => serializer.serialize_i64(*i),
            SqlValue::Int(i) => serializer.serialize_i32(*i),
            SqlValue::SmallInt(i) => serializer.serialize_i16(*i),
            SqlValue::Double(f) => serializer.serialize_f64(*f),
            SqlValue::Float(f) => serializer.serialize_f32(*f),
            SqlValue::Bool(b) => serializer.serialize_bool(*b),
            SqlValue::Timestamp(t) => t.serialize(serializer),
            SqlValue::Null => serializer.serialize_none(),
        }
    }
}

/// 字段名到值的映射，保持插入顺序
///
/// 作为查询结果的行类型返回，也可由调用方构造后代替模型实例传入
/// insert/update/delete。传入前每个键都必须是绑定模型声明过的字段。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldMap {
    entries: IndexMap<String, SqlValue>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<SqlValue>) {
        self.entries.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&SqlValue> {
        self.entries.get(name)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|k| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SqlValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// 第一个条目，用于按位置取值的结果提取
    pub fn first(&self) -> Option<(&str, &SqlValue)> {
        self.entries.first().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<SqlValue>> FromIterator<(K, V)> for FieldMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

impl IntoIterator for FieldMap {
    type Item = (String, SqlValue);
    type IntoIter = indexmap::map::IntoIter<String, SqlValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Serialize for FieldMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}
