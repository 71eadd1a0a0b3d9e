//! 端到端测试：derive 出的模型经由 SQLite 内存库走完整个 CRUD 流程
#![cfg(feature = "sqlite")]

use std::sync::Arc;

use sqldao::{Connection, DbPool, FieldMap, RecordMapper, SqlValue, Statement};

#[derive(Debug, Default, sqldao::Model)]
struct Product {
    id: Option<i64>,
    name: Option<String>,
    price: Option<f64>,
    active: Option<bool>,
    // 不入库的运行期状态
    #[dao(skip)]
    dirty: bool,
}

/// 内存库钉在单个连接上，池里的其他连接各是一个空库
async fn product_pool() -> DbPool {
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    let pool = DbPool::from_sqlite_pool(Arc::new(pool));
    pool.execute(&Statement::new(
        "CREATE TABLE products (\
         id INTEGER PRIMARY KEY AUTOINCREMENT, \
         name TEXT, price REAL, active BOOLEAN)",
    ))
    .await
    .unwrap();
    pool
}

#[tokio::test]
async fn test_insert_backfills_id() {
    let pool = product_pool().await;
    let mapper = RecordMapper::<Product>::new(&pool).unwrap();

    let mut product = Product {
        name: Some("CD George Michael".into()),
        price: Some(21.0),
        active: Some(true),
        ..Default::default()
    };
    mapper.insert(&mut product).await.unwrap();

    assert_eq!(product.id, Some(1));
    assert_eq!(mapper.last_insert_id().await.unwrap(), Some(1));
}

#[tokio::test]
async fn test_insert_then_fill_round_trip() {
    let pool = product_pool().await;
    let mapper = RecordMapper::<Product>::new(&pool).unwrap();

    let mut product = Product {
        name: Some("Personal Computer".into()),
        price: Some(500.0),
        active: Some(true),
        ..Default::default()
    };
    mapper.insert(&mut product).await.unwrap();

    let mut reread = Product {
        id: product.id,
        ..Default::default()
    };
    mapper.fill(&mut reread).await.unwrap();

    assert_eq!(reread.name, product.name);
    assert_eq!(reread.price, product.price);
    assert_eq!(reread.active, product.active);
}

#[tokio::test]
async fn test_fill_map_copies_every_column() {
    let pool = product_pool().await;
    let mapper = RecordMapper::<Product>::new(&pool).unwrap();

    let mut product = Product {
        name: Some("Ipod".into()),
        price: Some(150.0),
        ..Default::default()
    };
    mapper.insert(&mut product).await.unwrap();

    let mut fields: FieldMap = [("id", SqlValue::BigInt(product.id.unwrap()))]
        .into_iter()
        .collect();
    mapper.fill_map(&mut fields).await.unwrap();

    assert_eq!(fields.get("name"), Some(&SqlValue::Text("Ipod".into())));
    assert_eq!(fields.get("price"), Some(&SqlValue::Double(150.0)));
}

#[tokio::test]
async fn test_update_map_stores_false_as_zero() {
    let pool = product_pool().await;
    let mapper = RecordMapper::<Product>::new(&pool).unwrap();

    let mut product = Product {
        name: Some("Personal Computer".into()),
        active: Some(true),
        ..Default::default()
    };
    mapper.insert(&mut product).await.unwrap();

    let set: FieldMap = [("active", SqlValue::Bool(false))].into_iter().collect();
    let cond: FieldMap = [("name", SqlValue::Text("Personal Computer".into()))]
        .into_iter()
        .collect();
    mapper.update_map(&set, &cond).await.unwrap();

    let mut reread = Product {
        id: product.id,
        ..Default::default()
    };
    mapper.fill(&mut reread).await.unwrap();
    assert_eq!(reread.active, Some(false));
}

#[tokio::test]
async fn test_update_by_object_only_touches_present_fields() {
    let pool = product_pool().await;
    let mapper = RecordMapper::<Product>::new(&pool).unwrap();

    let mut product = Product {
        name: Some("CD".into()),
        price: Some(21.0),
        active: Some(true),
        ..Default::default()
    };
    mapper.insert(&mut product).await.unwrap();

    let patch = Product {
        id: product.id,
        price: Some(18.5),
        ..Default::default()
    };
    mapper.update(&patch).await.unwrap();

    let mut reread = Product {
        id: product.id,
        ..Default::default()
    };
    mapper.fill(&mut reread).await.unwrap();
    assert_eq!(reread.price, Some(18.5));
    assert_eq!(reread.name, Some("CD".into()));
}

#[tokio::test]
async fn test_delete_by_object() {
    let pool = product_pool().await;
    let mapper = RecordMapper::<Product>::new(&pool).unwrap();

    let mut keep = Product {
        name: Some("keep".into()),
        ..Default::default()
    };
    let mut gone = Product {
        name: Some("gone".into()),
        ..Default::default()
    };
    mapper.insert(&mut keep).await.unwrap();
    mapper.insert(&mut gone).await.unwrap();

    mapper.delete(&gone).await.unwrap();

    let rows = mapper.select(&["name"], "").await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("name"), Some(&SqlValue::Text("keep".into())));
}

#[tokio::test]
async fn test_select_with_verbatim_where() {
    let pool = product_pool().await;
    let mapper = RecordMapper::<Product>::new(&pool).unwrap();

    for (name, price) in [("cheap", 5.0), ("mid", 50.0), ("dear", 500.0)] {
        let mut product = Product {
            name: Some(name.into()),
            price: Some(price),
            ..Default::default()
        };
        mapper.insert(&mut product).await.unwrap();
    }

    let rows = mapper
        .select(&["name", "price"], "price > 10 AND price < 100")
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("name"), Some(&SqlValue::Text("mid".into())));
}

#[tokio::test]
async fn test_skipped_field_never_reaches_sql() {
    let pool = product_pool().await;
    let mapper = RecordMapper::<Product>::new(&pool).unwrap();

    // dirty 被 #[dao(skip)] 排除，映射里出现它就是字段不匹配
    let invalid: FieldMap = [("dirty", SqlValue::Bool(true))].into_iter().collect();
    assert!(!mapper.check_field_map(&invalid));

    let mut product = Product {
        name: Some("CD".into()),
        dirty: true,
        ..Default::default()
    };
    mapper.insert(&mut product).await.unwrap();
    assert_eq!(product.id, Some(1));
}
