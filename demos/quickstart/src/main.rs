use sqldao::{Connection, DbPool, FieldMap, RecordMapper, SqlValue, Statement};

/// Product 模型，表名由类型名推导为 `products`
#[derive(Debug, Default, serde::Serialize, sqldao::Model)]
struct Product {
    id: Option<i64>,
    name: Option<String>,
    price: Option<f64>,
    active: Option<bool>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let database_url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite:quickstart.db?mode=rwc".to_string());

    println!("Connecting to {}...", database_url);
    let pool = DbPool::connect(&database_url).await?;
    println!("Connected successfully!\n");

    pool.execute(&Statement::new(
        "CREATE TABLE IF NOT EXISTS products (\
         id INTEGER PRIMARY KEY AUTOINCREMENT, \
         name TEXT, price REAL, active BOOLEAN)",
    ))
    .await?;

    let mapper = RecordMapper::<Product>::new(&pool)?;
    println!("绑定模型 Product，推导表名: {}\n", mapper.table_name());

    // ========== 1. INSERT (插入对象，回填主键) ==========
    println!("=== 1. INSERT (插入对象，回填主键) ===");
    let mut product = Product {
        name: Some("CD George Michael".to_string()),
        price: Some(21.0),
        active: Some(true),
        ..Default::default()
    };
    mapper.insert(&mut product).await?;
    println!("插入成功，回填 ID: {:?}\n", product.id);

    // ========== 2. INSERT (插入字段映射) ==========
    println!("=== 2. INSERT (插入字段映射) ===");
    let mut fields: FieldMap = [
        ("name", SqlValue::Text("Personal Computer".into())),
        ("price", SqlValue::Double(500.0)),
    ]
    .into_iter()
    .collect();
    mapper.insert_map(&mut fields).await?;
    println!("插入成功，fields[\"id\"] = {:?}\n", fields.get("id"));

    // ========== 3. SELECT (查询) ==========
    println!("=== 3. SELECT (查询) ===");
    let rows = mapper.select(&["name", "price"], "price > 10").await?;
    for row in &rows {
        println!("{}", serde_json::to_string(row)?);
    }
    println!();

    // ========== 4. UPDATE (按对象更新) ==========
    println!("=== 4. UPDATE (按对象更新) ===");
    product.price = Some(18.5);
    mapper.update(&product).await?;
    println!("更新成功\n");

    // ========== 5. UPDATE (按字段映射更新) ==========
    println!("=== 5. UPDATE (按字段映射更新) ===");
    let set: FieldMap = [("active", SqlValue::Bool(false))].into_iter().collect();
    let cond: FieldMap = [("name", SqlValue::Text("Personal Computer".into()))]
        .into_iter()
        .collect();
    mapper.update_map(&set, &cond).await?;
    println!("更新成功\n");

    // ========== 6. FILL (按主键重读整行) ==========
    println!("=== 6. FILL (按主键重读整行) ===");
    let mut reread = Product {
        id: product.id,
        ..Default::default()
    };
    mapper.fill(&mut reread).await?;
    println!("重读结果: {}\n", serde_json::to_string(&reread)?);

    // ========== 7. LAST_INSERT_ID ==========
    println!("=== 7. LAST_INSERT_ID ===");
    println!("最后插入 ID: {:?}\n", mapper.last_insert_id().await?);

    // ========== 8. DELETE (按对象删除) ==========
    println!("=== 8. DELETE (按对象删除) ===");
    mapper.delete(&product).await?;
    let remaining = mapper.select(&[], "").await?;
    println!("删除成功，剩余 {} 条记录", remaining.len());

    Ok(())
}
