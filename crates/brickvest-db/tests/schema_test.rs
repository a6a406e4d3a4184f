//! Migration runner tests using in-memory SurrealDB.

use brickvest_db::run_migrations;
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;

#[tokio::test]
async fn migrations_apply_cleanly() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    run_migrations(&db).await.unwrap();
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    run_migrations(&db).await.unwrap();
    // A second run must find nothing to do and succeed.
    run_migrations(&db).await.unwrap();
}

#[tokio::test]
async fn schema_rejects_invalid_role() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    run_migrations(&db).await.unwrap();

    let result = db
        .query(
            "CREATE user SET username = 'x', password_hash = 'h', \
             wallet_balance = 0, role = 'superuser', is_verified = false",
        )
        .await
        .unwrap()
        .check();
    assert!(result.is_err());
}
