//! Shared helpers for service tests: an in-memory SQLite pool with the
//! embedded migrations applied, plus minimal row factories.

use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

pub async fn memory_pool() -> SqlitePool {
    // A single connection keeps every query on the same in-memory database.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("failed to open in-memory database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("failed to run migrations");

    pool
}

pub async fn insert_user(pool: &SqlitePool, username: &str) -> i64 {
    insert_user_with_role(pool, username, "member").await
}

pub async fn insert_user_with_role(pool: &SqlitePool, username: &str, role: &str) -> i64 {
    sqlx::query("INSERT INTO users (username, email, password_hash, role) VALUES (?, ?, ?, ?)")
        .bind(username)
        .bind(format!("{username}@test.com"))
        .bind("not-a-real-hash")
        .bind(role)
        .execute(pool)
        .await
        .expect("failed to insert user")
        .last_insert_rowid()
}

pub async fn insert_reward(pool: &SqlitePool, name: &str, cost_points: i64) -> i64 {
    sqlx::query("INSERT INTO rewards (name, cost_points, description) VALUES (?, ?, '')")
        .bind(name)
        .bind(cost_points)
        .execute(pool)
        .await
        .expect("failed to insert reward")
        .last_insert_rowid()
}
