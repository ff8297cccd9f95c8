use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::core::CoreResult;

pub mod bookings;
pub mod counters;
pub mod expenses;
pub mod users;

/// Opens the pool, creating the database file on first run. In-memory
/// databases are pinned to one connection so every query sees the same
/// schema.
pub async fn connect(database_url: &str) -> CoreResult<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
    let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };
    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;
    Ok(pool)
}

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS bookings (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        address TEXT NOT NULL DEFAULT '',
        phone TEXT NOT NULL,
        alternative_phone TEXT,
        date TEXT NOT NULL,
        days INTEGER NOT NULL DEFAULT 1,
        event_type TEXT NOT NULL,
        religion TEXT,
        timings TEXT,
        services TEXT NOT NULL DEFAULT '{}',
        cost REAL NOT NULL DEFAULT 0,
        generator_hours REAL NOT NULL DEFAULT 0,
        unit_used REAL NOT NULL DEFAULT 0,
        other_charges REAL NOT NULL DEFAULT 0,
        discount REAL NOT NULL DEFAULT 0,
        gst_included INTEGER NOT NULL DEFAULT 0,
        advance REAL NOT NULL DEFAULT 0,
        base_cost REAL NOT NULL DEFAULT 0,
        gst_amount REAL NOT NULL DEFAULT 0,
        total_cost REAL NOT NULL DEFAULT 0,
        balance REAL NOT NULL DEFAULT 0,
        gst_bill_url TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_bookings_created_at ON bookings(created_at)",
    "CREATE INDEX IF NOT EXISTS idx_bookings_date ON bookings(date)",
    "CREATE TABLE IF NOT EXISTS expenses (
        id TEXT PRIMARY KEY,
        description TEXT NOT NULL,
        category TEXT NOT NULL DEFAULT 'Other',
        amount REAL NOT NULL DEFAULT 0,
        incurred_on TEXT NOT NULL,
        receipt_urls TEXT NOT NULL DEFAULT '[]',
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS users (
        id TEXT PRIMARY KEY,
        user_name TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        first_name TEXT,
        last_name TEXT,
        phone TEXT,
        email TEXT
    )",
    "CREATE TABLE IF NOT EXISTS drive_credentials (
        id INTEGER PRIMARY KEY CHECK (id = 1),
        refresh_token TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS counters (
        name TEXT PRIMARY KEY,
        value INTEGER NOT NULL DEFAULT 0
    )",
];

pub async fn init_schema(pool: &SqlitePool) -> CoreResult<()> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}

#[cfg(test)]
pub async fn test_pool() -> SqlitePool {
    let pool = connect("sqlite::memory:").await.unwrap();
    init_schema(&pool).await.unwrap();
    pool
}
