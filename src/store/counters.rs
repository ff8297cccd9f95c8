use sqlx::SqlitePool;

use crate::core::CoreResult;

/// Counter backing the invoice number sequence.
pub const INVOICE_COUNTER: &str = "invoice_seq";

/// Increments the named counter and returns the new value. Runs inside a
/// transaction so two concurrent invoices never share a number.
pub async fn next_value(pool: &SqlitePool, name: &str) -> CoreResult<i64> {
    let mut tx = pool.begin().await?;
    sqlx::query("INSERT INTO counters (name, value) VALUES (?, 0) ON CONFLICT(name) DO NOTHING")
        .bind(name)
        .execute(&mut *tx)
        .await?;
    let value: i64 =
        sqlx::query_scalar("UPDATE counters SET value = value + 1 WHERE name = ? RETURNING value")
            .bind(name)
            .fetch_one(&mut *tx)
            .await?;
    tx.commit().await?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::test_pool;

    #[tokio::test]
    async fn counter_starts_at_one_and_increments() {
        let pool = test_pool().await;
        assert_eq!(next_value(&pool, INVOICE_COUNTER).await.unwrap(), 1);
        assert_eq!(next_value(&pool, INVOICE_COUNTER).await.unwrap(), 2);
        assert_eq!(next_value(&pool, INVOICE_COUNTER).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn counters_are_independent_per_name() {
        let pool = test_pool().await;
        assert_eq!(next_value(&pool, INVOICE_COUNTER).await.unwrap(), 1);
        assert_eq!(next_value(&pool, "receipt").await.unwrap(), 1);
        assert_eq!(next_value(&pool, INVOICE_COUNTER).await.unwrap(), 2);
    }
}
