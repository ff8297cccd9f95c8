use sqlx::SqlitePool;

use crate::core::CoreResult;
use crate::models::Expense;

pub async fn insert(pool: &SqlitePool, expense: &Expense) -> CoreResult<()> {
    sqlx::query(
        "INSERT INTO expenses (
            id, description, category, amount, incurred_on, receipt_urls,
            created_at, updated_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&expense.id)
    .bind(&expense.description)
    .bind(&expense.category)
    .bind(expense.amount)
    .bind(&expense.incurred_on)
    .bind(&expense.receipt_urls)
    .bind(expense.created_at)
    .bind(expense.updated_at)
    .execute(pool)
    .await?;
    Ok(())
}

/// Lists every expense, most recent expense date first.
pub async fn list_all(pool: &SqlitePool) -> CoreResult<Vec<Expense>> {
    let expenses = sqlx::query_as::<_, Expense>(
        "SELECT * FROM expenses ORDER BY incurred_on DESC, created_at DESC",
    )
    .fetch_all(pool)
    .await?;
    Ok(expenses)
}

pub async fn delete(pool: &SqlitePool, id: &str) -> CoreResult<bool> {
    let result = sqlx::query("DELETE FROM expenses WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExpenseInput;
    use crate::store::test_pool;

    fn sample_expense(description: &str) -> Expense {
        let input = ExpenseInput {
            description: description.to_string(),
            category: "Maintenance".to_string(),
            amount: "1250.50".to_string(),
            incurred_on: "2026-08-01".to_string(),
        };
        Expense::create(input, vec!["https://example.com/r1?raw=1".into()]).unwrap()
    }

    #[tokio::test]
    async fn insert_then_list_preserves_receipts() {
        let pool = test_pool().await;
        insert(&pool, &sample_expense("Generator diesel")).await.unwrap();

        let all = list_all(&pool).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].description, "Generator diesel");
        assert_eq!(all[0].amount, 1250.50);
        assert_eq!(all[0].receipt_urls.0, vec!["https://example.com/r1?raw=1"]);
    }

    #[tokio::test]
    async fn list_orders_by_expense_date_descending() {
        let pool = test_pool().await;
        let mut earlier = sample_expense("July entry");
        earlier.incurred_on = "2026-07-15".to_string();
        insert(&pool, &earlier).await.unwrap();
        insert(&pool, &sample_expense("August entry")).await.unwrap();

        let all = list_all(&pool).await.unwrap();
        assert_eq!(all[0].description, "August entry");
        assert_eq!(all[1].description, "July entry");
    }

    #[tokio::test]
    async fn delete_reports_whether_a_row_went_away() {
        let pool = test_pool().await;
        let expense = sample_expense("Flower decoration");
        insert(&pool, &expense).await.unwrap();

        assert!(delete(&pool, &expense.id).await.unwrap());
        assert!(!delete(&pool, &expense.id).await.unwrap());
    }
}
