use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use super::common::coerce_amount;
use crate::core::{CoreError, CoreResult};

/// An operating expense, with receipt scans stored as share links.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: String,
    pub description: String,
    pub category: String,
    pub amount: f64,
    /// Date the expense was incurred, as entered (yyyy-mm-dd expected).
    pub incurred_on: String,
    pub receipt_urls: Json<Vec<String>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Text fields of the multipart expense form, before receipts are handled.
#[derive(Debug, Clone, Default)]
pub struct ExpenseInput {
    pub description: String,
    pub category: String,
    pub amount: String,
    pub incurred_on: String,
}

impl ExpenseInput {
    /// Maps a multipart form field onto the input. The form sends the
    /// category under `type` and the expense date under `date`.
    pub fn set_field(&mut self, name: &str, value: String) {
        match name {
            "description" => self.description = value,
            "type" | "category" => self.category = value,
            "amount" => self.amount = value,
            "date" | "incurredOn" => self.incurred_on = value,
            _ => {}
        }
    }
}

impl Expense {
    pub fn create(input: ExpenseInput, receipt_urls: Vec<String>) -> CoreResult<Expense> {
        let mut missing = Vec::new();
        if input.description.trim().is_empty() {
            missing.push("description");
        }
        if input.category.trim().is_empty() {
            missing.push("type");
        }
        if input.amount.trim().is_empty() {
            missing.push("amount");
        }
        if input.incurred_on.trim().is_empty() {
            missing.push("date");
        }
        if !missing.is_empty() {
            return Err(CoreError::Validation(format!(
                "missing required fields: {}",
                missing.join(", ")
            )));
        }

        let now = Utc::now();
        Ok(Expense {
            id: Uuid::new_v4().to_string(),
            description: input.description.trim().to_string(),
            category: input.category.trim().to_string(),
            amount: coerce_amount(&input.amount),
            incurred_on: input.incurred_on.trim().to_string(),
            receipt_urls: Json(receipt_urls),
            created_at: now,
            updated_at: now,
        })
    }
}
