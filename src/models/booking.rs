use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use std::collections::HashMap;
use uuid::Uuid;

use super::common::{de_amount, de_days, de_opt_amount, default_days};
use crate::billing::{compute_billing, BillingInputs};
use crate::core::{CoreError, CoreResult};

/// A stored venue booking, including the derived billing columns and the
/// invoice URL once one has been uploaded.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub alternative_phone: Option<String>,
    /// Event start date as entered on the form (yyyy-mm-dd expected, but
    /// never rejected; the invoice falls back to the raw text).
    pub date: String,
    pub days: i64,
    pub event_type: String,
    pub religion: Option<String>,
    pub timings: Option<String>,
    pub services: Json<HashMap<String, bool>>,
    pub cost: f64,
    pub generator_hours: f64,
    pub unit_used: f64,
    pub other_charges: f64,
    pub discount: f64,
    pub gst_included: bool,
    pub advance: f64,
    pub base_cost: f64,
    pub gst_amount: f64,
    pub total_cost: f64,
    pub balance: f64,
    pub gst_bill_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Booking form payload. Amount fields tolerate numeric strings and blanks;
/// `cost` and `advance` must at least be present.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub alternative_phone: Option<String>,
    #[serde(default)]
    pub date: String,
    #[serde(default = "default_days", deserialize_with = "de_days")]
    pub days: i64,
    #[serde(default)]
    pub event_type: String,
    #[serde(default)]
    pub religion: Option<String>,
    #[serde(default)]
    pub timings: Option<String>,
    #[serde(default)]
    pub services: HashMap<String, bool>,
    #[serde(default, deserialize_with = "de_opt_amount")]
    pub cost: Option<f64>,
    #[serde(default, deserialize_with = "de_amount")]
    pub generator_hours: f64,
    #[serde(default, deserialize_with = "de_amount")]
    pub unit_used: f64,
    #[serde(default, deserialize_with = "de_amount")]
    pub other_charges: f64,
    #[serde(default, deserialize_with = "de_amount")]
    pub discount: f64,
    #[serde(default)]
    pub gst_included: bool,
    #[serde(default, deserialize_with = "de_opt_amount")]
    pub advance: Option<f64>,
}

impl BookingInput {
    pub fn validate(&self) -> CoreResult<()> {
        let mut missing = Vec::new();
        if self.name.trim().is_empty() {
            missing.push("name");
        }
        if self.phone.trim().is_empty() {
            missing.push("phone");
        }
        if self.date.trim().is_empty() {
            missing.push("date");
        }
        if self.event_type.trim().is_empty() {
            missing.push("eventType");
        }
        if self.cost.is_none() {
            missing.push("cost");
        }
        if self.advance.is_none() {
            missing.push("advance");
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(CoreError::Validation(format!(
                "missing required fields: {}",
                missing.join(", ")
            )))
        }
    }

    pub fn billing_inputs(&self) -> BillingInputs {
        BillingInputs {
            cost: self.cost.unwrap_or(0.0),
            other_charges: self.other_charges,
            generator_hours: self.generator_hours,
            unit_used: self.unit_used,
            discount: self.discount,
            advance: self.advance.unwrap_or(0.0),
            gst_included: self.gst_included,
        }
    }
}

impl Booking {
    /// Validates the form, computes billing and mints a fresh record.
    pub fn create(input: BookingInput) -> CoreResult<Booking> {
        input.validate()?;
        let summary = compute_billing(&input.billing_inputs());
        let now = Utc::now();
        Ok(Booking {
            id: Uuid::new_v4().to_string(),
            name: input.name.trim().to_string(),
            address: input.address.trim().to_string(),
            phone: input.phone.trim().to_string(),
            alternative_phone: input.alternative_phone,
            date: input.date.trim().to_string(),
            days: input.days,
            event_type: input.event_type.trim().to_string(),
            religion: input.religion,
            timings: input.timings,
            services: Json(input.services),
            cost: input.cost.unwrap_or(0.0),
            generator_hours: input.generator_hours,
            unit_used: input.unit_used,
            other_charges: input.other_charges,
            discount: input.discount,
            gst_included: input.gst_included,
            advance: input.advance.unwrap_or(0.0),
            base_cost: summary.base_cost,
            gst_amount: summary.gst_amount,
            total_cost: summary.total_cost,
            balance: summary.balance,
            gst_bill_url: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Rebuilds this booking from an edited form. Identity and creation
    /// time survive; the billing summary is always recomputed.
    pub fn apply_update(self, input: BookingInput) -> CoreResult<Booking> {
        let mut updated = Booking::create(input)?;
        updated.id = self.id;
        updated.created_at = self.created_at;
        updated.gst_bill_url = self.gst_bill_url;
        Ok(updated)
    }
}
