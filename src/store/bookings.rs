use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::core::CoreResult;
use crate::models::Booking;

pub const MAX_PAGE_SIZE: i64 = 100;

/// Maps a requested sort key to a real column. Anything unknown falls
/// back to newest-first, which keeps user input out of the SQL text.
fn sort_column(requested: Option<&str>) -> &'static str {
    match requested {
        Some("createdAt") | Some("created_at") => "created_at",
        Some("date") => "date",
        Some("name") => "name",
        Some("eventType") | Some("event_type") => "event_type",
        Some("totalCost") | Some("total_cost") => "total_cost",
        Some("balance") => "balance",
        _ => "created_at",
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingQuery {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub sort_by: Option<String>,
    #[serde(default)]
    pub sort_order: Option<String>,
}

impl Default for BookingQuery {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
            search: None,
            sort_by: None,
            sort_order: None,
        }
    }
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    20
}

#[derive(Debug, Serialize)]
pub struct BookingPage {
    pub bookings: Vec<Booking>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

pub async fn insert(pool: &SqlitePool, booking: &Booking) -> CoreResult<()> {
    sqlx::query(
        "INSERT INTO bookings (
            id, name, address, phone, alternative_phone, date, days, event_type,
            religion, timings, services, cost, generator_hours, unit_used,
            other_charges, discount, gst_included, advance, base_cost, gst_amount,
            total_cost, balance, gst_bill_url, created_at, updated_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&booking.id)
    .bind(&booking.name)
    .bind(&booking.address)
    .bind(&booking.phone)
    .bind(&booking.alternative_phone)
    .bind(&booking.date)
    .bind(booking.days)
    .bind(&booking.event_type)
    .bind(&booking.religion)
    .bind(&booking.timings)
    .bind(&booking.services)
    .bind(booking.cost)
    .bind(booking.generator_hours)
    .bind(booking.unit_used)
    .bind(booking.other_charges)
    .bind(booking.discount)
    .bind(booking.gst_included)
    .bind(booking.advance)
    .bind(booking.base_cost)
    .bind(booking.gst_amount)
    .bind(booking.total_cost)
    .bind(booking.balance)
    .bind(&booking.gst_bill_url)
    .bind(booking.created_at)
    .bind(booking.updated_at)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn update(pool: &SqlitePool, booking: &Booking) -> CoreResult<bool> {
    let result = sqlx::query(
        "UPDATE bookings SET
            name = ?, address = ?, phone = ?, alternative_phone = ?, date = ?,
            days = ?, event_type = ?, religion = ?, timings = ?, services = ?,
            cost = ?, generator_hours = ?, unit_used = ?, other_charges = ?,
            discount = ?, gst_included = ?, advance = ?, base_cost = ?,
            gst_amount = ?, total_cost = ?, balance = ?, updated_at = ?
        WHERE id = ?",
    )
    .bind(&booking.name)
    .bind(&booking.address)
    .bind(&booking.phone)
    .bind(&booking.alternative_phone)
    .bind(&booking.date)
    .bind(booking.days)
    .bind(&booking.event_type)
    .bind(&booking.religion)
    .bind(&booking.timings)
    .bind(&booking.services)
    .bind(booking.cost)
    .bind(booking.generator_hours)
    .bind(booking.unit_used)
    .bind(booking.other_charges)
    .bind(booking.discount)
    .bind(booking.gst_included)
    .bind(booking.advance)
    .bind(booking.base_cost)
    .bind(booking.gst_amount)
    .bind(booking.total_cost)
    .bind(booking.balance)
    .bind(booking.updated_at)
    .bind(&booking.id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn find(pool: &SqlitePool, id: &str) -> CoreResult<Option<Booking>> {
    let booking = sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(booking)
}

pub async fn delete(pool: &SqlitePool, id: &str) -> CoreResult<bool> {
    let result = sqlx::query("DELETE FROM bookings WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Records the shareable invoice link after the PDF lands in storage.
pub async fn set_invoice_url(
    pool: &SqlitePool,
    id: &str,
    url: &str,
    updated_at: chrono::DateTime<chrono::Utc>,
) -> CoreResult<()> {
    sqlx::query("UPDATE bookings SET gst_bill_url = ?, updated_at = ? WHERE id = ?")
        .bind(url)
        .bind(updated_at)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Paginated listing with an optional free-text filter over the fields
/// the front desk actually searches by.
pub async fn search(pool: &SqlitePool, query: &BookingQuery) -> CoreResult<BookingPage> {
    let page = query.page.max(1);
    let limit = query.limit.clamp(1, MAX_PAGE_SIZE);
    let offset = (page - 1) * limit;

    let sort_column = sort_column(query.sort_by.as_deref());
    let sort_direction = match query.sort_order.as_deref() {
        Some("asc") | Some("ASC") => "ASC",
        _ => "DESC",
    };

    let pattern = query
        .search
        .as_deref()
        .map(str::trim)
        .filter(|term| !term.is_empty())
        .map(|term| format!("%{term}%"));

    let (filter, paging) = if pattern.is_some() {
        (
            "WHERE name LIKE ?1 OR phone LIKE ?1 OR event_type LIKE ?1 OR religion LIKE ?1",
            "LIMIT ?2 OFFSET ?3",
        )
    } else {
        ("", "LIMIT ? OFFSET ?")
    };

    let count_sql = format!("SELECT COUNT(*) FROM bookings {filter}");
    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
    if let Some(pattern) = &pattern {
        count_query = count_query.bind(pattern);
    }
    let total = count_query.fetch_one(pool).await?;

    let rows_sql = format!(
        "SELECT * FROM bookings {filter} ORDER BY {sort_column} {sort_direction} {paging}"
    );
    let mut rows_query = sqlx::query_as::<_, Booking>(&rows_sql);
    if let Some(pattern) = &pattern {
        rows_query = rows_query.bind(pattern);
    }
    let bookings = rows_query.bind(limit).bind(offset).fetch_all(pool).await?;

    Ok(BookingPage {
        bookings,
        total,
        page,
        limit,
    })
}
