use sqlx::SqlitePool;

use crate::core::CoreResult;
use crate::models::User;

pub async fn find_by_user_name(pool: &SqlitePool, user_name: &str) -> CoreResult<Option<User>> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE user_name = ?")
        .bind(user_name)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

pub async fn insert(pool: &SqlitePool, user: &User) -> CoreResult<()> {
    sqlx::query(
        "INSERT INTO users (id, user_name, password_hash, first_name, last_name, phone, email)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&user.id)
    .bind(&user.user_name)
    .bind(&user.password_hash)
    .bind(&user.first_name)
    .bind(&user.last_name)
    .bind(&user.phone)
    .bind(&user.email)
    .execute(pool)
    .await?;
    Ok(())
}

/// Creates the bootstrap account on an empty database so the service is
/// usable right after first start. Existing users are left untouched.
pub async fn ensure_seed_user(
    pool: &SqlitePool,
    user_name: &str,
    password_hash: &str,
) -> CoreResult<()> {
    if find_by_user_name(pool, user_name).await?.is_some() {
        return Ok(());
    }
    let user = User {
        id: uuid::Uuid::new_v4().to_string(),
        user_name: user_name.to_string(),
        password_hash: password_hash.to_string(),
        first_name: Some("Admin".to_string()),
        last_name: None,
        phone: None,
        email: None,
    };
    insert(pool, &user).await
}
