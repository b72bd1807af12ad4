//! Postgres storage for analyses. Every query is owner-scoped except the
//! admin-side `list_all_searches` / `update_category`.

use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::models::search::{NewSearch, SearchRow};
use crate::models::user::User;

pub async fn insert_search(pool: &PgPool, new: NewSearch<'_>) -> Result<SearchRow, sqlx::Error> {
    sqlx::query_as::<_, SearchRow>(
        r#"
        INSERT INTO searches (id, user_id, problem_text, provider, category, result)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, user_id, problem_text, provider, category, result, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(new.user_id)
    .bind(new.problem_text)
    .bind(new.provider)
    .bind(new.category)
    .bind(new.result)
    .fetch_one(pool)
    .await
}

pub async fn get_search(
    pool: &PgPool,
    user_id: Uuid,
    id: Uuid,
) -> Result<Option<SearchRow>, sqlx::Error> {
    sqlx::query_as::<_, SearchRow>(
        "SELECT id, user_id, problem_text, provider, category, result, created_at \
         FROM searches WHERE id = $1 AND user_id = $2",
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

/// Newest first.
pub async fn list_searches(pool: &PgPool, user_id: Uuid) -> Result<Vec<SearchRow>, sqlx::Error> {
    sqlx::query_as::<_, SearchRow>(
        "SELECT id, user_id, problem_text, provider, category, result, created_at \
         FROM searches WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

/// Returns whether a row was deleted.
pub async fn delete_search(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM searches WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn list_all_searches(pool: &PgPool) -> Result<Vec<SearchRow>, sqlx::Error> {
    sqlx::query_as::<_, SearchRow>(
        "SELECT id, user_id, problem_text, provider, category, result, created_at \
         FROM searches ORDER BY created_at DESC",
    )
    .fetch_all(pool)
    .await
}

/// Generic over the executor so reclassification can run it inside a transaction.
pub async fn update_category<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
    category: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE searches SET category = $1 WHERE id = $2")
        .bind(category)
        .bind(id)
        .execute(executor)
        .await?;
    Ok(())
}

pub async fn find_user(pool: &PgPool, id: Uuid) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "SELECT id, username, email, is_staff, created_at FROM users WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// `(id, username)` for every user, for labelling rows in admin output.
pub async fn list_usernames(pool: &PgPool) -> Result<Vec<(Uuid, String)>, sqlx::Error> {
    sqlx::query_as("SELECT id, username FROM users")
        .fetch_all(pool)
        .await
}

/// Unknown users are not staff.
pub async fn is_staff(pool: &PgPool, user_id: Uuid) -> Result<bool, sqlx::Error> {
    Ok(find_user(pool, user_id)
        .await?
        .map(|user| user.is_staff)
        .unwrap_or(false))
}

pub async fn count_users(pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await
}
