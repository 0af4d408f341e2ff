//! User accounts.

use crate::constants::role_type_id;
use crate::models::UserRecord;
use crate::CoreResult;
use sqlx::SqliteExecutor;
use techmed_types::Role;

const SELECT_USER: &str = "SELECT u.id, u.email, u.hashed_password, u.mfa_type, u.type_id,
        t.name AS type_name, u.link_id
    FROM \"user\" u
    JOIN user_type t ON t.id = u.type_id";

pub async fn find_by_email<'e, E>(executor: E, email: &str) -> CoreResult<Option<UserRecord>>
where
    E: SqliteExecutor<'e>,
{
    let sql = format!("{SELECT_USER} WHERE u.email = ?");
    Ok(sqlx::query_as::<_, UserRecord>(&sql)
        .bind(email)
        .fetch_optional(executor)
        .await?)
}

pub async fn find_by_id<'e, E>(executor: E, id: i64) -> CoreResult<Option<UserRecord>>
where
    E: SqliteExecutor<'e>,
{
    let sql = format!("{SELECT_USER} WHERE u.id = ?");
    Ok(sqlx::query_as::<_, UserRecord>(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await?)
}

pub async fn list<'e, E>(executor: E) -> CoreResult<Vec<UserRecord>>
where
    E: SqliteExecutor<'e>,
{
    let sql = format!("{SELECT_USER} ORDER BY u.id");
    Ok(sqlx::query_as::<_, UserRecord>(&sql)
        .fetch_all(executor)
        .await?)
}

pub async fn email_exists<'e, E>(executor: E, email: &str) -> CoreResult<bool>
where
    E: SqliteExecutor<'e>,
{
    let found: Option<i64> = sqlx::query_scalar("SELECT id FROM \"user\" WHERE email = ?")
        .bind(email)
        .fetch_optional(executor)
        .await?;
    Ok(found.is_some())
}

/// Insert an account and return its id.
///
/// A duplicate email surfaces as a database error; check
/// [`CoreError::is_unique_violation`](crate::CoreError::is_unique_violation).
pub async fn insert<'e, E>(
    executor: E,
    email: &str,
    hashed_password: &str,
    role: Role,
    link_id: Option<i64>,
) -> CoreResult<i64>
where
    E: SqliteExecutor<'e>,
{
    let result = sqlx::query(
        "INSERT INTO \"user\" (email, hashed_password, type_id, link_id) VALUES (?, ?, ?, ?)",
    )
    .bind(email)
    .bind(hashed_password)
    .bind(role_type_id(role))
    .bind(link_id)
    .execute(executor)
    .await?;
    Ok(result.last_insert_rowid())
}

/// Replace a user's password digest. Returns false when no such user exists.
pub async fn update_password<'e, E>(executor: E, id: i64, hashed_password: &str) -> CoreResult<bool>
where
    E: SqliteExecutor<'e>,
{
    let result = sqlx::query("UPDATE \"user\" SET hashed_password = ? WHERE id = ?")
        .bind(hashed_password)
        .bind(id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected() == 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;

    async fn db() -> Database {
        let db = Database::in_memory().await.expect("open");
        db.migrate().await.expect("migrate");
        db
    }

    #[tokio::test]
    async fn insert_and_find() {
        let db = db().await;
        let id = insert(db.pool(), "jan@example.com", "digest", Role::Admin, None)
            .await
            .expect("insert");

        let user = find_by_email(db.pool(), "jan@example.com")
            .await
            .expect("query")
            .expect("user exists");
        assert_eq!(user.id, id);
        assert_eq!(user.type_name, "Admin");
        assert_eq!(user.link_id, None);
        assert!(find_by_id(db.pool(), id + 1).await.expect("query").is_none());
        assert!(email_exists(db.pool(), "jan@example.com").await.expect("query"));
        assert!(!email_exists(db.pool(), "JAN@example.com").await.expect("query"));
    }

    #[tokio::test]
    async fn duplicate_email_is_unique_violation() {
        let db = db().await;
        insert(db.pool(), "dup@example.com", "a", Role::Unassigned, None)
            .await
            .expect("first insert");
        let err = insert(db.pool(), "dup@example.com", "b", Role::Unassigned, None)
            .await
            .expect_err("second insert should fail");
        assert!(err.is_unique_violation());
    }

    #[tokio::test]
    async fn update_password_reports_missing_user() {
        let db = db().await;
        let id = insert(db.pool(), "pw@example.com", "old", Role::Unassigned, None)
            .await
            .expect("insert");
        assert!(update_password(db.pool(), id, "new").await.expect("update"));
        assert!(!update_password(db.pool(), id + 10, "new").await.expect("update"));

        let users = list(db.pool()).await.expect("list");
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].hashed_password, "new");
    }
}
