//! User repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgExecutor, PgPool, Postgres, QueryBuilder, Transaction};
use uuid::Uuid;

use roster_core::error::{AppError, ErrorKind};
use roster_core::result::AppResult;
use roster_entity::user::{NewUser, User, UserChanges, UserQuery, UserRole, normalize_email};

use crate::connection::ping;
use crate::store::{UserStore, user_not_found};

/// PostgreSQL-backed [`UserStore`].
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn begin(&self) -> AppResult<Transaction<'static, Postgres>> {
        self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to start transaction", e)
        })
    }
}

async fn commit(tx: Transaction<'_, Postgres>) -> AppResult<()> {
    tx.commit()
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to commit transaction", e))
}

/// Row-locks every active admin until the transaction ends. A concurrent
/// guarded write blocks here and then sees the committed result.
async fn lock_active_admins(tx: &mut Transaction<'_, Postgres>) -> AppResult<Vec<Uuid>> {
    sqlx::query_scalar("SELECT id FROM users WHERE role = $1 AND deleted_at IS NULL FOR UPDATE")
        .bind(UserRole::Admin)
        .fetch_all(&mut **tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to lock admins", e))
}

fn is_sole_admin(active_admins: &[Uuid], id: Uuid) -> bool {
    active_admins.len() <= 1 && active_admins.contains(&id)
}

async fn apply_changes<'e, E>(executor: E, id: Uuid, changes: &UserChanges) -> AppResult<User>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, User>(
        "UPDATE users SET email = COALESCE($2, email), \
                          first_name = COALESCE($3, first_name), \
                          last_name = COALESCE($4, last_name), \
                          img_url = COALESCE($5, img_url), \
                          role = COALESCE($6, role), \
                          updated_at = NOW() \
         WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(changes.email.as_deref().map(normalize_email))
    .bind(&changes.first_name)
    .bind(&changes.last_name)
    .bind(&changes.img_url)
    .bind(changes.role)
    .fetch_optional(executor)
    .await
    .map_err(|e| map_write_error(e, "Failed to update user"))?
    .ok_or_else(|| user_not_found(id))
}

async fn write_deleted_at<'e, E>(
    executor: E,
    id: Uuid,
    at: Option<DateTime<Utc>>,
) -> AppResult<User>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, User>(
        "UPDATE users SET deleted_at = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(at)
    .fetch_optional(executor)
    .await
    .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to archive user", e))?
    .ok_or_else(|| user_not_found(id))
}

fn map_write_error(e: sqlx::Error, context: &'static str) -> AppError {
    match e {
        sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
            AppError::conflict("Email is already in use")
        }
        _ => AppError::with_source(ErrorKind::Database, context, e),
    }
}

/// Append the WHERE clause shared by the count and page queries.
fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, query: &UserQuery) {
    builder.push(" WHERE 1 = 1");

    if !query.include_archived {
        builder.push(" AND deleted_at IS NULL");
    }

    if let Some(email) = query.email.as_deref() {
        builder
            .push(" AND email = ")
            .push_bind(normalize_email(email));
    }

    if let Some(term) = query.search_term() {
        let pattern = format!("%{term}%");
        builder
            .push(" AND (email ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR first_name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR last_name ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find user by id", e))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(normalize_email(email))
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find user by email", e)
            })
    }

    async fn list(&self, query: &UserQuery) -> AppResult<(Vec<User>, u64)> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM users");
        push_filters(&mut count, query);
        let total: i64 = count
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count users", e))?;

        let mut select = QueryBuilder::<Postgres>::new("SELECT * FROM users");
        push_filters(&mut select, query);
        // Column and direction come from closed enums, never from user input.
        select
            .push(" ORDER BY ")
            .push(query.sort_by.column())
            .push(" ")
            .push(query.sort_order.as_sql())
            .push(", id ASC LIMIT ")
            .push_bind(query.page.limit as i64)
            .push(" OFFSET ")
            .push_bind(query.page.offset() as i64);

        let users = select
            .build_query_as::<User>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list users", e))?;

        Ok((users, total.max(0) as u64))
    }

    async fn create(&self, data: &NewUser) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (id, email, password_hash, role, first_name, last_name) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(normalize_email(&data.email))
        .bind(&data.password_hash)
        .bind(data.role)
        .bind(&data.first_name)
        .bind(&data.last_name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Failed to create user"))
    }

    async fn update(&self, id: Uuid, changes: &UserChanges) -> AppResult<User> {
        apply_changes(&self.pool, id, changes).await
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(password_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update password", e))?
        .ok_or_else(|| user_not_found(id))
    }

    async fn touch_last_login(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("UPDATE users SET last_login_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to update last login", e)
            })?;

        if result.rows_affected() == 0 {
            return Err(user_not_found(id));
        }
        Ok(())
    }

    async fn set_deleted_at(&self, id: Uuid, at: Option<DateTime<Utc>>) -> AppResult<User> {
        write_deleted_at(&self.pool, id, at).await
    }

    async fn archive_unless_last_admin(
        &self,
        id: Uuid,
        at: DateTime<Utc>,
    ) -> AppResult<Option<User>> {
        let mut tx = self.begin().await?;
        if is_sole_admin(&lock_active_admins(&mut tx).await?, id) {
            return Ok(None);
        }
        let user = write_deleted_at(&mut *tx, id, Some(at)).await?;
        commit(tx).await?;
        Ok(Some(user))
    }

    async fn update_unless_last_admin(
        &self,
        id: Uuid,
        changes: &UserChanges,
    ) -> AppResult<Option<User>> {
        let mut tx = self.begin().await?;
        let admins = lock_active_admins(&mut tx).await?;
        if changes.role == Some(UserRole::User) && is_sole_admin(&admins, id) {
            return Ok(None);
        }
        let user = apply_changes(&mut *tx, id, changes).await?;
        commit(tx).await?;
        Ok(Some(user))
    }

    async fn count_active_admins(&self) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM users WHERE role = $1 AND deleted_at IS NULL",
        )
        .bind(UserRole::Admin)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count admins", e))?;
        Ok(count.max(0) as u64)
    }

    async fn delete_all(&self) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM users")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete users", e))?;
        Ok(result.rows_affected())
    }

    async fn health_check(&self) -> AppResult<()> {
        ping(&self.pool).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sole_admin_detection() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        assert!(is_sole_admin(&[a], a));
        assert!(!is_sole_admin(&[a, b], a));
        assert!(!is_sole_admin(&[a], b));
        assert!(!is_sole_admin(&[], a));
    }
}
