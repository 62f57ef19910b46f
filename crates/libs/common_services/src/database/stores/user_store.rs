use crate::database::DbError;
use crate::database::app_user::{User, UserRole, UserWithPassword};
use sqlx::postgres::PgQueryResult;
use sqlx::{Executor, Postgres};

pub struct UserStore;

impl UserStore {
    //================================================================================
    // Core User Management (CRUD)
    //================================================================================

    /// Creates a new user.
    pub async fn create(
        executor: impl Executor<'_, Database = Postgres>,
        email: &str,
        name: &str,
        hashed_password: &str,
        role: UserRole,
    ) -> Result<User, DbError> {
        Ok(sqlx::query_as::<_, User>(
            r"
            INSERT INTO app_user (email, name, password, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id, created_at, updated_at, email, name, role
            ",
        )
        .bind(email)
        .bind(name)
        .bind(hashed_password)
        .bind(role)
        .fetch_one(executor)
        .await?)
    }

    /// Updates a user's details.
    ///
    /// Pass `None` for fields that should remain unchanged.
    pub async fn update(
        executor: impl Executor<'_, Database = Postgres>,
        user_id: i32,
        name: Option<String>,
        role: Option<UserRole>,
    ) -> Result<Option<User>, DbError> {
        Ok(sqlx::query_as::<_, User>(
            r"
            UPDATE app_user
            SET
                name = COALESCE($1, name),
                role = COALESCE($2, role),
                updated_at = now()
            WHERE id = $3
            RETURNING id, created_at, updated_at, email, name, role
            ",
        )
        .bind(name)
        .bind(role)
        .bind(user_id)
        .fetch_optional(executor)
        .await?)
    }

    /// Deletes a user by ID.
    pub async fn delete(
        executor: impl Executor<'_, Database = Postgres>,
        user_id: i32,
    ) -> Result<PgQueryResult, DbError> {
        Ok(sqlx::query("DELETE FROM app_user WHERE id = $1")
            .bind(user_id)
            .execute(executor)
            .await?)
    }

    //================================================================================
    // Find / Get Methods
    //================================================================================

    pub async fn find_by_id(
        executor: impl Executor<'_, Database = Postgres>,
        user_id: i32,
    ) -> Result<Option<User>, DbError> {
        Ok(sqlx::query_as::<_, User>(
            r"
            SELECT id, created_at, updated_at, email, name, role
            FROM app_user
            WHERE id = $1
            ",
        )
        .bind(user_id)
        .fetch_optional(executor)
        .await?)
    }

    pub async fn find_by_email_with_password(
        executor: impl Executor<'_, Database = Postgres>,
        email: &str,
    ) -> Result<Option<UserWithPassword>, DbError> {
        Ok(sqlx::query_as::<_, UserWithPassword>(
            r"
            SELECT id, created_at, updated_at, email, name, role, password
            FROM app_user
            WHERE email = $1
            ",
        )
        .bind(email)
        .fetch_optional(executor)
        .await?)
    }

    /// Loads the given users, in no particular order.
    pub async fn list_by_ids(
        executor: impl Executor<'_, Database = Postgres>,
        user_ids: &[i32],
    ) -> Result<Vec<User>, DbError> {
        Ok(sqlx::query_as::<_, User>(
            r"
            SELECT id, created_at, updated_at, email, name, role
            FROM app_user
            WHERE id = ANY($1)
            ",
        )
        .bind(user_ids)
        .fetch_all(executor)
        .await?)
    }

    pub async fn list_users(
        executor: impl Executor<'_, Database = Postgres>,
    ) -> Result<Vec<User>, DbError> {
        Ok(sqlx::query_as::<_, User>(
            r"
            SELECT id, created_at, updated_at, email, name, role
            FROM app_user
            ORDER BY id
            ",
        )
        .fetch_all(executor)
        .await?)
    }
}
