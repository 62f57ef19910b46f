use crate::database::DbError;
use crate::database::preference::{Preference, TripPreferenceRow};
use sqlx::postgres::PgQueryResult;
use sqlx::{Executor, PgConnection, Postgres};

pub struct PreferenceStore;

impl PreferenceStore {
    //================================================================================
    // Catalog Management
    //================================================================================

    pub async fn list(
        executor: impl Executor<'_, Database = Postgres>,
    ) -> Result<Vec<Preference>, DbError> {
        Ok(sqlx::query_as::<_, Preference>(
            "SELECT id, created_at, updated_at, name FROM preference ORDER BY id",
        )
        .fetch_all(executor)
        .await?)
    }

    pub async fn find_by_id(
        executor: impl Executor<'_, Database = Postgres>,
        preference_id: i32,
    ) -> Result<Option<Preference>, DbError> {
        Ok(sqlx::query_as::<_, Preference>(
            "SELECT id, created_at, updated_at, name FROM preference WHERE id = $1",
        )
        .bind(preference_id)
        .fetch_optional(executor)
        .await?)
    }

    /// Fetches all preferences whose id is in `preference_ids`. Unknown ids are skipped.
    pub async fn find_by_ids(
        executor: impl Executor<'_, Database = Postgres>,
        preference_ids: &[i32],
    ) -> Result<Vec<Preference>, DbError> {
        Ok(sqlx::query_as::<_, Preference>(
            r"
            SELECT id, created_at, updated_at, name
            FROM preference
            WHERE id = ANY($1)
            ORDER BY id
            ",
        )
        .bind(preference_ids)
        .fetch_all(executor)
        .await?)
    }

    /// Plain insert. A duplicate name surfaces as `DbError::UniqueViolation`.
    pub async fn create(
        executor: impl Executor<'_, Database = Postgres>,
        name: &str,
    ) -> Result<Preference, DbError> {
        Ok(sqlx::query_as::<_, Preference>(
            r"
            INSERT INTO preference (name)
            VALUES ($1)
            RETURNING id, created_at, updated_at, name
            ",
        )
        .bind(name)
        .fetch_one(executor)
        .await?)
    }

    pub async fn update(
        executor: impl Executor<'_, Database = Postgres>,
        preference_id: i32,
        name: &str,
    ) -> Result<Option<Preference>, DbError> {
        Ok(sqlx::query_as::<_, Preference>(
            r"
            UPDATE preference
            SET name = $1, updated_at = now()
            WHERE id = $2
            RETURNING id, created_at, updated_at, name
            ",
        )
        .bind(name)
        .bind(preference_id)
        .fetch_optional(executor)
        .await?)
    }

    pub async fn delete(
        executor: impl Executor<'_, Database = Postgres>,
        preference_id: i32,
    ) -> Result<PgQueryResult, DbError> {
        Ok(sqlx::query("DELETE FROM preference WHERE id = $1")
            .bind(preference_id)
            .execute(executor)
            .await?)
    }

    /// Returns the preference called `name`, creating it if it does not exist yet.
    ///
    /// The insert waits on a concurrent insert of the same name and then does nothing, so
    /// the follow-up select sees the committed row. An existing row is never rewritten.
    pub async fn upsert_by_name(conn: &mut PgConnection, name: &str) -> Result<Preference, DbError> {
        let inserted = sqlx::query_as::<_, Preference>(
            r"
            INSERT INTO preference (name)
            VALUES ($1)
            ON CONFLICT (name) DO NOTHING
            RETURNING id, created_at, updated_at, name
            ",
        )
        .bind(name)
        .fetch_optional(&mut *conn)
        .await?;
        if let Some(preference) = inserted {
            return Ok(preference);
        }

        Ok(sqlx::query_as::<_, Preference>(
            "SELECT id, created_at, updated_at, name FROM preference WHERE name = $1",
        )
        .bind(name)
        .fetch_one(&mut *conn)
        .await?)
    }

    //================================================================================
    // User Associations
    //================================================================================

    /// Links a preference to a user. Returns `false` if the link already existed.
    pub async fn assign_to_user(
        executor: impl Executor<'_, Database = Postgres>,
        user_id: i32,
        preference_id: i32,
    ) -> Result<bool, DbError> {
        let result = sqlx::query(
            r"
            INSERT INTO user_preference (user_id, preference_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, preference_id) DO NOTHING
            ",
        )
        .bind(user_id)
        .bind(preference_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn list_for_user(
        executor: impl Executor<'_, Database = Postgres>,
        user_id: i32,
    ) -> Result<Vec<Preference>, DbError> {
        Ok(sqlx::query_as::<_, Preference>(
            r"
            SELECT p.id, p.created_at, p.updated_at, p.name
            FROM preference p
            JOIN user_preference up ON up.preference_id = p.id
            WHERE up.user_id = $1
            ORDER BY p.id
            ",
        )
        .bind(user_id)
        .fetch_all(executor)
        .await?)
    }

    /// Number of join rows between a user and a preference (0 or 1).
    pub async fn count_user_links(
        executor: impl Executor<'_, Database = Postgres>,
        user_id: i32,
        preference_id: i32,
    ) -> Result<i64, DbError> {
        Ok(sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM user_preference WHERE user_id = $1 AND preference_id = $2",
        )
        .bind(user_id)
        .bind(preference_id)
        .fetch_one(executor)
        .await?)
    }

    //================================================================================
    // Trip Associations
    //================================================================================

    /// Loads the preferences of several trips in one query.
    pub async fn list_for_trips(
        executor: impl Executor<'_, Database = Postgres>,
        trip_ids: &[i32],
    ) -> Result<Vec<TripPreferenceRow>, DbError> {
        Ok(sqlx::query_as::<_, TripPreferenceRow>(
            r"
            SELECT tp.trip_id, p.id, p.created_at, p.updated_at, p.name
            FROM trip_preference tp
            JOIN preference p ON p.id = tp.preference_id
            WHERE tp.trip_id = ANY($1)
            ORDER BY tp.trip_id, p.id
            ",
        )
        .bind(trip_ids)
        .fetch_all(executor)
        .await?)
    }
}
