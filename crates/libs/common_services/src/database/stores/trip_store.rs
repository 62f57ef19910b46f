use crate::database::DbError;
use crate::database::trip::{Coordinate, Trip, TripPoint, TripValues};
use sqlx::postgres::PgQueryResult;
use sqlx::{Executor, PgConnection, Postgres};

/// Optional filters for listing trips. `None` imposes no bound.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TripFilter {
    pub user_id: Option<i32>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

const TRIP_COLUMNS: &str = r"
    id, created_at, updated_at, name, description, cover_image, price, duration,
    start_latitude, start_longitude, end_latitude, end_longitude, user_id
";

pub struct TripStore;

impl TripStore {
    //================================================================================
    // Core Trip Management
    //================================================================================

    pub async fn create(
        executor: impl Executor<'_, Database = Postgres>,
        user_id: i32,
        values: &TripValues,
    ) -> Result<Trip, DbError> {
        let sql = format!(
            r"
            INSERT INTO trip (
                name, description, cover_image, price, duration,
                start_latitude, start_longitude, end_latitude, end_longitude, user_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {TRIP_COLUMNS}
            "
        );
        Ok(sqlx::query_as::<_, Trip>(&sql)
            .bind(&values.name)
            .bind(&values.description)
            .bind(&values.cover_image)
            .bind(values.price)
            .bind(values.duration)
            .bind(values.start_latitude)
            .bind(values.start_longitude)
            .bind(values.end_latitude)
            .bind(values.end_longitude)
            .bind(user_id)
            .fetch_one(executor)
            .await?)
    }

    /// Overwrites every scalar column of a trip.
    pub async fn update(
        executor: impl Executor<'_, Database = Postgres>,
        trip_id: i32,
        values: &TripValues,
    ) -> Result<Trip, DbError> {
        let sql = format!(
            r"
            UPDATE trip
            SET
                name = $1,
                description = $2,
                cover_image = $3,
                price = $4,
                duration = $5,
                start_latitude = $6,
                start_longitude = $7,
                end_latitude = $8,
                end_longitude = $9,
                updated_at = now()
            WHERE id = $10
            RETURNING {TRIP_COLUMNS}
            "
        );
        Ok(sqlx::query_as::<_, Trip>(&sql)
            .bind(&values.name)
            .bind(&values.description)
            .bind(&values.cover_image)
            .bind(values.price)
            .bind(values.duration)
            .bind(values.start_latitude)
            .bind(values.start_longitude)
            .bind(values.end_latitude)
            .bind(values.end_longitude)
            .bind(trip_id)
            .fetch_one(executor)
            .await?)
    }

    /// Deletes a trip. Points and preference links cascade, images are detached.
    pub async fn delete(
        executor: impl Executor<'_, Database = Postgres>,
        trip_id: i32,
    ) -> Result<PgQueryResult, DbError> {
        Ok(sqlx::query("DELETE FROM trip WHERE id = $1")
            .bind(trip_id)
            .execute(executor)
            .await?)
    }

    pub async fn find_by_id(
        executor: impl Executor<'_, Database = Postgres>,
        trip_id: i32,
    ) -> Result<Option<Trip>, DbError> {
        let sql = format!("SELECT {TRIP_COLUMNS} FROM trip WHERE id = $1");
        Ok(sqlx::query_as::<_, Trip>(&sql)
            .bind(trip_id)
            .fetch_optional(executor)
            .await?)
    }

    /// Same as `find_by_id` but locks the row until the surrounding transaction ends.
    pub async fn find_by_id_for_update(
        executor: impl Executor<'_, Database = Postgres>,
        trip_id: i32,
    ) -> Result<Option<Trip>, DbError> {
        let sql = format!("SELECT {TRIP_COLUMNS} FROM trip WHERE id = $1 FOR UPDATE");
        Ok(sqlx::query_as::<_, Trip>(&sql)
            .bind(trip_id)
            .fetch_optional(executor)
            .await?)
    }

    /// Lists trips matching the filter, both price bounds inclusive.
    pub async fn list(
        executor: impl Executor<'_, Database = Postgres>,
        filter: TripFilter,
    ) -> Result<Vec<Trip>, DbError> {
        let sql = format!(
            r"
            SELECT {TRIP_COLUMNS}
            FROM trip
            WHERE ($1::INTEGER IS NULL OR user_id = $1)
              AND ($2::DOUBLE PRECISION IS NULL OR price >= $2)
              AND ($3::DOUBLE PRECISION IS NULL OR price <= $3)
            ORDER BY id
            "
        );
        Ok(sqlx::query_as::<_, Trip>(&sql)
            .bind(filter.user_id)
            .bind(filter.min_price)
            .bind(filter.max_price)
            .fetch_all(executor)
            .await?)
    }

    //================================================================================
    // Associations
    //================================================================================

    /// Replaces the preference links of a trip with exactly `preference_ids`.
    pub async fn replace_preferences(
        conn: &mut PgConnection,
        trip_id: i32,
        preference_ids: &[i32],
    ) -> Result<(), DbError> {
        sqlx::query("DELETE FROM trip_preference WHERE trip_id = $1")
            .bind(trip_id)
            .execute(&mut *conn)
            .await?;
        sqlx::query(
            r"
            INSERT INTO trip_preference (trip_id, preference_id)
            SELECT $1, preference_id
            FROM UNNEST($2::INTEGER[]) AS preference_id
            ON CONFLICT (trip_id, preference_id) DO NOTHING
            ",
        )
        .bind(trip_id)
        .bind(preference_ids)
        .execute(&mut *conn)
        .await?;
        Ok(())
    }

    /// Replaces all points of a trip, keeping the given order.
    pub async fn replace_points(
        conn: &mut PgConnection,
        trip_id: i32,
        points: &[Coordinate],
    ) -> Result<(), DbError> {
        sqlx::query("DELETE FROM trip_point WHERE trip_id = $1")
            .bind(trip_id)
            .execute(&mut *conn)
            .await?;

        let latitudes: Vec<f64> = points.iter().map(|p| p.latitude).collect();
        let longitudes: Vec<f64> = points.iter().map(|p| p.longitude).collect();
        sqlx::query(
            r"
            INSERT INTO trip_point (trip_id, latitude, longitude)
            SELECT $1, latitude, longitude
            FROM UNNEST($2::DOUBLE PRECISION[], $3::DOUBLE PRECISION[])
                WITH ORDINALITY AS p(latitude, longitude, position)
            ORDER BY position
            ",
        )
        .bind(trip_id)
        .bind(&latitudes)
        .bind(&longitudes)
        .execute(&mut *conn)
        .await?;
        Ok(())
    }

    /// Loads the points of several trips in one query.
    pub async fn list_points_for_trips(
        executor: impl Executor<'_, Database = Postgres>,
        trip_ids: &[i32],
    ) -> Result<Vec<TripPoint>, DbError> {
        Ok(sqlx::query_as::<_, TripPoint>(
            r"
            SELECT id, created_at, trip_id, latitude, longitude
            FROM trip_point
            WHERE trip_id = ANY($1)
            ORDER BY trip_id, id
            ",
        )
        .bind(trip_ids)
        .fetch_all(executor)
        .await?)
    }
}
