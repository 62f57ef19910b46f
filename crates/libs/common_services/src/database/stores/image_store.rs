use crate::database::DbError;
use crate::database::image::{Image, NewImage};
use sqlx::postgres::PgQueryResult;
use sqlx::{Executor, Postgres};

const IMAGE_COLUMNS: &str = r"
    id, created_at, trip_id, uploaded_by, url, file_name, original_name, file_size, mime_type, kind
";

pub struct ImageStore;

impl ImageStore {
    pub async fn create(
        executor: impl Executor<'_, Database = Postgres>,
        image: &NewImage,
    ) -> Result<Image, DbError> {
        let sql = format!(
            r"
            INSERT INTO image (
                trip_id, uploaded_by, url, file_name, original_name, file_size, mime_type, kind
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {IMAGE_COLUMNS}
            "
        );
        Ok(sqlx::query_as::<_, Image>(&sql)
            .bind(image.trip_id)
            .bind(image.uploaded_by)
            .bind(&image.url)
            .bind(&image.file_name)
            .bind(&image.original_name)
            .bind(image.file_size)
            .bind(&image.mime_type)
            .bind(image.kind)
            .fetch_one(executor)
            .await?)
    }

    pub async fn find_by_id(
        executor: impl Executor<'_, Database = Postgres>,
        image_id: i32,
    ) -> Result<Option<Image>, DbError> {
        let sql = format!("SELECT {IMAGE_COLUMNS} FROM image WHERE id = $1");
        Ok(sqlx::query_as::<_, Image>(&sql)
            .bind(image_id)
            .fetch_optional(executor)
            .await?)
    }

    pub async fn find_by_file_name(
        executor: impl Executor<'_, Database = Postgres>,
        file_name: &str,
    ) -> Result<Option<Image>, DbError> {
        let sql = format!("SELECT {IMAGE_COLUMNS} FROM image WHERE file_name = $1");
        Ok(sqlx::query_as::<_, Image>(&sql)
            .bind(file_name)
            .fetch_optional(executor)
            .await?)
    }

    pub async fn list_by_uploader(
        executor: impl Executor<'_, Database = Postgres>,
        user_id: i32,
    ) -> Result<Vec<Image>, DbError> {
        let sql = format!("SELECT {IMAGE_COLUMNS} FROM image WHERE uploaded_by = $1 ORDER BY id");
        Ok(sqlx::query_as::<_, Image>(&sql)
            .bind(user_id)
            .fetch_all(executor)
            .await?)
    }

    /// Loads the images of several trips in one query.
    pub async fn list_for_trips(
        executor: impl Executor<'_, Database = Postgres>,
        trip_ids: &[i32],
    ) -> Result<Vec<Image>, DbError> {
        let sql = format!(
            "SELECT {IMAGE_COLUMNS} FROM image WHERE trip_id = ANY($1) ORDER BY trip_id, id"
        );
        Ok(sqlx::query_as::<_, Image>(&sql)
            .bind(trip_ids)
            .fetch_all(executor)
            .await?)
    }

    pub async fn delete(
        executor: impl Executor<'_, Database = Postgres>,
        image_id: i32,
    ) -> Result<PgQueryResult, DbError> {
        Ok(sqlx::query("DELETE FROM image WHERE id = $1")
            .bind(image_id)
            .execute(executor)
            .await?)
    }
}
