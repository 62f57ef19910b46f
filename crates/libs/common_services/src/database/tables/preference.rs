use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// A reusable named tag, attachable to trips and users.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq, ToSchema)]
pub struct Preference {
    pub id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub name: String,
}

/// Join row between a user and a preference.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone, ToSchema)]
pub struct UserPreference {
    pub id: i32,
    pub created_at: DateTime<Utc>,
    pub user_id: i32,
    pub preference_id: i32,
}

/// A preference together with the trip it is attached to, used when batch loading.
#[derive(Debug, FromRow)]
pub struct TripPreferenceRow {
    pub trip_id: i32,
    #[sqlx(flatten)]
    pub preference: Preference,
}
