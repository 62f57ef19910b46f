use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Represents a single trip in the database.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq, ToSchema)]
pub struct Trip {
    pub id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub name: String,
    pub description: String,
    pub cover_image: String,
    pub price: f64,
    pub duration: i32,
    pub start_latitude: f64,
    pub start_longitude: f64,
    pub end_latitude: f64,
    pub end_longitude: f64,
    pub user_id: i32,
}

/// A waypoint belonging to exactly one trip.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq, ToSchema)]
pub struct TripPoint {
    pub id: i32,
    pub created_at: DateTime<Utc>,
    pub trip_id: i32,
    pub latitude: f64,
    pub longitude: f64,
}

/// The scalar, user-editable columns of a trip.
#[derive(Debug, Clone, PartialEq)]
pub struct TripValues {
    pub name: String,
    pub description: String,
    pub cover_image: String,
    pub price: f64,
    pub duration: i32,
    pub start_latitude: f64,
    pub start_longitude: f64,
    pub end_latitude: f64,
    pub end_longitude: f64,
}

impl From<&Trip> for TripValues {
    fn from(trip: &Trip) -> Self {
        Self {
            name: trip.name.clone(),
            description: trip.description.clone(),
            cover_image: trip.cover_image.clone(),
            price: trip.price,
            duration: trip.duration,
            start_latitude: trip.start_latitude,
            start_longitude: trip.start_longitude,
            end_latitude: trip.end_latitude,
            end_longitude: trip.end_longitude,
        }
    }
}

/// A coordinate pair without an owning trip yet.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, ToSchema)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}
