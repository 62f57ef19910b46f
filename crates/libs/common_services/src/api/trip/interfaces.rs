use crate::api::patch::Patch;
use crate::api::trip::error::TripError;
use crate::api::validation::{check_latitude, check_longitude};
use crate::database::app_user::User;
use crate::database::image::Image;
use crate::database::preference::Preference;
use crate::database::trip::{Coordinate, Trip, TripPoint, TripValues};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::Display;
use std::str::FromStr;
use utoipa::{IntoParams, ToSchema};

/// Body of `POST /trips`. Name, price, duration and all four coordinates are required.
#[derive(Deserialize, Debug, Default, Clone, ToSchema)]
pub struct CreateTripRequest {
    pub name: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub cover_image: String,
    pub price: Option<f64>,
    pub duration: Option<i32>,
    pub start_latitude: Option<f64>,
    pub start_longitude: Option<f64>,
    pub end_latitude: Option<f64>,
    pub end_longitude: Option<f64>,
    #[serde(default)]
    pub preference_ids: Vec<i32>,
    #[serde(default)]
    pub points: Vec<Coordinate>,
}

/// Body of `PUT /trips/{id}`. Absent or null fields are left unchanged; a present list
/// replaces the existing associations entirely, an empty list clears them.
#[derive(Deserialize, Debug, Default, Clone, ToSchema)]
pub struct UpdateTripRequest {
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub name: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub description: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub cover_image: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<f64>)]
    pub price: Patch<f64>,
    #[serde(default)]
    #[schema(value_type = Option<i32>)]
    pub duration: Patch<i32>,
    #[serde(default)]
    #[schema(value_type = Option<f64>)]
    pub start_latitude: Patch<f64>,
    #[serde(default)]
    #[schema(value_type = Option<f64>)]
    pub start_longitude: Patch<f64>,
    #[serde(default)]
    #[schema(value_type = Option<f64>)]
    pub end_latitude: Patch<f64>,
    #[serde(default)]
    #[schema(value_type = Option<f64>)]
    pub end_longitude: Patch<f64>,
    #[serde(default)]
    #[schema(value_type = Option<Vec<i32>>)]
    pub preference_ids: Patch<Vec<i32>>,
    #[serde(default)]
    #[schema(value_type = Option<Vec<Coordinate>>)]
    pub points: Patch<Vec<Coordinate>>,
}

/// Query parameters of `GET /trips`. Both price bounds are inclusive, and a
/// parameter sent with an empty value counts as absent.
#[derive(Deserialize, Debug, Default, Clone, Copy, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListTripsParams {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub user_id: Option<i32>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub min_price: Option<f64>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub max_price: Option<f64>,
}

fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    match Option::<String>::deserialize(deserializer)?.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// A trip with its owner and associations loaded.
#[derive(Serialize, Debug, Clone, ToSchema)]
pub struct TripDetails {
    #[serde(flatten)]
    pub trip: Trip,
    pub user: Option<User>,
    pub images: Vec<Image>,
    pub preferences: Vec<Preference>,
    pub points: Vec<TripPoint>,
}

#[derive(Serialize, Debug, Clone, ToSchema)]
pub struct DeletedTrip {
    pub id: i32,
    pub name: String,
}

/// A validated create request.
#[derive(Debug, Clone, PartialEq)]
pub struct TripDraft {
    pub values: TripValues,
    pub preference_ids: Vec<i32>,
    pub points: Vec<Coordinate>,
}

/// Association changes left over after the scalar fields of an update are applied.
#[derive(Debug, Clone, PartialEq)]
pub struct AssociationPatch {
    pub preference_ids: Patch<Vec<i32>>,
    pub points: Patch<Vec<Coordinate>>,
}

fn required<T>(field: &str, value: Option<T>) -> Result<T, TripError> {
    value.ok_or_else(|| TripError::validation(field, "is required"))
}

/// Checks the constraints every stored trip must satisfy.
pub fn validate_values(values: &TripValues) -> Result<(), TripError> {
    if !values.price.is_finite() || values.price < 0.0 {
        return Err(TripError::validation("price", "must be zero or greater"));
    }
    if values.duration < 1 {
        return Err(TripError::validation("duration", "must be at least 1"));
    }
    check_latitude("start_latitude", values.start_latitude)?;
    check_longitude("start_longitude", values.start_longitude)?;
    check_latitude("end_latitude", values.end_latitude)?;
    check_longitude("end_longitude", values.end_longitude)?;
    Ok(())
}

pub fn validate_points(points: &[Coordinate]) -> Result<(), TripError> {
    for (i, point) in points.iter().enumerate() {
        check_latitude(&format!("points[{i}].latitude"), point.latitude)?;
        check_longitude(&format!("points[{i}].longitude"), point.longitude)?;
    }
    Ok(())
}

impl CreateTripRequest {
    /// Validates the request and splits it into scalar values and associations.
    pub fn into_draft(self) -> Result<TripDraft, TripError> {
        let name = required("name", self.name)?;
        if name.trim().is_empty() {
            return Err(TripError::validation("name", "is required"));
        }
        let values = TripValues {
            name,
            description: self.description,
            cover_image: self.cover_image,
            price: required("price", self.price)?,
            duration: required("duration", self.duration)?,
            start_latitude: required("start_latitude", self.start_latitude)?,
            start_longitude: required("start_longitude", self.start_longitude)?,
            end_latitude: required("end_latitude", self.end_latitude)?,
            end_longitude: required("end_longitude", self.end_longitude)?,
        };
        validate_values(&values)?;
        validate_points(&self.points)?;

        Ok(TripDraft {
            values,
            preference_ids: self.preference_ids,
            points: self.points,
        })
    }
}

impl UpdateTripRequest {
    /// Writes the set scalar fields into `values`, validates the result, and returns
    /// the association changes.
    pub fn apply_to(self, values: &mut TripValues) -> Result<AssociationPatch, TripError> {
        self.name.apply_to(&mut values.name);
        self.description.apply_to(&mut values.description);
        self.cover_image.apply_to(&mut values.cover_image);
        self.price.apply_to(&mut values.price);
        self.duration.apply_to(&mut values.duration);
        self.start_latitude.apply_to(&mut values.start_latitude);
        self.start_longitude.apply_to(&mut values.start_longitude);
        self.end_latitude.apply_to(&mut values.end_latitude);
        self.end_longitude.apply_to(&mut values.end_longitude);
        validate_values(values)?;
        if let Patch::Set(points) = &self.points {
            validate_points(points)?;
        }

        Ok(AssociationPatch {
            preference_ids: self.preference_ids,
            points: self.points,
        })
    }
}
