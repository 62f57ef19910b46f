use crate::api::access::{Ownership, Subject, TRIP_OWNER_ONLY, ensure};
use crate::api::patch::Patch;
use crate::api::trip::error::TripError;
use crate::api::trip::interfaces::{
    CreateTripRequest, DeletedTrip, ListTripsParams, TripDetails, UpdateTripRequest,
};
use crate::database::app_user::User;
use crate::database::image::Image;
use crate::database::image_store::ImageStore;
use crate::database::preference::Preference;
use crate::database::preference_store::PreferenceStore;
use crate::database::trip::{Trip, TripPoint, TripValues};
use crate::database::trip_store::{TripFilter, TripStore};
use crate::database::user_store::UserStore;
use sqlx::{PgConnection, PgPool};
use std::collections::{BTreeSet, HashMap};
use tracing::{info, instrument};

/// Checks that every id refers to an existing preference and returns them deduplicated.
pub async fn resolve_preference_ids(
    conn: &mut PgConnection,
    preference_ids: &[i32],
) -> Result<Vec<i32>, TripError> {
    let wanted: BTreeSet<i32> = preference_ids.iter().copied().collect();
    if wanted.is_empty() {
        return Ok(vec![]);
    }
    let ids: Vec<i32> = wanted.into_iter().collect();
    let found: BTreeSet<i32> = PreferenceStore::find_by_ids(&mut *conn, &ids)
        .await?
        .into_iter()
        .map(|p| p.id)
        .collect();

    if let Some(missing) = ids.iter().find(|id| !found.contains(id)) {
        return Err(TripError::validation(
            "preference_ids",
            format!("preference {missing} does not exist"),
        ));
    }
    Ok(ids)
}

/// Loads owners, images, preferences and points for a batch of trips.
pub async fn with_details(pool: &PgPool, trips: Vec<Trip>) -> Result<Vec<TripDetails>, TripError> {
    if trips.is_empty() {
        return Ok(vec![]);
    }
    let trip_ids: Vec<i32> = trips.iter().map(|t| t.id).collect();
    let owner_ids: Vec<i32> = trips
        .iter()
        .map(|t| t.user_id)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let (owners, images, preferences, points) = tokio::try_join!(
        UserStore::list_by_ids(pool, &owner_ids),
        ImageStore::list_for_trips(pool, &trip_ids),
        PreferenceStore::list_for_trips(pool, &trip_ids),
        TripStore::list_points_for_trips(pool, &trip_ids),
    )?;

    let owners: HashMap<i32, User> = owners.into_iter().map(|u| (u.id, u)).collect();
    let mut images_by_trip: HashMap<i32, Vec<Image>> = HashMap::new();
    for image in images {
        if let Some(trip_id) = image.trip_id {
            images_by_trip.entry(trip_id).or_default().push(image);
        }
    }
    let mut preferences_by_trip: HashMap<i32, Vec<Preference>> = HashMap::new();
    for row in preferences {
        preferences_by_trip
            .entry(row.trip_id)
            .or_default()
            .push(row.preference);
    }
    let mut points_by_trip: HashMap<i32, Vec<TripPoint>> = HashMap::new();
    for point in points {
        points_by_trip.entry(point.trip_id).or_default().push(point);
    }

    Ok(trips
        .into_iter()
        .map(|trip| TripDetails {
            user: owners.get(&trip.user_id).cloned(),
            images: images_by_trip.remove(&trip.id).unwrap_or_default(),
            preferences: preferences_by_trip.remove(&trip.id).unwrap_or_default(),
            points: points_by_trip.remove(&trip.id).unwrap_or_default(),
            trip,
        })
        .collect())
}

async fn details_of(pool: &PgPool, trip: Trip) -> Result<TripDetails, TripError> {
    let trip_id = trip.id;
    with_details(pool, vec![trip])
        .await?
        .pop()
        .ok_or(TripError::NotFound(trip_id))
}

/// Creates a trip together with its points and preference links.
#[instrument(skip(pool, payload), fields(user_id = subject.id))]
pub async fn create_trip(
    pool: &PgPool,
    subject: &Subject,
    payload: CreateTripRequest,
) -> Result<TripDetails, TripError> {
    ensure(Some(subject), TRIP_OWNER_ONLY, Ownership::Any)?;
    let draft = payload.into_draft()?;

    let mut tx = pool.begin().await?;
    let preference_ids = resolve_preference_ids(&mut tx, &draft.preference_ids).await?;
    let trip = TripStore::create(&mut *tx, subject.id, &draft.values).await?;
    TripStore::replace_preferences(&mut tx, trip.id, &preference_ids).await?;
    TripStore::replace_points(&mut tx, trip.id, &draft.points).await?;
    tx.commit().await?;

    info!("Created trip {} for user {}", trip.id, subject.id);
    details_of(pool, trip).await
}

pub async fn get_trip(pool: &PgPool, trip_id: i32) -> Result<TripDetails, TripError> {
    let trip = TripStore::find_by_id(pool, trip_id)
        .await?
        .ok_or(TripError::NotFound(trip_id))?;
    details_of(pool, trip).await
}

#[instrument(skip(pool))]
pub async fn list_trips(
    pool: &PgPool,
    params: ListTripsParams,
) -> Result<Vec<TripDetails>, TripError> {
    let filter = TripFilter {
        user_id: params.user_id,
        min_price: params.min_price,
        max_price: params.max_price,
    };
    let trips = TripStore::list(pool, filter).await?;
    with_details(pool, trips).await
}

/// Trips owned by the calling trip owner.
pub async fn list_my_trips(
    pool: &PgPool,
    subject: &Subject,
) -> Result<Vec<TripDetails>, TripError> {
    ensure(Some(subject), TRIP_OWNER_ONLY, Ownership::Any)?;
    let filter = TripFilter {
        user_id: Some(subject.id),
        ..TripFilter::default()
    };
    let trips = TripStore::list(pool, filter).await?;
    with_details(pool, trips).await
}

/// Applies a partial update. Scalars, preference links and points are written in one
/// transaction; any error leaves the trip as it was.
///
/// `payload` is the decoded request body. A body that failed to decode is reported only
/// after the trip is found and the caller is allowed to change it.
#[instrument(skip(pool, subject, payload))]
pub async fn update_trip(
    pool: &PgPool,
    subject: Option<&Subject>,
    trip_id: i32,
    payload: Result<UpdateTripRequest, TripError>,
) -> Result<TripDetails, TripError> {
    let mut tx = pool.begin().await?;
    let trip = TripStore::find_by_id_for_update(&mut *tx, trip_id)
        .await?
        .ok_or(TripError::NotFound(trip_id))?;
    ensure(subject, TRIP_OWNER_ONLY, Ownership::OwnedBy(trip.user_id))?;

    let mut values = TripValues::from(&trip);
    let associations = payload?.apply_to(&mut values)?;
    let preference_ids = match associations.preference_ids {
        Patch::Set(ids) => Some(resolve_preference_ids(&mut tx, &ids).await?),
        Patch::Unset => None,
    };

    let updated = TripStore::update(&mut *tx, trip_id, &values).await?;
    if let Some(ids) = preference_ids {
        TripStore::replace_preferences(&mut tx, trip_id, &ids).await?;
    }
    if let Patch::Set(points) = associations.points {
        TripStore::replace_points(&mut tx, trip_id, &points).await?;
    }
    tx.commit().await?;

    info!("Updated trip {trip_id}");
    details_of(pool, updated).await
}

#[instrument(skip(pool, subject))]
pub async fn delete_trip(
    pool: &PgPool,
    subject: Option<&Subject>,
    trip_id: i32,
) -> Result<DeletedTrip, TripError> {
    let mut tx = pool.begin().await?;
    let trip = TripStore::find_by_id_for_update(&mut *tx, trip_id)
        .await?
        .ok_or(TripError::NotFound(trip_id))?;
    ensure(subject, TRIP_OWNER_ONLY, Ownership::OwnedBy(trip.user_id))?;

    TripStore::delete(&mut *tx, trip_id).await?;
    tx.commit().await?;

    info!("Deleted trip {trip_id}");
    Ok(DeletedTrip {
        id: trip.id,
        name: trip.name,
    })
}
