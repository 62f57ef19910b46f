use crate::api_state::ApiContext;
use crate::auth::middlewares::deferred_user::DeferredUser;
use crate::auth::middlewares::optional_user::OptionalUser;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use common_services::api::access::Subject;
use common_services::api::response::ApiResponse;
use common_services::api::seed::error::SeedError;
use common_services::api::seed::interfaces::SeedSummary;
use common_services::api::seed::service::seed_trips;
use common_services::api::trip::error::TripError;
use common_services::api::trip::interfaces::{
    CreateTripRequest, DeletedTrip, ListTripsParams, TripDetails, UpdateTripRequest,
};
use common_services::api::trip::service::{
    create_trip, delete_trip, get_trip, list_my_trips, list_trips, update_trip,
};
use common_services::database::app_user::User;
use tracing::{info, instrument};

/// List trips, optionally filtered by owner and an inclusive price range.
///
/// A token is not required, but one that is sent must be valid.
#[utoipa::path(
    get,
    path = "/trips",
    tag = "Trips",
    params(ListTripsParams),
    responses(
        (status = 200, description = "All matching trips with their count.", body = Vec<TripDetails>),
        (status = 401, description = "An invalid token was sent."),
    )
)]
#[instrument(skip(context, user), err(Debug))]
pub async fn list_trips_handler(
    State(context): State<ApiContext>,
    user: OptionalUser,
    Query(params): Query<ListTripsParams>,
) -> Result<ApiResponse<Vec<TripDetails>>, TripError> {
    if let Some(subject) = user.subject() {
        info!("Listing trips for user {}", subject.id);
    }
    let trips = list_trips(&context.pool, params).await?;
    Ok(ApiResponse::counted("Trips retrieved successfully", trips))
}

/// Get one trip with its owner, images, preferences and points.
#[utoipa::path(
    get,
    path = "/trips/{trip_id}",
    tag = "Trips",
    params(
        ("trip_id" = i32, Path, description = "The id of the trip.")
    ),
    responses(
        (status = 200, description = "The trip.", body = TripDetails),
        (status = 404, description = "Trip not found."),
    )
)]
pub async fn get_trip_handler(
    State(context): State<ApiContext>,
    Path(trip_id): Path<i32>,
) -> Result<ApiResponse<TripDetails>, TripError> {
    let trip = get_trip(&context.pool, trip_id).await?;
    Ok(ApiResponse::new("Trip retrieved successfully", trip))
}

/// Create a trip owned by the caller. Requires the `trip_owner` role.
#[utoipa::path(
    post,
    path = "/trips",
    tag = "Trips",
    request_body = CreateTripRequest,
    responses(
        (status = 201, description = "Trip created.", body = TripDetails),
        (status = 400, description = "Invalid field or unknown preference id."),
        (status = 401, description = "Authentication required."),
        (status = 403, description = "Caller is not a trip owner."),
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(context, user, payload), fields(user_id = user.id), err(Debug))]
pub async fn create_trip_handler(
    State(context): State<ApiContext>,
    Extension(user): Extension<User>,
    Json(payload): Json<CreateTripRequest>,
) -> Result<(StatusCode, ApiResponse<TripDetails>), TripError> {
    let trip = create_trip(&context.pool, &Subject::from(&user), payload).await?;
    Ok((
        StatusCode::CREATED,
        ApiResponse::new("Trip created successfully", trip),
    ))
}

/// Partially update a trip. Only its owner may do this.
///
/// Omitted fields are left alone; `preference_ids` and `points`, when sent,
/// replace the current sets. A missing trip is a 404 whatever the body holds.
#[utoipa::path(
    put,
    path = "/trips/{trip_id}",
    tag = "Trips",
    params(
        ("trip_id" = i32, Path, description = "The id of the trip.")
    ),
    request_body = UpdateTripRequest,
    responses(
        (status = 200, description = "Trip updated.", body = TripDetails),
        (status = 400, description = "Invalid field or unknown preference id."),
        (status = 401, description = "Authentication required."),
        (status = 403, description = "Caller is not the owner."),
        (status = 404, description = "Trip not found."),
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(context, user, payload), err(Debug))]
pub async fn update_trip_handler(
    State(context): State<ApiContext>,
    user: DeferredUser,
    Path(trip_id): Path<i32>,
    payload: Result<Json<UpdateTripRequest>, JsonRejection>,
) -> Result<ApiResponse<TripDetails>, TripError> {
    let payload = payload.map(|Json(body)| body).map_err(TripError::from);
    let trip = update_trip(&context.pool, user.subject(), trip_id, payload).await?;
    Ok(ApiResponse::new("Trip updated successfully", trip))
}

/// Delete a trip. Only its owner may do this.
#[utoipa::path(
    delete,
    path = "/trips/{trip_id}",
    tag = "Trips",
    params(
        ("trip_id" = i32, Path, description = "The id of the trip.")
    ),
    responses(
        (status = 200, description = "Trip deleted.", body = DeletedTrip),
        (status = 401, description = "Authentication required."),
        (status = 403, description = "Caller is not the owner."),
        (status = 404, description = "Trip not found."),
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(context, user), err(Debug))]
pub async fn delete_trip_handler(
    State(context): State<ApiContext>,
    user: DeferredUser,
    Path(trip_id): Path<i32>,
) -> Result<ApiResponse<DeletedTrip>, TripError> {
    let deleted = delete_trip(&context.pool, user.subject(), trip_id).await?;
    Ok(ApiResponse::new("Trip deleted successfully", deleted))
}

/// The caller's own trips. Requires the `trip_owner` role.
#[utoipa::path(
    get,
    path = "/trips/my-trips",
    tag = "Trips",
    responses(
        (status = 200, description = "The caller's trips with their count.", body = Vec<TripDetails>),
        (status = 401, description = "Authentication required."),
        (status = 403, description = "Caller is not a trip owner."),
    ),
    security(("bearer_auth" = []))
)]
pub async fn my_trips_handler(
    State(context): State<ApiContext>,
    Extension(user): Extension<User>,
) -> Result<ApiResponse<Vec<TripDetails>>, TripError> {
    let trips = list_my_trips(&context.pool, &Subject::from(&user)).await?;
    Ok(ApiResponse::counted("Your trips retrieved successfully", trips))
}

/// Import demo trips from OpenStreetMap tourism attractions. Requires the `trip_owner` role.
#[utoipa::path(
    post,
    path = "/trips/seed",
    tag = "Trips",
    responses(
        (status = 200, description = "Seeding finished.", body = SeedSummary),
        (status = 401, description = "Authentication required."),
        (status = 403, description = "Caller is not a trip owner."),
        (status = 502, description = "The Overpass API could not be reached."),
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(context, user), fields(user_id = user.id), err(Debug))]
pub async fn seed_trips_handler(
    State(context): State<ApiContext>,
    Extension(user): Extension<User>,
) -> Result<ApiResponse<SeedSummary>, SeedError> {
    let summary = seed_trips(
        &context.pool,
        &context.http_client,
        &context.settings.seed,
        &Subject::from(&user),
    )
    .await?;
    let message = if summary.trips == 0 {
        "No suitable attractions found".to_owned()
    } else {
        format!("{} trips seeded successfully", summary.trips)
    };
    Ok(ApiResponse::new(message, summary))
}
