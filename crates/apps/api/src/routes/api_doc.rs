use crate::routes::root::handlers::HealthStatus;
use crate::routes::{auth, images, preferences, root, trips, users};
use common_services::api::auth::interfaces::{
    AuthResponse, CreateUser, LoginUser, RoleInfo, UpdateProfile,
};
use common_services::api::preference::interfaces::{
    AssignedPreferences, PreferencePayload, PreferenceSpec,
};
use common_services::api::seed::interfaces::SeedSummary;
use common_services::api::trip::interfaces::{
    CreateTripRequest, DeletedTrip, TripDetails, UpdateTripRequest,
};
use common_services::api::user::interfaces::UpdateUserRequest;
use common_services::database::app_user::{User, UserRole};
use common_services::database::image::{Image, ImageKind};
use common_services::database::preference::Preference;
use common_services::database::trip::{Coordinate, Trip, TripPoint};
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    paths(
        root::handlers::root,
        root::handlers::health_check,
        // Auth handlers
        auth::handlers::login,
        auth::handlers::register,
        auth::handlers::get_profile,
        auth::handlers::put_profile,
        auth::handlers::get_roles,
        // Trip handlers
        trips::handlers::list_trips_handler,
        trips::handlers::get_trip_handler,
        trips::handlers::create_trip_handler,
        trips::handlers::update_trip_handler,
        trips::handlers::delete_trip_handler,
        trips::handlers::my_trips_handler,
        trips::handlers::seed_trips_handler,
        // Preference handlers
        preferences::handlers::list_preferences_handler,
        preferences::handlers::get_preference_handler,
        preferences::handlers::create_preference_handler,
        preferences::handlers::update_preference_handler,
        preferences::handlers::delete_preference_handler,
        preferences::handlers::assign_preferences_handler,
        // Image handlers
        images::handlers::upload_images_handler,
        images::handlers::upload_cover_handler,
        images::handlers::get_image_handler,
        images::handlers::get_cover_handler,
        images::handlers::trip_images_handler,
        images::handlers::my_images_handler,
        images::handlers::delete_image_handler,
        // User handlers
        users::handlers::list_users_handler,
        users::handlers::create_user_handler,
        users::handlers::get_user_handler,
        users::handlers::update_user_handler,
        users::handlers::delete_user_handler,
    ),
    components(
        schemas(
            AuthResponse, CreateUser, LoginUser, RoleInfo, UpdateProfile,
            User, UserRole,
            Trip, TripPoint, Coordinate, TripDetails, DeletedTrip,
            CreateTripRequest, UpdateTripRequest, SeedSummary,
            Preference, PreferencePayload, PreferenceSpec, AssignedPreferences,
            Image, ImageKind,
            UpdateUserRequest, HealthStatus,
        ),
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Trips", description = "Browsing, publishing and managing trips"),
        (name = "Preferences", description = "The preference catalog and user tagging"),
        (name = "Images", description = "Image uploads and downloads"),
        (name = "Users", description = "User administration"),
        (name = "Auth", description = "Authentication endpoints"),
        (name = "System", description = "Health check"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
