use crate::api_state::ApiContext;
use axum::extract::{FromRequestParts, State};
use color_eyre::eyre::eyre;
use common_services::api::auth::error::AuthError;
use common_services::api::auth::token::verify_token;
use common_services::database::app_user::User;
use common_services::database::user_store::UserStore;
use http::header;
use http::request::Parts;

pub async fn extract_context<S>(parts: &mut Parts, state: &S) -> Result<ApiContext, AuthError>
where
    S: Send + Sync,
    State<ApiContext>: FromRequestParts<S>,
{
    match State::<ApiContext>::from_request_parts(parts, state).await {
        Ok(State(context)) => Ok(context),
        Err(_e) => Err(AuthError::Internal(eyre!(
            "Server state is not configured correctly."
        ))),
    }
}

/// Get auth token from Authorization Header.
pub fn extract_token(parts: &Parts) -> Result<String, AuthError> {
    let auth_header = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingToken)?;

    auth_header
        .strip_prefix("Bearer ")
        .map(ToOwned::to_owned)
        .ok_or(AuthError::InvalidToken)
}

/// Resolves the token's subject from the users table, so role changes apply right away.
pub async fn resolve_user(context: &ApiContext, token: &str) -> Result<User, AuthError> {
    let claims = verify_token(&context.settings.secrets.jwt, token)?;
    UserStore::find_by_id(&context.pool, claims.sub)
        .await?
        .ok_or(AuthError::UserNotFound)
}

/// Whether the error means "no usable credential" rather than a server failure.
pub const fn is_credential_error(error: &AuthError) -> bool {
    matches!(
        error,
        AuthError::MissingToken | AuthError::InvalidToken | AuthError::UserNotFound
    )
}
