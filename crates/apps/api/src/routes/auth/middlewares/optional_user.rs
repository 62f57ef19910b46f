use crate::api_state::ApiContext;
use crate::auth::middlewares::common::{extract_context, extract_token, resolve_user};
use axum::{
    extract::{FromRequestParts, State},
    http::request::Parts,
};
use common_services::api::access::Subject;
use common_services::api::auth::error::AuthError;
use common_services::database::app_user::User;

/// Anonymous when no token is sent. A token that is sent must be valid.
#[derive(Clone, Debug)]
pub struct OptionalUser(pub Option<User>);

impl OptionalUser {
    #[must_use]
    pub fn subject(&self) -> Option<Subject> {
        self.0.as_ref().map(Subject::from)
    }
}

impl<S> FromRequestParts<S> for OptionalUser
where
    S: Send + Sync,
    State<ApiContext>: FromRequestParts<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = match extract_token(parts) {
            Ok(token) => token,
            Err(AuthError::MissingToken) => return Ok(Self(None)),
            Err(e) => return Err(e),
        };
        let context = extract_context(parts, state).await?;
        let user = resolve_user(&context, &token).await?;
        Ok(Self(Some(user)))
    }
}
