use crate::api_state::ApiContext;
use crate::auth::middlewares::common::{
    extract_context, extract_token, is_credential_error, resolve_user,
};
use axum::{
    extract::{FromRequestParts, State},
    http::request::Parts,
};
use common_services::api::access::Subject;
use common_services::api::auth::error::AuthError;
use tracing::debug;

/// The caller, if a valid token was sent. Never rejects for a bad credential.
///
/// Used where the handler must first check that the target exists, so a missing
/// resource is a 404 even for anonymous callers. The service then turns `None`
/// into an authentication error.
#[derive(Clone, Debug)]
pub struct DeferredUser(pub Option<Subject>);

impl DeferredUser {
    #[must_use]
    pub fn subject(&self) -> Option<&Subject> {
        self.0.as_ref()
    }
}

impl<S> FromRequestParts<S> for DeferredUser
where
    S: Send + Sync,
    State<ApiContext>: FromRequestParts<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let context = extract_context(parts, state).await?;
        let resolved = match extract_token(parts) {
            Ok(token) => resolve_user(&context, &token).await,
            Err(e) => Err(e),
        };
        match resolved {
            Ok(user) => Ok(Self(Some(Subject::from(&user)))),
            Err(e) if is_credential_error(&e) => {
                debug!("Continuing without a subject: {e:?}");
                Ok(Self(None))
            }
            Err(e) => Err(e),
        }
    }
}
