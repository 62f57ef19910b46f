use axum::body::Body;
use axum::extract::State;
use axum::middleware::Next;
use axum::response::Response;
use common_services::api::access::{AccessDecision, Ownership, Subject, authorize};
use common_services::api::auth::error::AuthError;
use common_services::database::app_user::{User, UserRole};
use http::Request;

/// Lets the request through only when the user put in the extensions by
/// [`ApiUser`](super::user::ApiUser) has one of `allowed_roles`.
pub async fn require_role(
    State(allowed_roles): State<&'static [UserRole]>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let subject = req.extensions().get::<User>().map(Subject::from);

    match authorize(subject.as_ref(), allowed_roles, Ownership::Any) {
        AccessDecision::Allow => Ok(next.run(req).await),
        AccessDecision::AuthRequired => Err(AuthError::MissingToken),
        AccessDecision::RoleDenied | AccessDecision::OwnerDenied => {
            Err(AuthError::PermissionDenied {
                user_email: subject.map(|s| s.email).unwrap_or_default(),
                path: req.uri().to_string(),
            })
        }
    }
}
