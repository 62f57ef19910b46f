use crate::api::auth::error::AuthError;
use crate::api::auth::interfaces::AuthClaims;
use crate::database::app_user::User;
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};

/// Creates a signed access token for `user`, returning it with its expiry timestamp.
///
/// # Errors
///
/// * `jsonwebtoken::Error` if token encoding fails.
pub fn issue_token(
    jwt_secret: &str,
    expiry_minutes: i64,
    user: &User,
) -> Result<(String, u64), AuthError> {
    let exp = (Utc::now() + Duration::minutes(expiry_minutes)).timestamp();
    let claims = AuthClaims {
        sub: user.id,
        email: user.email.clone(),
        role: user.role,
        exp,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_ref()),
    )?;

    Ok((token, exp.max(0) as u64))
}

/// Checks the signature and expiry of a token and returns its claims.
///
/// # Errors
///
/// * `AuthError::InvalidToken` for any malformed, tampered or expired token.
pub fn verify_token(jwt_secret: &str, token: &str) -> Result<AuthClaims, AuthError> {
    decode::<AuthClaims>(
        token,
        &DecodingKey::from_secret(jwt_secret.as_ref()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AuthError::InvalidToken)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::app_user::UserRole;

    fn user() -> User {
        User {
            id: 42,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            email: "owner@example.com".to_owned(),
            name: "Owner".to_owned(),
            role: UserRole::TripOwner,
        }
    }

    #[test]
    fn issued_token_carries_subject_email_and_role() {
        let (token, expiry) = issue_token("secret", 60, &user()).expect("token is issued");
        let claims = verify_token("secret", &token).expect("token verifies");
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.email, "owner@example.com");
        assert_eq!(claims.role, UserRole::TripOwner);
        assert_eq!(claims.exp as u64, expiry);
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let (token, _) = issue_token("secret", 60, &user()).expect("token is issued");
        assert!(matches!(
            verify_token("other", &token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn expired_token_is_rejected() {
        let (token, _) = issue_token("secret", -10, &user()).expect("token is issued");
        assert!(matches!(
            verify_token("secret", &token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(matches!(
            verify_token("secret", "not.a.jwt"),
            Err(AuthError::InvalidToken)
        ));
    }
}
