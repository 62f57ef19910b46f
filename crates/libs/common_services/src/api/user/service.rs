use crate::api::access::{
    ADMIN_ONLY, ANY_ROLE, AccessDecision, ForbiddenReason, Ownership, Subject, authorize, ensure,
};
use crate::api::patch::Patch;
use crate::api::user::error::UserError;
use crate::api::user::interfaces::UpdateUserRequest;
use crate::database::app_user::User;
use crate::database::user_store::UserStore;
use sqlx::PgPool;
use tracing::{info, instrument};

pub async fn list_users(pool: &PgPool) -> Result<Vec<User>, UserError> {
    Ok(UserStore::list_users(pool).await?)
}

pub async fn get_user(pool: &PgPool, user_id: i32) -> Result<User, UserError> {
    UserStore::find_by_id(pool, user_id)
        .await?
        .ok_or(UserError::NotFound(user_id))
}

/// Whether `subject` may edit `user_id`, and whether it may also change roles.
fn check_edit_rights(
    subject: &Subject,
    user_id: i32,
    payload: &UpdateUserRequest,
) -> Result<(), UserError> {
    if authorize(Some(subject), ADMIN_ONLY, Ownership::Any) == AccessDecision::Allow {
        return Ok(());
    }
    ensure(Some(subject), ANY_ROLE, Ownership::OwnedBy(user_id))?;
    if payload.role.is_set() {
        return Err(UserError::Forbidden(ForbiddenReason::RoleMismatch));
    }
    Ok(())
}

#[instrument(skip(pool, subject, payload), fields(by = subject.id))]
pub async fn update_user(
    pool: &PgPool,
    subject: &Subject,
    user_id: i32,
    payload: UpdateUserRequest,
) -> Result<User, UserError> {
    get_user(pool, user_id).await?;
    check_edit_rights(subject, user_id, &payload)?;

    let name = match payload.name {
        Patch::Set(name) if name.trim().is_empty() => {
            return Err(UserError::Validation {
                field: "name".to_owned(),
                reason: "cannot be empty".to_owned(),
            });
        }
        name => name.into_option(),
    };
    let user = UserStore::update(pool, user_id, name, payload.role.into_option())
        .await?
        .ok_or(UserError::NotFound(user_id))?;
    info!("Updated user {user_id}");
    Ok(user)
}

#[instrument(skip(pool))]
pub async fn delete_user(pool: &PgPool, user_id: i32) -> Result<User, UserError> {
    let user = get_user(pool, user_id).await?;
    UserStore::delete(pool, user_id).await?;
    info!("Deleted user {user_id}");
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::app_user::UserRole;

    fn subject(id: i32, role: UserRole) -> Subject {
        Subject {
            id,
            email: format!("u{id}@example.com"),
            role,
        }
    }

    fn rename() -> UpdateUserRequest {
        UpdateUserRequest {
            name: Patch::Set("New".to_owned()),
            role: Patch::Unset,
        }
    }

    #[test]
    fn users_can_rename_themselves() {
        assert!(check_edit_rights(&subject(4, UserRole::Visitor), 4, &rename()).is_ok());
    }

    #[test]
    fn users_cannot_edit_others() {
        let err = check_edit_rights(&subject(4, UserRole::TripOwner), 5, &rename())
            .expect_err("not self");
        assert!(matches!(err, UserError::Forbidden(ForbiddenReason::NotOwner)));
    }

    #[test]
    fn only_admins_change_roles() {
        let promote = UpdateUserRequest {
            name: Patch::Unset,
            role: Patch::Set(UserRole::Admin),
        };
        let err = check_edit_rights(&subject(4, UserRole::Visitor), 4, &promote)
            .expect_err("self promotion");
        assert!(matches!(
            err,
            UserError::Forbidden(ForbiddenReason::RoleMismatch)
        ));
        assert!(check_edit_rights(&subject(1, UserRole::Admin), 4, &promote).is_ok());
    }
}
