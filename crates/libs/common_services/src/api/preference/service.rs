use crate::api::preference::error::PreferenceError;
use crate::api::preference::interfaces::{
    AssignedPreferences, PreferencePayload, PreferenceSpec, SpecTarget,
};
use crate::database::DbError;
use crate::database::preference::Preference;
use crate::database::preference_store::PreferenceStore;
use sqlx::PgPool;
use std::collections::BTreeMap;
use tracing::{info, instrument};

fn name_conflict(name: &str) -> impl FnOnce(DbError) -> PreferenceError + '_ {
    move |err| match err {
        DbError::UniqueViolation(_) => PreferenceError::NameTaken(name.to_owned()),
        other => other.into(),
    }
}

pub async fn list_preferences(pool: &PgPool) -> Result<Vec<Preference>, PreferenceError> {
    Ok(PreferenceStore::list(pool).await?)
}

pub async fn get_preference(pool: &PgPool, id: i32) -> Result<Preference, PreferenceError> {
    PreferenceStore::find_by_id(pool, id)
        .await?
        .ok_or(PreferenceError::NotFound(id))
}

#[instrument(skip(pool))]
pub async fn create_preference(
    pool: &PgPool,
    payload: &PreferencePayload,
) -> Result<Preference, PreferenceError> {
    let name = payload.validated_name()?;
    let preference = PreferenceStore::create(pool, name)
        .await
        .map_err(name_conflict(name))?;
    info!("Created preference {} ({})", preference.id, preference.name);
    Ok(preference)
}

#[instrument(skip(pool))]
pub async fn update_preference(
    pool: &PgPool,
    id: i32,
    payload: &PreferencePayload,
) -> Result<Preference, PreferenceError> {
    let name = payload.validated_name()?;
    PreferenceStore::update(pool, id, name)
        .await
        .map_err(name_conflict(name))?
        .ok_or(PreferenceError::NotFound(id))
}

/// Deletes a preference; its trip and user links go with it.
#[instrument(skip(pool))]
pub async fn delete_preference(pool: &PgPool, id: i32) -> Result<Preference, PreferenceError> {
    let mut tx = pool.begin().await?;
    let preference = PreferenceStore::find_by_id(&mut *tx, id)
        .await?
        .ok_or(PreferenceError::NotFound(id))?;
    PreferenceStore::delete(&mut *tx, id).await?;
    tx.commit().await?;
    info!("Deleted preference {id}");
    Ok(preference)
}

/// Resolves each spec to a preference (creating named ones on demand) and links them to
/// the user. Already linked preferences stay linked exactly once.
#[instrument(skip(pool, specs), fields(specs = specs.len()))]
pub async fn assign_to_user(
    pool: &PgPool,
    user_id: i32,
    specs: &[PreferenceSpec],
) -> Result<AssignedPreferences, PreferenceError> {
    let mut targets = specs
        .iter()
        .enumerate()
        .map(|(index, spec)| spec.target(index).map(|target| (index, target)))
        .collect::<Result<Vec<_>, _>>()?;
    // Upsert names in a stable order so concurrent assignments lock rows in the same order.
    targets.sort_by(|(_, a), (_, b)| a.cmp(b));

    let mut tx = pool.begin().await?;
    let mut assigned = BTreeMap::new();
    for (index, target) in targets {
        let preference = match target {
            SpecTarget::ByName(name) => PreferenceStore::upsert_by_name(&mut *tx, name).await?,
            SpecTarget::ById(id) => PreferenceStore::find_by_id(&mut *tx, id)
                .await?
                .ok_or_else(|| {
                    PreferenceError::validation(
                        format!("[{index}].id"),
                        format!("preference {id} does not exist"),
                    )
                })?,
        };
        let linked = PreferenceStore::assign_to_user(&mut *tx, user_id, preference.id).await?;
        if linked {
            info!("Linked preference {} to user {user_id}", preference.id);
        }
        assigned.insert(preference.id, preference);
    }
    let preferences = PreferenceStore::list_for_user(&mut *tx, user_id).await?;
    tx.commit().await?;

    Ok(AssignedPreferences {
        assigned: assigned.into_values().collect(),
        preferences,
    })
}
