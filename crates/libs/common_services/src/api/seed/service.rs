use crate::api::access::{Ownership, Subject, TRIP_OWNER_ONLY, ensure};
use crate::api::seed::error::SeedError;
use crate::api::seed::interfaces::{OverpassElement, OverpassResponse, SeedSummary};
use crate::api::seed::planner::{JAKARTA_BBOX, build_query, plan_trips};
use crate::database::preference_store::PreferenceStore;
use crate::database::trip_store::TripStore;
use app_state::SeedSettings;
use fastrand::Rng;
use reqwest::header::CONTENT_TYPE;
use sqlx::PgPool;
use std::collections::{BTreeSet, HashMap};
use tracing::{info, instrument};

/// Runs an Overpass query and returns the raw elements.
pub async fn fetch_attractions(
    client: &reqwest::Client,
    overpass_url: &str,
    query: &str,
) -> Result<Vec<OverpassElement>, SeedError> {
    let body = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("data", query)
        .finish();
    let response: OverpassResponse = client
        .post(overpass_url)
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(body)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    Ok(response.elements)
}

/// Imports Jakarta attractions as trips owned by the caller, all in one transaction.
#[instrument(skip(pool, client, settings, subject), fields(user_id = subject.id))]
pub async fn seed_trips(
    pool: &PgPool,
    client: &reqwest::Client,
    settings: &SeedSettings,
    subject: &Subject,
) -> Result<SeedSummary, SeedError> {
    ensure(Some(subject), TRIP_OWNER_ONLY, Ownership::Any)?;

    let query = build_query(JAKARTA_BBOX);
    let elements = fetch_attractions(client, &settings.overpass_url, &query).await?;
    let planned = plan_trips(&elements, settings.max_trips, &mut Rng::new());
    info!(
        "Overpass returned {} elements, {} usable",
        elements.len(),
        planned.len()
    );
    if planned.is_empty() {
        return Ok(SeedSummary {
            trips: 0,
            trip_ids: vec![],
        });
    }

    let names: BTreeSet<&str> = planned
        .iter()
        .flat_map(|trip| trip.preference_names.iter().copied())
        .collect();

    let mut tx = pool.begin().await?;
    let mut preference_ids = HashMap::with_capacity(names.len());
    for name in names {
        let preference = PreferenceStore::upsert_by_name(&mut *tx, name).await?;
        preference_ids.insert(name, preference.id);
    }

    let mut trip_ids = Vec::with_capacity(planned.len());
    for trip in &planned {
        let created = TripStore::create(&mut *tx, subject.id, &trip.values).await?;
        let ids: Vec<i32> = trip
            .preference_names
            .iter()
            .filter_map(|name| preference_ids.get(name).copied())
            .collect();
        TripStore::replace_preferences(&mut tx, created.id, &ids).await?;
        TripStore::replace_points(&mut tx, created.id, &trip.points).await?;
        trip_ids.push(created.id);
    }
    tx.commit().await?;

    info!("Seeded {} trips", trip_ids.len());
    Ok(SeedSummary {
        trips: trip_ids.len(),
        trip_ids,
    })
}
