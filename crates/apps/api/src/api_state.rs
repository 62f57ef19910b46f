use app_state::AppSettings;
use axum::extract::FromRef;
use common_services::storage::BlobStore;
use reqwest::Client;
use sqlx::PgPool;

#[derive(Clone)]
pub struct ApiContext {
    pub pool: PgPool,
    pub settings: AppSettings,
    pub http_client: Client,
    pub blobs: BlobStore,
}

impl ApiContext {
    #[must_use]
    pub fn new(pool: PgPool, settings: AppSettings) -> Self {
        let blobs = BlobStore::from_settings(&settings.uploads);
        Self {
            pool,
            settings,
            http_client: Client::new(),
            blobs,
        }
    }
}

// Lets extractors and handlers pull just the part of the state they need.
impl FromRef<ApiContext> for PgPool {
    fn from_ref(state: &ApiContext) -> Self {
        state.pool.clone()
    }
}

impl FromRef<ApiContext> for AppSettings {
    fn from_ref(state: &ApiContext) -> Self {
        state.settings.clone()
    }
}

impl FromRef<ApiContext> for BlobStore {
    fn from_ref(state: &ApiContext) -> Self {
        state.blobs.clone()
    }
}
