//! A live API bound to a random local port, backed by the database in `DATABASE_URL`.
//!
//! Every test gets its own server and uses unique emails and names, so tests can
//! share one database and run in parallel.

use api::api_state::ApiContext;
use api::create_router;
use app_state::{AppSettings, load_settings_from_path};
use color_eyre::eyre::{Result, WrapErr, eyre};
use common_services::api::auth::hashing::hash_password;
use common_services::database::app_user::UserRole;
use common_services::database::run_migrations;
use common_services::database::user_store::UserStore;
use reqwest::{Client, RequestBuilder, Response};
use serde_json::{Value, json};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Once;
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::error;
use tracing_subscriber::EnvFilter;

pub const PASSWORD: &str = "secret-password";

static TRACING: Once = Once::new();

fn setup_tracing() {
    TRACING.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "warn,api=info,common_services=info".into());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .compact()
            .with_target(false)
            .init();
    });
}

/// A registered user and their bearer token.
#[derive(Debug, Clone)]
pub struct TestUser {
    pub id: i32,
    pub email: String,
    pub token: String,
}

pub struct TestContext {
    pub pool: PgPool,
    pub settings: AppSettings,
    pub http_client: Client,
    pub base_url: String,
    _upload_dir: TempDir,
    api_handle: JoinHandle<()>,
}

impl TestContext {
    pub async fn new() -> Result<Self> {
        setup_tracing();

        let settings_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("../../config/settings.yaml")
            .canonicalize()?;
        let mut settings = load_settings_from_path(&settings_path, false)?;
        settings.secrets.database_url =
            std::env::var("DATABASE_URL").wrap_err("DATABASE_URL must be set")?;
        settings.api.rate_limiting.burst_size = 10_000;

        let upload_dir = tempfile::tempdir()?;
        settings.uploads.image_folder = upload_dir.path().join("images");
        settings.uploads.cover_folder = upload_dir.path().join("covers");

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(&settings.secrets.database_url)
            .await?;
        run_migrations(&pool).await?;

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let base_url = format!("http://{addr}");
        settings.api.public_url.clone_from(&base_url);

        let app = create_router(ApiContext::new(pool.clone(), settings.clone()))?;
        let api_handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            {
                error!("API server failed: {}", e);
            }
        });

        Ok(Self {
            pool,
            settings,
            http_client: Client::new(),
            base_url,
            _upload_dir: upload_dir,
            api_handle,
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    pub fn get(&self, path: &str) -> RequestBuilder {
        self.http_client.get(self.url(path))
    }

    pub fn post(&self, path: &str) -> RequestBuilder {
        self.http_client.post(self.url(path))
    }

    pub fn put(&self, path: &str) -> RequestBuilder {
        self.http_client.put(self.url(path))
    }

    pub fn delete(&self, path: &str) -> RequestBuilder {
        self.http_client.delete(self.url(path))
    }

    /// Registers a fresh user with `role` through the API.
    pub async fn register(&self, role: &str) -> Result<TestUser> {
        let email = format!("{}@example.com", unique("user"));
        let response = self
            .post("/auth/register")
            .json(&json!({
                "name": "Test User",
                "email": email,
                "password": PASSWORD,
                "role": role,
            }))
            .send()
            .await?;
        let (status, body) = read(response).await?;
        if !status.is_success() {
            return Err(eyre!("register failed with {status}: {body}"));
        }
        Ok(TestUser {
            id: id_of(&body["data"]["user"])?,
            email,
            token: body["data"]["token"]
                .as_str()
                .ok_or_else(|| eyre!("no token in {body}"))?
                .to_owned(),
        })
    }

    /// Admins cannot self-register, so they are inserted directly and then logged in.
    pub async fn admin(&self) -> Result<TestUser> {
        let email = format!("{}@example.com", unique("admin"));
        let hashed = hash_password(PASSWORD.as_bytes())?;
        let user = UserStore::create(&self.pool, &email, "Admin", &hashed, UserRole::Admin).await?;
        let response = self
            .post("/auth/login")
            .json(&json!({ "email": email, "password": PASSWORD }))
            .send()
            .await?;
        let (status, body) = read(response).await?;
        if !status.is_success() {
            return Err(eyre!("admin login failed with {status}: {body}"));
        }
        Ok(TestUser {
            id: user.id,
            email,
            token: body["data"]["token"]
                .as_str()
                .ok_or_else(|| eyre!("no token in {body}"))?
                .to_owned(),
        })
    }

    /// Creates a preference directly in the database.
    pub async fn preference(&self, prefix: &str) -> Result<i32> {
        let id = sqlx::query_scalar::<_, i32>("INSERT INTO preference (name) VALUES ($1) RETURNING id")
            .bind(unique(prefix))
            .fetch_one(&self.pool)
            .await?;
        Ok(id)
    }

    /// Creates a trip through the API and returns its JSON.
    pub async fn create_trip(&self, owner: &TestUser, body: &Value) -> Result<Value> {
        let response = self
            .post("/trips")
            .bearer_auth(&owner.token)
            .json(body)
            .send()
            .await?;
        let (status, body) = read(response).await?;
        if status.as_u16() != 201 {
            return Err(eyre!("create trip failed with {status}: {body}"));
        }
        Ok(body["data"].clone())
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        self.api_handle.abort();
    }
}

/// A name no other test run will use.
pub fn unique(prefix: &str) -> String {
    format!("{prefix}-{}", uuid::Uuid::new_v4().simple())
}

pub async fn read(response: Response) -> Result<(reqwest::StatusCode, Value)> {
    let status = response.status();
    let text = response.text().await?;
    let body = serde_json::from_str(&text).unwrap_or(Value::String(text));
    Ok((status, body))
}

pub fn id_of(value: &Value) -> Result<i32> {
    value["id"]
        .as_i64()
        .and_then(|id| i32::try_from(id).ok())
        .ok_or_else(|| eyre!("no id in {value}"))
}

/// A valid trip body inside Jakarta.
pub fn trip_body(name: &str, price: f64) -> Value {
    json!({
        "name": name,
        "description": "A walk through the old town",
        "cover_image": "",
        "price": price,
        "duration": 2,
        "start_latitude": -6.1352,
        "start_longitude": 106.8133,
        "end_latitude": -6.1754,
        "end_longitude": 106.8272,
    })
}
