//! # crmctl: customer relationship management service
//!
//! `crmctl` keeps a table of customer records and exposes it over a small REST API: operators
//! search, view, add and update customers, and "delete" them by marking them `INACTIVE`. Every
//! customer operation leaves a line in the [`log_book`] naming the operator who performed it.
//!
//! ## Architecture
//!
//! The HTTP layer is built on [Axum](https://github.com/tokio-rs/axum). Customer routes live under
//! `/api/v1/customers`, the OpenAPI documentation under `/docs`, and every other path serves the
//! embedded browser client.
//!
//! The **API layer** ([`api`]) validates requests, translates between the camelCase request names
//! and the stored field names, and maps failures onto the error body documented in [`errors`].
//!
//! The **authentication layer** ([`auth`]) resolves the operator for each request from a trusted
//! proxy header or HTTP Basic credentials checked against Argon2 password hashes. Anonymous
//! requests are accepted unless `auth.required` is set.
//!
//! The **database layer** ([`db`]) hides storage behind repository traits. PostgreSQL is used in
//! production; an in-memory store backs tests and `database.type: memory` deployments.
//!
//! ## Quick Start
//!
//! ```no_run
//! use clap::Parser;
//! use crmctl::{Application, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let args = crmctl::config::Args::parse();
//!     let config = Config::load(&args)?;
//!
//!     crmctl::telemetry::init_telemetry()?;
//!
//!     let app = Application::new(config).await?;
//!     app.serve(async {
//!         let _ = tokio::signal::ctrl_c().await;
//!     })
//!     .await
//! }
//! ```
//!
//! ## Database Setup
//!
//! Migrations are embedded and run automatically on startup against an external database:
//!
//! ```no_run
//! # use sqlx::PgPool;
//! # async fn example(pool: PgPool) -> Result<(), sqlx::migrate::MigrateError> {
//! crmctl::migrator().run(&pool).await?;
//! # Ok(())
//! # }
//! ```
//!
//! See the [`config`] module for configuration options.
pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
pub mod log_book;
mod openapi;
pub mod telemetry;
pub mod types;

#[cfg(test)]
pub mod test_utils;

use crate::{
    api::handlers::{customers, static_assets::serve_embedded_asset},
    auth::password,
    config::DatabaseConfig,
    db::{
        handlers::{CustomerRepository, Customers, InMemoryCustomers, InMemoryUsers, UserRepository, Users},
        models::users::UserCreateDBRequest,
    },
    errors::{Error, ErrorCode},
    openapi::ApiDoc,
};
use axum::{
    Router,
    http::{self, HeaderValue, Uri},
    routing::get,
};
use bon::Builder;
pub use config::Config;
use sqlx::PgPool;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{Level, debug, info, instrument};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

pub use types::{CustomerId, UserId};

/// Shared state handed to every handler.
///
/// Storage is injected as trait objects so the same router runs against PostgreSQL, the
/// in-memory store, or a test double.
#[derive(Clone, Builder)]
pub struct AppState {
    pub customers: Arc<dyn CustomerRepository>,
    pub users: Arc<dyn UserRepository>,
    pub config: Config,
}

pub fn migrator() -> sqlx::migrate::Migrator {
    sqlx::migrate!("./migrations")
}

/// Store the configured admin operator, replacing the password of an existing one.
///
/// Without a password nothing is stored: an operator with no password could never log in.
#[instrument(skip_all, fields(username = %username))]
pub async fn create_initial_admin_user(
    username: &str,
    password: Option<&str>,
    users: &dyn UserRepository,
) -> anyhow::Result<Option<UserId>> {
    let Some(password) = password else {
        info!("No admin password configured, skipping admin operator setup");
        return Ok(None);
    };

    // Hashing is CPU-bound
    let owned = password.to_string();
    let password_hash = tokio::task::spawn_blocking(move || password::hash_password(&owned))
        .await?
        .map_err(|e| anyhow::anyhow!("Failed to hash admin password: {e}"))?;

    let user = users
        .upsert(&UserCreateDBRequest {
            username: username.to_string(),
            password_hash,
        })
        .await?;

    debug!("Admin operator {} ready with id {}", user.username, user.id);
    Ok(Some(user.id))
}

/// Repositories and, for an external database, the pool behind them.
struct Storage {
    customers: Arc<dyn CustomerRepository>,
    users: Arc<dyn UserRepository>,
    pool: Option<PgPool>,
}

async fn setup_storage(config: &Config) -> anyhow::Result<Storage> {
    match &config.database {
        DatabaseConfig::Memory => {
            info!("Using in-memory storage; data will not survive a restart");
            Ok(Storage {
                customers: Arc::new(InMemoryCustomers::new()),
                users: Arc::new(InMemoryUsers::new()),
                pool: None,
            })
        }
        DatabaseConfig::External { url, pool: settings } => {
            info!("Connecting to external database");
            let pool = db::connect(url, settings).await?;
            migrator().run(&pool).await?;

            Ok(Storage {
                customers: Arc::new(Customers::new(pool.clone())),
                users: Arc::new(Users::new(pool.clone())),
                pool: Some(pool),
            })
        }
    }
}

fn create_cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let mut origins = Vec::new();
    for origin in &config.cors.allowed_origins {
        origins.push(origin.header_value().parse::<HeaderValue>()?);
    }

    let mut cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([http::Method::GET, http::Method::POST, http::Method::PUT, http::Method::DELETE])
        .allow_headers([http::header::CONTENT_TYPE, http::header::AUTHORIZATION])
        .allow_credentials(config.cors.allow_credentials);

    if let Some(max_age) = config.cors.max_age {
        cors = cors.max_age(max_age);
    }

    Ok(cors)
}

/// Unknown paths under the API prefix get an error body instead of the client shell
async fn api_not_found(uri: Uri) -> Error {
    Error::NotFound {
        message: format!("No route for {}", uri.path()),
        code: ErrorCode::NotFound,
    }
}

/// Build the full router: customer API, docs, health check and the client shell fallback.
pub fn build_router(state: AppState) -> anyhow::Result<Router> {
    let cors = create_cors_layer(&state.config)?;

    let api_routes = Router::new()
        .route("/customers", get(customers::list_customers).post(customers::create_customer))
        .route(
            "/customers/{id}",
            get(customers::get_customer)
                .put(customers::update_customer)
                .delete(customers::delete_customer),
        )
        .fallback(api_not_found)
        .with_state(state);

    let router = Router::new()
        .route("/healthz", get(|| async { "OK" }))
        .nest("/api/v1", api_routes)
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()))
        .fallback(serve_embedded_asset)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        );

    Ok(router)
}

/// Owns the router, configuration and database pool for the lifetime of the server.
///
/// 1. [`Application::new`] connects storage, runs migrations and seeds the admin operator
/// 2. [`Application::serve`] binds the listener and handles requests until shutdown
pub struct Application {
    router: Router,
    config: Config,
    pool: Option<PgPool>,
}

impl Application {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        debug!("Starting crmctl with configuration: {:#?}", config);

        let storage = setup_storage(&config).await?;

        create_initial_admin_user(&config.admin_username, config.admin_password.as_deref(), storage.users.as_ref()).await?;

        let state = AppState::builder()
            .customers(storage.customers)
            .users(storage.users)
            .config(config.clone())
            .build();

        Self::new_with_state(state, storage.pool)
    }

    /// Build an application around already constructed state
    pub fn new_with_state(state: AppState, pool: Option<PgPool>) -> anyhow::Result<Self> {
        let config = state.config.clone();
        let router = build_router(state)?;
        Ok(Self { router, config, pool })
    }

    #[cfg(test)]
    pub fn into_test_server(self) -> axum_test::TestServer {
        axum_test::TestServer::new(self.router).expect("Failed to create test server")
    }

    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!(
            "crmctl listening on http://{}, available at http://localhost:{}",
            bind_addr, self.config.port
        );

        axum::serve(listener, self.router).with_graceful_shutdown(shutdown).await?;

        if let Some(pool) = self.pool {
            info!("Closing database connections...");
            pool.close().await;
        }

        Ok(())
    }
}
