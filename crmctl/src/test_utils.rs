//! Test utilities for building in-memory applications and seeding operators.

use crate::{
    AppState,
    api::models::customers::CustomerStatus,
    auth::password,
    config::{Config, DatabaseConfig},
    db::{
        errors::Result,
        handlers::{CustomerFilter, CustomerRepository, InMemoryCustomers, InMemoryUsers, Repository},
        models::{
            customers::{CustomerCreateDBRequest, CustomerDBResponse, CustomerUpdateDBRequest},
            users::UserCreateDBRequest,
        },
    },
    log_book,
    types::CustomerId,
};
use axum_test::TestServer;
use std::fmt;
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};
use tracing::{
    Event, Subscriber,
    field::{Field, Visit},
    subscriber::DefaultGuard,
};
use tracing_subscriber::{
    Layer,
    layer::{Context, SubscriberExt},
};

pub fn create_test_config() -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        database_url: None,
        database: DatabaseConfig::Memory,
        admin_password: None,
        ..Default::default()
    }
}

pub fn create_test_state(config: Config) -> AppState {
    create_test_state_with_customers(config, Arc::new(InMemoryCustomers::new()))
}

fn create_test_state_with_customers(config: Config, customers: Arc<dyn CustomerRepository>) -> AppState {
    AppState::builder()
        .customers(customers)
        .users(Arc::new(InMemoryUsers::new()))
        .config(config)
        .build()
}

fn into_server(state: AppState) -> TestServer {
    let router = crate::build_router(state).expect("Failed to build router");
    TestServer::new(router).expect("Failed to create test server")
}

pub fn create_test_app(config: Config) -> (TestServer, AppState) {
    let state = create_test_state(config);
    (into_server(state.clone()), state)
}

/// Like [`create_test_app`], but backed by a caller-held counting store.
pub fn create_test_app_with_customers(config: Config, customers: Arc<CountingCustomers>) -> (TestServer, AppState) {
    let state = create_test_state_with_customers(config, customers);
    (into_server(state.clone()), state)
}

/// Store an operator whose password hashes with the production parameters.
pub async fn seed_operator(state: &AppState, username: &str, password: &str) {
    let password_hash = password::hash_password(password).expect("Failed to hash password");
    state
        .users
        .upsert(&UserCreateDBRequest {
            username: username.to_string(),
            password_hash,
        })
        .await
        .expect("Failed to seed operator");
}

/// In-memory customer store that counts lookups, for asserting which storage calls a request
/// makes.
#[derive(Default)]
pub struct CountingCustomers {
    inner: InMemoryCustomers,
    get_by_id_calls: AtomicUsize,
    get_by_email_calls: AtomicUsize,
}

impl CountingCustomers {
    pub fn get_by_id_calls(&self) -> usize {
        self.get_by_id_calls.load(Ordering::SeqCst)
    }

    pub fn get_by_email_calls(&self) -> usize {
        self.get_by_email_calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Repository for CountingCustomers {
    type CreateRequest = CustomerCreateDBRequest;
    type UpdateRequest = CustomerUpdateDBRequest;
    type Response = CustomerDBResponse;
    type Id = CustomerId;
    type Filter = CustomerFilter;

    async fn create(&self, request: &Self::CreateRequest) -> Result<Self::Response> {
        self.inner.create(request).await
    }

    async fn get_by_id(&self, id: Self::Id) -> Result<Option<Self::Response>> {
        self.get_by_id_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.get_by_id(id).await
    }

    async fn list(&self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        self.inner.list(filter).await
    }

    async fn update(&self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        self.inner.update(id, request).await
    }
}

#[async_trait::async_trait]
impl CustomerRepository for CountingCustomers {
    async fn get_by_email(&self, email: &str) -> Result<Option<CustomerDBResponse>> {
        self.get_by_email_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.get_by_email(email).await
    }

    async fn set_status(&self, id: CustomerId, status: CustomerStatus) -> Result<CustomerDBResponse> {
        self.inner.set_status(id, status).await
    }
}

/// Collects log book lines written on the current thread while installed.
///
/// `#[tokio::test]` runs on a single thread, so handlers driven through a [`TestServer`] log
/// into the installed subscriber.
#[derive(Clone, Default)]
pub struct LogBookCapture {
    lines: Arc<Mutex<Vec<String>>>,
}

impl LogBookCapture {
    /// Route events to this capture until the guard is dropped
    pub fn install(&self) -> DefaultGuard {
        tracing::subscriber::set_default(tracing_subscriber::registry().with(self.clone()))
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

impl<S: Subscriber> Layer<S> for LogBookCapture {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if event.metadata().target() != log_book::TARGET {
            return;
        }

        let mut message = MessageVisitor(None);
        event.record(&mut message);
        if let Some(line) = message.0 {
            self.lines.lock().unwrap().push(line);
        }
    }
}

struct MessageVisitor(Option<String>);

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.0 = Some(format!("{value:?}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_counting_customers_delegates() {
        let counting = CountingCustomers::default();
        let created = counting
            .create(&CustomerCreateDBRequest {
                f_name: "Ann".to_string(),
                l_name: "Lee".to_string(),
                email: "ann@x.com".to_string(),
                contact_num: "123".to_string(),
                address: "A St".to_string(),
            })
            .await
            .unwrap();

        assert!(counting.get_by_email("ann@x.com").await.unwrap().is_some());
        assert_eq!(counting.get_by_email_calls(), 1);
        assert_eq!(counting.get_by_id(created.id).await.unwrap().unwrap().id, created.id);
        assert_eq!(counting.get_by_id_calls(), 1);
        assert_eq!(counting.list(&CustomerFilter::default()).await.unwrap().len(), 1);
    }

    #[test]
    fn test_log_book_capture_ignores_other_targets() {
        let capture = LogBookCapture::default();
        let _guard = capture.install();

        tracing::info!("unrelated");
        tracing::info!(target: log_book::TARGET, "LOG_BOOK customer=1 viewed by anonymous at now");

        assert_eq!(capture.lines(), vec!["LOG_BOOK customer=1 viewed by anonymous at now".to_string()]);
    }
}
