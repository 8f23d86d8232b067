//! Server construction and middleware wiring.

mod config;

pub use config::{AppConfig, BuildMode, ConfigError, SessionSettings};

use std::sync::Arc;

use actix_session::{
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
    SessionMiddleware,
};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{web, App, HttpServer};
#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetricsBuilder;
use diesel_async::async_connection_wrapper::AsyncConnectionWrapper;
use diesel_async::AsyncPgConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::domain::{
    AccountDirectoryService, CleanupService, FederatedProvisioningService,
    PasswordLoginService, UploadBrokerService, WashCommandService, WashQueryService,
};
use crate::inbound::http::auth::{callback, login, logout};
use crate::inbound::http::cleanup::cleanup_storage;
use crate::inbound::http::health::{live, ready, HealthState};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::inbound::http::uploads::issue_upload;
use crate::inbound::http::users::{create_user, delete_user, list_users, update_user};
use crate::inbound::http::washes::{create_wash, delete_wash, list_washes, update_wash};
use crate::middleware::Trace;
use crate::outbound::notify::TracingMailer;
use crate::outbound::persistence::{DbPool, DieselAccountRepository, DieselWashRepository};
use crate::outbound::storage::{S3ObjectStore, StorageSettings};

/// SQL migrations baked into the binary and applied at startup.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Apply pending migrations on a blocking task.
///
/// Diesel's migration harness is synchronous, so the async connection is
/// wrapped and driven off the runtime threads.
pub async fn run_pending_migrations(database_url: String) -> std::io::Result<()> {
    let outcome = tokio::task::spawn_blocking(move || -> Result<(), String> {
        use diesel::Connection;
        use diesel_migrations::MigrationHarness;

        let mut conn = AsyncConnectionWrapper::<AsyncPgConnection>::establish(&database_url)
            .map_err(|err| format!("connect for migrations: {err}"))?;
        conn.run_pending_migrations(MIGRATIONS)
            .map(|_| ())
            .map_err(|err| format!("run migrations: {err}"))
    })
    .await
    .map_err(|err| std::io::Error::other(format!("migration task panicked: {err}")))?;

    outcome.map_err(std::io::Error::other)
}

/// Wire the domain services over their production adapters.
pub fn build_http_state(pool: DbPool, storage: StorageSettings) -> HttpState {
    let accounts = Arc::new(DieselAccountRepository::new(pool.clone()));
    let washes = Arc::new(DieselWashRepository::new(pool));
    let store = Arc::new(S3ObjectStore::new(storage));
    let mailer = Arc::new(TracingMailer);
    let directory = Arc::new(AccountDirectoryService::new(accounts.clone(), mailer));

    HttpState::new(HttpStatePorts {
        login: Arc::new(PasswordLoginService::new(accounts.clone())),
        provisioning: Arc::new(FederatedProvisioningService::new(accounts.clone())),
        washes: Arc::new(WashCommandService::new(
            washes.clone(),
            accounts,
            store.clone(),
        )),
        washes_query: Arc::new(WashQueryService::new(washes.clone())),
        directory: directory.clone(),
        directory_query: directory,
        uploads: Arc::new(UploadBrokerService::new(store.clone())),
        cleanup: Arc::new(CleanupService::new(washes, store)),
    })
}

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    key: Key,
    cookie_secure: bool,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        key,
        cookie_secure,
    } = deps;

    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(SameSite::Lax)
        .session_lifecycle(
            PersistentSession::default().session_ttl(actix_web::cookie::time::Duration::hours(2)),
        )
        .build();

    let api = web::scope("/api/v1")
        .wrap(session)
        .service(login)
        .service(logout)
        .service(callback)
        .service(create_wash)
        .service(list_washes)
        .service(update_wash)
        .service(delete_wash)
        .service(list_users)
        .service(create_user)
        .service(update_user)
        .service(delete_user)
        .service(issue_upload)
        .service(cleanup_storage);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

/// Construct an Actix HTTP server using the provided health state and
/// configuration.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: AppConfig,
    http_state: HttpState,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = web::Data::new(http_state);
    let AppConfig {
        bind_addr, session, ..
    } = config;
    let SessionSettings { key, cookie_secure } = session;

    let server = HttpServer::new(move || {
        let app = build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            key: key.clone(),
            cookie_secure,
        });

        #[cfg(feature = "metrics")]
        let app = app.wrap(make_metrics());

        app
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}

#[cfg(feature = "metrics")]
fn make_metrics() -> actix_web_prom::PrometheusMetrics {
    PrometheusMetricsBuilder::new("truckwash")
        .endpoint("/metrics")
        .build()
        .expect("configure Prometheus metrics")
}
