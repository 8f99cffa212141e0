//! EMS Server - Event Management System
//!
//! REST API server for events, registrations and related content.

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use ems_server::{
    api,
    config::AppConfig,
    logging,
    repository::Repository,
    services::{email, Services},
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let _log_guard = logging::init(&config.logging)?;

    tracing::info!("Starting EMS Server v{}", env!("CARGO_PKG_VERSION"));

    // Create database connection pool
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await
        .context("Failed to connect to database")?;

    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    tracing::info!("Database migrations completed");

    let mailer = email::mailer_from_config(&config.email).context("Failed to set up mail transport")?;

    let repository = Repository::new(pool);
    let services = Services::new(repository, &config, mailer);

    services
        .users
        .ensure_default_admin()
        .await
        .context("Failed to create default admin")?;
    services.files.init().await.context("Failed to create upload directory")?;

    let addr = SocketAddr::new(
        config.server.host.parse().context("Invalid host address")?,
        config.server.port,
    );

    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    };

    let app = create_router(state)?;

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;

    Ok(())
}

/// Create the application router with all routes
fn create_router(state: AppState) -> anyhow::Result<Router> {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let upload_limit = state.services.files.max_bytes();
    let governor = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(state.config.rate_limit.per_second)
            .burst_size(state.config.rate_limit.burst_size)
            .finish()
            .context("Invalid rate limit configuration")?,
    );

    // Credential endpoints are rate limited per client address
    let auth_routes = Router::new()
        .route("/auth/register", post(api::auth::register))
        .route("/auth/login", post(api::auth::login))
        .route("/auth/forgot-password", post(api::auth::forgot_password))
        .route("/auth/contact", post(api::auth::contact))
        .layer(GovernorLayer { config: governor });

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Authentication
        .merge(auth_routes)
        .route("/auth/logout", post(api::auth::logout))
        .route("/auth/me", get(api::auth::me))
        .route("/auth/me/registrations", get(api::auth::my_registrations))
        .route("/auth/password", put(api::auth::change_password))
        .route("/auth/reset-password", post(api::auth::reset_password))
        // Users
        .route("/users", get(api::users::list_users).post(api::users::create_user))
        .route(
            "/users/:id",
            get(api::users::get_user)
                .put(api::users::update_user)
                .delete(api::users::delete_user),
        )
        .route("/users/:id/registrations", get(api::users::get_user_registrations))
        // Departments
        .route(
            "/departments",
            get(api::departments::list_departments).post(api::departments::create_department),
        )
        .route(
            "/departments/:id",
            get(api::departments::get_department)
                .put(api::departments::update_department)
                .delete(api::departments::delete_department),
        )
        // Offices
        .route("/offices", get(api::offices::list_offices).post(api::offices::create_office))
        .route(
            "/offices/:id",
            get(api::offices::get_office)
                .put(api::offices::update_office)
                .delete(api::offices::delete_office),
        )
        // Events
        .route("/events", get(api::events::list_events).post(api::events::create_event))
        .route(
            "/events/:id",
            get(api::events::get_event)
                .put(api::events::update_event)
                .delete(api::events::delete_event),
        )
        .route("/events/:id/approve", post(api::events::approve_event))
        .route("/events/:id/reject", post(api::events::reject_event))
        // Registrations
        .route(
            "/events/:id/register",
            post(api::registrations::register).delete(api::registrations::cancel),
        )
        .route("/events/:id/is-registered", get(api::registrations::is_registered))
        .route("/events/:id/registrations", get(api::registrations::list_registrations))
        .route("/events/:id/registered-users", get(api::registrations::registered_users))
        .route(
            "/events/:id/registrations/:registration_id/check-in",
            put(api::registrations::check_in),
        )
        // Communications
        .route(
            "/communications",
            get(api::communications::list_communications).post(api::communications::create_communication),
        )
        .route(
            "/communications/:id",
            get(api::communications::get_communication)
                .put(api::communications::update_communication)
                .delete(api::communications::delete_communication),
        )
        .route("/communications/:id/approve", put(api::communications::approve_communication))
        .route("/communications/:id/reject", put(api::communications::reject_communication))
        .route("/communications/:id/unapprove", put(api::communications::unapprove_communication))
        .route("/communications/:id/submit", put(api::communications::submit_communication))
        .route("/communications/:id/share", post(api::communications::share_communication))
        .route("/communications/:id/view", post(api::communications::view_communication))
        // Event reports
        .route(
            "/event-reports",
            get(api::event_reports::list_reports).post(api::event_reports::create_report),
        )
        .route("/event-reports/event/:event_id", get(api::event_reports::list_reports_by_event))
        .route(
            "/event-reports/:id",
            get(api::event_reports::get_report)
                .put(api::event_reports::update_report)
                .delete(api::event_reports::delete_report),
        )
        .route("/event-reports/:id/approve", put(api::event_reports::approve_report))
        .route("/event-reports/:id/reject", put(api::event_reports::reject_report))
        .route("/event-reports/:id/request-revision", put(api::event_reports::request_revision))
        // Sliders
        .route("/sliders", get(api::sliders::list_sliders).post(api::sliders::create_slider))
        .route("/sliders/active", get(api::sliders::list_active_sliders))
        .route(
            "/sliders/:id",
            get(api::sliders::get_slider)
                .put(api::sliders::update_slider)
                .delete(api::sliders::delete_slider),
        )
        .route("/sliders/:id/status", put(api::sliders::set_slider_status))
        .route("/sliders/:id/order", put(api::sliders::set_slider_order))
        // News
        .route("/news", get(api::news::list_active_news).post(api::news::create_news))
        .route("/news/all", get(api::news::list_all_news))
        .route(
            "/news/:id",
            get(api::news::get_news)
                .put(api::news::update_news)
                .delete(api::news::delete_news),
        )
        // Statistics
        .route("/statistics/summary", get(api::stats::get_summary))
        // Files
        .route(
            "/files/upload",
            post(api::files::upload).layer(DefaultBodyLimit::max(upload_limit.saturating_mul(4))),
        )
        .route("/files/download/:name", get(api::files::download))
        .route("/files/:name", delete(api::files::delete_file))
        .with_state(state);

    // OpenAPI documentation
    let openapi = api::openapi::create_openapi_router();

    Ok(Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors))
}
