use std::sync::Arc;

use auth::Authenticator;
use auth::PasswordHasher;
use league_service::config::Config;
use league_service::domain::auth::service::AuthService;
use league_service::domain::user::service::UserService;
use league_service::inbound::http::router::create_router;
use league_service::inbound::http::router::AppState;
use league_service::outbound::notifications::LoggingResetTokenNotifier;
use league_service::outbound::repositories::PostgresPasswordResetRepository;
use league_service::outbound::repositories::PostgresUserRepository;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "league_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "league-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        jwt_expiration_hours = config.jwt.expiration_hours,
        reset_expiration_minutes = config.reset.expiration_minutes,
        cookie_secure = config.cookie.secure,
        "Configuration loaded"
    );

    let password_hasher =
        PasswordHasher::with_settings(config.password.cost(), config.password.policy())?;
    let authenticator = Arc::new(
        Authenticator::new(config.jwt.secret.as_bytes(), config.jwt.expiration_hours)
            .with_password_hasher(password_hasher),
    );

    // Refuse to serve if the OS random source cannot produce tokens
    authenticator.self_check()?;
    tracing::info!("Secure random source available");

    let pg_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = config.database.max_connections,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let user_repository = Arc::new(PostgresUserRepository::new(pg_pool.clone()));
    let reset_repository = Arc::new(PostgresPasswordResetRepository::new(pg_pool));
    let notifier = Arc::new(LoggingResetTokenNotifier::new());

    let auth_service = Arc::new(AuthService::new(
        Arc::clone(&user_repository),
        reset_repository,
        notifier,
        Arc::clone(&authenticator),
        chrono::Duration::minutes(config.reset.expiration_minutes),
    ));
    let user_service = Arc::new(UserService::new(user_repository));

    let state = AppState {
        auth_service,
        user_service,
        authenticator,
        cookie: config.cookie.clone(),
    };
    let http_application = create_router(state, &config.cors);

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    if let Err(e) = axum::serve(http_listener, http_application).await {
        tracing::error!(error = %e, "Server error");
        return Err(e.into());
    }

    tracing::info!("Server exited successfully");

    Ok(())
}
