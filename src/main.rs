use numguess::{
    build_router,
    config::AppConfig,
    scores::repository::{
        GameRecordRepository, InMemoryGameRecordRepository, PostgresGameRecordRepository,
    },
    shared::AppState,
    user::{InMemoryUserRepository, PostgresUserRepository, UserRepository},
    TokenConfig,
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "numguess=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting number guessing score server");

    let config = AppConfig::from_env()?;

    let (user_repository, score_repository): (
        Arc<dyn UserRepository>,
        Arc<dyn GameRecordRepository>,
    ) = match &config.database_url {
        Some(database_url) => {
            let pool = PgPoolOptions::new()
                .max_connections(10)
                .connect(database_url)
                .await?;
            sqlx::migrate!("./migrations").run(&pool).await?;
            info!("Connected to PostgreSQL and applied migrations");

            (
                Arc::new(PostgresUserRepository::new(pool.clone())),
                Arc::new(PostgresGameRecordRepository::new(pool)),
            )
        }
        None => {
            warn!("DATABASE_URL not set, using in-memory stores");
            (
                Arc::new(InMemoryUserRepository::new()),
                Arc::new(InMemoryGameRecordRepository::new()),
            )
        }
    };

    let bind_address = config.bind_address.clone();
    let app_state = AppState::new(
        user_repository,
        score_repository,
        TokenConfig::new(),
        config,
    );

    let app = build_router(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!(address = %bind_address, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
