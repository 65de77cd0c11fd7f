//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

use academy::{MediaConfig, PgAcademyRepository, academy_routers};
use auth::{AuthConfig, PgAuthRepository, auth_router};
use axum::{
    Router, http,
    http::{Method, header},
};
use base64::Engine;
use base64::engine::general_purpose;
use platform::signing::{CdnSigner, StorageSigner};
use sqlx::postgres::PgPoolOptions;
use std::env;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// Re-export unified error types for use in handlers
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,auth=info,academy=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Database connection
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    // Startup cleanup: drop refresh-token rows that can never validate.
    // Errors here should not prevent server startup
    let auth_store_for_cleanup = PgAuthRepository::new(pool.clone());
    match auth_store_for_cleanup.cleanup_expired().await {
        Ok(tokens) => {
            tracing::info!(tokens_deleted = tokens, "Refresh token cleanup completed");
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                "Refresh token cleanup failed, continuing anyway"
            );
        }
    }

    // Auth configuration
    let auth_config = if cfg!(debug_assertions) && env::var("JWT_SECRET").is_err() {
        AuthConfig::development()
    } else {
        let secret = env::var("JWT_SECRET").expect("JWT_SECRET must be set in production");
        AuthConfig::new(secret.into_bytes())?
    };

    // Media configuration
    let media_config = media_config_from_env()?;
    tracing::info!(
        cdn_signing = media_config.cdn_configured(),
        "Media signing configured"
    );

    // CORS configuration
    let frontend_origins = env::var("FRONTEND_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:5173,http://127.0.0.1:5173".to_string());

    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    // Build router
    let codec = auth_config.codec();
    let (courses, progress) = academy_routers(
        PgAcademyRepository::new(pool.clone()),
        PgAuthRepository::new(pool.clone()),
        codec,
        media_config,
    );

    let app = Router::new()
        .nest("/api/auth", auth_router(PgAuthRepository::new(pool), auth_config))
        .nest("/api/courses", courses)
        .nest("/api/progress", progress)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(31180);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Assemble media signing material from the environment
///
/// CDN signing activates only when all three of its variables are set;
/// the pre-signed storage fallback is always available (with generated
/// material in debug builds).
fn media_config_from_env() -> anyhow::Result<MediaConfig> {
    let cdn = match (
        env::var("CDN_DOMAIN"),
        env::var("CDN_KEY_PAIR_ID"),
        env::var("CDN_PRIVATE_KEY"),
    ) {
        (Ok(domain), Ok(key_pair_id), Ok(private_key_b64)) => {
            let seed_bytes = Engine::decode(&general_purpose::STANDARD, &private_key_b64)?;
            let mut seed = [0u8; 32];
            if seed_bytes.len() != seed.len() {
                anyhow::bail!("CDN_PRIVATE_KEY must decode to exactly 32 bytes");
            }
            seed.copy_from_slice(&seed_bytes);
            Some(CdnSigner::new(domain, key_pair_id, seed))
        }
        _ => None,
    };

    let storage = match (
        env::var("MEDIA_ENDPOINT"),
        env::var("MEDIA_BUCKET"),
        env::var("MEDIA_SIGNING_SECRET"),
    ) {
        (Ok(endpoint), Ok(bucket), Ok(secret_b64)) => {
            let secret_bytes = Engine::decode(&general_purpose::STANDARD, &secret_b64)?;
            let mut secret = [0u8; 32];
            if secret_bytes.len() != secret.len() {
                anyhow::bail!("MEDIA_SIGNING_SECRET must decode to exactly 32 bytes");
            }
            secret.copy_from_slice(&secret_bytes);
            StorageSigner::new(endpoint, bucket, secret)
        }
        _ if cfg!(debug_assertions) => {
            return Ok(MediaConfig::new(cdn, development_storage_signer()));
        }
        _ => anyhow::bail!(
            "MEDIA_ENDPOINT, MEDIA_BUCKET and MEDIA_SIGNING_SECRET must be set in production"
        ),
    };

    Ok(MediaConfig::new(cdn, storage))
}

fn development_storage_signer() -> StorageSigner {
    let mut secret = [0u8; 32];
    secret.copy_from_slice(&platform::crypto::random_bytes(32));
    StorageSigner::new("http://localhost:9000", "academy-videos", secret)
}
