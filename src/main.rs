use actix_web::{middleware, web, App, HttpServer};
use anyhow::Result;
use secrecy::SecretString;
use std::env;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::EnvFilter;
use venue_desk::api::state::AppConfig;
use venue_desk::api::{configure_routes, ApiState};
use venue_desk::core::{DriveConfig, HijriConfig, HolidayConfig, VenueConfig};

#[actix_web::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Starting Venue Desk API");

    // Initialize Prometheus metrics
    prometheus::default_registry().register(Box::new(
        prometheus::process_collector::ProcessCollector::for_self(),
    ))?;

    // Load configuration
    let config = load_config()?;

    // Initialize application state
    let state = web::Data::new(ApiState::new(config).await?);

    // Get server settings
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = env::var("PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse::<u16>()?;

    tracing::info!("Starting server on {}:{}", host, port);

    // Start HTTP server
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(TracingLogger::default())
            .wrap(middleware::NormalizePath::trim())
            .configure(configure_routes)
    })
    .bind((host.as_str(), port))?
    .run()
    .await?;

    Ok(())
}

fn load_config() -> Result<AppConfig> {
    let defaults = AppConfig::default();

    let venue = VenueConfig {
        name: env_or("VENUE_NAME", &defaults.venue.name),
        address: env_or("VENUE_ADDRESS", &defaults.venue.address),
        gstin: env_or("VENUE_GSTIN", &defaults.venue.gstin),
        phone: env_or("VENUE_PHONE", &defaults.venue.phone),
        email: env_opt("VENUE_EMAIL"),
    };

    let drive = DriveConfig {
        app_key: env_or("DROPBOX_APP_KEY", ""),
        app_secret: SecretString::new(env_or("DROPBOX_APP_SECRET", "")),
        refresh_token_fallback: env_opt("DROPBOX_REFRESH_TOKEN").map(SecretString::new),
        redirect_uri: env_or("DROPBOX_REDIRECT_URI", &defaults.drive.redirect_uri),
        ..DriveConfig::default()
    };

    let holidays = HolidayConfig {
        api_key: env_or("GOOGLE_CALENDAR_API_KEY", ""),
        ..HolidayConfig::default()
    };

    let config = AppConfig {
        database_url: env_or("DATABASE_URL", &defaults.database_url),
        max_upload_size_bytes: env_or("MAX_UPLOAD_SIZE_BYTES", "10485760").parse()?,
        jwt_secret: SecretString::new(env_or("JWT_SECRET", "dev-only-secret")),
        admin_user: env_or("ADMIN_USER", &defaults.admin_user),
        admin_password: SecretString::new(env_or("ADMIN_PASSWORD", "changeme")),
        venue,
        drive,
        hijri: HijriConfig::default(),
        holidays,
    };

    Ok(config)
}

fn env_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn env_opt(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.is_empty())
}
