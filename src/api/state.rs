use std::sync::Arc;

use prometheus::IntCounter;
use secrecy::{ExposeSecret, SecretString};
use sqlx::SqlitePool;

use crate::calendar::{HijriClient, HolidayClient};
use crate::core::{DriveConfig, HijriConfig, HolidayConfig, VenueConfig};
use crate::storage::{CredentialStore, DriveClient, SqliteCredentialStore};
use crate::store;

#[derive(Clone)]
pub struct ApiState {
    pub db: SqlitePool,
    pub drive: Arc<DriveClient>,
    pub credentials: Arc<dyn CredentialStore>,
    pub hijri: Arc<HijriClient>,
    pub holidays: Arc<HolidayClient>,
    pub metrics: Metrics,
    pub config: Arc<AppConfig>,
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub max_upload_size_bytes: usize,
    pub jwt_secret: SecretString,
    pub admin_user: String,
    pub admin_password: SecretString,
    pub venue: VenueConfig,
    pub drive: DriveConfig,
    pub hijri: HijriConfig,
    pub holidays: HolidayConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            database_url: "sqlite:venue.db".to_string(),
            max_upload_size_bytes: 10_485_760, // 10MB per receipt
            jwt_secret: SecretString::new("dev-only-secret".to_string()),
            admin_user: "admin".to_string(),
            admin_password: SecretString::new("changeme".to_string()),
            venue: VenueConfig::default(),
            drive: DriveConfig::default(),
            hijri: HijriConfig::default(),
            holidays: HolidayConfig::default(),
        }
    }
}

/// Counters for the invoice pipeline, exported through `/metrics`.
#[derive(Clone)]
pub struct Metrics {
    pub invoices_generated: IntCounter,
    pub invoice_failures: IntCounter,
    pub receipts_uploaded: IntCounter,
}

impl Metrics {
    fn register() -> anyhow::Result<Metrics> {
        let invoices_generated = IntCounter::new(
            "invoices_generated_total",
            "GST invoices rendered and uploaded",
        )?;
        let invoice_failures = IntCounter::new(
            "invoice_failures_total",
            "Bookings saved without an invoice because generation failed",
        )?;
        let receipts_uploaded = IntCounter::new(
            "receipts_uploaded_total",
            "Expense receipt files stored in the drive",
        )?;
        for collector in [&invoices_generated, &invoice_failures, &receipts_uploaded] {
            register_collector(collector.clone())?;
        }
        Ok(Metrics {
            invoices_generated,
            invoice_failures,
            receipts_uploaded,
        })
    }
}

/// Tests build several states in one process; the first registration of
/// each counter wins and later duplicates are not an error.
fn register_collector(counter: IntCounter) -> anyhow::Result<()> {
    match prometheus::default_registry().register(Box::new(counter)) {
        Ok(()) | Err(prometheus::Error::AlreadyReg) => Ok(()),
        Err(e) => Err(e.into()),
    }
}

impl ApiState {
    pub async fn new(config: AppConfig) -> anyhow::Result<Self> {
        // Initialize database
        let db = store::connect(&config.database_url).await?;
        store::init_schema(&db).await?;

        // Seed the bootstrap operator account
        let password_hash =
            bcrypt::hash(config.admin_password.expose_secret(), bcrypt::DEFAULT_COST)?;
        store::users::ensure_seed_user(&db, &config.admin_user, &password_hash).await?;

        // Initialize the drive client over the persisted credential
        let credentials: Arc<dyn CredentialStore> = Arc::new(SqliteCredentialStore::new(
            db.clone(),
            config.drive.refresh_token_fallback.clone(),
        ));
        let drive = Arc::new(DriveClient::new(config.drive.clone(), credentials.clone())?);

        // Initialize calendar feed clients
        let hijri = Arc::new(HijriClient::new(config.hijri.clone())?);
        let holidays = Arc::new(HolidayClient::new(config.holidays.clone())?);

        let metrics = Metrics::register()?;

        Ok(ApiState {
            db,
            drive,
            credentials,
            hijri,
            holidays,
            metrics,
            config: Arc::new(config),
        })
    }
}
