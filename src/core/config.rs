use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// Identity block printed on every invoice and used for GST registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VenueConfig {
    pub name: String,
    pub address: String,
    pub gstin: String,
    pub phone: String,
    pub email: Option<String>,
}

impl Default for VenueConfig {
    fn default() -> Self {
        VenueConfig {
            name: "Function Hall".to_string(),
            address: "Main Road".to_string(),
            gstin: "00AAAAA0000A0Z0".to_string(),
            phone: "0000000000".to_string(),
            email: None,
        }
    }
}

/// OAuth app credentials and endpoints for the blob store provider.
///
/// Base URLs are configurable so tests can point the client at a local
/// mock server. The refresh token itself lives in the credential store,
/// with `refresh_token_fallback` used until the connect flow has run.
#[derive(Debug, Clone)]
pub struct DriveConfig {
    pub api_base_url: String,
    pub content_base_url: String,
    pub authorize_url: String,
    pub redirect_uri: String,
    pub app_key: String,
    pub app_secret: SecretString,
    pub refresh_token_fallback: Option<SecretString>,
    pub timeout_secs: u64,
}

impl Default for DriveConfig {
    fn default() -> Self {
        DriveConfig {
            api_base_url: "https://api.dropboxapi.com".to_string(),
            content_base_url: "https://content.dropboxapi.com".to_string(),
            authorize_url: "https://www.dropbox.com/oauth2/authorize".to_string(),
            redirect_uri: "http://localhost:8080/api/drive/callback".to_string(),
            app_key: String::new(),
            app_secret: SecretString::new(String::new()),
            refresh_token_fallback: None,
            timeout_secs: 30,
        }
    }
}

/// Hijri calendar feed settings. Coordinates select the calculation
/// method reference point.
#[derive(Debug, Clone)]
pub struct HijriConfig {
    pub base_url: String,
    pub latitude: f64,
    pub longitude: f64,
    pub timeout_secs: u64,
}

impl Default for HijriConfig {
    fn default() -> Self {
        HijriConfig {
            base_url: "https://api.aladhan.com".to_string(),
            latitude: 12.9716,
            longitude: 77.5946,
            timeout_secs: 30,
        }
    }
}

/// Public holiday feed settings.
#[derive(Debug, Clone)]
pub struct HolidayConfig {
    pub base_url: String,
    pub api_key: String,
    pub calendar_id: String,
    pub timeout_secs: u64,
}

impl Default for HolidayConfig {
    fn default() -> Self {
        HolidayConfig {
            base_url: "https://www.googleapis.com/calendar/v3".to_string(),
            api_key: String::new(),
            calendar_id: "en.indian#holiday@group.v.calendar.google.com".to_string(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone)]
pub enum PageSize {
    A4,
    Letter,
}

impl PageSize {
    pub fn dimensions(&self) -> (f32, f32) {
        match self {
            PageSize::A4 => (210.0, 297.0),
            PageSize::Letter => (215.9, 279.4),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Margin {
    pub top: f32,
    pub bottom: f32,
    pub left: f32,
    pub right: f32,
}

impl Default for Margin {
    fn default() -> Self {
        Margin::uniform(15.0)
    }
}

impl Margin {
    pub fn uniform(size: f32) -> Self {
        Margin {
            top: size,
            bottom: size,
            left: size,
            right: size,
        }
    }
}

/// Page geometry the layout engine works against.
#[derive(Debug, Clone, Default)]
pub struct PageLayout {
    pub size: PageSize,
    pub margin: Margin,
}

impl Default for PageSize {
    fn default() -> Self {
        PageSize::A4
    }
}

impl PageLayout {
    pub fn width(&self) -> f32 {
        self.size.dimensions().0
    }

    pub fn height(&self) -> f32 {
        self.size.dimensions().1
    }

    pub fn content_width(&self) -> f32 {
        self.width() - self.margin.left - self.margin.right
    }
}
