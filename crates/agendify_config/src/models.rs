// --- File: crates/agendify_config/src/models.rs ---

use chrono::Weekday;
use serde::{Deserialize, Serialize};

// --- General Server Config ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

// --- OAuth Config ---
// Holds the OAuth2 client registration. The client secret is normally loaded
// via the AGENDIFY_OAUTH__CLIENT_SECRET env var rather than a config file.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct OAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    /// Where the auth callback sends the browser after a successful exchange.
    pub post_auth_redirect: String,
}

// --- Google Calendar Config ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GcalConfig {
    pub calendar_id: String,
    /// IANA time zone the salon operates in.
    #[serde(default = "default_time_zone")]
    pub time_zone: String,
    /// Street address written into created events.
    #[serde(default)]
    pub location: Option<String>,
    /// Business address invited as attendee on every event.
    #[serde(default)]
    pub business_email: Option<String>,
    /// On-disk path of the persisted OAuth credential.
    #[serde(default = "default_token_path")]
    pub token_path: String,
}

fn default_time_zone() -> String {
    "America/Sao_Paulo".to_string()
}

fn default_token_path() -> String {
    "token.json".to_string()
}

// --- Booking Rules ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BookingConfig {
    /// Opening time, "HH:MM".
    #[serde(default = "default_open_time")]
    pub open_time: String,
    /// Closing time, "HH:MM". No appointment may start at or after it.
    #[serde(default = "default_close_time")]
    pub close_time: String,
    /// Granularity of candidate starts, in minutes.
    #[serde(default = "default_slot_minutes")]
    pub slot_minutes: u32,
    /// Fixed length of one appointment, in minutes.
    #[serde(default = "default_appointment_minutes")]
    pub appointment_minutes: u32,
    /// Weekdays the salon does not open ("Sun", "Mon", ...).
    #[serde(default = "default_closed_weekdays")]
    pub closed_weekdays: Vec<String>,
}

fn default_open_time() -> String {
    "09:00".to_string()
}

fn default_close_time() -> String {
    "19:00".to_string()
}

fn default_slot_minutes() -> u32 {
    30
}

fn default_appointment_minutes() -> u32 {
    60
}

fn default_closed_weekdays() -> Vec<String> {
    vec!["Sun".to_string(), "Mon".to_string()]
}

impl Default for BookingConfig {
    fn default() -> Self {
        BookingConfig {
            open_time: default_open_time(),
            close_time: default_close_time(),
            slot_minutes: default_slot_minutes(),
            appointment_minutes: default_appointment_minutes(),
            closed_weekdays: default_closed_weekdays(),
        }
    }
}

impl BookingConfig {
    /// Closed weekdays parsed to chrono, unknown names ignored.
    pub fn closed_weekdays(&self) -> Vec<Weekday> {
        self.closed_weekdays
            .iter()
            .filter_map(|day| match day.as_str() {
                "Mon" => Some(Weekday::Mon),
                "Tue" => Some(Weekday::Tue),
                "Wed" => Some(Weekday::Wed),
                "Thu" => Some(Weekday::Thu),
                "Fri" => Some(Weekday::Fri),
                "Sat" => Some(Weekday::Sat),
                "Sun" => Some(Weekday::Sun),
                _ => None,
            })
            .collect()
    }
}

// --- Unified App Configuration ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub oauth: OAuthConfig,
    pub gcal: GcalConfig,
    #[serde(default)]
    pub booking: BookingConfig,
    /// Directory of static form assets served at the root, if any.
    #[serde(default)]
    pub static_dir: Option<String>,
}
