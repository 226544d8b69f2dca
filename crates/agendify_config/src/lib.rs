use config::{Config, ConfigError, Environment, File};
use once_cell::sync::OnceCell;
use std::env;

pub mod models;
pub use models::*;

/// Loads the application configuration.
///
/// Sources, later ones winning: `config/default` (optional file, any format
/// the `config` crate understands), `config/{RUN_ENV}` (optional), then
/// environment variables prefixed `AGENDIFY` with `__` as section separator
/// (e.g. `AGENDIFY_OAUTH__CLIENT_SECRET`). A `.env` file is loaded into the
/// environment first so local development does not need exported variables.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    ensure_dotenv_loaded();

    let run_env = env::var("RUN_ENV").unwrap_or_else(|_| "debug".to_string());

    let builder = Config::builder()
        .add_source(File::with_name("config/default").required(false))
        .add_source(File::with_name(&format!("config/{run_env}")).required(false))
        .add_source(Environment::with_prefix("AGENDIFY").separator("__"));

    let config: AppConfig = builder.build()?.try_deserialize()?;
    validate(&config)?;
    Ok(config)
}

/// Rejects configurations that would let the service start but make every
/// authorization flow fail later with an opaque provider error.
fn validate(config: &AppConfig) -> Result<(), ConfigError> {
    let oauth = &config.oauth;
    for (field, value) in [
        ("oauth.client_id", &oauth.client_id),
        ("oauth.client_secret", &oauth.client_secret),
        ("oauth.redirect_uri", &oauth.redirect_uri),
    ] {
        if value.trim().is_empty() {
            return Err(ConfigError::Message(format!("{field} must not be empty")));
        }
    }
    if config.gcal.calendar_id.trim().is_empty() {
        return Err(ConfigError::Message(
            "gcal.calendar_id must not be empty".to_string(),
        ));
    }
    Ok(())
}

static INIT_DOTENV: OnceCell<()> = OnceCell::new();

/// Ensures the dotenv file is loaded into the environment exactly once.
///
/// `DOTENV_OVERRIDE` selects an alternative file; otherwise `.env` is used.
pub fn ensure_dotenv_loaded() {
    let dotenv_path = env::var("DOTENV_OVERRIDE").unwrap_or_else(|_| ".env".to_string());
    INIT_DOTENV.get_or_init(|| {
        dotenv::from_filename(&dotenv_path).ok();
    });
}
