use config::{Config, ConfigError, Environment, File};
use once_cell::sync::OnceCell;
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;
pub mod models;
pub use models::*;

/// Environment prefix for overrides, e.g. `COUNSELIFY_BOOKING__SLOT_LENGTH_MINUTES=45`.
pub const ENV_PREFIX: &str = "COUNSELIFY";

/// Loads the application configuration.
///
/// Sources, later ones winning:
/// 1. `{CONFIG_DIR}/default.{toml,yaml,json}` (optional)
/// 2. `{CONFIG_DIR}/{RUN_ENV}.{toml,yaml,json}` (optional, `RUN_ENV` defaults to "debug")
/// 3. environment variables prefixed with `COUNSELIFY` using `__` as separator
///
/// `CONFIG_DIR` defaults to `./config`.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    ensure_dotenv_loaded();

    let run_env = env::var("RUN_ENV").unwrap_or_else(|_| "debug".to_string());
    let config_dir = env::var("CONFIG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config"));

    load_config_from(&config_dir, &run_env, ENV_PREFIX)
}

/// Loads configuration from an explicit directory, run environment and env prefix.
pub fn load_config_from(
    config_dir: &Path,
    run_env: &str,
    prefix: &str,
) -> Result<AppConfig, ConfigError> {
    let default_path = config_dir.join("default");
    let env_path = config_dir.join(run_env);

    debug!("config: default_path: {}", default_path.display());
    debug!("config: env_path: {}", env_path.display());

    let builder = Config::builder()
        .add_source(File::with_name(&default_path.to_string_lossy()).required(false))
        .add_source(File::with_name(&env_path.to_string_lossy()).required(false))
        .add_source(
            Environment::with_prefix(prefix)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

    let app_config: AppConfig = builder.build()?.try_deserialize()?;
    if app_config.booking.slot_length_minutes == 0 {
        return Err(ConfigError::Message(
            "booking.slot_length_minutes must be greater than zero".to_string(),
        ));
    }
    Ok(app_config)
}

static INIT_DOTENV: OnceCell<()> = OnceCell::new();

/// Ensures that the dotenv file is loaded into the environment variables.
///
/// The file is `DOTENV_OVERRIDE` if set, otherwise `.env`. Loading happens at
/// most once per process; a missing file is not an error. Returns the path
/// that was (or would have been) loaded.
pub fn ensure_dotenv_loaded() -> String {
    let dotenv_path = std::env::var("DOTENV_OVERRIDE").unwrap_or_else(|_| ".env".to_string());

    INIT_DOTENV.get_or_init(|| {
        dotenv::from_filename(&dotenv_path).ok();
    });

    dotenv_path
}
