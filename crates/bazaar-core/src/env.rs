// Environment detection and logging bootstrap.

use std::sync::OnceLock;

/// Cached environment mode.
static ENV_MODE: OnceLock<EnvMode> = OnceLock::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvMode {
    Production,
    Development,
    Test,
}

/// Detect the current environment mode from environment variables.
/// Checks `BAZAAR_ENV` then `RUST_ENV`.
pub fn detect_env_mode() -> EnvMode {
    *ENV_MODE.get_or_init(|| {
        let env_val = std::env::var("BAZAAR_ENV")
            .or_else(|_| std::env::var("RUST_ENV"))
            .unwrap_or_default()
            .to_lowercase();

        match env_val.as_str() {
            "production" | "prod" => EnvMode::Production,
            "test" | "testing" => EnvMode::Test,
            _ => EnvMode::Development,
        }
    })
}

pub fn is_production() -> bool {
    detect_env_mode() == EnvMode::Production
}

/// Token-signing secret from the environment.
pub fn secret_from_env() -> Option<String> {
    std::env::var("BAZAAR_SECRET").ok()
}

pub fn database_url_from_env() -> Option<String> {
    std::env::var("DATABASE_URL").ok()
}

pub fn database_name_from_env() -> String {
    std::env::var("DATABASE_NAME").unwrap_or_else(|_| "bazaar".to_string())
}

/// Initialize the `tracing` subscriber. `RUST_LOG` wins; otherwise info
/// in production, debug elsewhere.
pub fn init_logger() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if is_production() {
            EnvFilter::new("bazaar=info")
        } else {
            EnvFilter::new("bazaar=debug")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}
