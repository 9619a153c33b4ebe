use std::env;
use std::path::PathBuf;

/// How domain errors are translated into HTTP status codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusMode {
    /// Validation -> 400, constraint -> 409, missing id -> 404, the rest -> 500
    Hardened,
    /// Every failure -> 500, GET of a missing id -> 200 with a null contact
    Legacy,
}

impl StatusMode {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "legacy" => StatusMode::Legacy,
            "hardened" => StatusMode::Hardened,
            other => {
                tracing::warn!("Unknown STATUS_MODE '{}', using hardened", other);
                StatusMode::Hardened
            }
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub upload_dir: PathBuf,
    pub status_mode: StatusMode,
    pub prune_uploads: bool,
    pub seed_demo: bool,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://contacts.db?mode=rwc".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5001),
            upload_dir: env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("uploads")),
            status_mode: env::var("STATUS_MODE")
                .map(|v| StatusMode::parse(&v))
                .unwrap_or(StatusMode::Hardened),
            prune_uploads: env::var("PRUNE_UPLOADS")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
            seed_demo: env::var("SEED_DEMO").is_ok(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 6] = [
        "DATABASE_URL",
        "PORT",
        "UPLOAD_DIR",
        "STATUS_MODE",
        "PRUNE_UPLOADS",
        "SEED_DEMO",
    ];

    fn clear_env() {
        for var in VARS {
            // SAFETY: tests touching the environment are serialized
            unsafe { env::remove_var(var) };
        }
    }

    #[test]
    #[serial]
    fn defaults_when_unset() {
        clear_env();
        let config = Config::from_env();
        assert_eq!(config.port, 5001);
        assert_eq!(config.upload_dir, PathBuf::from("uploads"));
        assert_eq!(config.status_mode, StatusMode::Hardened);
        assert!(!config.prune_uploads);
        assert!(!config.seed_demo);
        assert!(config.database_url.starts_with("sqlite://"));
    }

    #[test]
    #[serial]
    fn reads_overrides() {
        clear_env();
        unsafe {
            env::set_var("PORT", "8080");
            env::set_var("STATUS_MODE", "Legacy");
            env::set_var("PRUNE_UPLOADS", "1");
            env::set_var("UPLOAD_DIR", "/tmp/contact-images");
        }
        let config = Config::from_env();
        assert_eq!(config.port, 8080);
        assert_eq!(config.status_mode, StatusMode::Legacy);
        assert!(config.prune_uploads);
        assert_eq!(config.upload_dir, PathBuf::from("/tmp/contact-images"));
        clear_env();
    }

    #[test]
    #[serial]
    fn invalid_port_falls_back() {
        clear_env();
        unsafe { env::set_var("PORT", "not-a-port") };
        assert_eq!(Config::from_env().port, 5001);
        clear_env();
    }
}
