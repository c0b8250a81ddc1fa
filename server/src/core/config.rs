use crate::auth::JwtConfig;

/// Server configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | WORK_DIR | ./data | database and log files |
/// | HTTP_PORT | 3000 | HTTP + Socket.IO port |
/// | ENVIRONMENT | development | development \| production |
/// | CORS_ORIGIN | (permissive) | allowed browser origin |
/// | LOG_LEVEL | info | tracing filter fallback |
/// | LOG_TO_FILE | false | daily rolling file under WORK_DIR/logs |
///
/// JWT and admin-credential variables are documented in the auth module.
#[derive(Debug, Clone)]
pub struct Config {
    /// Work directory holding the database and log files
    pub work_dir: String,
    pub http_port: u16,
    pub jwt: JwtConfig,
    /// development | production
    pub environment: String,
    /// Exact allowed origin; None means a permissive CORS layer
    pub cors_origin: Option<String>,
    pub log_level: String,
    pub log_to_file: bool,
}

impl Config {
    /// Load configuration from the environment, with defaults
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            jwt: JwtConfig::default(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            cors_origin: std::env::var("CORS_ORIGIN").ok().filter(|o| !o.is_empty()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_to_file: std::env::var("LOG_TO_FILE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Path of the embedded database under the work directory
    pub fn db_path(&self) -> String {
        format!("{}/comanda.db", self.work_dir)
    }

    /// Log directory under the work directory
    pub fn log_dir(&self) -> String {
        format!("{}/logs", self.work_dir)
    }
}
