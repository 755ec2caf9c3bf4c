use facegate_cloud::cloudinary::CloudinaryConfig;
use facegate_cloud::face_engine::DEFAULT_FACE_ENGINE_URL;

/// Server configuration loaded from environment variables.
///
/// Network settings have defaults suitable for local development. The
/// third-party credentials are optional: when absent the server still
/// starts and each request reports the missing collaborator.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `60`).
    pub request_timeout_secs: u64,
    /// Timeout applied to every outbound call (default: `15`).
    pub outbound_timeout_secs: u64,
    /// Root URL of the face encoder service.
    pub face_engine_url: String,
    /// Employee database connection string. `None` when unset.
    pub database_url: Option<String>,
    /// Object-storage credentials. `None` when incomplete.
    pub cloudinary: Option<CloudinaryConfig>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                    |
    /// |-------------------------|----------------------------|
    /// | `HOST`                  | `0.0.0.0`                  |
    /// | `PORT`                  | `3000`                     |
    /// | `CORS_ORIGINS`          | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`  | `60`                       |
    /// | `OUTBOUND_TIMEOUT_SECS` | `15`                       |
    /// | `FACE_ENGINE_URL`       | `http://127.0.0.1:5001`    |
    /// | `DATABASE_URL`          | unset                      |
    ///
    /// Cloudinary credentials are read by [`CloudinaryConfig::from_env`].
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins = parse_origins(
            &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "http://localhost:5173".into()),
        );

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "60".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let outbound_timeout_secs: u64 = std::env::var("OUTBOUND_TIMEOUT_SECS")
            .unwrap_or_else(|_| "15".into())
            .parse()
            .expect("OUTBOUND_TIMEOUT_SECS must be a valid u64");

        let face_engine_url =
            std::env::var("FACE_ENGINE_URL").unwrap_or_else(|_| DEFAULT_FACE_ENGINE_URL.into());

        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());
        if database_url.is_none() {
            tracing::error!("Missing DATABASE_URL. Employee lookups are disabled");
        }

        let cloudinary = CloudinaryConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            outbound_timeout_secs,
            face_engine_url,
            database_url,
            cloudinary,
        }
    }
}

/// Split a comma-separated origin list, dropping blanks.
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
