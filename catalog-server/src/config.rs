//! Server configuration

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Catalog server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite database file path
    pub database_path: String,
    /// HTTP port
    pub http_port: u16,
    /// Upstream catalog feed URL (env: CATALOG_FEED_URL); sync is rejected when unset
    pub catalog_feed_url: Option<String>,
    /// Upstream catalog access token (env: CATALOG_ACCESS_TOKEN), sent as X-Access-Token
    pub catalog_access_token: Option<String>,
    /// Products per feed page request
    pub feed_page_size: u32,
    /// JWT secret for admin authentication
    pub jwt_secret: String,
    /// Admin login username
    pub admin_username: String,
    /// Argon2 hash of the admin password (env: ADMIN_PASSWORD_HASH)
    pub admin_password_hash: String,
    /// Environment: development | staging | production
    pub environment: String,
}

impl Config {
    /// Require a secret env var: must be set and non-empty in non-development environments.
    fn require_secret(name: &str, environment: &str) -> Result<String, BoxError> {
        let val = match std::env::var(name) {
            Ok(v) => v,
            Err(_) => {
                if environment != "development" {
                    return Err(format!("{name} must be set in {environment} environment").into());
                }
                format!("dev-{name}-not-for-production")
            }
        };
        if val.is_empty() && environment != "development" {
            return Err(format!("{name} must not be empty in {environment} environment").into());
        }
        Ok(val)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());

        Ok(Self {
            database_path: std::env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "data/catalog.db".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            catalog_feed_url: std::env::var("CATALOG_FEED_URL")
                .ok()
                .filter(|s| !s.is_empty()),
            catalog_access_token: std::env::var("CATALOG_ACCESS_TOKEN")
                .ok()
                .filter(|s| !s.is_empty()),
            feed_page_size: std::env::var("CATALOG_FEED_PAGE_SIZE")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(250),
            jwt_secret: Self::require_secret("JWT_SECRET", &environment)?,
            admin_username: std::env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".into()),
            admin_password_hash: Self::require_secret("ADMIN_PASSWORD_HASH", &environment)?,
            environment,
        })
    }

    /// Feed URL and access token, when both are configured
    pub fn feed_credentials(&self) -> Option<(&str, &str)> {
        match (&self.catalog_feed_url, &self.catalog_access_token) {
            (Some(url), Some(token)) => Some((url.as_str(), token.as_str())),
            _ => None,
        }
    }
}
