use std::fmt;

#[cfg(feature = "config")]
use core_config::{ConfigError, FromEnv, env_first, env_parse_or};

/// Connection string used when none is configured.
pub const DEFAULT_URL: &str = "mongodb://localhost:27017";

/// Database holding the `events` collection.
pub const DEFAULT_DATABASE: &str = "Social-events";

/// MongoDB connection settings.
///
/// Constructed manually or, with the `config` feature, from environment
/// variables. Credentials are kept out of the URL and applied as a driver
/// credential, so passwords never need URL-encoding.
#[derive(Clone)]
pub struct MongoConfig {
    /// Connection string: mongodb[+srv]://host[:port][/?options]
    pub url: String,

    /// Database name
    pub database: String,

    /// Username applied as a driver credential
    pub username: Option<String>,

    /// Password applied as a driver credential
    pub password: Option<String>,

    /// Application name reported in server logs
    pub app_name: Option<String>,

    pub max_pool_size: u32,

    pub min_pool_size: u32,

    pub connect_timeout_secs: u64,

    pub server_selection_timeout_secs: u64,
}

impl MongoConfig {
    /// Config for `url` using the default database.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Config for `url` and a specific database.
    pub fn with_database(url: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            database: database.into(),
            ..Self::default()
        }
    }

    /// Set username and password for authentication
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Set the application name for server logs
    pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = Some(app_name.into());
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    /// The connection string with any inline `user:password@` replaced, for logs.
    pub fn redacted_url(&self) -> String {
        redact_url(&self.url)
    }
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            database: DEFAULT_DATABASE.to_string(),
            username: None,
            password: None,
            app_name: None,
            max_pool_size: 100,
            min_pool_size: 5,
            connect_timeout_secs: 10,
            server_selection_timeout_secs: 30,
        }
    }
}

impl fmt::Debug for MongoConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MongoConfig")
            .field("url", &self.redacted_url())
            .field("database", &self.database)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("app_name", &self.app_name)
            .field("max_pool_size", &self.max_pool_size)
            .field("min_pool_size", &self.min_pool_size)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field(
                "server_selection_timeout_secs",
                &self.server_selection_timeout_secs,
            )
            .finish()
    }
}

fn redact_url(url: &str) -> String {
    let Some(scheme_end) = url.find("://") else {
        return url.to_string();
    };
    let rest = &url[scheme_end + 3..];
    let authority_end = rest.find('/').unwrap_or(rest.len());
    match rest[..authority_end].rfind('@') {
        Some(at) => format!("{}***{}", &url[..scheme_end + 3], &rest[at..]),
        None => url.to_string(),
    }
}

/// Load MongoConfig from environment variables
///
/// - `MONGODB_URL` or `MONGO_URL` (default `mongodb://localhost:27017`)
/// - `MONGODB_DATABASE` or `MONGO_DATABASE` (default `Social-events`)
/// - `DB_USERNAME` and `DB_PASSWORD` (optional, used only when both are set)
/// - `MONGODB_APP_NAME` (optional)
/// - `MONGODB_MAX_POOL_SIZE` (default 100), `MONGODB_MIN_POOL_SIZE` (default 5)
/// - `MONGODB_CONNECT_TIMEOUT_SECS` (default 10)
/// - `MONGODB_SERVER_SELECTION_TIMEOUT_SECS` (default 30)
#[cfg(feature = "config")]
impl FromEnv for MongoConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let url = env_first(&["MONGODB_URL", "MONGO_URL"]).unwrap_or(defaults.url);
        let database =
            env_first(&["MONGODB_DATABASE", "MONGO_DATABASE"]).unwrap_or(defaults.database);

        let (username, password) = match (
            std::env::var("DB_USERNAME").ok(),
            std::env::var("DB_PASSWORD").ok(),
        ) {
            (Some(user), Some(pass)) => (Some(user), Some(pass)),
            _ => (None, None),
        };

        Ok(Self {
            url,
            database,
            username,
            password,
            app_name: std::env::var("MONGODB_APP_NAME").ok(),
            max_pool_size: env_parse_or("MONGODB_MAX_POOL_SIZE", defaults.max_pool_size)?,
            min_pool_size: env_parse_or("MONGODB_MIN_POOL_SIZE", defaults.min_pool_size)?,
            connect_timeout_secs: env_parse_or(
                "MONGODB_CONNECT_TIMEOUT_SECS",
                defaults.connect_timeout_secs,
            )?,
            server_selection_timeout_secs: env_parse_or(
                "MONGODB_SERVER_SELECTION_TIMEOUT_SECS",
                defaults.server_selection_timeout_secs,
            )?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mongo_config_new_uses_events_database() {
        let config = MongoConfig::new("mongodb://db:27017");
        assert_eq!(config.url, "mongodb://db:27017");
        assert_eq!(config.database, "Social-events");
        assert_eq!(config.max_pool_size, 100);
        assert_eq!(config.min_pool_size, 5);
    }

    #[test]
    fn test_mongo_config_with_credentials() {
        let config = MongoConfig::with_database("mongodb://db:27017", "events_test")
            .with_credentials("alice", "s3cr3t");
        assert_eq!(config.database, "events_test");
        assert_eq!(config.username.as_deref(), Some("alice"));
        assert_eq!(config.password.as_deref(), Some("s3cr3t"));
    }

    #[test]
    fn test_debug_output_hides_password() {
        let config = MongoConfig::new("mongodb://bob:hunter2@db:27017/?appName=x")
            .with_credentials("alice", "s3cr3t");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("s3cr3t"));
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("alice"));
    }

    #[test]
    fn test_redact_url() {
        assert_eq!(
            redact_url("mongodb+srv://user:pa@ss@cluster0.example.net/?appName=Cluster0"),
            "mongodb+srv://***@cluster0.example.net/?appName=Cluster0"
        );
        assert_eq!(
            redact_url("mongodb://localhost:27017"),
            "mongodb://localhost:27017"
        );
        assert_eq!(redact_url("not a url"), "not a url");
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_mongo_config_from_env_defaults() {
        temp_env::with_vars(
            [
                ("MONGODB_URL", None::<&str>),
                ("MONGO_URL", None::<&str>),
                ("MONGODB_DATABASE", None::<&str>),
                ("MONGO_DATABASE", None::<&str>),
                ("DB_USERNAME", None::<&str>),
                ("DB_PASSWORD", None::<&str>),
            ],
            || {
                let config = MongoConfig::from_env().unwrap();
                assert_eq!(config.url, DEFAULT_URL);
                assert_eq!(config.database, DEFAULT_DATABASE);
                assert!(config.username.is_none());
            },
        );
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_mongo_config_from_env_fallback_and_credentials() {
        temp_env::with_vars(
            [
                ("MONGODB_URL", None::<&str>),
                ("MONGO_URL", Some("mongodb://fallback:27017")),
                ("MONGODB_DATABASE", None::<&str>),
                ("MONGO_DATABASE", Some("fallbackdb")),
                ("DB_USERNAME", Some("events")),
                ("DB_PASSWORD", Some("p@ss:word")),
            ],
            || {
                let config = MongoConfig::from_env().unwrap();
                assert_eq!(config.url, "mongodb://fallback:27017");
                assert_eq!(config.database, "fallbackdb");
                assert_eq!(config.username.as_deref(), Some("events"));
                assert_eq!(config.password.as_deref(), Some("p@ss:word"));
            },
        );
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_mongo_config_from_env_ignores_half_credentials() {
        temp_env::with_vars(
            [("DB_USERNAME", Some("events")), ("DB_PASSWORD", None::<&str>)],
            || {
                let config = MongoConfig::from_env().unwrap();
                assert!(config.username.is_none());
                assert!(config.password.is_none());
            },
        );
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_mongo_config_from_env_invalid_pool_size() {
        temp_env::with_var("MONGODB_MAX_POOL_SIZE", Some("many"), || {
            let err = MongoConfig::from_env().unwrap_err();
            assert!(err.to_string().contains("MONGODB_MAX_POOL_SIZE"));
        });
    }
}
