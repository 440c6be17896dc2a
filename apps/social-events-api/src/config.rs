use core_config::{AppInfo, FromEnv, app_info, server::ServerConfig};

use database::mongodb::MongoConfig;

pub use core_config::Environment;

/// Application configuration, composed from the shared config pieces.
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub mongodb: MongoConfig,
    pub server: ServerConfig,
    pub environment: Environment,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let app = app_info!();
        let environment = Environment::from_env();
        let server = ServerConfig::from_env()?;

        let mut mongodb = MongoConfig::from_env()?;
        if mongodb.app_name.is_none() {
            mongodb = mongodb.with_app_name(app.name);
        }

        Ok(Self {
            app,
            mongodb,
            server,
            environment,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        temp_env::with_vars_unset(
            [
                "PORT",
                "HOST",
                "MONGODB_URL",
                "MONGO_URL",
                "MONGODB_DATABASE",
                "MONGO_DATABASE",
                "MONGODB_APP_NAME",
                "DB_USERNAME",
                "DB_PASSWORD",
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.server.port, 3000);
                assert_eq!(config.mongodb.database(), "Social-events");
                assert_eq!(config.mongodb.app_name.as_deref(), Some(config.app.name));
                assert!(config.mongodb.username.is_none());
            },
        );
    }

    #[test]
    fn test_credentials_and_database_from_env() {
        temp_env::with_vars(
            [
                ("MONGODB_URL", Some("mongodb+srv://cluster0.example.net")),
                ("MONGODB_DATABASE", Some("events_staging")),
                ("DB_USERNAME", Some("events")),
                ("DB_PASSWORD", Some("secret")),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.mongodb.url(), "mongodb+srv://cluster0.example.net");
                assert_eq!(config.mongodb.database(), "events_staging");
                assert_eq!(config.mongodb.username.as_deref(), Some("events"));
            },
        );
    }

    #[test]
    fn test_malformed_port_is_error() {
        temp_env::with_var("PORT", Some("not-a-port"), || {
            assert!(Config::from_env().is_err());
        });
    }
}
