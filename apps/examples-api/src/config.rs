use core_config::{AppInfo, FromEnv, app_info, env_parse, server::ServerConfig};
use database::postgres::PostgresConfig;
use std::time::Duration;

pub use core_config::Environment;

/// Application configuration, composed from the shared config components
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub database: PostgresConfig,
    pub server: ServerConfig,
    pub environment: Environment,
    /// Deadline for each storage call; `None` when `OPERATION_TIMEOUT_SECS <= 0`
    pub operation_timeout: Option<Duration>,
    pub shutdown_timeout: Duration,
    pub run_migrations: bool,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let database = PostgresConfig::from_env()?;
        let server = ServerConfig::from_env()?;

        let operation_timeout_secs: i64 = env_parse("OPERATION_TIMEOUT_SECS", "5")?;
        let shutdown_timeout_secs: u64 = env_parse("SHUTDOWN_TIMEOUT_SECS", "30")?;
        let run_migrations: bool = env_parse("RUN_MIGRATIONS", "true")?;

        Ok(Self {
            app: app_info!(),
            database,
            server,
            environment,
            operation_timeout: u64::try_from(operation_timeout_secs)
                .ok()
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
            shutdown_timeout: Duration::from_secs(shutdown_timeout_secs),
            run_migrations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATABASE_URL: &str = "postgres://postgres@localhost:5432/service_db";

    fn with_env<F: FnOnce()>(
        operation_timeout: Option<&str>,
        shutdown_timeout: Option<&str>,
        run_migrations: Option<&str>,
        f: F,
    ) {
        temp_env::with_vars(
            [
                ("DATABASE_URL", Some(DATABASE_URL)),
                ("OPERATION_TIMEOUT_SECS", operation_timeout),
                ("SHUTDOWN_TIMEOUT_SECS", shutdown_timeout),
                ("RUN_MIGRATIONS", run_migrations),
                ("APP_ENV", None),
            ],
            f,
        );
    }

    #[test]
    fn test_defaults() {
        with_env(None, None, None, || {
            let config = Config::from_env().unwrap();
            assert_eq!(config.operation_timeout, Some(Duration::from_secs(5)));
            assert_eq!(config.shutdown_timeout, Duration::from_secs(30));
            assert!(config.run_migrations);
            assert_eq!(config.app.name, "examples_api");
            assert_eq!(config.database.url(), DATABASE_URL);
        });
    }

    #[test]
    fn test_zero_operation_timeout_disables_deadline() {
        with_env(Some("0"), None, None, || {
            assert_eq!(Config::from_env().unwrap().operation_timeout, None);
        });
    }

    #[test]
    fn test_negative_operation_timeout_disables_deadline() {
        with_env(Some("-3"), None, None, || {
            assert_eq!(Config::from_env().unwrap().operation_timeout, None);
        });
    }

    #[test]
    fn test_migrations_can_be_skipped() {
        with_env(None, None, Some("false"), || {
            assert!(!Config::from_env().unwrap().run_migrations);
        });
    }

    #[test]
    fn test_malformed_number_is_an_error() {
        with_env(None, Some("soon"), None, || {
            let err = Config::from_env().unwrap_err();
            assert!(err.to_string().contains("SHUTDOWN_TIMEOUT_SECS"));
        });
    }
}
