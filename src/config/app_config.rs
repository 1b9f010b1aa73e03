use serde::{Deserialize, Deserializer};

use crate::domain::DomainError;
use crate::infrastructure::storage::PostgresConfig;
use crate::infrastructure::user::UserControllerConfig;

/// Secret used when none is configured; refused in production
pub const DEVELOPMENT_SECRET: &str = "pmp-accounts-development-secret";

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    #[serde(rename = "env")]
    pub environment: Environment,
    pub auth: AuthConfig,
    pub client: ClientConfig,
    pub teams: TeamsConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
}

/// Deployment mode, selected with `APP_ENV`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    #[serde(alias = "dev")]
    Development,
    #[serde(alias = "prod")]
    Production,
    Test,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::Test => "test",
        }
    }

    /// Read `APP_ENV`, falling back to development
    pub fn from_env() -> Self {
        std::env::var("APP_ENV")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_default()
    }
}

impl std::str::FromStr for Environment {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            "test" => Ok(Self::Test),
            other => Err(DomainError::configuration(format!(
                "Unknown environment '{}'",
                other
            ))),
        }
    }
}

/// Key material for the email/reset-link codec
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub secret: String,
    pub salt: String,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("secret", &"[REDACTED]")
            .field("salt", &"[REDACTED]")
            .finish()
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret: DEVELOPMENT_SECRET.to_string(),
            salt: "pmp-accounts".to_string(),
        }
    }
}

/// Web client the reset links point at
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:3000".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TeamsConfig {
    /// Disables personal team provisioning; accepts `true` or `"1"`
    #[serde(deserialize_with = "deserialize_flag")]
    pub restricted: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// PostgreSQL URL; in-memory storage is used when unset
    pub url: Option<String>,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

/// Boolean that also accepts `1`/`0` and `"yes"`/`"on"` style strings
fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
        Text(String),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(value) => value,
        Flag::Int(value) => value != 0,
        Flag::Text(value) => matches!(
            value.trim().to_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        ),
    })
}

impl AppConfig {
    /// Load configuration for the environment named by `APP_ENV`
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_for(Environment::from_env())
    }

    /// Layer `config/default`, `config/{environment}`, `config/local` and
    /// `APP_*` environment variables
    pub fn load_for(environment: Environment) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .set_default("env", environment.as_str())?
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(
                config::File::with_name(&format!("config/{}", environment.as_str()))
                    .required(false),
            )
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Reject settings the process must not start with
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.auth.secret.trim().is_empty() {
            return Err(DomainError::configuration("auth.secret must not be empty"));
        }

        if self.environment == Environment::Production && self.auth.secret == DEVELOPMENT_SECRET {
            return Err(DomainError::configuration(
                "auth.secret must be set explicitly in production",
            ));
        }

        if self.client.url.trim().is_empty() {
            return Err(DomainError::configuration("client.url must not be empty"));
        }

        if self.database.max_connections == 0 {
            return Err(DomainError::configuration(
                "database.max_connections must be at least 1",
            ));
        }

        Ok(())
    }

    pub fn controller_config(&self) -> UserControllerConfig {
        UserControllerConfig {
            client_url: self.client.url.clone(),
            team_restricted: self.teams.restricted,
        }
    }

    /// Pool settings, or `None` to run on in-memory storage
    pub fn postgres_config(&self) -> Option<PostgresConfig> {
        self.database
            .url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(|url| PostgresConfig::new(url).with_max_connections(self.database.max_connections))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_overrides(pairs: &[(&str, &str)]) -> AppConfig {
        let mut builder = config::Config::builder();

        for (key, value) in pairs {
            builder = builder.set_override(*key, *value).unwrap();
        }

        builder.build().unwrap().try_deserialize().unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = from_overrides(&[]);

        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.auth.secret, DEVELOPMENT_SECRET);
        assert_eq!(config.client.url, "http://localhost:3000");
        assert!(!config.teams.restricted);
        assert!(config.postgres_config().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_restricted_flag_accepts_one() {
        let config = from_overrides(&[("teams.restricted", "1")]);
        assert!(config.teams.restricted);
        assert!(config.controller_config().team_restricted);

        let config = from_overrides(&[("teams.restricted", "true")]);
        assert!(config.teams.restricted);

        let config = from_overrides(&[("teams.restricted", "0")]);
        assert!(!config.teams.restricted);
    }

    #[test]
    fn test_production_rejects_development_secret() {
        let config = from_overrides(&[("env", "production")]);
        assert_eq!(config.environment, Environment::Production);

        let err = config.validate().unwrap_err();
        assert!(matches!(err, DomainError::Configuration { .. }));

        let config = from_overrides(&[("env", "production"), ("auth.secret", "real-secret")]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_secret_rejected() {
        let config = from_overrides(&[("auth.secret", "")]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_postgres_config_from_database_url() {
        let config = from_overrides(&[
            ("database.url", "postgres://db/accounts"),
            ("database.max_connections", "3"),
        ]);

        let postgres = config.postgres_config().unwrap();
        assert_eq!(postgres.url, "postgres://db/accounts");
        assert_eq!(postgres.max_connections, 3);

        let blank = from_overrides(&[("database.url", "  ")]);
        assert!(blank.postgres_config().is_none());
    }

    #[test]
    fn test_controller_config_uses_client_url() {
        let config = from_overrides(&[("client.url", "https://app.example.com")]);
        assert_eq!(config.controller_config().client_url, "https://app.example.com");
    }

    #[test]
    fn test_environment_parse() {
        assert_eq!("prod".parse::<Environment>().unwrap(), Environment::Production);
        assert_eq!("Test".parse::<Environment>().unwrap(), Environment::Test);
        assert!("staging".parse::<Environment>().is_err());
    }

    #[test]
    fn test_load_reads_app_environment_variables() {
        unsafe {
            std::env::set_var("APP_TEAMS__RESTRICTED", "1");
            std::env::set_var("APP_AUTH__SECRET", "secret-from-environment");
            std::env::set_var("APP_CLIENT__URL", "https://accounts.example.com");
        }

        let config = AppConfig::load_for(Environment::Development);

        unsafe {
            std::env::remove_var("APP_TEAMS__RESTRICTED");
            std::env::remove_var("APP_AUTH__SECRET");
            std::env::remove_var("APP_CLIENT__URL");
        }

        let config = config.unwrap();
        assert!(config.teams.restricted);
        assert_eq!(config.auth.secret, "secret-from-environment");
        assert_eq!(config.client.url, "https://accounts.example.com");
        assert_eq!(config.environment, Environment::Development);
    }

    #[test]
    fn test_auth_debug_redacts_secret() {
        let rendered = format!("{:?}", AuthConfig::default());
        assert!(!rendered.contains(DEVELOPMENT_SECRET));
    }
}
