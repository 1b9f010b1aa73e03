//! Process configuration

mod app_config;

pub use app_config::{
    AppConfig, AuthConfig, ClientConfig, DatabaseConfig, Environment, LogFormat, LoggingConfig,
    TeamsConfig, DEVELOPMENT_SECRET,
};
