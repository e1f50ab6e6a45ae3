use anyhow::Result;
use config::{builder::DefaultState, Config, ConfigBuilder, Environment, File};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub llm: LlmConfig,
    pub session: SessionConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_body_bytes: usize,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    /// Empty means "no database": summaries and preferences live in process memory.
    pub url: String,
    pub pool_max_size: u32,
    pub pool_timeout_seconds: u64,
    pub run_migrations: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LlmConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
    #[serde(default)]
    pub max_tokens: Option<u32>,
    #[serde(default)]
    pub temperature: Option<f32>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SessionConfig {
    /// Sessions idle longer than this are dropped.
    pub idle_ttl_seconds: u64,
    /// Max turns kept per session (oldest user/assistant pairs are dropped first).
    pub max_turns: usize,
    pub max_sessions: usize,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    pub filter: String,
    #[serde(default)]
    pub directory: Option<String>,
}

impl Settings {
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self::defaults()?
            .add_source(File::with_name("config/settings").required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings: Settings = config.try_deserialize()?;
        Ok(settings)
    }

    /// Builder pre-populated with every default, so the server can boot from env vars alone.
    pub fn defaults() -> Result<ConfigBuilder<DefaultState>> {
        let builder = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 5000)?
            .set_default("server.max_body_bytes", 2 * 1024 * 1024)?
            .set_default("database.url", "")?
            .set_default("database.pool_max_size", 10)?
            .set_default("database.pool_timeout_seconds", 5)?
            .set_default("database.run_migrations", true)?
            .set_default("llm.base_url", "https://api.deepseek.com")?
            .set_default("llm.api_key", "")?
            .set_default("llm.model", "deepseek-chat")?
            .set_default("session.idle_ttl_seconds", 6 * 60 * 60)?
            .set_default("session.max_turns", 40)?
            .set_default("session.max_sessions", 10_000)?
            .set_default("logging.filter", "info,summarize_api_server=debug")?;

        Ok(builder)
    }

    pub fn uses_database(&self) -> bool {
        !self.database.url.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    #[test]
    fn test_defaults_deserialize() {
        let settings: Settings = Settings::defaults()
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.server.port, 5000);
        assert_eq!(settings.llm.model, "deepseek-chat");
        assert_eq!(settings.llm.base_url, "https://api.deepseek.com");
        assert!(settings.llm.timeout_seconds.is_none());
        assert_eq!(settings.session.max_turns, 40);
        assert!(!settings.uses_database());
        assert!(settings.logging.directory.is_none());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let toml = r#"
            [llm]
            api_key = "sk-test"
            timeout_seconds = 30

            [database]
            url = "postgres://localhost/summaries"

            [session]
            max_turns = 10
        "#;

        let settings: Settings = Settings::defaults()
            .unwrap()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.llm.api_key, "sk-test");
        assert_eq!(settings.llm.timeout_seconds, Some(30));
        assert_eq!(settings.session.max_turns, 10);
        assert_eq!(settings.session.max_sessions, 10_000);
        assert!(settings.uses_database());
    }
}
