use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub listen: ListenConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Optional genre -> movies file replacing the built-in catalog.
    #[serde(default)]
    pub catalog: Option<String>,
    #[serde(default)]
    pub seed: SeedConfig,
    #[serde(skip)]
    pub debug_logs: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ListenConfig {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default = "default_port")]
    pub port: String,
    #[serde(default)]
    pub tlscert: Option<String>,
    #[serde(default)]
    pub tlskey: Option<String>,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            address: None,
            port: default_port(),
            tlscert: None,
            tlskey: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: Option<String>,
}

/// Settings for the offline `moviepicks-seed` utility.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct SeedConfig {
    #[serde(default)]
    pub database: Option<String>,
}

fn default_port() -> String {
    "5000".to_string()
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(path.to_string(), e))?;

        let config: Config = serde_yaml::from_str(&content)
            .map_err(|e| ConfigError::ParseError(path.to_string(), e))?;

        Ok(config)
    }

    /// Reads the config file when one is given, then applies the
    /// environment overrides.
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Config::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// `DATABASE_URL` wins over the legacy `MONGO_URL`; empty values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = non_empty("DATABASE_URL").or_else(|| non_empty("MONGO_URL")) {
            self.database.url = Some(url);
        }
        if let Some(port) = non_empty("PORT") {
            self.listen.port = port;
        }
    }

    pub fn database_url(&self) -> Result<&str, ConfigError> {
        self.database
            .url
            .as_deref()
            .ok_or(ConfigError::MissingDatabaseUrl)
    }

    /// The offline seeder writes to `seed.database`, falling back to the
    /// primary database.
    pub fn seed_database_url(&self) -> Result<&str, ConfigError> {
        match self.seed.database.as_deref() {
            Some(url) => Ok(url),
            None => self.database_url(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    ReadError(String, std::io::Error),
    #[error("Failed to parse config file {0}: {1}")]
    ParseError(String, serde_yaml::Error),
    #[error("No database connection string configured (set database.url or DATABASE_URL)")]
    MissingDatabaseUrl,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config: Config = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.listen.port, "5000");
        assert!(config.listen.address.is_none());
        assert!(matches!(
            config.database_url(),
            Err(ConfigError::MissingDatabaseUrl)
        ));
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
listen:
  address: 127.0.0.1
  port: "8080"
database:
  url: sqlite://picks.db
catalog: catalog.json
seed:
  database: sqlite://offline.db
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.listen.address.as_deref(), Some("127.0.0.1"));
        assert_eq!(config.listen.port, "8080");
        assert_eq!(config.database_url().unwrap(), "sqlite://picks.db");
        assert_eq!(config.catalog.as_deref(), Some("catalog.json"));
        assert_eq!(config.seed_database_url().unwrap(), "sqlite://offline.db");
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config.database.url = Some("sqlite://file.db".to_string());
        config.apply_env(env(&[("DATABASE_URL", "sqlite://env.db"), ("PORT", "9000")]));
        assert_eq!(config.database_url().unwrap(), "sqlite://env.db");
        assert_eq!(config.listen.port, "9000");
    }

    #[test]
    fn test_env_legacy_and_empty() {
        let mut config = Config::default();
        config.apply_env(env(&[("MONGO_URL", "sqlite://legacy.db"), ("PORT", "")]));
        assert_eq!(config.database_url().unwrap(), "sqlite://legacy.db");
        assert_eq!(config.listen.port, "5000");
        assert_eq!(config.seed_database_url().unwrap(), "sqlite://legacy.db");
    }
}
