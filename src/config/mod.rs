use figment::providers::{Env, Format, Toml};
use figment::Figment;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_user")]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default = "default_host")]
    pub server: String,
    #[serde(default = "default_db_port")]
    pub port: u32,
    #[serde(default = "default_db_name")]
    pub database: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8088
}

fn default_db_user() -> String {
    "postgres".to_string()
}

fn default_db_port() -> u32 {
    5432
}

fn default_db_name() -> String {
    "crmserver".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            username: default_db_user(),
            password: String::new(),
            server: default_host(),
            port: default_db_port(),
            database: default_db_name(),
        }
    }
}

impl AppConfig {
    /// Layered load: `crmserver.toml` overlaid by `CRMSERVER_*` environment
    /// variables (`CRMSERVER_DATABASE__PASSWORD=...`).
    pub fn load() -> Result<Self, figment::Error> {
        Self::from_file("crmserver.toml")
    }

    pub fn from_file(path: &str) -> Result<Self, figment::Error> {
        Figment::new()
            .merge(Toml::file(path))
            .merge(Env::prefixed("CRMSERVER_").split("__"))
            .extract()
    }

    pub fn database_url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.database.username,
            self.database.password,
            self.database.server,
            self.database.port,
            self.database.database
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_when_file_missing() {
        let config = AppConfig::from_file("does-not-exist.toml").expect("defaults");
        assert_eq!(config.server.port, 8088);
        assert_eq!(config.database.database, "crmserver");
    }

    #[test]
    fn reads_toml_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("crmserver.toml");
        let mut file = std::fs::File::create(&path).expect("create");
        writeln!(
            file,
            "[server]\nport = 9000\n\n[database]\nusername = \"crm\"\ndatabase = \"pipeline\""
        )
        .expect("write");

        let config = AppConfig::from_file(path.to_str().expect("utf8 path")).expect("load");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.database.username, "crm");
        assert_eq!(
            config.database_url(),
            "postgres://crm:@127.0.0.1:5432/pipeline"
        );
    }
}
