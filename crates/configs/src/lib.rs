use anyhow::anyhow;
use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8000, worker_threads: None }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    File,
    Mongo,
}

impl std::str::FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" | "json" => Ok(Self::File),
            "mongo" | "mongodb" => Ok(Self::Mongo),
            other => Err(anyhow!("unknown storage backend `{other}` (expected file or mongo)")),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default)]
    pub mongo_uri: String,
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default = "default_students_collection")]
    pub students_collection: String,
    #[serde(default = "default_interactions_collection")]
    pub interactions_collection: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::File,
            data_dir: default_data_dir(),
            mongo_uri: String::new(),
            database: default_database(),
            students_collection: default_students_collection(),
            interactions_collection: default_interactions_collection(),
        }
    }
}

fn default_data_dir() -> String { "data".into() }
fn default_database() -> String { "dashboard".into() }
fn default_students_collection() -> String { "Students".into() }
fn default_interactions_collection() -> String { "Interactions".into() }

/// Config file read when `CONFIG_PATH` is unset.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| anyhow!("cannot read config file `{path}`: {e}"))?;
    from_toml_str(&content).map_err(|e| anyhow!("invalid config file `{path}`: {e}"))
}

pub fn from_toml_str(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl AppConfig {
    /// Prefer `config.toml` (or `CONFIG_PATH`); fall back to environment variables.
    pub fn load() -> Result<Self> {
        Self::load_from(env_var("CONFIG_PATH").as_deref(), DEFAULT_CONFIG_PATH)
    }

    /// An explicit path must exist and parse. Only a missing default file
    /// falls through to the environment; a broken one is an error.
    fn load_from(explicit: Option<&str>, default_path: &str) -> Result<Self> {
        let mut cfg = match explicit {
            Some(path) => load_from_file(path)?,
            None => match std::fs::read_to_string(default_path) {
                Ok(content) => {
                    from_toml_str(&content).map_err(|e| anyhow!("invalid config file `{default_path}`: {e}"))?
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Self::from_env()?,
                Err(e) => return Err(anyhow!("cannot read config file `{default_path}`: {e}")),
            },
        };
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Build a config purely from `SERVER_*`, `STORAGE_*`, `DATA_DIR` and `MONGO_*`.
    pub fn from_env() -> Result<Self> {
        let mut cfg = Self::default();
        if let Some(host) = env_var("SERVER_HOST") {
            cfg.server.host = host;
        }
        if let Some(port) = env_var("SERVER_PORT") {
            cfg.server.port = port
                .parse()
                .map_err(|e| anyhow!("SERVER_PORT `{port}` is not a valid port: {e}"))?;
        }
        // unparsable thread counts are ignored rather than fatal
        cfg.server.worker_threads = env_var("TOKIO_WORKER_THREADS").and_then(|v| v.parse().ok());
        if let Some(backend) = env_var("STORAGE_BACKEND") {
            cfg.storage.backend = backend.parse()?;
        }
        if let Some(dir) = env_var("DATA_DIR") {
            cfg.storage.data_dir = dir;
        }
        if let Some(db) = env_var("MONGO_DATABASE") {
            cfg.storage.database = db;
        }
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        // blank host falls back to loopback, zero workers means "tokio default"
        self.server.normalize()?;
        // MONGO_URI may supply the connection string the file left out
        self.storage.normalize_from_env();
        self.storage.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        if self.worker_threads == Some(0) {
            self.worker_threads = None;
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl StorageConfig {
    pub fn normalize_from_env(&mut self) {
        // secrets stay out of config.toml
        if self.mongo_uri.trim().is_empty() {
            if let Some(uri) = env_var("MONGO_URI") {
                self.mongo_uri = uri;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.students_collection.trim().is_empty() || self.interactions_collection.trim().is_empty() {
            return Err(anyhow!("storage collection names must not be empty"));
        }
        // each backend only checks the settings it actually reads
        match self.backend {
            StorageBackend::File => {
                if self.data_dir.trim().is_empty() {
                    return Err(anyhow!("storage.data_dir is empty"));
                }
            }
            StorageBackend::Mongo => {
                let lower = self.mongo_uri.to_lowercase();
                if !(lower.starts_with("mongodb://") || lower.starts_with("mongodb+srv://")) {
                    return Err(anyhow!(
                        "storage.mongo_uri must start with mongodb:// or mongodb+srv://; set it in config.toml or MONGO_URI"
                    ));
                }
                if self.database.trim().is_empty() {
                    return Err(anyhow!("storage.database is empty"));
                }
            }
        }
        Ok(())
    }
}
