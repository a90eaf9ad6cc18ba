//! Gateway configuration, loadable from TOML with environment overrides.

use serde::Deserialize;

use crate::inference::CompletionOptions;

/// Top-level gateway configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    /// Listen address (e.g., "0.0.0.0").
    #[serde(default = "default_host")]
    pub host: String,
    /// Listen port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Browser origins allowed by CORS (e.g., ["http://localhost:3000"]).
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
    /// Ollama completion endpoint settings.
    #[serde(default)]
    pub ollama: OllamaConfig,
    /// Product catalog endpoint settings.
    #[serde(default)]
    pub catalog: CatalogConfig,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_cors_origins() -> Vec<String> {
    vec![
        "http://localhost:3000".to_string(),
        "http://127.0.0.1:3000".to_string(),
    ]
}

/// Configuration for the Ollama `/api/generate` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct OllamaConfig {
    /// Ollama HTTP API base URL.
    #[serde(default = "default_ollama_host")]
    pub host: String,
    /// Model to use for filter extraction.
    #[serde(default = "default_ollama_model")]
    pub model: String,
    /// Request timeout in seconds. Generation is slow, so this is generous.
    #[serde(default = "default_ollama_timeout_secs")]
    pub timeout_secs: u64,
    /// Sampling temperature; kept low for repeatable output.
    #[serde(default = "default_temperature")]
    pub temperature: f64,
}

fn default_ollama_host() -> String {
    "http://localhost:11434".into()
}
fn default_ollama_model() -> String {
    "mistral".into()
}
fn default_ollama_timeout_secs() -> u64 {
    30
}
fn default_temperature() -> f64 {
    0.1
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            host: default_ollama_host(),
            model: default_ollama_model(),
            timeout_secs: default_ollama_timeout_secs(),
            temperature: default_temperature(),
        }
    }
}

impl OllamaConfig {
    /// Generation options sent with every completion request.
    pub fn completion_options(&self) -> CompletionOptions {
        CompletionOptions {
            model: self.model.clone(),
            temperature: self.temperature,
            json_format: true,
        }
    }
}

/// Configuration for the upstream product catalog.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    /// Full URL of the product list endpoint.
    #[serde(default = "default_catalog_url")]
    pub url: String,
    /// Request timeout in seconds.
    #[serde(default = "default_catalog_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_catalog_url() -> String {
    "https://fakestoreapi.com/products".into()
}
fn default_catalog_timeout_secs() -> u64 {
    15
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            url: default_catalog_url(),
            timeout_secs: default_catalog_timeout_secs(),
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: default_cors_origins(),
            ollama: OllamaConfig::default(),
            catalog: CatalogConfig::default(),
        }
    }
}

impl GatewayConfig {
    /// Load config from a TOML file path.
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load from `path` if given (defaults otherwise), then apply environment overrides.
    pub fn load(path: Option<&str>) -> anyhow::Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply `SQ_HOST`, `SQ_PORT`, `OLLAMA_HOST`, `OLLAMA_MODEL` and
    /// `CATALOG_URL` from `lookup`.
    pub fn with_overrides<F>(mut self, lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("SQ_HOST") {
            self.host = host;
        }
        if let Some(port) = lookup("SQ_PORT") {
            self.port = port
                .parse()
                .map_err(|e| anyhow::anyhow!("invalid SQ_PORT '{port}': {e}"))?;
        }
        if let Some(host) = lookup("OLLAMA_HOST") {
            self.ollama.host = host;
        }
        if let Some(model) = lookup("OLLAMA_MODEL") {
            self.ollama.model = model;
        }
        if let Some(url) = lookup("CATALOG_URL") {
            self.catalog.url = url;
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn default_config() {
        let config = GatewayConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8000);
        assert_eq!(config.cors_origins.len(), 2);
        assert_eq!(config.ollama.host, "http://localhost:11434");
        assert_eq!(config.ollama.model, "mistral");
        assert_eq!(config.ollama.timeout_secs, 30);
        assert_eq!(config.catalog.url, "https://fakestoreapi.com/products");
        assert_eq!(config.catalog.timeout_secs, 15);
    }

    #[test]
    fn deserialize_empty_uses_defaults() {
        let config: GatewayConfig = toml::from_str("").unwrap();
        assert_eq!(config.port, 8000);
        assert!((config.ollama.temperature - 0.1).abs() < f64::EPSILON);
        assert_eq!(config.catalog.timeout_secs, 15);
    }

    #[test]
    fn deserialize_full_config() {
        let toml = r#"
host = "127.0.0.1"
port = 9090
cors_origins = ["https://shop.example.com"]

[ollama]
host = "http://gpu-box:11434"
model = "llama3"
timeout_secs = 60
temperature = 0.0

[catalog]
url = "http://catalog.internal/products"
timeout_secs = 5
"#;
        let config: GatewayConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 9090);
        assert_eq!(config.cors_origins, vec!["https://shop.example.com"]);
        assert_eq!(config.ollama.model, "llama3");
        assert_eq!(config.ollama.timeout_secs, 60);
        assert_eq!(config.catalog.url, "http://catalog.internal/products");
        assert_eq!(config.catalog.timeout_secs, 5);
    }

    #[test]
    fn completion_options_request_json() {
        let options = OllamaConfig::default().completion_options();
        assert_eq!(options.model, "mistral");
        assert!(options.json_format);
        assert!((options.temperature - 0.1).abs() < f64::EPSILON);
    }

    #[test]
    fn overrides_replace_fields() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("SQ_PORT", "8181"),
            ("OLLAMA_MODEL", "phi3:mini"),
            ("CATALOG_URL", "http://localhost:9999/products"),
        ]);
        let config = GatewayConfig::default()
            .with_overrides(|k| env.get(k).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.port, 8181);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.ollama.model, "phi3:mini");
        assert_eq!(config.catalog.url, "http://localhost:9999/products");
    }

    #[test]
    fn invalid_port_override_is_an_error() {
        let result = GatewayConfig::default()
            .with_overrides(|k| (k == "SQ_PORT").then(|| "not-a-port".to_string()));
        assert!(result.is_err());
    }
}
