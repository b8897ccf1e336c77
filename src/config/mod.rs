use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub web: WebConfig,
    pub storage: StorageConfig,
    pub ocr: OcrConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding one JSON file per cached OCR result
    pub cache_path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrConfig {
    /// External OCR command; when unset, the server decodes images but
    /// performs no text recognition
    pub command: Option<String>,
    #[serde(default)]
    pub command_args: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            web: WebConfig {
                host: "0.0.0.0".to_string(),
                port: 4527,
            },
            storage: StorageConfig {
                cache_path: PathBuf::from("./_cache"),
            },
            ocr: OcrConfig {
                command: None,
                command_args: Vec::new(),
            },
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_file =
            std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".to_string());

        if std::path::Path::new(&config_file).exists() {
            let contents = std::fs::read_to_string(&config_file)?;
            Ok(toml::from_str(&contents)?)
        } else {
            let default_config = Self::default();
            let contents = toml::to_string_pretty(&default_config)?;
            std::fs::write(&config_file, contents)?;
            Ok(default_config)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_round_trips_through_toml() {
        let config = Config::default();
        let toml = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.web.port, 4527);
        assert_eq!(parsed.storage.cache_path, PathBuf::from("./_cache"));
        assert!(parsed.ocr.command.is_none());
    }

    #[test]
    fn test_command_args_default_to_empty() {
        let parsed: Config = toml::from_str(
            r#"
            [web]
            host = "127.0.0.1"
            port = 8080

            [storage]
            cache_path = "/var/cache/ocr"

            [ocr]
            command = "manga-ocr-runner"
            "#,
        )
        .unwrap();
        assert_eq!(parsed.ocr.command.as_deref(), Some("manga-ocr-runner"));
        assert!(parsed.ocr.command_args.is_empty());
    }
}
