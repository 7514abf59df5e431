use std::path::PathBuf;

use clap::Parser;
use serde::Deserialize;

#[derive(Parser)]
#[command(name = "compilex", version = "1.0", about, long_about = None)]
pub struct CliArgs {
    /// Path to the configuration file
    #[arg(long = "config", short = 'c')]
    pub config_path: Option<String>,
}

impl CliArgs {
    /// Load the configuration from the specified file, or fall back to defaults
    pub fn to_config(&self) -> std::io::Result<Config> {
        match &self.config_path {
            Some(path) => {
                let file = std::fs::File::open(path)?;
                let reader = std::io::BufReader::new(file);
                serde_json::from_reader(reader).map_err(|e| e.into())
            }
            None => Ok(Config::default()),
        }
    }
}

#[derive(Deserialize, Debug, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    /// Parent directory for per-execution workspaces
    pub workspace_root: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Default)]
pub struct ServerConfig {
    pub bind_address: Option<String>,
    pub bind_port: Option<u16>,
    /// Origins allowed by the CORS layer; defaults to the local dev frontend
    pub allowed_origins: Option<Vec<String>>,
}

impl Config {
    pub fn workspace_root(&self) -> PathBuf {
        self.workspace_root
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("compilex"))
    }
}

impl ServerConfig {
    pub fn allowed_origins(&self) -> Vec<String> {
        self.allowed_origins.clone().unwrap_or_else(|| {
            vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
            ]
        })
    }
}
