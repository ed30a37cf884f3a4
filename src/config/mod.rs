pub mod cli;
pub mod toml_config;

use crate::utils::error::Result;
use clap::Parser;
use serde::{Deserialize, Serialize};
use toml_config::TomlConfig;

#[derive(Debug, Clone, Default, Serialize, Deserialize, Parser)]
#[command(name = "routing-input-transformer")]
#[command(about = "Upload a CSV/Excel file, derive the groupid column and download the result")]
pub struct CliConfig {
    /// Path to an optional TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(long)]
    pub host: Option<String>,

    #[arg(long)]
    pub port: Option<u16>,

    /// Directory the transformed workbook is written to
    #[arg(long)]
    pub output_path: Option<String>,

    /// File name of the transformed workbook
    #[arg(long)]
    pub output_file: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,
}

impl CliConfig {
    /// 載入設定檔（若有）後套用命令列覆蓋
    pub fn resolve(&self) -> Result<TomlConfig> {
        let mut config = match &self.config {
            Some(path) => TomlConfig::from_file(path)?,
            None => TomlConfig::default(),
        };
        self.apply_overrides(&mut config);
        Ok(config)
    }

    pub fn apply_overrides(&self, config: &mut TomlConfig) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(path) = &self.output_path {
            config.output.path = path.clone();
        }
        if let Some(file) = &self.output_file {
            config.output.file_name = file.clone();
        }
        config.logging.verbose |= self.verbose;
        config.logging.json |= self.log_json;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides_defaults() {
        let cli = CliConfig::parse_from([
            "routing-input-transformer",
            "--port",
            "9100",
            "--output-path",
            "/tmp/exports",
            "--verbose",
        ]);
        let config = cli.resolve().unwrap();

        assert_eq!(config.server.port, 9100);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.output.path, "/tmp/exports");
        assert_eq!(config.output.file_name, "data.xlsx");
        assert!(config.logging.verbose);
        assert!(!config.logging.json);
    }

    #[test]
    fn test_cli_overrides_file_values() {
        let mut config = TomlConfig::from_toml_str("[server]\nhost = \"0.0.0.0\"\nport = 8000").unwrap();
        let cli = CliConfig {
            port: Some(8001),
            ..Default::default()
        };
        cli.apply_overrides(&mut config);

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8001);
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let cli = CliConfig {
            config: Some("/nonexistent/transformer.toml".to_string()),
            ..Default::default()
        };
        assert!(cli.resolve().is_err());
    }
}
