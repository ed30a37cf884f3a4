use crate::core::transformer::{ColumnConcat, DEFAULT_SOURCE_COLUMNS, DEFAULT_TARGET_COLUMN};
use crate::core::xlsx::DEFAULT_SHEET_NAME;
use crate::core::ConfigProvider;
use crate::utils::error::{Result, TransformError};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub server: ServerConfig,
    pub output: OutputConfig,
    pub transform: TransformConfig,
    pub logging: LoggingConfig,
}

/// `server.max_upload_mb` 的上限
pub const MAX_UPLOAD_MB: usize = 1024;
const SUBMIT_ENVELOPE_BYTES: usize = 64 * 1024;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_upload_mb: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8050,
            max_upload_mb: 25,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub path: String,
    pub file_name: String,
    pub sheet_name: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: ".".to_string(),
            file_name: "data.xlsx".to_string(),
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformConfig {
    pub source_columns: Vec<String>,
    pub target_column: String,
    pub separator: String,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            source_columns: DEFAULT_SOURCE_COLUMNS.iter().map(|c| c.to_string()).collect(),
            target_column: DEFAULT_TARGET_COLUMN.to_string(),
            separator: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub json: bool,
    pub verbose: bool,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| TransformError::ConfigError {
            message: format!("Cannot read {}: {}", path.as_ref().display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置；缺少的區段使用預設值
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| TransformError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${OUTPUT_DIR})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| TransformError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("server.host", &self.server.host)?;
        validation::validate_range("server.port", self.server.port, 1, u16::MAX)?;
        validation::validate_range("server.max_upload_mb", self.server.max_upload_mb, 1, MAX_UPLOAD_MB)?;

        validation::validate_path("output.path", &self.output.path)?;
        validation::validate_file_name("output.file_name", &self.output.file_name)?;
        validation::validate_file_extensions(
            "output.file_name",
            std::slice::from_ref(&self.output.file_name),
            &["xlsx"],
        )?;
        validation::validate_sheet_name("output.sheet_name", &self.output.sheet_name)?;

        if self.transform.source_columns.is_empty() {
            return Err(TransformError::MissingConfigError {
                field: "transform.source_columns".to_string(),
            });
        }
        for column in &self.transform.source_columns {
            validation::validate_non_empty_string("transform.source_columns", column)?;
        }
        validation::validate_non_empty_string("transform.target_column", &self.transform.target_column)?;

        Ok(())
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// 上傳檔案本身的大小上限
    pub fn max_upload_bytes(&self) -> usize {
        self.server.max_upload_mb.saturating_mul(1024 * 1024)
    }

    /// `/api/submit` 的 JSON 本文上限：Base64 膨脹約 4/3，另留檔名與前綴的空間
    pub fn max_submit_body_bytes(&self) -> usize {
        (self.max_upload_bytes() / 3)
            .saturating_mul(4)
            .saturating_add(SUBMIT_ENVELOPE_BYTES)
    }
}

impl ConfigProvider for TomlConfig {
    fn output_path(&self) -> &str {
        &self.output.path
    }

    fn output_file(&self) -> &str {
        &self.output.file_name
    }

    fn sheet_name(&self) -> &str {
        &self.output.sheet_name
    }

    fn column_concat(&self) -> ColumnConcat {
        ColumnConcat::new(
            self.transform.source_columns.clone(),
            self.transform.target_column.clone(),
        )
        .with_separator(self.transform.separator.clone())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
