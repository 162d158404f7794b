use crate::adapters::session::{Credential, DEFAULT_SESSION_FILE};
use crate::config::ServiceConfig;
use crate::domain::model::Principal;
use crate::utils::error::{PortalError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:4943/api";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
pub const DEFAULT_UPLOAD_CHUNK_SIZE: usize = 1024 * 1024;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PortalConfig {
    #[serde(default)]
    pub service: ServiceSection,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceSection {
    pub endpoint: String,
    pub timeout_seconds: Option<u64>,
    pub upload_chunk_size: Option<usize>,
}

impl Default for ServiceSection {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_seconds: None,
            upload_chunk_size: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub directory: String,
    pub file_name: Option<String>,
    pub principal: Option<String>,
    pub token: Option<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            directory: ".study-portal".to_string(),
            file_name: None,
            principal: None,
            token: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub format: Option<String>,
}

impl PortalConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(PortalError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| PortalError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${PORTAL_TOKEN})，未設定的保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}")
            .map_err(|e| PortalError::config(format!("invalid substitution pattern: {}", e)))?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// Command-line values win over the file.
    pub fn with_endpoint(mut self, endpoint: Option<String>) -> Self {
        if let Some(endpoint) = endpoint {
            self.service.endpoint = endpoint;
        }
        self
    }

    pub fn with_session_dir(mut self, directory: Option<String>) -> Self {
        if let Some(directory) = directory {
            self.session.directory = directory;
        }
        self
    }

    pub fn session_file(&self) -> &str {
        self.session
            .file_name
            .as_deref()
            .unwrap_or(DEFAULT_SESSION_FILE)
    }

    /// Credential from `[session]`, ignoring values whose variable was never set.
    pub fn credential(&self) -> Option<Credential> {
        let resolved = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty() && !v.contains("${"))
                .map(str::to_string)
        };

        Some(Credential {
            principal: Principal(resolved(&self.session.principal)?),
            token: resolved(&self.session.token)?,
        })
    }

    pub fn json_logs(&self) -> bool {
        self.logging.format.as_deref() == Some("json")
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::service_url("service.endpoint", &self.service.endpoint)?;
        if let Some(timeout) = self.service.timeout_seconds {
            validation::non_zero("service.timeout_seconds", timeout)?;
        }
        if let Some(chunk) = self.service.upload_chunk_size {
            validation::non_zero("service.upload_chunk_size", chunk as u64)?;
        }

        validation::directory("session.directory", &self.session.directory)?;
        if let Some(file_name) = &self.session.file_name {
            validation::file_name("session.file_name", file_name)?;
        }

        if let Some(level) = &self.logging.level {
            validation::one_of("logging.level", level, &["trace", "debug", "info", "warn", "error"])?;
        }
        if let Some(format) = &self.logging.format {
            validation::one_of("logging.format", format, &["compact", "json"])?;
        }
        Ok(())
    }
}

impl ServiceConfig for PortalConfig {
    fn endpoint(&self) -> &str {
        &self.service.endpoint
    }

    fn timeout_seconds(&self) -> u64 {
        self.service
            .timeout_seconds
            .unwrap_or(DEFAULT_TIMEOUT_SECONDS)
    }

    fn upload_chunk_size(&self) -> usize {
        self.service
            .upload_chunk_size
            .unwrap_or(DEFAULT_UPLOAD_CHUNK_SIZE)
    }
}

impl Validate for PortalConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
