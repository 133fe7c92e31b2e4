use crate::app::cancellation::CancellationOptions;
use crate::core::pagination::{DEFAULT_PAGE_SIZE, PAGE_SIZES};
use crate::core::selection::MAX_BULK_SELECTION;
use crate::domain::model::Priority;
use crate::domain::ports::ConfigProvider;
use crate::email::Branding;
use crate::utils::error::{PortalError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
const DEFAULT_CONCURRENT_REQUESTS: usize = 5;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PortalConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
    #[serde(default)]
    pub cancellation: CancellationConfig,
    #[serde(default)]
    pub email: EmailConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: Option<String>,
    pub token: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardConfig {
    pub items_per_page: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CancellationConfig {
    pub concurrent_requests: Option<usize>,
    pub rollback_on_failure: Option<bool>,
    pub default_reason: Option<String>,
    pub priority: Option<Priority>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmailConfig {
    pub company_name: Option<String>,
    pub support_email: Option<String>,
    pub dashboard_url: Option<String>,
    pub logo_url: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub format: Option<LogFormat>,
}

impl PortalConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content)?;
        Ok(toml::from_str(&processed)?)
    }

    /// 替換環境變數 (例如 ${PORTAL_API_TOKEN})；未設定的變數保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").map_err(|e| {
            PortalError::ProcessingError {
                message: format!("invalid substitution pattern: {}", e),
            }
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 命令列參數覆蓋檔案中的值
    pub fn apply_overrides(&mut self, base_url: Option<String>, token: Option<String>) {
        if let Some(base_url) = base_url {
            self.api.base_url = Some(base_url);
        }
        if let Some(token) = token {
            self.api.token = Some(token);
        }
    }

    pub fn items_per_page(&self) -> usize {
        self.dashboard.items_per_page.unwrap_or(DEFAULT_PAGE_SIZE)
    }

    pub fn log_format(&self) -> LogFormat {
        self.logging.format.unwrap_or_default()
    }

    pub fn cancellation_options(&self) -> CancellationOptions {
        let defaults = CancellationOptions::default();
        CancellationOptions {
            concurrent_requests: self
                .cancellation
                .concurrent_requests
                .unwrap_or(defaults.concurrent_requests),
            rollback_on_failure: self
                .cancellation
                .rollback_on_failure
                .unwrap_or(defaults.rollback_on_failure),
            reason: self
                .cancellation
                .default_reason
                .clone()
                .unwrap_or(defaults.reason),
            priority: self.cancellation.priority.unwrap_or(defaults.priority),
        }
    }

    pub fn branding(&self) -> Branding {
        let defaults = Branding::default();
        Branding {
            company_name: self.email.company_name.clone().unwrap_or(defaults.company_name),
            support_email: self.email.support_email.clone().unwrap_or(defaults.support_email),
            dashboard_url: self.email.dashboard_url.clone().unwrap_or(defaults.dashboard_url),
            logo_url: self.email.logo_url.clone().or(defaults.logo_url),
        }
    }

    /// 只檢查信件相關設定，email 子命令不需要 API
    pub fn validate_email_settings(&self) -> Result<()> {
        if let Some(name) = &self.email.company_name {
            validation::validate_non_empty_string("email.company_name", name)?;
        }
        if let Some(email) = &self.email.support_email {
            validation::validate_email("email.support_email", email)?;
        }
        if let Some(url) = &self.email.dashboard_url {
            validation::validate_url("email.dashboard_url", url)?;
        }
        if let Some(url) = &self.email.logo_url {
            validation::validate_url("email.logo_url", url)?;
        }
        Ok(())
    }
}

impl Validate for PortalConfig {
    fn validate(&self) -> Result<()> {
        let base_url = validation::validate_required_field("api.base_url", &self.api.base_url)?;
        validation::validate_url("api.base_url", base_url)?;

        if let Some(token) = &self.api.token {
            if token.starts_with("${") {
                return Err(PortalError::MissingConfigError {
                    field: format!("api.token (environment variable {} is not set)", token),
                });
            }
            validation::validate_non_empty_string("api.token", token)?;

            // token 不走明文 http，本機開發除外
            if let Ok(url) = url::Url::parse(base_url) {
                let local = matches!(url.host_str(), Some("localhost" | "127.0.0.1" | "[::1]"));
                if url.scheme() == "http" && !local {
                    return Err(PortalError::ConfigValidationError {
                        field: "api.token".to_string(),
                        message: "A token must not be sent over plain http, use an https base_url"
                            .to_string(),
                    });
                }
            }
        }

        if let Some(timeout) = self.api.timeout_seconds {
            validation::validate_range("api.timeout_seconds", timeout, 1, 300)?;
        }

        let page_size = self.items_per_page();
        if !PAGE_SIZES.contains(&page_size) {
            return Err(PortalError::InvalidConfigValueError {
                field: "dashboard.items_per_page".to_string(),
                value: page_size.to_string(),
                reason: format!(
                    "Must be one of {}",
                    PAGE_SIZES
                        .iter()
                        .map(|s| s.to_string())
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
            });
        }

        if let Some(concurrent) = self.cancellation.concurrent_requests {
            validation::validate_range(
                "cancellation.concurrent_requests",
                concurrent,
                1,
                MAX_BULK_SELECTION,
            )?;
        }

        if let Some(reason) = &self.cancellation.default_reason {
            validation::validate_non_empty_string("cancellation.default_reason", reason)?;
        }

        self.validate_email_settings()
    }
}

impl ConfigProvider for PortalConfig {
    fn base_url(&self) -> &str {
        self.api.base_url.as_deref().unwrap_or_default()
    }

    fn api_token(&self) -> Option<&str> {
        self.api.token.as_deref()
    }

    fn timeout_seconds(&self) -> u64 {
        self.api.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS)
    }

    fn concurrent_requests(&self) -> usize {
        self.cancellation
            .concurrent_requests
            .unwrap_or(DEFAULT_CONCURRENT_REQUESTS)
    }
}
