use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::{AppError, AppResult};

/// 题目提取模式
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExtractMode {
    /// 通过本地后端中转（multipart 上传到 /generate）
    Relay,
    /// 直接调用 Gemini API
    #[default]
    Direct,
}

impl fmt::Display for ExtractMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractMode::Relay => write!(f, "relay"),
            ExtractMode::Direct => write!(f, "direct"),
        }
    }
}

impl FromStr for ExtractMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "relay" => Ok(ExtractMode::Relay),
            "direct" => Ok(ExtractMode::Direct),
            other => Err(AppError::Config(format!(
                "未知的提取模式 '{}'，可选值: relay / direct",
                other
            ))),
        }
    }
}

/// 程序配置
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 提取模式
    pub mode: ExtractMode,
    /// 中转后端地址
    pub relay_endpoint: String,
    // --- Gemini 配置 ---
    pub gemini_api_base_url: String,
    pub gemini_model_name: String,
    /// 没有默认值，未配置时直连模式直接报错
    pub gemini_api_key: Option<String>,
    /// HTTP 请求超时（秒），不配置则不超时
    pub request_timeout_secs: Option<u64>,
    /// 是否输出彩色结果
    pub color: bool,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: ExtractMode::Direct,
            relay_endpoint: "http://localhost:5000/generate".to_string(),
            gemini_api_base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            gemini_model_name: "gemini-1.5-flash".to_string(),
            gemini_api_key: None,
            request_timeout_secs: None,
            color: true,
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 从环境变量加载配置，未设置的项使用默认值
    pub fn from_env() -> Self {
        Self::default().with_overrides(|name| std::env::var(name).ok())
    }

    /// 从 TOML 文件加载配置，文件中未出现的项使用默认值
    pub fn from_toml_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::file(path.display().to_string(), e))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> AppResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// 用环境变量覆盖当前配置
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    /// 用 `lookup` 提供的值覆盖当前配置
    ///
    /// 无法解析的值会被忽略并保留原值
    pub fn with_overrides(self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        Self {
            mode: non_empty("EXTRACT_MODE")
                .and_then(|v| v.parse().ok())
                .unwrap_or(self.mode),
            relay_endpoint: non_empty("RELAY_ENDPOINT").unwrap_or(self.relay_endpoint),
            gemini_api_base_url: non_empty("GEMINI_API_BASE_URL")
                .unwrap_or(self.gemini_api_base_url),
            gemini_model_name: non_empty("GEMINI_MODEL_NAME").unwrap_or(self.gemini_model_name),
            gemini_api_key: non_empty("GEMINI_API_KEY").or(self.gemini_api_key),
            request_timeout_secs: non_empty("REQUEST_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .or(self.request_timeout_secs),
            // 按 NO_COLOR 约定，只有非空值才关闭彩色
            color: if non_empty("NO_COLOR").is_some() {
                false
            } else {
                self.color
            },
            verbose_logging: non_empty("VERBOSE_LOGGING")
                .and_then(|v| v.parse().ok())
                .unwrap_or(self.verbose_logging),
        }
    }
}
