//! 配置管理系统
//!
//! 提供 Schema Registry 连接配置，支持 TOML 文件和环境变量覆盖。

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    /// IO 错误
    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    /// 解析错误
    #[error("解析配置文件失败: {0}")]
    Parse(String),

    /// 验证错误
    #[error("配置验证失败: {0}")]
    Validation(String),

    /// 环境变量错误
    #[error("环境变量解析失败: {0}")]
    EnvVar(String),
}

/// 配置 Result 类型
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Schema Registry 连接配置
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Registry 根地址，例如 `http://localhost:8081`
    #[serde(default = "default_url")]
    pub url: String,

    /// 单次请求超时时间（毫秒）
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Basic 认证用户名
    #[serde(default)]
    pub username: Option<String>,

    /// Basic 认证密码
    #[serde(default)]
    pub password: Option<String>,

    /// 删除主题时是否在软删除之后执行永久删除
    #[serde(default = "default_permanent_delete")]
    pub permanent_delete: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            timeout_ms: default_timeout_ms(),
            username: None,
            password: None,
            permanent_delete: default_permanent_delete(),
        }
    }
}

impl RegistryConfig {
    /// 使用指定地址创建配置，其余字段取默认值
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// 设置 Basic 认证凭据
    pub fn with_basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// 设置请求超时
    ///
    /// 不足 1 毫秒的超时取 1 毫秒，超出 `u64` 的取最大值。
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = u64::try_from(timeout.as_millis())
            .unwrap_or(u64::MAX)
            .max(1);
        self
    }

    /// 从 TOML 文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Parse(format!("读取配置文件失败: {}", e)))?;

        let config: RegistryConfig = toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(format!("解析配置文件失败: {}", e)))?;

        Ok(config)
    }

    /// 从环境变量加载配置并覆盖
    ///
    /// 支持的环境变量：
    /// - REGCODEC_REGISTRY_URL: Registry 地址
    /// - REGCODEC_REGISTRY_TIMEOUT_MS: 请求超时（毫秒）
    /// - REGCODEC_REGISTRY_USERNAME: Basic 认证用户名
    /// - REGCODEC_REGISTRY_PASSWORD: Basic 认证密码
    /// - REGCODEC_PERMANENT_DELETE: 是否永久删除主题 (true/false)
    pub fn load_with_env_override(mut self) -> Result<Self> {
        if let Ok(url) = std::env::var("REGCODEC_REGISTRY_URL") {
            self.url = url;
        }

        if let Ok(timeout) = std::env::var("REGCODEC_REGISTRY_TIMEOUT_MS") {
            self.timeout_ms = timeout.parse().map_err(|_| {
                ConfigError::EnvVar("REGCODEC_REGISTRY_TIMEOUT_MS 必须是有效的 u64 数字".to_string())
            })?;
        }

        if let Ok(username) = std::env::var("REGCODEC_REGISTRY_USERNAME") {
            self.username = Some(username);
        }

        if let Ok(password) = std::env::var("REGCODEC_REGISTRY_PASSWORD") {
            self.password = Some(password);
        }

        if let Ok(permanent) = std::env::var("REGCODEC_PERMANENT_DELETE") {
            self.permanent_delete = permanent.parse().map_err(|_| {
                ConfigError::EnvVar("REGCODEC_PERMANENT_DELETE 必须是 true 或 false".to_string())
            })?;
        }

        Ok(self)
    }

    /// 从文件加载并应用环境变量覆盖
    pub fn from_file_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_file(path)?.load_with_env_override()
    }

    /// 验证配置是否有效
    pub fn validate(&self) -> Result<()> {
        if self.url.is_empty() {
            return Err(ConfigError::Validation("Registry 地址不能为空".to_string()));
        }

        if !self.url.starts_with("http://") && !self.url.starts_with("https://") {
            return Err(ConfigError::Validation(format!(
                "Registry 地址必须以 http:// 或 https:// 开头: {}",
                self.url
            )));
        }

        if self.timeout_ms == 0 {
            return Err(ConfigError::Validation("请求超时不能为 0".to_string()));
        }

        // 只有密码没有用户名无法构造 Basic 认证
        if self.password.is_some() && self.username.is_none() {
            return Err(ConfigError::Validation("设置了密码但缺少用户名".to_string()));
        }

        Ok(())
    }

    /// 请求超时
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// 去掉末尾斜杠的根地址
    pub fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }

    /// 获取配置摘要信息（密码不会出现在摘要中）
    pub fn summary(&self) -> String {
        format!(
            "regcodec Registry 配置:\n  地址: {}\n  超时: {}ms\n  认证用户: {}\n  永久删除: {}",
            self.base_url(),
            self.timeout_ms,
            self.username.as_deref().unwrap_or("<无>"),
            self.permanent_delete
        )
    }
}

// 默认值函数
fn default_url() -> String {
    "http://localhost:8081".to_string()
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_permanent_delete() -> bool {
    true
}
