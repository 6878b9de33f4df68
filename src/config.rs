//! 配置管理模块
//!
//! 提供TOML配置文件的读取、写入、校验和自动发现功能。

use crate::error::ConfigError;
use crate::types::{LanguageTag, ProviderConfig, TranslationConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// 自动查找配置文件时依次尝试的路径
pub const DEFAULT_CONFIG_PATHS: [&str; 3] = [
    "translation-config.toml",
    "config.toml",
    ".translation-config.toml",
];

/// 翻译库配置结构
///
/// 包含所有翻译相关的配置选项，支持从TOML文件加载和保存。
///
/// ```toml
/// [translation]
/// native_language = "zh"
/// after_translation = "popup"
/// max_text_length = 5000
///
/// [provider]
/// deeplx_api_url = "http://localhost:1188/translate"
/// max_requests_per_second = 2.0
/// timeout_secs = 30
/// ```
///
/// # 示例
///
/// ```rust,no_run
/// use comment_translator::TranslationLibConfig;
///
/// // 从默认位置加载配置
/// let config = TranslationLibConfig::load_from_default_locations();
///
/// // 从指定文件加载配置
/// let config = TranslationLibConfig::from_file("config.toml").unwrap();
///
/// // 保存配置到文件
/// config.save_to_file("output.toml").unwrap();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TranslationLibConfig {
    /// 翻译配置
    #[serde(default)]
    pub translation: TranslationConfig,
    /// 翻译服务配置
    #[serde(default)]
    pub provider: ProviderConfig,
}

impl TranslationLibConfig {
    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: TranslationLibConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Check that every value is usable before building a pipeline
    pub fn validate(&self) -> Result<(), ConfigError> {
        LanguageTag::parse(&self.translation.native_language).map_err(|_| {
            ConfigError::Invalid(format!(
                "native_language {:?} is not a language code such as \"zh\" or \"zh-TW\"",
                self.translation.native_language
            ))
        })?;
        if self.translation.max_text_length == 0 {
            return Err(ConfigError::Invalid("max_text_length must be positive".to_string()));
        }
        if self.provider.deeplx_api_url.trim().is_empty() {
            return Err(ConfigError::Invalid("deeplx_api_url must not be empty".to_string()));
        }
        if !self.provider.max_requests_per_second.is_finite()
            || self.provider.max_requests_per_second < 0.0
        {
            return Err(ConfigError::Invalid(
                "max_requests_per_second must be a non-negative number".to_string(),
            ));
        }
        Ok(())
    }

    /// Load configuration from multiple possible locations
    pub fn load_from_default_locations() -> Self {
        Self::load_from_paths(&DEFAULT_CONFIG_PATHS)
    }

    /// Load the first readable configuration among `paths`, falling back to defaults
    pub fn load_from_paths<P: AsRef<Path>>(paths: &[P]) -> Self {
        for path in paths {
            let path = path.as_ref();
            if path.exists() {
                match Self::from_file(path) {
                    Ok(config) => {
                        log::info!("Loaded configuration from: {}", path.display());
                        return config;
                    }
                    Err(e) => {
                        log::warn!("Failed to load config from {}: {}", path.display(), e);
                    }
                }
            }
        }

        log::info!("No configuration file found, using defaults");
        Self::default()
    }

    /// Generate example configuration file
    pub fn generate_example_config<P: AsRef<Path>>(path: P) -> Result<(), ConfigError> {
        Self::default().save_to_file(path)
    }
}
