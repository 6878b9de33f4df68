//! 错误处理模块
//!
//! 定义翻译库中使用的错误类型和错误处理机制。
//!
//! 错误分为三层：
//!
//! * [`ProviderError`] - 翻译服务提供方（网络、API响应）产生的错误
//! * [`TranslationError`] - 一次翻译请求的最终失败原因
//! * [`ConfigError`] - 配置文件读取、解析和校验错误

use thiserror::Error;

/// 翻译服务提供方错误
///
/// 由 [`TranslationProvider`](crate::provider::TranslationProvider) 的实现返回，
/// 描述语言检测或翻译调用失败的具体原因。
#[derive(Debug, Error)]
pub enum ProviderError {
    /// HTTP请求错误
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    /// API响应错误
    #[error("API error {code}: {message}")]
    Api {
        /// 错误代码
        code: i32,
        /// 错误消息
        message: String,
    },
    /// 解析错误
    #[error("Parse error: {0}")]
    Parse(String),
    /// 服务返回了空的翻译结果
    #[error("provider returned an empty result")]
    EmptyResult,
    /// 其他错误
    #[error("{0}")]
    Other(String),
}

impl From<String> for ProviderError {
    fn from(error: String) -> Self {
        ProviderError::Other(error)
    }
}

impl From<&str> for ProviderError {
    fn from(error: &str) -> Self {
        ProviderError::Other(error.to_string())
    }
}

/// 翻译错误类型
///
/// 一次翻译请求只会产生一个结果：成功的文本，或以下错误之一。
/// 所有错误都是终止性的，库内部不做重试。
///
/// # 变体说明
///
/// * `EmptySelection` - 没有可翻译的文本
/// * `TooLong` - 规范化后的文本超过长度上限
/// * `DetectionFailed` - 语言检测调用失败
/// * `TranslationFailed` - 单条翻译调用失败
/// * `BatchFailed` - 批量翻译调用失败
/// * `BatchMismatch` - 批量翻译返回的条数与发送条数不一致
/// * `InvalidLanguage` - 语言代码不合法
#[derive(Debug, Error)]
pub enum TranslationError {
    /// 没有选中文本，也不在折叠区域内
    #[error("no text selected")]
    EmptySelection,
    /// 文本过长
    #[error("text length {length} exceeds the limit of {max} characters")]
    TooLong {
        /// 实际长度（字符数）
        length: usize,
        /// 允许的最大长度
        max: usize,
    },
    /// 语言检测失败
    #[error("language detection failed: {0}")]
    DetectionFailed(#[source] ProviderError),
    /// 单条翻译失败
    #[error("translation failed: {0}")]
    TranslationFailed(#[source] ProviderError),
    /// 批量翻译失败
    #[error("batch translation failed: {0}")]
    BatchFailed(#[source] ProviderError),
    /// 批量翻译返回条数不匹配
    #[error("batch translation returned {received} segments for {sent} sent")]
    BatchMismatch {
        /// 发送的段落数
        sent: usize,
        /// 收到的段落数
        received: usize,
    },
    /// 语言代码不合法
    #[error("invalid language tag: {0:?}")]
    InvalidLanguage(String),
}

impl TranslationError {
    /// 返回展示给用户的提示信息
    ///
    /// 所有与翻译服务相关的失败共用同一条提示，
    /// 具体原因只出现在日志和 `Display` 输出中。
    pub fn user_message(&self) -> String {
        match self {
            TranslationError::EmptySelection => "Please select the translated text.".to_string(),
            TranslationError::TooLong { max, .. } => {
                format!("Translation length cannot exceed {}.", max)
            }
            TranslationError::InvalidLanguage(tag) => format!("Unsupported language: {}", tag),
            TranslationError::DetectionFailed(_)
            | TranslationError::TranslationFailed(_)
            | TranslationError::BatchFailed(_)
            | TranslationError::BatchMismatch { .. } => {
                "Translation failed, please try again.".to_string()
            }
        }
    }

    /// 是否为用户可以自行修正的错误（重新选择文本）
    pub fn is_user_correctable(&self) -> bool {
        matches!(
            self,
            TranslationError::EmptySelection | TranslationError::TooLong { .. }
        )
    }
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 读写配置文件失败
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML解析失败
    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
    /// TOML序列化失败
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    /// 配置值不合法
    #[error("invalid config value: {0}")]
    Invalid(String),
}

/// 翻译结果类型别名
///
/// 简化返回类型，使用 `TranslationError` 作为错误类型。
///
/// # 示例
///
/// ```rust
/// use comment_translator::{Result, TranslationError};
///
/// fn example_function() -> Result<String> {
///     Err(TranslationError::EmptySelection)
/// }
///
/// assert!(example_function().is_err());
/// ```
pub type Result<T> = std::result::Result<T, TranslationError>;
