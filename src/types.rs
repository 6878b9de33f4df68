//! 类型定义模块
//!
//! 定义翻译库中使用的所有数据结构和配置类型。

use crate::error::{Result, TranslationError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 单次翻译允许的最大文本长度（字符数）
pub const DEFAULT_MAX_TEXT_LENGTH: usize = 5000;

/// 翻译配置
///
/// 包含翻译流程本身的配置选项：母语、翻译后的处理方式和长度上限。
///
/// # 字段说明
///
/// * `native_language` - 用户母语代码，英文内容会被翻译成该语言
/// * `after_translation` - 翻译完成后是弹窗展示还是替换选中文本
/// * `max_text_length` - 单次翻译的最大文本长度（字符数）
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslationConfig {
    /// 用户母语代码，可以带地区后缀，例如 "zh-TW"
    pub native_language: String,
    /// 翻译后的处理方式
    pub after_translation: AfterTranslation,
    /// 单次翻译的最大文本长度
    pub max_text_length: usize,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            native_language: "zh".to_string(),
            after_translation: AfterTranslation::default(),
            max_text_length: DEFAULT_MAX_TEXT_LENGTH,
        }
    }
}

/// 翻译服务提供方配置
///
/// # 字段说明
///
/// * `deeplx_api_url` - DeepLX API地址
/// * `max_requests_per_second` - 每秒最大请求数
/// * `timeout_secs` - 单个HTTP请求的超时时间
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// DeepLX API地址
    pub deeplx_api_url: String,
    /// 每秒最大请求数
    pub max_requests_per_second: f64,
    /// 请求超时（秒）
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            deeplx_api_url: "http://localhost:1188/translate".to_string(),
            max_requests_per_second: 2.0,
            timeout_secs: 30,
        }
    }
}

/// 翻译完成后的处理方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AfterTranslation {
    /// 在弹窗中展示译文
    #[default]
    Popup,
    /// 用译文替换选中的文本
    Replace,
}

/// 译文的交付方式，由编辑器集成层执行
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// 替换选中的文本
    ReplaceSelection,
    /// 弹窗展示
    ShowPopup,
}

impl Delivery {
    /// 根据文档是否可写和用户设置决定交付方式
    ///
    /// 只读文档总是弹窗展示；可写文档只有在设置为替换时才替换。
    pub fn decide(writable: bool, setting: AfterTranslation) -> Self {
        match (writable, setting) {
            (true, AfterTranslation::Replace) => Delivery::ReplaceSelection,
            _ => Delivery::ShowPopup,
        }
    }
}

/// 语言代码
///
/// 小写的短代码，例如 `en`、`zh`，可以带地区后缀（`zh-TW`），
/// 或者表示自动检测的 `auto`。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LanguageTag(String);

impl LanguageTag {
    /// 自动检测
    pub const AUTO: &'static str = "auto";
    /// 英语
    pub const ENGLISH: &'static str = "en";

    /// 解析并校验语言代码
    pub fn parse(tag: &str) -> Result<Self> {
        let tag = tag.trim();
        if tag == Self::AUTO || is_valid_tag(tag) {
            Ok(Self(tag.to_string()))
        } else {
            Err(TranslationError::InvalidLanguage(tag.to_string()))
        }
    }

    pub fn auto() -> Self {
        Self(Self::AUTO.to_string())
    }

    pub fn english() -> Self {
        Self(Self::ENGLISH.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 检测结果是否为英语（忽略大小写）
    pub fn is_english_code(code: &str) -> bool {
        code.trim().eq_ignore_ascii_case(Self::ENGLISH)
    }
}

fn is_valid_tag(tag: &str) -> bool {
    let (language, region) = match tag.split_once('-') {
        Some((language, region)) => (language, Some(region)),
        None => (tag, None),
    };
    let language_ok = (2..=3).contains(&language.len())
        && language.chars().all(|c| c.is_ascii_lowercase());
    let region_ok = region.map_or(true, |region| {
        (2..=4).contains(&region.len()) && region.chars().all(|c| c.is_ascii_alphanumeric())
    });
    language_ok && region_ok
}

impl fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for LanguageTag {
    type Error = TranslationError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<LanguageTag> for String {
    fn from(tag: LanguageTag) -> Self {
        tag.0
    }
}

/// 翻译方向
///
/// 每次请求只会是两种之一：`en → 母语` 或 `auto → en`。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationDirection {
    pub source: LanguageTag,
    pub target: LanguageTag,
}

impl TranslationDirection {
    /// 英文内容翻译成用户母语
    pub fn english_to(native: &LanguageTag) -> Self {
        Self {
            source: LanguageTag::english(),
            target: native.clone(),
        }
    }

    /// 其他语言统一翻译成英文
    pub fn auto_to_english() -> Self {
        Self {
            source: LanguageTag::auto(),
            target: LanguageTag::english(),
        }
    }
}

impl fmt::Display for TranslationDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source, self.target)
    }
}

/// 注释的处理方式，由调用方决定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommentMode {
    /// 按文档注释解析标签并重新排版
    #[default]
    DocComment,
    /// 只去掉注释符号
    Plain,
}

/// 翻译调用方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TranslationMode {
    /// 整段文本一次翻译
    Single,
    /// 按行分段批量翻译，保留每行缩进
    #[default]
    Multiline,
}

/// 规范化后的待翻译文本
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedText {
    pub content: String,
    pub was_structured_comment: bool,
}

/// 多行文本中的一行
///
/// `prefix + content` 在翻译前可以还原原始行（不含行尾空白）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineSegment {
    /// 行号，从0开始
    pub index: usize,
    /// 行首的空格
    pub prefix: String,
    /// 去掉首尾空白后的内容
    pub content: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeepLXRequest {
    pub text: String,
    pub source_lang: String,
    pub target_lang: String,
}

#[derive(Debug, Deserialize)]
pub struct DeepLXResponse {
    pub code: i32,
    #[serde(default)]
    pub data: String,
    /// 服务端检测到的源语言，例如 "EN"
    #[serde(default)]
    pub source_lang: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_tags_accept_codes_with_region() {
        assert_eq!(LanguageTag::parse("zh").unwrap().as_str(), "zh");
        assert_eq!(LanguageTag::parse("zh-TW").unwrap().as_str(), "zh-TW");
        assert_eq!(LanguageTag::parse("auto").unwrap(), LanguageTag::auto());
        assert!(LanguageTag::parse("EN").is_err());
        assert!(LanguageTag::parse("").is_err());
        assert!(LanguageTag::parse("chinese").is_err());
        assert!(LanguageTag::parse("zh-").is_err());
    }

    #[test]
    fn english_detection_ignores_case() {
        assert!(LanguageTag::is_english_code("en"));
        assert!(LanguageTag::is_english_code("EN"));
        assert!(LanguageTag::is_english_code("En"));
        assert!(!LanguageTag::is_english_code("en-US"));
        assert!(!LanguageTag::is_english_code("zh"));
    }

    #[test]
    fn delivery_respects_read_only_documents() {
        assert_eq!(Delivery::decide(false, AfterTranslation::Replace), Delivery::ShowPopup);
        assert_eq!(Delivery::decide(true, AfterTranslation::Popup), Delivery::ShowPopup);
        assert_eq!(Delivery::decide(true, AfterTranslation::Replace), Delivery::ReplaceSelection);
    }

    #[test]
    fn directions_have_fixed_shapes() {
        let native = LanguageTag::parse("ja").unwrap();
        assert_eq!(TranslationDirection::english_to(&native).to_string(), "en -> ja");
        assert_eq!(TranslationDirection::auto_to_english().to_string(), "auto -> en");
    }
}
