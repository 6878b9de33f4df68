//! # Comment Translator
//!
//! 面向编辑器插件的源码注释翻译库：从选区或折叠区域中提取文本，
//! 把文档注释整理成便于阅读的扁平文本，检测语言后按行批量翻译，
//! 并在译文中保留每一行原有的缩进。
//!
//! ## 主要特性
//!
//! - **选区提取**: 光标位于折叠区域内时优先翻译被折叠的内容
//! - **文档注释排版**: 提取描述、`@param`、`@return`、`@throws`、`@since`，去掉HTML标记
//! - **方向选择**: 英文翻译成母语，其他语言翻译成英文
//! - **分段翻译**: 每行独立翻译，按行号拼回原有结构并保留行首空格
//! - **可替换的翻译服务**: 内置 DeepLX HTTP 实现和测试用的 Mock 实现
//!
//! ## 快速开始
//!
//! ```rust,no_run
//! use comment_translator::{RunOptions, Span, TranslationLibConfig, TranslationPipeline};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = TranslationLibConfig::load_from_default_locations();
//!     let pipeline = TranslationPipeline::from_config(&config)?;
//!
//!     let span = Span::from_text("/**\n * Returns the sum.\n * @param a first operand\n */")?;
//!     let translated = pipeline.run(&span, RunOptions::default()).await?;
//!     println!("{}", translated);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## 配置文件支持
//!
//! ```toml
//! [translation]
//! native_language = "zh"
//! after_translation = "popup"
//! max_text_length = 5000
//!
//! [provider]
//! deeplx_api_url = "http://localhost:1188/translate"
//! max_requests_per_second = 2.0
//! timeout_secs = 30
//! ```

pub mod comment;
pub mod config;
pub mod doc_comment;
pub mod error;
pub mod pipeline;
pub mod provider;
pub mod span;
pub mod translator;
pub mod types;

pub use comment::{normalize, strip_plain_comment};
pub use config::TranslationLibConfig;
pub use doc_comment::{DocComment, DocParseError, DocTagSection, ParamDoc, ThrowsDoc};
pub use error::{ConfigError, ProviderError, Result, TranslationError};
pub use pipeline::{RunOptions, RunOptionsBuilder, TranslationOutcome, TranslationPipeline};
pub use provider::deeplx::{DeepLXProvider, RateLimiter};
pub use provider::mock::{MockBehavior, MockCall, MockProvider};
pub use provider::TranslationProvider;
pub use span::{extract, extract_span, EditorSnapshot, FoldRegion, Span, SpanKind};
pub use translator::{reassemble, segment_lines, LanguageRouter, SegmentingTranslator};
pub use types::{
    AfterTranslation, CommentMode, DeepLXRequest, DeepLXResponse, Delivery, LanguageTag,
    LineSegment, NormalizedText, ProviderConfig, TranslationConfig, TranslationDirection,
    TranslationMode, DEFAULT_MAX_TEXT_LENGTH,
};
