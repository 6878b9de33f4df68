//! 翻译流程模块
//!
//! 把各个步骤串成一次完整的翻译：
//! 提取文本 → 规范化注释 → 长度检查 → 检测语言并翻译。
//! 每次调用只做一次线性尝试，任何一步失败都直接返回，不重试。

use std::ops::Range;
use std::sync::Arc;

use crate::comment::normalize;
use crate::config::TranslationLibConfig;
use crate::error::{Result, TranslationError};
use crate::provider::deeplx::DeepLXProvider;
use crate::provider::TranslationProvider;
use crate::span::{extract, EditorSnapshot, Span};
use crate::translator::SegmentingTranslator;
use crate::types::{
    AfterTranslation, CommentMode, Delivery, LanguageTag, TranslationConfig, TranslationMode,
};

/// 单次运行的选项
///
/// 默认按文档注释解析并分段翻译。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunOptions {
    pub comment_mode: CommentMode,
    pub translation_mode: TranslationMode,
}

/// 编辑器集成层需要的翻译结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationOutcome {
    /// 译文
    pub text: String,
    /// 原文在文档中的位置，替换时使用
    pub range: Range<usize>,
    /// 交付方式
    pub delivery: Delivery,
}

/// 翻译流程
///
/// 持有翻译服务的共享句柄，可以跨请求复用；流程本身不保存任何请求状态。
///
/// # 示例
///
/// ```rust
/// use std::sync::Arc;
/// use comment_translator::{
///     MockProvider, RunOptions, Span, TranslationConfig, TranslationPipeline,
/// };
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let provider = Arc::new(MockProvider::detecting("en"));
///     let pipeline = TranslationPipeline::new(provider, &TranslationConfig::default())?;
///
///     let span = Span::from_text("/**\n * Adds two numbers.\n * @return sum\n */")?;
///     let text = pipeline.run(&span, RunOptions::default()).await?;
///     assert_eq!(text, "Adds two numbers.\nReturns:\n     sum\n");
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct TranslationPipeline {
    provider: Arc<dyn TranslationProvider>,
    native_language: LanguageTag,
    after_translation: AfterTranslation,
    max_length: usize,
}

impl TranslationPipeline {
    /// 创建翻译流程
    ///
    /// 母语代码不合法时返回 [`TranslationError::InvalidLanguage`]。
    pub fn new(provider: Arc<dyn TranslationProvider>, config: &TranslationConfig) -> Result<Self> {
        Ok(Self {
            provider,
            native_language: LanguageTag::parse(&config.native_language)?,
            after_translation: config.after_translation,
            max_length: config.max_text_length,
        })
    }

    /// 用配置中的 DeepLX 服务创建翻译流程
    pub fn from_config(config: &TranslationLibConfig) -> Result<Self> {
        let provider = Arc::new(DeepLXProvider::new(&config.provider));
        Self::new(provider, &config.translation)
    }

    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    pub fn native_language(&self) -> &LanguageTag {
        &self.native_language
    }

    /// 检查规范化后的文本长度（按字符计）
    pub fn check_length(&self, content: &str) -> Result<()> {
        let length = content.chars().count();
        if length > self.max_length {
            return Err(TranslationError::TooLong {
                length,
                max: self.max_length,
            });
        }
        Ok(())
    }

    /// 翻译一段已经提取好的文本
    pub async fn run(&self, span: &Span, options: RunOptions) -> Result<String> {
        let normalized = normalize(&span.text, options.comment_mode);
        if normalized.content.trim().is_empty() {
            return Err(TranslationError::EmptySelection);
        }
        self.check_length(&normalized.content)?;

        log::debug!(
            "规范化完成: {} 字符，文档注释: {}，模式: {:?}",
            normalized.content.chars().count(),
            normalized.was_structured_comment,
            options.translation_mode
        );

        let translator = SegmentingTranslator::new(self.provider.as_ref(), &self.native_language);
        match options.translation_mode {
            TranslationMode::Single => translator.translate_single(&normalized.content).await,
            TranslationMode::Multiline => {
                translator
                    .translate_multiline_routed(&normalized.content)
                    .await
            }
        }
    }

    /// 从编辑器快照中提取文本并翻译
    pub async fn translate_selection(
        &self,
        snapshot: &EditorSnapshot<'_>,
        options: RunOptions,
    ) -> Result<TranslationOutcome> {
        let span = extract(snapshot)?;
        let text = self.run(&span, options).await?;
        Ok(TranslationOutcome {
            text,
            range: span.range,
            delivery: Delivery::decide(snapshot.writable, self.after_translation),
        })
    }
}

/// [`RunOptions`] 的构建器
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptionsBuilder(RunOptions);

impl RunOptionsBuilder {
    pub fn comment_mode(mut self, mode: CommentMode) -> Self {
        self.0.comment_mode = mode;
        self
    }

    pub fn translation_mode(mut self, mode: TranslationMode) -> Self {
        self.0.translation_mode = mode;
        self
    }

    pub fn build(self) -> RunOptions {
        self.0
    }
}

impl RunOptions {
    pub fn builder() -> RunOptionsBuilder {
        RunOptionsBuilder::default()
    }
}
