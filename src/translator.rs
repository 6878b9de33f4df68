//! 翻译核心模块
//!
//! * [`LanguageRouter`] - 根据语言检测结果选择翻译方向
//! * [`SegmentingTranslator`] - 按行分段批量翻译，并按原有行结构和缩进重新拼装

use crate::error::{Result, TranslationError};
use crate::provider::TranslationProvider;
use crate::types::{LanguageTag, LineSegment, TranslationDirection};

/// 翻译方向选择
///
/// 检测为英语时翻译成用户母语，其他情况一律翻译成英语。
pub struct LanguageRouter<'a> {
    provider: &'a dyn TranslationProvider,
    native_language: &'a LanguageTag,
}

impl<'a> LanguageRouter<'a> {
    pub fn new(provider: &'a dyn TranslationProvider, native_language: &'a LanguageTag) -> Self {
        Self {
            provider,
            native_language,
        }
    }

    /// 根据检测到的语言代码决定翻译方向
    pub fn direction_for(&self, detected: &str) -> TranslationDirection {
        if LanguageTag::is_english_code(detected) {
            TranslationDirection::english_to(self.native_language)
        } else {
            TranslationDirection::auto_to_english()
        }
    }

    /// 检测全文语言并返回翻译方向，检测失败不重试
    pub async fn route(&self, text: &str) -> Result<TranslationDirection> {
        let detected = self.provider.detect_language(text).await.map_err(|e| {
            log::warn!("语言检测失败: {}", e);
            TranslationError::DetectionFailed(e)
        })?;
        let direction = self.direction_for(&detected);
        log::debug!("检测到语言 {}，翻译方向 {}", detected, direction);
        Ok(direction)
    }
}

/// 把文本拆分成行
///
/// 每行记录行首的空格作为前缀，内容去掉首尾空白。
/// 末尾的空行不会产生段落，因此以换行结尾的文本不会多出一行。
///
/// 只有ASCII空格算作前缀。以制表符缩进的行前缀为空，制表符会随首尾空白一起被去掉，
/// 拼回后这一行不再保留缩进。
pub fn segment_lines(text: &str) -> Vec<LineSegment> {
    let mut lines: Vec<&str> = text.split('\n').collect();
    while lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }

    lines
        .into_iter()
        .enumerate()
        .map(|(index, line)| {
            let prefix_len = line.len() - line.trim_start_matches(' ').len();
            LineSegment {
                index,
                prefix: line[..prefix_len].to_string(),
                content: line.trim().to_string(),
            }
        })
        .collect()
}

/// 按行号把译文填回对应的位置，每行保留原来的前缀并以换行结尾
///
/// 译文条数与段落数不一致时返回 [`TranslationError::BatchMismatch`]。
pub fn reassemble(segments: &[LineSegment], translated: &[String]) -> Result<String> {
    if segments.len() != translated.len() {
        return Err(TranslationError::BatchMismatch {
            sent: segments.len(),
            received: translated.len(),
        });
    }

    let mut slots = vec![String::new(); segments.len()];
    for (segment, text) in segments.iter().zip(translated) {
        let slot = slots
            .get_mut(segment.index)
            .ok_or(TranslationError::BatchMismatch {
                sent: segments.len(),
                received: translated.len(),
            })?;
        slot.push_str(&segment.prefix);
        slot.push_str(text);
        slot.push('\n');
    }

    Ok(slots.concat())
}

/// 分段批量翻译
pub struct SegmentingTranslator<'a> {
    provider: &'a dyn TranslationProvider,
    router: LanguageRouter<'a>,
}

impl<'a> SegmentingTranslator<'a> {
    pub fn new(provider: &'a dyn TranslationProvider, native_language: &'a LanguageTag) -> Self {
        Self {
            provider,
            router: LanguageRouter::new(provider, native_language),
        }
    }

    pub fn router(&self) -> &LanguageRouter<'a> {
        &self.router
    }

    /// 按给定方向分段翻译多行文本
    pub async fn translate_multiline(
        &self,
        text: &str,
        direction: &TranslationDirection,
    ) -> Result<String> {
        let segments = segment_lines(text);
        if segments.is_empty() {
            return Ok(String::new());
        }

        let contents: Vec<String> = segments.iter().map(|s| s.content.clone()).collect();
        log::debug!("批量翻译 {} 段，方向 {}", contents.len(), direction);

        let translated = self
            .provider
            .translate_batch(&contents, &direction.source, &direction.target)
            .await
            .map_err(|e| {
                log::warn!("批量翻译失败 ({}): {}", direction, e);
                TranslationError::BatchFailed(e)
            })?;

        reassemble(&segments, &translated).map_err(|e| {
            log::error!("翻译服务返回的段落数不正确: {}", e);
            e
        })
    }

    /// 检测语言后分段翻译
    pub async fn translate_multiline_routed(&self, text: &str) -> Result<String> {
        let direction = self.router.route(text).await?;
        self.translate_multiline(text, &direction).await
    }

    /// 不分段，整段翻译
    pub async fn translate_single(&self, text: &str) -> Result<String> {
        let direction = self.router.route(text).await?;
        self.provider
            .translate_one(text, &direction.source, &direction.target)
            .await
            .map_err(|e| {
                log::warn!("翻译失败 ({}): {}", direction, e);
                TranslationError::TranslationFailed(e)
            })
    }
}
