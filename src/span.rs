//! 选区提取模块
//!
//! 根据光标位置、当前选区和折叠区域确定要翻译的文本。
//! 光标位于已折叠区域内时，优先翻译折叠起来的内容，因为这部分文本对用户不可见。

use crate::error::{Result, TranslationError};
use std::ops::Range;

/// 编辑器中的折叠区域（字节偏移）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoldRegion {
    /// 起始偏移
    pub start: usize,
    /// 结束偏移（不含）
    pub end: usize,
    /// 是否已展开
    pub expanded: bool,
    /// 区域是否仍然有效
    pub valid: bool,
}

impl FoldRegion {
    /// 创建一个有效且已折叠的区域
    pub fn collapsed(start: usize, end: usize) -> Self {
        Self {
            start,
            end,
            expanded: false,
            valid: true,
        }
    }

    /// 创建一个有效且已展开的区域
    pub fn expanded(start: usize, end: usize) -> Self {
        Self {
            expanded: true,
            ..Self::collapsed(start, end)
        }
    }

    /// 光标是否落在区域内（两端都包含）
    pub fn contains(&self, offset: usize) -> bool {
        offset >= self.start && offset <= self.end
    }
}

/// 编辑器状态快照，由编辑器集成层提供
#[derive(Debug, Clone)]
pub struct EditorSnapshot<'a> {
    /// 文档全文
    pub document: &'a str,
    /// 光标偏移
    pub caret: usize,
    /// 当前选区
    pub selection: Range<usize>,
    /// 所有折叠区域
    pub folds: &'a [FoldRegion],
    /// 文档是否可写
    pub writable: bool,
}

/// 文本来源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanKind {
    /// 普通选区
    Selection,
    /// 折叠区域
    FoldedRegion,
}

/// 要翻译的文本片段
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub kind: SpanKind,
    /// 在文档中的位置
    pub range: Range<usize>,
}

impl Span {
    /// 直接从文本构造，用于没有编辑器上下文的调用方
    pub fn from_text(text: impl Into<String>) -> Result<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(TranslationError::EmptySelection);
        }
        let range = 0..text.len();
        Ok(Self {
            text,
            kind: SpanKind::Selection,
            range,
        })
    }
}

/// 从编辑器快照中提取要翻译的文本
pub fn extract(snapshot: &EditorSnapshot<'_>) -> Result<Span> {
    extract_span(
        snapshot.document,
        snapshot.caret,
        snapshot.selection.clone(),
        snapshot.folds,
    )
}

/// 提取要翻译的文本
///
/// 光标所在的、有效且未展开的折叠区域优先；否则使用选区。
/// 两者都没有非空白文本时返回 [`TranslationError::EmptySelection`]。
pub fn extract_span(
    document: &str,
    caret: usize,
    selection: Range<usize>,
    folds: &[FoldRegion],
) -> Result<Span> {
    let folded = folds
        .iter()
        .find(|region| region.valid && !region.expanded && region.contains(caret))
        .and_then(|region| non_blank(document, region.start..region.end))
        .map(|(text, range)| Span {
            text,
            kind: SpanKind::FoldedRegion,
            range,
        });

    if let Some(span) = folded {
        log::debug!("使用折叠区域 {:?} 的文本", span.range);
        return Ok(span);
    }

    non_blank(document, selection)
        .map(|(text, range)| Span {
            text,
            kind: SpanKind::Selection,
            range,
        })
        .ok_or(TranslationError::EmptySelection)
}

fn non_blank(document: &str, range: Range<usize>) -> Option<(String, Range<usize>)> {
    if range.start >= range.end {
        return None;
    }
    let text = document.get(range.clone())?;
    if text.trim().is_empty() {
        None
    } else {
        Some((text.to_string(), range))
    }
}
