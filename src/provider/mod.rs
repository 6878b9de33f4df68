//! 翻译服务提供方
//!
//! 翻译流程只依赖 [`TranslationProvider`] 这一抽象能力：语言检测、单条翻译和批量翻译。
//! 具体实现：
//!
//! * [`deeplx::DeepLXProvider`] - DeepLX 兼容的 HTTP 接口
//! * [`mock::MockProvider`] - 返回预设结果的测试替身

use async_trait::async_trait;

use crate::error::ProviderError;
use crate::types::LanguageTag;

pub mod deeplx;
pub mod mock;

/// 翻译服务能力
///
/// 实现需要能在多次顺序调用之间复用（例如持有连接池），
/// 翻译流程本身不会并发调用同一个实例。
#[async_trait]
pub trait TranslationProvider: Send + Sync {
    /// 检测文本语言，返回语言代码（大小写不限）
    async fn detect_language(&self, text: &str) -> Result<String, ProviderError>;

    /// 翻译一段文本
    async fn translate_one(
        &self,
        text: &str,
        source: &LanguageTag,
        target: &LanguageTag,
    ) -> Result<String, ProviderError>;

    /// 批量翻译
    ///
    /// 返回的结果必须与输入一一对应、顺序一致；调用方会校验条数。
    async fn translate_batch(
        &self,
        segments: &[String],
        source: &LanguageTag,
        target: &LanguageTag,
    ) -> Result<Vec<String>, ProviderError>;
}
