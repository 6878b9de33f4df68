//! 测试用的翻译服务
//!
//! 返回预设的检测结果和译文，并记录每次调用，方便断言翻译方向和请求内容。
//!
//! * `MockBehavior::Identity` - 原样返回
//! * `MockBehavior::Uppercase` - 转成大写
//! * `MockBehavior::Canned` - 批量翻译返回固定列表
//! * `MockBehavior::Failing` - 翻译总是失败

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::ProviderError;
use crate::provider::TranslationProvider;
use crate::types::{LanguageTag, TranslationDirection};

/// 翻译行为
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockBehavior {
    Identity,
    Uppercase,
    /// 批量翻译返回这里的内容（条数可以和输入不同），单条翻译返回第一项
    Canned(Vec<String>),
    Failing(String),
}

/// 调用类型
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    Detect(String),
    TranslateOne {
        text: String,
        direction: TranslationDirection,
    },
    TranslateBatch {
        segments: Vec<String>,
        direction: TranslationDirection,
    },
}

/// 测试用翻译服务
#[derive(Debug)]
pub struct MockProvider {
    detection: Result<String, String>,
    behavior: MockBehavior,
    calls: Mutex<Vec<MockCall>>,
}

impl MockProvider {
    /// 检测结果固定为 `language`，翻译原样返回
    pub fn detecting(language: &str) -> Self {
        Self {
            detection: Ok(language.to_string()),
            behavior: MockBehavior::Identity,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// 语言检测总是失败
    pub fn detection_failing(message: &str) -> Self {
        Self {
            detection: Err(message.to_string()),
            ..Self::detecting("en")
        }
    }

    pub fn with_behavior(mut self, behavior: MockBehavior) -> Self {
        self.behavior = behavior;
        self
    }

    /// 所有调用记录
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// 最近一次翻译调用使用的方向
    pub fn last_direction(&self) -> Option<TranslationDirection> {
        self.calls.lock().iter().rev().find_map(|call| match call {
            MockCall::TranslateOne { direction, .. } | MockCall::TranslateBatch { direction, .. } => {
                Some(direction.clone())
            }
            MockCall::Detect(_) => None,
        })
    }

    fn apply(&self, text: &str) -> Result<String, ProviderError> {
        match &self.behavior {
            MockBehavior::Identity => Ok(text.to_string()),
            MockBehavior::Uppercase => Ok(text.to_uppercase()),
            MockBehavior::Canned(items) => items.first().cloned().ok_or(ProviderError::EmptyResult),
            MockBehavior::Failing(message) => Err(ProviderError::Other(message.clone())),
        }
    }
}

fn direction(source: &LanguageTag, target: &LanguageTag) -> TranslationDirection {
    TranslationDirection {
        source: source.clone(),
        target: target.clone(),
    }
}

#[async_trait]
impl TranslationProvider for MockProvider {
    async fn detect_language(&self, text: &str) -> Result<String, ProviderError> {
        self.calls.lock().push(MockCall::Detect(text.to_string()));
        self.detection.clone().map_err(ProviderError::Other)
    }

    async fn translate_one(
        &self,
        text: &str,
        source: &LanguageTag,
        target: &LanguageTag,
    ) -> Result<String, ProviderError> {
        self.calls.lock().push(MockCall::TranslateOne {
            text: text.to_string(),
            direction: direction(source, target),
        });
        self.apply(text)
    }

    async fn translate_batch(
        &self,
        segments: &[String],
        source: &LanguageTag,
        target: &LanguageTag,
    ) -> Result<Vec<String>, ProviderError> {
        self.calls.lock().push(MockCall::TranslateBatch {
            segments: segments.to_vec(),
            direction: direction(source, target),
        });
        match &self.behavior {
            MockBehavior::Canned(items) => Ok(items.clone()),
            _ => segments.iter().map(|segment| self.apply(segment)).collect(),
        }
    }
}
