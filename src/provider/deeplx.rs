//! DeepLX 翻译服务
//!
//! 通过 DeepLX 兼容的 HTTP 接口提供语言检测、单条翻译和批量翻译。
//! DeepLX 没有单独的语言检测和批量接口：
//!
//! * 语言检测发送一次 `auto → en` 翻译请求，读取响应中的 `source_lang`
//! * 批量翻译按顺序逐条请求，空白段落不发请求

use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep_until, Instant};

use crate::error::ProviderError;
use crate::provider::TranslationProvider;
use crate::types::{DeepLXRequest, DeepLXResponse, LanguageTag, ProviderConfig};

/// 速率限制器
///
/// 用于控制API请求频率，防止超出服务提供商的速率限制。
/// 保证相邻两次请求之间至少间隔 `1 / requests_per_second` 秒。
#[derive(Clone)]
pub struct RateLimiter {
    /// 上一次请求的时间
    last_request: Arc<Mutex<Option<Instant>>>,
    /// 请求间隔
    interval: Duration,
}

impl RateLimiter {
    /// 创建新的速率限制器
    ///
    /// # 参数
    ///
    /// * `requests_per_second` - 每秒允许的最大请求数，非正数表示不限制
    ///
    /// # 示例
    ///
    /// ```rust
    /// use comment_translator::RateLimiter;
    ///
    /// let limiter = RateLimiter::new(2.0); // 每秒2个请求
    /// ```
    pub fn new(requests_per_second: f64) -> Self {
        let interval = if requests_per_second.is_finite() && requests_per_second > 0.0 {
            Duration::from_secs_f64(1.0 / requests_per_second)
        } else {
            Duration::ZERO
        };

        Self {
            last_request: Arc::new(Mutex::new(None)),
            interval,
        }
    }

    /// 请求间隔
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// 等待直到可以发起下一次请求
    pub async fn acquire(&self) {
        let mut last_request = self.last_request.lock().await;
        if let Some(previous) = *last_request {
            let ready_at = previous + self.interval;
            if ready_at > Instant::now() {
                sleep_until(ready_at).await;
            }
        }
        *last_request = Some(Instant::now());
    }
}

/// 一次 DeepLX 请求的结果
#[derive(Debug, Clone, PartialEq, Eq)]
struct Translated {
    text: String,
    detected: Option<String>,
}

/// DeepLX 翻译服务
///
/// # 示例
///
/// ```rust,no_run
/// use comment_translator::{DeepLXProvider, ProviderConfig, TranslationProvider};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let provider = DeepLXProvider::new(&ProviderConfig::default());
///     let lang = provider.detect_language("Hello, world!").await?;
///     println!("Detected: {}", lang);
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct DeepLXProvider {
    /// HTTP客户端，用于API调用
    client: Client,
    /// 速率限制器
    rate_limiter: RateLimiter,
    /// DeepLX API地址
    api_url: String,
}

impl DeepLXProvider {
    /// 创建新的 DeepLX 服务实例
    pub fn new(config: &ProviderConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_idle_timeout(Duration::from_secs(30))
            .pool_max_idle_per_host(5)
            .tcp_keepalive(Duration::from_secs(60))
            .user_agent(concat!("comment-translator/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|e| {
                log::warn!("创建HTTP客户端失败: {}，使用默认客户端", e);
                Client::new()
            });

        Self {
            client,
            rate_limiter: RateLimiter::new(config.max_requests_per_second),
            api_url: config.deeplx_api_url.clone(),
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    async fn request(&self, text: &str, source: &str, target: &str) -> Result<Translated, ProviderError> {
        self.rate_limiter.acquire().await;

        let request = DeepLXRequest {
            text: text.to_string(),
            source_lang: source.to_string(),
            target_lang: target.to_string(),
        };

        log::debug!(
            "发送翻译请求到 {}: {} -> {}，{} 字符",
            self.api_url,
            source,
            target,
            text.chars().count()
        );

        let response = self
            .client
            .post(&self.api_url)
            .header("Accept", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "无法读取错误信息".to_string());
            return Err(ProviderError::Api {
                code: i32::from(status.as_u16()),
                message: format!("DeepLX API请求失败: {} - {}", status, error_text),
            });
        }

        let body = response.text().await?;
        parse_response_body(&body)
    }
}

/// 解析 DeepLX 响应
///
/// 优先按标准 DeepLX 格式解析；其次尝试常见的 JSON 字段；
/// 非 JSON 的响应体视为纯文本翻译结果。
fn parse_response_body(body: &str) -> Result<Translated, ProviderError> {
    if let Ok(result) = serde_json::from_str::<DeepLXResponse>(body) {
        if result.code != 200 {
            return Err(ProviderError::Api {
                code: result.code,
                message: format!("DeepLX翻译失败，返回代码: {}", result.code),
            });
        }
        if result.data.is_empty() {
            return Err(ProviderError::EmptyResult);
        }
        return Ok(Translated {
            text: result.data,
            detected: result.source_lang,
        });
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Err(ProviderError::EmptyResult);
    }

    if trimmed.starts_with('{') {
        let value = serde_json::from_str::<serde_json::Value>(trimmed)
            .map_err(|e| ProviderError::Parse(format!("无法解析JSON响应: {}", e)))?;
        let text = value
            .get("translated_text")
            .or_else(|| value.get("result"))
            .or_else(|| value.get("translation"))
            .or_else(|| value.get("data"))
            .and_then(|v| v.as_str())
            .ok_or_else(|| ProviderError::Parse(format!("无法从JSON响应中提取翻译结果: {}", trimmed)))?;
        let detected = value
            .get("source_lang")
            .and_then(|v| v.as_str())
            .map(str::to_string);
        return Ok(Translated {
            text: text.to_string(),
            detected,
        });
    }

    Ok(Translated {
        text: body.to_string(),
        detected: None,
    })
}

#[async_trait]
impl TranslationProvider for DeepLXProvider {
    async fn detect_language(&self, text: &str) -> Result<String, ProviderError> {
        let translated = self
            .request(text, LanguageTag::AUTO, LanguageTag::ENGLISH)
            .await?;
        translated
            .detected
            .map(|lang| lang.trim().to_lowercase())
            .filter(|lang| !lang.is_empty())
            .ok_or_else(|| ProviderError::Parse("响应中没有 source_lang 字段".to_string()))
    }

    async fn translate_one(
        &self,
        text: &str,
        source: &LanguageTag,
        target: &LanguageTag,
    ) -> Result<String, ProviderError> {
        let translated = self.request(text, source.as_str(), target.as_str()).await?;
        Ok(translated.text)
    }

    async fn translate_batch(
        &self,
        segments: &[String],
        source: &LanguageTag,
        target: &LanguageTag,
    ) -> Result<Vec<String>, ProviderError> {
        let mut translated = Vec::with_capacity(segments.len());
        for (i, segment) in segments.iter().enumerate() {
            if segment.trim().is_empty() {
                translated.push(String::new());
                continue;
            }
            log::debug!("翻译第 {}/{} 段", i + 1, segments.len());
            let result = self.request(segment, source.as_str(), target.as_str()).await?;
            translated.push(result.text);
        }
        Ok(translated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer) -> ProviderConfig {
        ProviderConfig {
            deeplx_api_url: format!("{}/translate", server.uri()),
            max_requests_per_second: 0.0,
            timeout_secs: 5,
        }
    }

    fn tag(code: &str) -> LanguageTag {
        LanguageTag::parse(code).unwrap()
    }

    #[test]
    fn parses_standard_deeplx_response() {
        let parsed = parse_response_body(r#"{"code":200,"data":"你好","source_lang":"EN"}"#).unwrap();
        assert_eq!(parsed.text, "你好");
        assert_eq!(parsed.detected.as_deref(), Some("EN"));
    }

    #[test]
    fn non_200_code_is_an_api_error() {
        let err = parse_response_body(r#"{"code":429,"data":""}"#).unwrap_err();
        assert!(matches!(err, ProviderError::Api { code: 429, .. }));
    }

    #[test]
    fn empty_results_are_rejected() {
        assert!(matches!(
            parse_response_body(r#"{"code":200,"data":""}"#),
            Err(ProviderError::EmptyResult)
        ));
        assert!(matches!(parse_response_body("  "), Err(ProviderError::EmptyResult)));
    }

    #[test]
    fn falls_back_to_alternative_fields_and_plain_text() {
        let parsed = parse_response_body(r#"{"translation":"bonjour"}"#).unwrap();
        assert_eq!(parsed.text, "bonjour");
        assert!(matches!(
            parse_response_body(r#"{"unexpected":true}"#),
            Err(ProviderError::Parse(_))
        ));
        assert_eq!(parse_response_body("hola").unwrap().text, "hola");
    }

    #[tokio::test]
    async fn translate_one_posts_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/translate"))
            .and(body_json(json!({"text": "Hello", "source_lang": "en", "target_lang": "zh"})))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"code": 200, "data": "你好"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let provider = DeepLXProvider::new(&config_for(&server));
        let text = provider
            .translate_one("Hello", &tag("en"), &tag("zh"))
            .await
            .unwrap();
        assert_eq!(text, "你好");
    }

    #[tokio::test]
    async fn detect_language_reads_source_lang() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_json(json!({"text": "Bonjour", "source_lang": "auto", "target_lang": "en"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                json!({"code": 200, "data": "Hello", "source_lang": "FR"}),
            ))
            .mount(&server)
            .await;

        let provider = DeepLXProvider::new(&config_for(&server));
        assert_eq!(provider.detect_language("Bonjour").await.unwrap(), "fr");
    }

    #[tokio::test]
    async fn detect_language_without_source_lang_fails() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": 200, "data": "Hello"})))
            .mount(&server)
            .await;

        let provider = DeepLXProvider::new(&config_for(&server));
        assert!(matches!(
            provider.detect_language("Hello").await,
            Err(ProviderError::Parse(_))
        ));
    }

    #[tokio::test]
    async fn http_errors_become_api_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let provider = DeepLXProvider::new(&config_for(&server));
        let err = provider
            .translate_one("Hello", &tag("en"), &tag("zh"))
            .await
            .unwrap_err();
        match err {
            ProviderError::Api { code, message } => {
                assert_eq!(code, 503);
                assert!(message.contains("overloaded"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn batch_skips_blank_segments() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_json(json!({"text": "one", "source_lang": "auto", "target_lang": "en"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": 200, "data": "ONE"})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(body_json(json!({"text": "two", "source_lang": "auto", "target_lang": "en"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": 200, "data": "TWO"})))
            .expect(1)
            .mount(&server)
            .await;

        let provider = DeepLXProvider::new(&config_for(&server));
        let segments = vec!["one".to_string(), String::new(), "two".to_string()];
        let translated = provider
            .translate_batch(&segments, &LanguageTag::auto(), &LanguageTag::english())
            .await
            .unwrap();
        assert_eq!(translated, vec!["ONE", "", "TWO"]);
    }

    #[tokio::test]
    async fn rate_limiter_spaces_requests() {
        let limiter = RateLimiter::new(16.0);
        assert_eq!(limiter.interval(), Duration::from_micros(62_500));
        let started = Instant::now();
        limiter.acquire().await;
        limiter.acquire().await;
        limiter.acquire().await;
        assert!(started.elapsed() >= Duration::from_millis(125));
    }

    #[test]
    fn unlimited_rate_limiter_does_not_wait() {
        assert_eq!(RateLimiter::new(0.0).interval(), Duration::ZERO);
        assert_eq!(RateLimiter::new(f64::NAN).interval(), Duration::ZERO);
        tokio_test::block_on(async {
            let limiter = RateLimiter::new(0.0);
            limiter.acquire().await;
            limiter.acquire().await;
        });
    }
}
