/*!
 * Common test utilities for the comment-translator test suite
 */

use comment_translator::{ProviderConfig, TranslationConfig, TranslationLibConfig};
use serde_json::{json, Value};
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

/// Enables log output for failing tests (`RUST_LOG=debug cargo test`)
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Fake DeepLX endpoint
///
/// Every request is answered with `<target>text`, and reports `detected`
/// as the source language so detection requests can be steered.
pub struct FakeDeepLX {
    pub detected: &'static str,
}

impl Respond for FakeDeepLX {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let body: Value = match serde_json::from_slice(&request.body) {
            Ok(body) => body,
            Err(_) => return ResponseTemplate::new(400),
        };
        let text = body["text"].as_str().unwrap_or_default();
        let target = body["target_lang"].as_str().unwrap_or_default();
        ResponseTemplate::new(200).set_body_json(json!({
            "code": 200,
            "data": format!("<{}>{}", target, text),
            "source_lang": self.detected,
        }))
    }
}

/// Starts a server that answers like [`FakeDeepLX`]
pub async fn fake_deeplx(detected: &'static str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(FakeDeepLX { detected })
        .mount(&server)
        .await;
    server
}

/// Builds a config pointing at the given mock server, without rate limiting
pub fn config_for(server: &MockServer) -> TranslationLibConfig {
    TranslationLibConfig {
        translation: TranslationConfig::default(),
        provider: ProviderConfig {
            deeplx_api_url: format!("{}/translate", server.uri()),
            max_requests_per_second: 0.0,
            timeout_secs: 5,
        },
    }
}
