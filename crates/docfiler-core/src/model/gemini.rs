use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use serde_json::{Value, json};

use super::ModelClient;

const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Client for the Gemini `generateContent` API.
pub struct GeminiClient {
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

impl ModelClient for GeminiClient {
    fn name(&self) -> &str {
        "Gemini"
    }

    fn generate<'a>(
        &'a self,
        prompt: &'a str,
        client: &'a reqwest::Client,
        timeout: Duration,
    ) -> Pin<Box<dyn Future<Output = Result<String, String>> + Send + 'a>> {
        Box::pin(async move {
            let url = format!(
                "{API_BASE}/{}:generateContent?key={}",
                self.model, self.api_key
            );
            let body = json!({
                "contents": [{ "parts": [{ "text": prompt }] }]
            });

            let resp = client
                .post(&url)
                .json(&body)
                .timeout(timeout)
                .send()
                .await
                .map_err(|e| e.to_string())?;

            let status = resp.status();
            if status.as_u16() == 429 {
                return Err("Rate limited (429)".into());
            }
            if !status.is_success() {
                return Err(format!("HTTP {}", status));
            }

            let data: Value = resp.json().await.map_err(|e| e.to_string())?;
            reply_text(&data)
        })
    }
}

/// Pull the reply text out of a `generateContent` response body.
fn reply_text(data: &Value) -> Result<String, String> {
    data["candidates"][0]["content"]["parts"][0]["text"]
        .as_str()
        .map(String::from)
        .ok_or_else(|| "response contains no candidate text".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reply_text_from_well_formed_response() {
        let data = serde_json::json!({
            "candidates": [{
                "content": { "parts": [{ "text": "{\"summary\":\"ok\"}" }] }
            }]
        });
        assert_eq!(reply_text(&data).unwrap(), "{\"summary\":\"ok\"}");
    }

    #[test]
    fn reply_text_missing_candidates_is_error() {
        let data = serde_json::json!({ "promptFeedback": { "blockReason": "SAFETY" } });
        assert!(reply_text(&data).is_err());
    }
}
