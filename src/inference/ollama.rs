//! Ollama client using the non-streaming `/api/generate` endpoint.

use super::{InferenceBackend, InferenceError};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// Ollama inference client.
///
/// One request per prompt, bounded by a single timeout that covers both
/// connecting and generating.
pub struct OllamaClient {
    client: Client,
    base_url: String,
    model: String,
    temperature: Option<f32>,
}

impl OllamaClient {
    /// Create a new Ollama client.
    ///
    /// # Arguments
    /// * `base_url` - Base URL of the Ollama server (e.g., "http://localhost:11434").
    /// * `model` - Model to use (e.g., "deepseek-r1:14b").
    /// * `timeout` - Upper bound for one whole request.
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, InferenceError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| InferenceError::Connection(format!("Failed to build HTTP client: {}", e)))?;

        let base_url: String = base_url.into();
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.into(),
            temperature: None,
        })
    }

    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }
}

impl InferenceBackend for OllamaClient {
    fn model(&self) -> &str {
        &self.model
    }

    fn infer(&self, prompt: &str) -> Result<String, InferenceError> {
        let url = format!("{}/api/generate", self.base_url);

        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: self.temperature.map(|t| GenerateOptions {
                temperature: Some(t),
            }),
        };

        debug!(
            model = %self.model,
            prompt_len = prompt.len(),
            "Sending generate request to Ollama"
        );

        let response = self.client.post(&url).json(&request).send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(InferenceError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text()?;
        let generated: GenerateResponse = serde_json::from_str(&body).map_err(|e| {
            InferenceError::MalformedResponse(format!("Failed to parse Ollama response: {}", e))
        })?;

        let text = generated.response.ok_or_else(|| {
            InferenceError::MalformedResponse("Missing 'response' field".to_string())
        })?;

        Ok(text.trim().to_string())
    }

    fn health_check(&self) -> Result<(), InferenceError> {
        let url = format!("{}/api/tags", self.base_url);

        let response = self
            .client
            .get(&url)
            .timeout(HEALTH_CHECK_TIMEOUT)
            .send()?;

        if !response.status().is_success() {
            return Err(InferenceError::Api {
                status: response.status().as_u16(),
                message: "Health check failed".to_string(),
            });
        }

        let tags: TagsResponse = response.json().map_err(|e| {
            InferenceError::MalformedResponse(format!("Failed to parse tags response: {}", e))
        })?;

        let model_exists = tags.models.iter().any(|m| m.name == self.model);
        if !model_exists {
            warn!(
                model = %self.model,
                available_models = ?tags.models.iter().map(|m| &m.name).collect::<Vec<_>>(),
                "Configured model not found in Ollama"
            );
        }

        Ok(())
    }
}

// Ollama API types

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<GenerateOptions>,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<TagsModel>,
}

#[derive(Debug, Deserialize)]
struct TagsModel {
    name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn client_for(server: &MockServer) -> OllamaClient {
        OllamaClient::new(server.base_url(), "deepseek-r1:14b", Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_infer_returns_trimmed_response() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/generate")
                .json_body_partial(r#"{"model": "deepseek-r1:14b", "stream": false}"#);
            then.status(200).json_body(json!({
                "model": "deepseek-r1:14b",
                "response": "  {\"language\": \"EN\", \"emotion\": \"Ease\"}\n",
                "done": true
            }));
        });

        let text = client_for(&server).infer("classify this").unwrap();

        mock.assert();
        assert_eq!(text, "{\"language\": \"EN\", \"emotion\": \"Ease\"}");
    }

    #[test]
    fn test_infer_sends_temperature_when_set() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/generate")
                .json_body_partial(r#"{"options": {"temperature": 0.5}}"#);
            then.status(200).json_body(json!({"response": "ok"}));
        });

        let client = client_for(&server).with_temperature(Some(0.5));
        assert_eq!(client.infer("p").unwrap(), "ok");
        mock.assert();
    }

    #[test]
    fn test_infer_missing_response_field_is_malformed() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/api/generate");
            then.status(200).json_body(json!({"error": "model is loading"}));
        });

        let result = client_for(&server).infer("p");
        assert!(matches!(result, Err(InferenceError::MalformedResponse(_))));
    }

    #[test]
    fn test_infer_non_json_body_is_malformed() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/api/generate");
            then.status(200).body("<html>proxy error</html>");
        });

        let result = client_for(&server).infer("p");
        assert!(matches!(result, Err(InferenceError::MalformedResponse(_))));
    }

    #[test]
    fn test_infer_http_error_status() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/api/generate");
            then.status(404).body("model 'deepseek-r1:14b' not found");
        });

        match client_for(&server).infer("p") {
            Err(InferenceError::Api { status, message }) => {
                assert_eq!(status, 404);
                assert!(message.contains("not found"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_infer_slow_generation_times_out() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/api/generate");
            then.status(200)
                .delay(Duration::from_secs(3))
                .json_body(json!({"response": "too late"}));
        });

        let client = OllamaClient::new(server.base_url(), "m", Duration::from_secs(1)).unwrap();
        let result = client.infer("p");
        assert!(
            matches!(result, Err(InferenceError::Timeout)),
            "unexpected result: {:?}",
            result
        );
    }

    #[test]
    fn test_infer_connection_refused() {
        // Port 9 (discard) is essentially never served locally.
        let client =
            OllamaClient::new("http://127.0.0.1:9", "m", Duration::from_secs(2)).unwrap();
        let result = client.infer("p");
        assert!(matches!(
            result,
            Err(InferenceError::Connection(_)) | Err(InferenceError::Timeout)
        ));
    }

    #[test]
    fn test_health_check() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/api/tags");
            then.status(200)
                .json_body(json!({"models": [{"name": "deepseek-r1:14b"}]}));
        });

        assert!(client_for(&server).health_check().is_ok());
    }

    #[test]
    fn test_health_check_failure_status() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/api/tags");
            then.status(500);
        });

        assert!(matches!(
            client_for(&server).health_check(),
            Err(InferenceError::Api { status: 500, .. })
        ));
    }

    #[test]
    fn test_trailing_slash_in_base_url() {
        let client =
            OllamaClient::new("http://localhost:11434/", "m", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url, "http://localhost:11434");
        assert_eq!(client.model(), "m");
    }
}
