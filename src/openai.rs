// src/openai.rs

use std::future::Future;

use tracing::{debug, error};

use super::api::{ChatRequest, ChatResponse};
use super::config::Config;
use super::error::ServiceError;

/// Anything that can turn a chat request into generated text.
pub trait CompletionClient {
    fn complete(
        &self,
        api_key: &str,
        request: &ChatRequest,
    ) -> impl Future<Output = Result<String, ServiceError>> + Send;
}

#[derive(Debug, Clone)]
pub struct OpenAiClient {
    base_url: String,
    http_client: reqwest::Client,
}

impl OpenAiClient {
    /// Builds a pooled client with the configured timeout and optional egress proxy.
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder().timeout(config.timeout);
        if let Some(proxy) = &config.proxy {
            builder = builder.proxy(reqwest::Proxy::all(proxy)?);
        }
        Ok(Self {
            base_url: config.base_url.clone(),
            http_client: builder.build()?,
        })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

impl CompletionClient for OpenAiClient {
    async fn complete(&self, api_key: &str, request: &ChatRequest) -> Result<String, ServiceError> {
        let url = self.completions_url();
        debug!(%url, model = %request.model, "sending chat completion request");

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                error!("chat completion request failed: {}", e);
                ServiceError::Network(e.to_string())
            })?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let text = response
                .text()
                .await
                .map_err(|e| ServiceError::Network(e.to_string()))?;
            error!("OpenAI API returned {}: {}", status, text);
            return Err(ServiceError::Upstream(text));
        }

        let body: ChatResponse = response.json().await.map_err(|e| {
            error!("undecodable chat completion payload: {}", e);
            ServiceError::Upstream(format!("invalid completion payload: {e}"))
        })?;

        body.into_first_content()
            .ok_or_else(|| ServiceError::Upstream("completion contained no message".to_string()))
    }
}
