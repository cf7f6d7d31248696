// src/api.rs

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::error::ServiceError;

/// Language used when the request body does not name one.
pub const DEFAULT_LANGUAGE: &str = "python";

/* ---------- Chat completion wire types ---------- */

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Deserialize, Debug)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Deserialize, Debug)]
pub struct ChatChoice {
    pub message: ChatChoiceMessage,
}

#[derive(Deserialize, Debug)]
pub struct ChatChoiceMessage {
    pub content: Option<String>,
}

impl ChatResponse {
    /// Text of the first choice, if the model produced any.
    pub fn into_first_content(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
    }
}

/* ---------- Invocation event shapes ---------- */

/// HTTP-shaped event handed to the handler by the hosting platform.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct InboundEvent {
    #[serde(default)]
    pub http_method: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
}

impl InboundEvent {
    pub fn new(method: impl Into<String>, body: Option<String>) -> Self {
        Self {
            http_method: Some(method.into()),
            body,
        }
    }

    /// An event without a method is dispatched as `GET`.
    pub fn method(&self) -> &str {
        self.http_method.as_deref().unwrap_or("GET")
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OutboundResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
    pub is_base64_encoded: bool,
}

impl OutboundResponse {
    /// Answer to a CORS preflight: permission headers, empty body.
    pub fn preflight() -> Self {
        let headers = BTreeMap::from([
            ("Access-Control-Allow-Origin".to_string(), "*".to_string()),
            (
                "Access-Control-Allow-Methods".to_string(),
                "POST, OPTIONS".to_string(),
            ),
            (
                "Access-Control-Allow-Headers".to_string(),
                "Content-Type".to_string(),
            ),
            ("Access-Control-Max-Age".to_string(), "86400".to_string()),
        ]);
        Self {
            status_code: 200,
            headers,
            body: String::new(),
            is_base64_encoded: false,
        }
    }

    pub fn success(generated: &GeneratedCode) -> Self {
        Self::json(
            200,
            json!({
                "code": generated.code,
                "language": generated.language,
            }),
        )
    }

    pub fn from_error(error: &ServiceError) -> Self {
        Self::json(error.status_code().as_u16(), error.body())
    }

    fn json(status_code: u16, body: serde_json::Value) -> Self {
        let headers = BTreeMap::from([
            ("Content-Type".to_string(), "application/json".to_string()),
            ("Access-Control-Allow-Origin".to_string(), "*".to_string()),
        ]);
        Self {
            status_code,
            headers,
            body: body.to_string(),
            is_base64_encoded: false,
        }
    }
}

/* ---------- Generation payloads ---------- */

/// POST body as sent by the client. Both fields are optional on the wire;
/// `validate` turns it into a `CodeTask`.
#[derive(Debug, Default)]
pub struct GenerateRequest {
    pub prompt: Option<String>,
    pub language: Option<String>,
}

impl GenerateRequest {
    /// Parses a raw body. An absent or blank body, or any JSON value other
    /// than an object, is an empty request. Only invalid JSON is an error.
    pub fn parse(body: Option<&str>) -> Result<Self, serde_json::Error> {
        match body {
            Some(raw) if !raw.trim().is_empty() => {
                let value: Value = serde_json::from_str(raw)?;
                Ok(Self::from_value(&value))
            }
            _ => Ok(Self::default()),
        }
    }

    /// Picks the string fields out of a JSON object. A field of the wrong type
    /// is dropped on its own without discarding the rest of the body.
    fn from_value(value: &Value) -> Self {
        let Some(fields) = value.as_object() else {
            return Self::default();
        };
        let text = |name: &str| fields.get(name).and_then(Value::as_str).map(str::to_string);
        Self {
            prompt: text("prompt"),
            language: text("language"),
        }
    }

    pub fn validate(self) -> Result<CodeTask, ServiceError> {
        let prompt = self
            .prompt
            .filter(|p| !p.is_empty())
            .ok_or(ServiceError::PromptRequired)?;
        let language = self
            .language
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());
        Ok(CodeTask { prompt, language })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTask {
    pub prompt: String,
    pub language: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedCode {
    pub code: String,
    pub language: String,
}
