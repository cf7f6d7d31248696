// src/services.rs

use tracing::info;

use super::api::{ChatRequest, CodeTask, GeneratedCode, Message};
use super::config::Config;
use super::error::ServiceError;
use super::fence::strip_code_fence;
use super::openai::CompletionClient;

/// System instruction pinning the model to the requested language and to code-only output.
pub fn build_system_prompt(language: &str) -> String {
    let language = language.to_uppercase();
    format!(
        "You are an expert {language} developer.\n\
         Generate clean, working, well-commented {language} code based on user requests.\n\
         Only return the code, no explanations or markdown formatting.\n\
         Make sure the code is syntactically correct and follows best practices."
    )
}

/// Pairs the system instruction with the user's prompt.
pub fn build_chat_request(config: &Config, task: &CodeTask) -> ChatRequest {
    ChatRequest {
        model: config.model.clone(),
        messages: vec![
            Message::system(build_system_prompt(&task.language)),
            Message::user(task.prompt.clone()),
        ],
        temperature: config.temperature,
        max_tokens: config.max_tokens,
    }
}

/// Trims the model output and unwraps a markdown fence if one surrounds it.
fn clean_generated_text(raw_output: &str) -> String {
    strip_code_fence(raw_output.trim()).to_string()
}

pub async fn generate_code<C: CompletionClient>(
    config: &Config,
    client: &C,
    task: CodeTask,
) -> Result<GeneratedCode, ServiceError> {
    // 1. Credential check happens before any network traffic
    let api_key = config
        .api_key
        .as_deref()
        .ok_or(ServiceError::ApiKeyMissing)?;

    // 2. Build and send the request
    let request = build_chat_request(config, &task);
    let raw_output = client.complete(api_key, &request).await?;

    // 3. Post-process the output
    let code = clean_generated_text(&raw_output);
    info!(
        model = %request.model,
        language = %task.language,
        chars = code.len(),
        "code generated"
    );

    Ok(GeneratedCode {
        code,
        language: task.language,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::api::Role;

    struct CannedClient {
        reply: Result<String, String>,
        seen: Mutex<Vec<(String, ChatRequest)>>,
    }

    impl CannedClient {
        fn ok(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl CompletionClient for CannedClient {
        async fn complete(&self, api_key: &str, request: &ChatRequest) -> Result<String, ServiceError> {
            self.seen
                .lock()
                .unwrap()
                .push((api_key.to_string(), request.clone()));
            self.reply.clone().map_err(ServiceError::Upstream)
        }
    }

    fn task(prompt: &str, language: &str) -> CodeTask {
        CodeTask {
            prompt: prompt.to_string(),
            language: language.to_string(),
        }
    }

    fn keyed_config() -> Config {
        Config {
            api_key: Some("sk-test".to_string()),
            ..Config::default()
        }
    }

    #[test]
    fn system_prompt_names_the_language_in_upper_case() {
        let prompt = build_system_prompt("lua");
        assert!(prompt.starts_with("You are an expert LUA developer."));
        assert!(prompt.contains("Only return the code, no explanations or markdown formatting."));
    }

    #[test]
    fn chat_request_carries_model_settings_and_both_messages() {
        let request = build_chat_request(&Config::default(), &task("add two numbers", "go"));
        assert_eq!(request.model, "gpt-3.5-turbo");
        assert_eq!(request.max_tokens, 1500);
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, Role::System);
        assert!(request.messages[0].content.contains("GO"));
        assert_eq!(request.messages[1].role, Role::User);
        assert_eq!(request.messages[1].content, "add two numbers");
    }

    #[test]
    fn chat_request_serializes_in_openai_shape() {
        let request = build_chat_request(&Config::default(), &task("hi", "python"));
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["role"], "user");
        assert_eq!(value["max_tokens"], 1500);
    }

    #[actix_web::test]
    async fn fenced_output_is_cleaned() {
        let client = CannedClient::ok("\n```go\npackage main\nfunc add(a, b int) int { return a + b }\n```\n");
        let generated = generate_code(&keyed_config(), &client, task("add", "go"))
            .await
            .unwrap();
        assert_eq!(
            generated.code,
            "package main\nfunc add(a, b int) int { return a + b }"
        );
        assert_eq!(generated.language, "go");

        let seen = client.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, "sk-test");
    }

    #[actix_web::test]
    async fn missing_key_skips_the_upstream_call() {
        let client = CannedClient::ok("unused");
        let err = generate_code(&Config::default(), &client, task("add", "go"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::ApiKeyMissing));
        assert!(client.seen.lock().unwrap().is_empty());
    }

    #[actix_web::test]
    async fn upstream_errors_pass_through() {
        let client = CannedClient {
            reply: Err("rate limited".to_string()),
            seen: Mutex::new(Vec::new()),
        };
        let err = generate_code(&keyed_config(), &client, task("add", "go"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "OpenAI API error: rate limited");
    }
}
