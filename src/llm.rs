// llm.rs — the language-model collaborator.
//
// One trait seam, one concrete client shaped for the Gemini generateContent
// endpoint. Failures propagate to the caller: no retry, no canned fallback
// reply — a failed call means the message simply never appears.

use crate::chat::{ChatLog, Role};
use crate::error::{PuppetError, Result};
use async_trait::async_trait;
use serde_json::{json, Value};

#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn reply(&self, prompt: &str, history: &ChatLog) -> Result<String>;
}

pub struct GeminiChat {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
    system_instruction: String,
}

impl GeminiChat {
    pub fn new(api_key: String, model: String, system_instruction: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            model,
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            system_instruction,
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    /// Bounded history first, then the fresh prompt as the final user turn.
    fn request_body(&self, prompt: &str, history: &ChatLog) -> Value {
        let mut contents: Vec<Value> = history
            .turns()
            .map(|turn| {
                json!({
                    "role": match turn.role {
                        Role::User => "user",
                        Role::Model => "model",
                    },
                    "parts": [{"text": turn.text}]
                })
            })
            .collect();
        contents.push(json!({"role": "user", "parts": [{"text": prompt}]}));

        json!({
            "contents": contents,
            "systemInstruction": {"parts": [{"text": self.system_instruction}]},
        })
    }
}

#[async_trait]
impl ChatModel for GeminiChat {
    async fn reply(&self, prompt: &str, history: &ChatLog) -> Result<String> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );
        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&self.request_body(prompt, history))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(PuppetError::Llm(format!("HTTP {status}: {text}")));
        }

        let body: Value = response.json().await?;
        body["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| PuppetError::Llm("no candidate text in response".to_string()))
    }
}
