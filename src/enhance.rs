use std::env;

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};

const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";

// Models occasionally wrap the rewritten text in a markdown fence even when
// told not to.
static FENCE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)^```[a-z]*\n(.*?)\n?```$").unwrap());

/// One-shot text improvement. Implementations own their own transport and
/// failure modes; the caller's contract is to keep the original content
/// whenever this returns an error.
#[allow(async_fn_in_trait)]
pub trait Enhance {
    async fn enhance(&self, title: &str, content: &str) -> Result<String>;
}

#[derive(Clone)]
pub struct TextPolisher {
    http: reqwest::Client,
    api_key: String,
    model: String,
}

impl TextPolisher {
    pub fn from_env() -> Result<Self> {
        let api_key =
            env::var("OPENAI_API_KEY").map_err(|_| anyhow!("OPENAI_API_KEY must be set"))?;
        let model = env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string());
        Ok(Self {
            http: reqwest::Client::new(),
            api_key,
            model,
        })
    }

    async fn chat(&self, system: &str, user: &str) -> Result<String> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user.to_string(),
                },
            ],
            temperature: 0.4,
        };

        let resp = self
            .http
            .post(OPENAI_API_URL)
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .context("OpenAI request failed")?;

        let status = resp.status();
        let body = resp.text().await.context("OpenAI response read failed")?;

        if !status.is_success() {
            return Err(anyhow!("OpenAI API error: {} - {}", status, body));
        }

        let parsed: ChatResponse = serde_json::from_str(&body).context("OpenAI response parse failed")?;
        let content = parsed
            .choices
            .first()
            .ok_or_else(|| anyhow!("OpenAI response missing choices"))?
            .message
            .content
            .clone();
        Ok(content)
    }
}

impl Enhance for TextPolisher {
    async fn enhance(&self, title: &str, content: &str) -> Result<String> {
        let system = "你是公安机关政工部门的宣传干事，负责润色内部惠警通知。\
                      保持原意与事实不变，使措辞正式、亲切、条理清晰。只返回润色后的正文，不要任何解释或格式标记。";
        let user = format!("通知标题：{}\n\n通知正文：\n{}\n\n请润色上面的正文。", title, content);
        let polished = self.chat(system, &user).await?;
        let polished = clean_output(&polished);
        if polished.is_empty() {
            return Err(anyhow!("model returned empty content"));
        }
        Ok(polished)
    }
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

fn clean_output(raw: &str) -> String {
    let trimmed = raw.trim();
    match FENCE_RE.captures(trimmed) {
        Some(caps) => caps[1].trim().to_string(),
        None => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_output_passes_plain_text_through() {
        assert_eq!(clean_output("  润色后的正文。\n"), "润色后的正文。");
    }

    #[test]
    fn clean_output_strips_a_wrapping_fence() {
        assert_eq!(clean_output("```\n正文\n```"), "正文");
        assert_eq!(clean_output("```text\n第一行\n第二行\n```"), "第一行\n第二行");
    }

    #[test]
    fn clean_output_keeps_inner_backticks() {
        assert_eq!(clean_output("内容 `code` 内容"), "内容 `code` 内容");
    }
}
