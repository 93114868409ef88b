//! Google Gemini driver for the native Generative Language API.
//!
//! Streams `streamGenerateContent` as server-sent events.  The web-search
//! capability is forwarded as the hosted `google_search` tool, so grounding
//! happens on Google's side and only text comes back.
//!
//! # Auth
//! API key via the `x-goog-api-key` header.  The key is handed to the
//! provider at construction and never read from or written to the process
//! environment here.
//!
//! # Endpoint pattern
//! `POST https://generativelanguage.googleapis.com/v1beta/models/{model}:streamGenerateContent?alt=sse`

use anyhow::{bail, Context};
use async_trait::async_trait;
use futures::StreamExt;
use serde_json::{json, Value};
use tracing::debug;

use crate::{provider::ResponseStream, Capability, CompletionRequest, ResponseEvent, Role};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Finish reasons that end a response normally.
const NORMAL_FINISH: &[&str] = &["STOP", "MAX_TOKENS", "FINISH_REASON_UNSPECIFIED"];

pub struct GoogleProvider {
    model: String,
    api_key: Option<String>,
    base_url: String,
    max_tokens: u32,
    temperature: f32,
    client: reqwest::Client,
}

impl GoogleProvider {
    pub fn new(
        model: String,
        api_key: Option<String>,
        base_url: Option<String>,
        max_tokens: Option<u32>,
        temperature: Option<f32>,
    ) -> Self {
        Self {
            model,
            api_key,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.into()),
            max_tokens: max_tokens.unwrap_or(8192),
            temperature: temperature.unwrap_or(0.2),
            client: reqwest::Client::new(),
        }
    }

    fn build_body(&self, req: &CompletionRequest) -> Value {
        let mut system_parts: Vec<Value> = Vec::new();
        let mut contents: Vec<Value> = Vec::new();

        for m in &req.messages {
            let Some(text) = m.as_text() else { continue };
            match m.role {
                Role::System => system_parts.push(json!({ "text": text })),
                Role::User => contents.push(json!({ "role": "user", "parts": [{ "text": text }] })),
                Role::Assistant => {
                    contents.push(json!({ "role": "model", "parts": [{ "text": text }] }))
                }
            }
        }

        let mut body = json!({
            "contents": contents,
            "generationConfig": {
                "maxOutputTokens": self.max_tokens,
                "temperature": self.temperature,
            }
        });
        if !system_parts.is_empty() {
            body["systemInstruction"] = json!({ "parts": system_parts });
        }
        if !req.capabilities.is_empty() {
            let tools: Vec<Value> = req
                .capabilities
                .iter()
                .map(|c| match c {
                    Capability::WebSearch => json!({ "google_search": {} }),
                })
                .collect();
            body["tools"] = Value::Array(tools);
        }
        body
    }
}

#[async_trait]
impl crate::ModelProvider for GoogleProvider {
    fn name(&self) -> &str { "google" }
    fn model_name(&self) -> &str { &self.model }

    async fn complete(&self, req: CompletionRequest) -> anyhow::Result<ResponseStream> {
        let key = self
            .api_key
            .as_deref()
            .context("no Gemini API key configured (set model.api_key or model.api_key_env)")?;

        let model = req.model.as_deref().unwrap_or(&self.model);
        let body = self.build_body(&req);
        let url = format!(
            "{}/v1beta/models/{}:streamGenerateContent?alt=sse",
            self.base_url.trim_end_matches('/'),
            model,
        );

        debug!(model = %model, "sending Google Gemini request");

        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", key)
            .json(&body)
            .send()
            .await
            .context("Google Gemini request failed")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            bail!("Google Gemini error {status}: {text}");
        }

        // SSE lines and multi-byte characters can both be split across TCP
        // packets.  Buffer raw bytes and only decode complete lines.
        let event_stream = resp
            .bytes_stream()
            .scan(Vec::<u8>::new(), |buf, chunk| {
                let events: Vec<anyhow::Result<ResponseEvent>> = match chunk {
                    Ok(b) => {
                        buf.extend_from_slice(&b);
                        drain_complete_sse_lines(buf)
                    }
                    Err(e) => vec![Err(anyhow::anyhow!(e).context("reading Gemini stream"))],
                };
                std::future::ready(Some(events))
            })
            .flat_map(futures::stream::iter);

        Ok(Box::pin(event_stream))
    }
}

/// Remove every complete line from `buf` and parse the `data:` lines.
fn drain_complete_sse_lines(buf: &mut Vec<u8>) -> Vec<anyhow::Result<ResponseEvent>> {
    let mut events = Vec::new();
    while let Some(nl_pos) = buf.iter().position(|&b| b == b'\n') {
        let raw: Vec<u8> = buf.drain(..=nl_pos).collect();
        let line = String::from_utf8_lossy(&raw);
        let Some(data) = line.trim_end().strip_prefix("data:") else { continue };
        let data = data.trim();
        if data.is_empty() {
            continue;
        }
        match serde_json::from_str::<Value>(data) {
            Ok(v) => events.extend(parse_gemini_chunk(&v).into_iter().map(Ok)),
            Err(e) => debug!(error = %e, "skipping unparseable Gemini SSE line"),
        }
    }
    events
}

/// Translate one `GenerateContentResponse` chunk into stream events.
///
/// A single chunk may carry text, usage and a finish reason at once.
fn parse_gemini_chunk(v: &Value) -> Vec<ResponseEvent> {
    let mut events = Vec::new();

    if let Some(reason) = v["promptFeedback"]["blockReason"].as_str() {
        events.push(ResponseEvent::Error(format!("prompt blocked: {reason}")));
        return events;
    }

    let candidate = &v["candidates"][0];
    if let Some(parts) = candidate["content"]["parts"].as_array() {
        let mut text = String::new();
        for part in parts {
            let Some(t) = part["text"].as_str() else { continue };
            if part["thought"].as_bool() == Some(true) {
                events.push(ResponseEvent::ThinkingDelta(t.to_string()));
            } else {
                text.push_str(t);
            }
        }
        if !text.is_empty() {
            events.push(ResponseEvent::TextDelta(text));
        }
    }

    if let Some(meta) = v.get("usageMetadata") {
        events.push(ResponseEvent::Usage {
            input_tokens: meta["promptTokenCount"].as_u64().unwrap_or(0) as u32,
            output_tokens: meta["candidatesTokenCount"].as_u64().unwrap_or(0) as u32,
        });
    }

    match candidate["finishReason"].as_str() {
        Some(r) if NORMAL_FINISH.contains(&r) => events.push(ResponseEvent::Done),
        Some(r) => events.push(ResponseEvent::Error(format!("response stopped: {r}"))),
        None => {}
    }

    events
}
