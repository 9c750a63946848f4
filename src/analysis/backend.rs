//! Wire formats and calls for the model backends.

use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_API_MODEL;
use crate::error_handling::AnalysisError;

#[derive(Debug, Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    #[serde(default)]
    response: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    error: Option<ChatErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatErrorBody {
    #[serde(default)]
    message: String,
}

/// `POST {base_url}/api/generate` with streaming disabled.
pub(super) async fn call_ollama(
    client: &reqwest::Client,
    base_url: &str,
    model: &str,
    prompt: &str,
) -> Result<String, AnalysisError> {
    let endpoint = format!("{}/api/generate", base_url.trim_end_matches('/'));
    log::info!("Calling Ollama API: {}", endpoint);

    let request = client.post(&endpoint).json(&OllamaRequest {
        model,
        prompt,
        stream: false,
    });
    let response = send(request, &endpoint).await?;

    let body: OllamaResponse = response
        .json()
        .await
        .map_err(|source| AnalysisError::Decode {
            endpoint: endpoint.clone(),
            source,
        })?;
    Ok(body.response)
}

/// OpenAI-style chat completion with a single user message.
pub(super) async fn call_chat_api(
    client: &reqwest::Client,
    endpoint: &str,
    api_key: &str,
    prompt: &str,
) -> Result<String, AnalysisError> {
    log::info!("Calling remote API: {}", endpoint);

    let mut request = client.post(endpoint).json(&ChatRequest {
        model: DEFAULT_API_MODEL,
        messages: [ChatMessage {
            role: "user",
            content: prompt,
        }],
    });
    if !api_key.is_empty() {
        request = request.bearer_auth(api_key);
    }
    let response = send(request, endpoint).await?;

    let body: ChatResponse = response
        .json()
        .await
        .map_err(|source| AnalysisError::Decode {
            endpoint: endpoint.to_string(),
            source,
        })?;

    if let Some(error) = body.error {
        return Err(AnalysisError::Api(error.message));
    }
    body.choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content)
        .ok_or(AnalysisError::EmptyResponse)
}

/// Sends the request and turns a non-success status into `AnalysisError::Status`.
async fn send(
    request: reqwest::RequestBuilder,
    endpoint: &str,
) -> Result<reqwest::Response, AnalysisError> {
    let response = request
        .send()
        .await
        .map_err(|source| AnalysisError::Request {
            endpoint: endpoint.to_string(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(AnalysisError::Status {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
            body,
        });
    }
    Ok(response)
}
