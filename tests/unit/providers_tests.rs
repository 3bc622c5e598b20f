/*!
 * Tests for provider request building and response handling
 */

use std::sync::Arc;
use serde_json::json;

use vidscribe::app_config::{Config, ProviderConfig, ProviderKind};
use vidscribe::errors::ProviderError;
use vidscribe::providers::mock::MockProvider;
use vidscribe::providers::ollama::ChatRequest;
use vidscribe::providers::openai::{OpenAI, OpenAIRequest, OpenAIResponse};
use vidscribe::providers::{Provider, StructuredRequest, create_provider, http_client};

fn request() -> StructuredRequest {
    StructuredRequest {
        system_prompt: "Clean this.".to_string(),
        user_content: "# Video Transcript\n\nHello.".to_string(),
        schema_name: "sanitized_transcript".to_string(),
        schema: json!({ "type": "object" }),
        temperature: 0.0,
    }
}

#[test]
fn test_openai_request_shouldUseStrictJsonSchema() {
    let body = serde_json::to_value(OpenAIRequest::from_structured("gpt-4o-mini", request())).unwrap();

    assert_eq!(body["model"], "gpt-4o-mini");
    assert_eq!(body["temperature"], 0.0);
    assert_eq!(body["messages"][0]["role"], "system");
    assert_eq!(body["messages"][1]["content"], "# Video Transcript\n\nHello.");
    assert_eq!(body["response_format"]["type"], "json_schema");
    assert_eq!(body["response_format"]["json_schema"]["name"], "sanitized_transcript");
    assert_eq!(body["response_format"]["json_schema"]["strict"], true);
}

#[test]
fn test_openai_extract_content_withUsage_shouldReturnContentAndTokens() {
    let response: OpenAIResponse = serde_json::from_value(json!({
        "choices": [{
            "message": { "role": "assistant", "content": "{\"clean_transcript\":\"Hi.\"}" },
            "finish_reason": "stop"
        }],
        "usage": { "prompt_tokens": 12, "completion_tokens": 7 }
    }))
    .unwrap();

    let extracted = OpenAI::extract_content(response).unwrap();
    assert_eq!(extracted.content, "{\"clean_transcript\":\"Hi.\"}");
    assert_eq!(extracted.prompt_tokens, Some(12));
    assert_eq!(extracted.completion_tokens, Some(7));
}

#[test]
fn test_openai_extract_content_withRefusalOrTruncation_shouldFail() {
    let refused: OpenAIResponse = serde_json::from_value(json!({
        "choices": [{ "message": { "role": "assistant", "content": null, "refusal": "no" } }]
    }))
    .unwrap();
    assert!(matches!(OpenAI::extract_content(refused), Err(ProviderError::ParseError(_))));

    let truncated: OpenAIResponse = serde_json::from_value(json!({
        "choices": [{ "message": { "role": "assistant", "content": "{\"clean" }, "finish_reason": "length" }]
    }))
    .unwrap();
    assert!(matches!(OpenAI::extract_content(truncated), Err(ProviderError::ParseError(_))));

    let empty: OpenAIResponse = serde_json::from_value(json!({ "choices": [] })).unwrap();
    assert!(OpenAI::extract_content(empty).is_err());
}

#[test]
fn test_ollama_request_shouldSendSchemaAsFormat() {
    let body = serde_json::to_value(ChatRequest::from_structured("llama3.1:8b", request(), Some(65536))).unwrap();

    assert_eq!(body["model"], "llama3.1:8b");
    assert_eq!(body["format"], json!({ "type": "object" }));
    assert_eq!(body["stream"], false);
    assert_eq!(body["options"]["temperature"], 0.0);
    assert_eq!(body["options"]["num_ctx"], 65536);
}

#[test]
fn test_ollama_request_withoutContextWindow_shouldLeaveServerDefault() {
    let body = serde_json::to_value(ChatRequest::from_structured("llama3.1:8b", request(), None)).unwrap();
    assert!(body["options"].get("num_ctx").is_none());
}

#[test]
fn test_provider_config_defaults_shouldHaveNoRequestDeadline() {
    let config: ProviderConfig = serde_json::from_value(json!({ "type": "ollama" })).unwrap();

    assert_eq!(config.timeout_secs, None);
    assert_eq!(config.context_window, Some(32768));

    let tuned: ProviderConfig =
        serde_json::from_value(json!({ "type": "ollama", "context_window": 131072, "timeout_secs": 3600 })).unwrap();
    assert_eq!(tuned.context_window, Some(131072));
    assert_eq!(tuned.timeout_secs, Some(3600));
}

#[tokio::test]
async fn test_http_client_withoutTimeout_shouldOutlastSlowResponse() {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buffer = [0u8; 1024];
        let _ = socket.read(&mut buffer).await;
        tokio::time::sleep(std::time::Duration::from_millis(300)).await;
        let _ = socket
            .write_all(b"HTTP/1.1 200 OK\r\ncontent-length: 2\r\nconnection: close\r\n\r\nok")
            .await;
    });

    let body = http_client(None)
        .get(format!("http://{}/", address))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert_eq!(body, "ok");
}

#[tokio::test]
async fn test_http_client_withTimeout_shouldCutOffSlowResponse() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (_socket, _) = listener.accept().await.unwrap();
        tokio::time::sleep(std::time::Duration::from_secs(5)).await;
    });

    let result = http_client(Some(std::time::Duration::from_millis(100)))
        .get(format!("http://{}/", address))
        .send()
        .await;

    assert!(result.unwrap_err().is_timeout());
}

#[test]
fn test_create_provider_withOllama_shouldNotNeedKey() {
    let config = Config {
        provider: ProviderKind::Ollama,
        ..Config::default()
    };
    let provider = create_provider(&config).unwrap();
    assert_eq!(provider.name(), "Ollama");
}

#[tokio::test]
async fn test_mock_provider_withCannedResponse_shouldReturnIt() {
    let mock = MockProvider::working().with_response("sanitized_transcript", "{\"clean_transcript\":\"Canned.\"}");
    let provider: Arc<dyn Provider> = Arc::new(mock.clone());

    let response = provider.complete(request()).await.unwrap();

    assert_eq!(response.content, "{\"clean_transcript\":\"Canned.\"}");
    assert_eq!(mock.request_count(), 1);
}

#[tokio::test]
async fn test_mock_provider_testConnection_shouldFollowBehavior() {
    assert!(MockProvider::working().test_connection().await.is_ok());
    assert!(matches!(
        MockProvider::failing().test_connection().await,
        Err(ProviderError::ConnectionError(_))
    ));
}
