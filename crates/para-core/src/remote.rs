/// Remote analysis backend: delegates summary and questions to a hosted LLM.
///
/// The model is asked for a fixed text layout and the reply is parsed on the
/// literal `Summary:` and `Questions:` markers. There is no local fallback:
/// transport, upstream and parse failures are returned to the caller.
use async_trait::async_trait;
use tracing::info;

use crate::backend::{Analysis, AnalysisBackend};
use crate::error::AnalysisError;
use crate::openai::{ChatClient, ChatClientError, ChatCompletionRequest, Message};

pub const REMOTE_LABEL: &str = "Remote Processing";
pub const SYSTEM_PROMPT: &str = "You are a helpful assistant.";

const SUMMARY_MARKER: &str = "Summary:";
const QUESTIONS_MARKER: &str = "Questions:";

#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error(transparent)]
    Client(#[from] ChatClientError),

    #[error("upstream response has no message content")]
    MissingContent,

    #[error("unparseable upstream response: {0}")]
    UnparseableResponse(String),
}

pub fn build_prompt(paragraph: &str) -> String {
    format!(
        r#"
Summarise the following paragraph clearly and generate contextual questions:
- 2 multiple choice questions (with options)
- 2 short answer questions
- 1 true/false question
- 2 vocabulary or grammar-based questions

Paragraph:
"""
{paragraph}
"""

Output in this format:
Summary:
[summary]

Questions:
1. [question]
2. [question]
...
"#
    )
}

/// Split a completion into summary and questions.
///
/// The summary is the trimmed text between the markers; every non-blank line
/// after `Questions:` is one entry.
pub fn parse_completion(content: &str) -> Result<Analysis, RemoteError> {
    let Some(summary_at) = content.find(SUMMARY_MARKER) else {
        return Err(RemoteError::UnparseableResponse(format!(
            "missing {SUMMARY_MARKER:?} marker"
        )));
    };
    let after_summary = &content[summary_at + SUMMARY_MARKER.len()..];
    let Some(questions_at) = after_summary.find(QUESTIONS_MARKER) else {
        return Err(RemoteError::UnparseableResponse(format!(
            "missing {QUESTIONS_MARKER:?} marker after {SUMMARY_MARKER:?}"
        )));
    };

    let summary = after_summary[..questions_at].trim().to_string();
    let questions = after_summary[questions_at + QUESTIONS_MARKER.len()..]
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect();

    Ok(Analysis { summary, questions })
}

#[derive(Clone)]
pub struct RemoteBackend {
    client: ChatClient,
    model: String,
}

impl RemoteBackend {
    pub fn new(client: ChatClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }
}

#[async_trait]
impl AnalysisBackend for RemoteBackend {
    fn label(&self) -> &str {
        REMOTE_LABEL
    }

    async fn analyze(&self, paragraph: &str) -> Result<Analysis, AnalysisError> {
        let paragraph = paragraph.trim();
        if paragraph.is_empty() {
            return Ok(Analysis::default());
        }

        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                Message::system(SYSTEM_PROMPT),
                Message::user(build_prompt(paragraph)),
            ],
            temperature: None,
            max_tokens: None,
        };
        let response = self
            .client
            .chat_completions(&request)
            .await
            .map_err(RemoteError::from)?;
        info!(
            model = %self.model,
            total_tokens = response.usage.as_ref().and_then(|u| u.total_tokens),
            "remote completion received"
        );

        let content = response.first_content().ok_or(RemoteError::MissingContent)?;
        Ok(parse_completion(content)?)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use axum::extract::State;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{json, Value};

    use super::*;
    use crate::openai::ChatClientConfig;

    const COMPLETION: &str = "Summary:\nBirds fly high.\n\nQuestions:\n1. What flies?\n   A) Birds\n\n2. True or False: Cats fly.\n";

    #[test]
    fn prompt_embeds_paragraph_and_format() {
        let prompt = build_prompt("Birds fly.");
        assert!(prompt.contains("\"\"\"\nBirds fly.\n\"\"\""));
        assert!(prompt.contains("- 2 vocabulary or grammar-based questions"));
        assert!(prompt.contains("Summary:\n[summary]"));
    }

    #[test]
    fn parses_summary_and_question_lines() {
        let analysis = parse_completion(COMPLETION).expect("parse");
        assert_eq!(analysis.summary, "Birds fly high.");
        assert_eq!(
            analysis.questions,
            vec!["1. What flies?", "A) Birds", "2. True or False: Cats fly."]
        );
    }

    #[test]
    fn missing_markers_are_errors() {
        let err = parse_completion("Here is your summary: birds.").unwrap_err();
        assert!(matches!(err, RemoteError::UnparseableResponse(_)));

        let err = parse_completion("Questions:\n1. x\nSummary: y").unwrap_err();
        assert!(matches!(err, RemoteError::UnparseableResponse(_)));
    }

    #[derive(Clone)]
    struct Stub {
        calls: Arc<AtomicUsize>,
        status: StatusCode,
        delay: Duration,
        content: Option<&'static str>,
    }

    async fn completions(
        State(stub): State<Stub>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> (StatusCode, Json<Value>) {
        stub.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(stub.delay).await;
        if headers.get("authorization").and_then(|v| v.to_str().ok()) != Some("Bearer test-key") {
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({"object": "error", "message": "Unauthorized"})),
            );
        }
        if stub.status != StatusCode::OK {
            return (stub.status, Json(json!({"message": "upstream broke"})));
        }
        assert_eq!(body["messages"][0]["content"], SYSTEM_PROMPT);
        let content = stub.content.map(Value::from).unwrap_or(Value::Null);
        (
            StatusCode::OK,
            Json(json!({
                "id": "cmpl-1",
                "choices": [{"index": 0, "message": {"role": "assistant", "content": content}}],
                "usage": {"total_tokens": 42}
            })),
        )
    }

    async fn spawn_stub(stub: Stub) -> String {
        let app = Router::new()
            .route("/v1/chat/completions", post(completions))
            .with_state(stub);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let addr = listener.local_addr().expect("addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve");
        });
        format!("http://{addr}/v1")
    }

    fn stub(status: StatusCode, content: Option<&'static str>) -> Stub {
        Stub {
            calls: Arc::new(AtomicUsize::new(0)),
            status,
            delay: Duration::ZERO,
            content,
        }
    }

    fn backend(base_url: &str, api_key: &str, timeout: Duration, retries: u32) -> RemoteBackend {
        let mut config = ChatClientConfig::new(api_key).with_base_url(base_url);
        config.timeout = timeout;
        config.max_retries = retries;
        config.initial_backoff = Duration::from_millis(1);
        config.max_backoff = Duration::from_millis(5);
        RemoteBackend::new(ChatClient::new(config).expect("client"), "mistral-small")
    }

    #[tokio::test]
    async fn round_trip_against_stub_upstream() {
        let base = spawn_stub(stub(StatusCode::OK, Some(COMPLETION))).await;
        let backend = backend(&base, "test-key", Duration::from_secs(5), 0);
        let analysis = backend.analyze("Birds fly high.").await.expect("analysis");
        assert_eq!(analysis.summary, "Birds fly high.");
        assert_eq!(analysis.questions.len(), 3);
    }

    #[tokio::test]
    async fn blank_paragraph_skips_upstream() {
        let stub = stub(StatusCode::OK, Some(COMPLETION));
        let calls = Arc::clone(&stub.calls);
        let base = spawn_stub(stub).await;
        let backend = backend(&base, "test-key", Duration::from_secs(5), 0);
        assert!(backend.analyze("  ").await.expect("analysis").is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unauthorized_is_not_retried() {
        let stub = stub(StatusCode::OK, Some(COMPLETION));
        let calls = Arc::clone(&stub.calls);
        let base = spawn_stub(stub).await;
        let backend = backend(&base, "wrong-key", Duration::from_secs(5), 3);
        let err = backend.analyze("Birds fly.").await.unwrap_err();
        match err {
            AnalysisError::Remote(RemoteError::Client(ChatClientError::Upstream {
                status,
                message,
            })) => {
                assert_eq!(status, reqwest::StatusCode::UNAUTHORIZED);
                assert_eq!(message, "Unauthorized");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn server_errors_are_retried_then_surfaced() {
        let stub = stub(StatusCode::SERVICE_UNAVAILABLE, Some(COMPLETION));
        let calls = Arc::clone(&stub.calls);
        let base = spawn_stub(stub).await;
        let backend = backend(&base, "test-key", Duration::from_secs(5), 2);
        let err = backend.analyze("Birds fly.").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "upstream returned error: status=503 Service Unavailable message=upstream broke"
        );
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn slow_upstream_times_out() {
        let mut stub = stub(StatusCode::OK, Some(COMPLETION));
        stub.delay = Duration::from_millis(500);
        let base = spawn_stub(stub).await;
        let backend = backend(&base, "test-key", Duration::from_millis(50), 0);
        match backend.analyze("Birds fly.").await.unwrap_err() {
            AnalysisError::Remote(RemoteError::Client(e)) => assert!(e.is_timeout()),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn missing_content_and_bad_layout_are_reported() {
        let base = spawn_stub(stub(StatusCode::OK, None)).await;
        let err = backend(&base, "test-key", Duration::from_secs(5), 0)
            .analyze("Birds fly.")
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::Remote(RemoteError::MissingContent)));

        let base = spawn_stub(stub(StatusCode::OK, Some("Birds fly, that's all."))).await;
        let err = backend(&base, "test-key", Duration::from_secs(5), 0)
            .analyze("Birds fly.")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::Remote(RemoteError::UnparseableResponse(_))
        ));
    }
}
