use std::sync::{Arc, Mutex};

use response_tracing_core::{
    Generation, ListenerManager, LlmResponse, Message, ResponseTracingError, Run, RunListener,
    RunType, Runnable, TracedLlm, TracerError,
};
use serde_json::json;

struct RecordingListener {
    runs: Arc<Mutex<Vec<Run>>>,
}

#[async_trait::async_trait]
impl RunListener for RecordingListener {
    async fn on_llm_end(&self, run: &Run) -> Result<(), TracerError> {
        self.runs.lock().unwrap().push(run.clone());
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("audit sink rejected batch")]
struct Rejected;

struct RejectingListener;

#[async_trait::async_trait]
impl RunListener for RejectingListener {
    async fn on_llm_end(&self, _run: &Run) -> Result<(), TracerError> {
        Err(TracerError::listener("rejecting", Rejected))
    }
}

struct EchoModel;

#[async_trait::async_trait]
impl Runnable<Vec<Message>, LlmResponse> for EchoModel {
    async fn invoke(&self, input: Vec<Message>) -> Result<LlmResponse, ResponseTracingError> {
        Ok(LlmResponse {
            model: "echo".to_string(),
            generations: input
                .into_iter()
                .map(|message| Generation {
                    text: message.content,
                    finish_reason: Some("stop".to_string()),
                })
                .collect(),
            token_usage: None,
        })
    }
}

struct FailingModel;

#[async_trait::async_trait]
impl Runnable<Vec<Message>, LlmResponse> for FailingModel {
    async fn invoke(&self, _input: Vec<Message>) -> Result<LlmResponse, ResponseTracingError> {
        Err(ResponseTracingError::LlmProvider("rate limited".to_string()))
    }
}

#[tokio::test]
async fn traced_llm_reports_generations_to_listeners() {
    let runs = Arc::new(Mutex::new(Vec::new()));
    let manager = ListenerManager::new(vec![Arc::new(RecordingListener { runs: runs.clone() })]);
    let llm = TracedLlm::new(EchoModel, manager, "ChatOpenAI");

    let response = llm
        .invoke(vec![Message::user("hello"), Message::user("world")])
        .await
        .unwrap();
    assert_eq!(response.content(), "hello");

    let runs = runs.lock().unwrap().clone();
    assert_eq!(runs.len(), 1);
    let run = &runs[0];
    assert_eq!(run.name, "ChatOpenAI");
    assert_eq!(run.run_type, RunType::Llm);
    assert!(run.end_time.is_some());

    let outputs = run.outputs.clone().unwrap();
    assert_eq!(outputs["generations"][0][0]["text"], json!("hello"));
    assert_eq!(outputs["generations"][0][1]["text"], json!("world"));
    assert_eq!(outputs["llm_output"]["model_name"], json!("echo"));
}

#[tokio::test]
async fn listener_failure_aborts_invocation() {
    let manager = ListenerManager::new(vec![Arc::new(RejectingListener)]);
    let llm = TracedLlm::new(EchoModel, manager, "ChatOpenAI");

    let err = llm.invoke(vec![Message::user("hi")]).await.unwrap_err();
    assert!(matches!(err, ResponseTracingError::Tracer(_)));
}

#[tokio::test]
async fn model_failure_skips_llm_end() {
    let runs = Arc::new(Mutex::new(Vec::new()));
    let manager = ListenerManager::new(vec![Arc::new(RecordingListener { runs: runs.clone() })]);
    let llm = TracedLlm::new(FailingModel, manager, "ChatOpenAI");

    let err = llm.invoke(vec![Message::user("hi")]).await.unwrap_err();
    assert!(matches!(err, ResponseTracingError::LlmProvider(_)));
    assert!(runs.lock().unwrap().is_empty());
}

#[tokio::test]
async fn traced_llm_attaches_to_active_parent() {
    let runs = Arc::new(Mutex::new(Vec::new()));
    let manager = ListenerManager::new(vec![Arc::new(RecordingListener { runs: runs.clone() })]);
    let parent = manager.start_run("pipeline", RunType::Chain, None, json!({}));
    let llm = TracedLlm::new(EchoModel, manager.clone(), "ChatOpenAI").with_parent(parent.id);

    llm.invoke(vec![Message::user("hi")]).await.unwrap();

    let runs = runs.lock().unwrap().clone();
    assert_eq!(runs[0].parent_run_id, Some(parent.id));
}
