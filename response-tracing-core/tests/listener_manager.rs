use std::sync::{Arc, Mutex};

use response_tracing_core::{ListenerManager, Run, RunListener, RunType, TracerError};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
#[error("sink unavailable")]
struct SinkDown;

struct RecordingListener {
    label: &'static str,
    events: Arc<Mutex<Vec<String>>>,
    fail: bool,
    log_missing_parent: bool,
}

impl RecordingListener {
    fn new(label: &'static str, events: Arc<Mutex<Vec<String>>>) -> Self {
        Self {
            label,
            events,
            fail: false,
            log_missing_parent: false,
        }
    }
}

#[async_trait::async_trait]
impl RunListener for RecordingListener {
    async fn on_llm_end(&self, run: &Run) -> Result<(), TracerError> {
        self.events
            .lock()
            .unwrap()
            .push(format!("{}:llm_end:{}", self.label, run.name));
        if self.fail {
            return Err(TracerError::listener(self.label, SinkDown));
        }
        Ok(())
    }

    async fn persist_run(&self, run: &Run) -> Result<(), TracerError> {
        self.events
            .lock()
            .unwrap()
            .push(format!("{}:persist:{}", self.label, run.name));
        Ok(())
    }

    fn log_missing_parent(&self) -> bool {
        self.log_missing_parent
    }
}

#[tokio::test]
async fn listeners_run_in_registration_order() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let manager = ListenerManager::new(vec![
        Arc::new(RecordingListener::new("a", events.clone())),
        Arc::new(RecordingListener::new("b", events.clone())),
    ]);

    let run = manager.start_run("llm", RunType::Llm, None, json!({}));
    let run_id = run.id;
    assert!(manager.is_active(&run_id));

    let run = manager
        .end_llm_run(run, json!({"generations": []}))
        .await
        .unwrap();

    assert!(!manager.is_active(&run_id));
    assert!(run.end_time.is_some());
    assert_eq!(
        events.lock().unwrap().clone(),
        vec!["a:llm_end:llm", "b:llm_end:llm", "a:persist:llm", "b:persist:llm"]
    );
}

#[tokio::test]
async fn first_listener_error_stops_notification() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let mut failing = RecordingListener::new("a", events.clone());
    failing.fail = true;
    let manager = ListenerManager::new(vec![
        Arc::new(failing),
        Arc::new(RecordingListener::new("b", events.clone())),
    ]);

    let run = manager.start_run("llm", RunType::Llm, None, json!({}));
    let err = manager.end_llm_run(run, json!({})).await.unwrap_err();

    assert!(err.to_string().contains("listener 'a' failed"));
    assert_eq!(events.lock().unwrap().clone(), vec!["a:llm_end:llm"]);
}

#[tokio::test]
async fn child_runs_are_not_persisted() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let manager = ListenerManager::new(vec![Arc::new(RecordingListener::new(
        "a",
        events.clone(),
    ))]);

    let parent = manager.start_run("chain", RunType::Chain, None, json!({}));
    let child = manager.start_run("llm", RunType::Llm, Some(parent.id), json!({}));
    assert_eq!(child.parent_run_id, Some(parent.id));

    manager.end_llm_run(child, json!({})).await.unwrap();
    manager.end_run(parent, json!({})).await.unwrap();

    assert_eq!(
        events.lock().unwrap().clone(),
        vec!["a:llm_end:llm", "a:persist:chain"]
    );
}

#[tokio::test]
async fn unknown_parent_is_rerooted() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let mut listener = RecordingListener::new("a", events.clone());
    listener.log_missing_parent = true;
    let manager = ListenerManager::new(vec![Arc::new(listener)]);

    let run = manager.start_run("llm", RunType::Llm, Some(uuid::Uuid::new_v4()), json!({}));
    assert!(run.is_root());

    manager.end_llm_run(run, json!({})).await.unwrap();
    assert_eq!(
        events.lock().unwrap().clone(),
        vec!["a:llm_end:llm", "a:persist:llm"]
    );
}

#[tokio::test]
async fn errored_runs_skip_llm_end() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let manager = ListenerManager::new(vec![Arc::new(RecordingListener::new(
        "a",
        events.clone(),
    ))]);

    let run = manager.start_run("llm", RunType::Llm, None, json!({}));
    let run = manager.error_run(run, "timeout".to_string()).await.unwrap();

    assert_eq!(run.error.as_deref(), Some("timeout"));
    assert_eq!(events.lock().unwrap().clone(), vec!["a:persist:llm"]);
}
