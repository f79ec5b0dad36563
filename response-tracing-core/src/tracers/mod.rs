//! Run lifecycle tracking and the listener interface.
//!
//! A [`ListenerManager`] opens a [`Run`] when a traced stage starts and hands
//! the finished run to every registered [`RunListener`], in registration
//! order, before the stage returns its output. Listener errors are returned
//! to the stage and abort it.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashSet;
use serde::Serialize;
use uuid::Uuid;

use crate::{TracerError, Value};

mod traced_llm;

pub use traced_llm::{llm_run_outputs, TracedLlm};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunType {
    Chain,
    Llm,
}

/// One execution of a traced stage.
#[derive(Clone, Debug, Serialize)]
pub struct Run {
    pub id: Uuid,
    pub parent_run_id: Option<Uuid>,
    pub name: String,
    pub run_type: RunType,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub inputs: Value,
    pub outputs: Option<Value>,
    pub error: Option<String>,
}

impl Run {
    pub fn new(name: impl Into<String>, run_type: RunType, inputs: Value) -> Self {
        Self {
            id: Uuid::new_v4(),
            parent_run_id: None,
            name: name.into(),
            run_type,
            start_time: Utc::now(),
            end_time: None,
            inputs,
            outputs: None,
            error: None,
        }
    }

    pub fn with_outputs(mut self, outputs: Value) -> Self {
        self.outputs = Some(outputs);
        self
    }

    pub fn is_root(&self) -> bool {
        self.parent_run_id.is_none()
    }
}

#[async_trait]
pub trait RunListener: Send + Sync {
    /// Called once per completed LLM run, before the stage returns.
    async fn on_llm_end(&self, run: &Run) -> Result<(), TracerError>;

    /// Called once per finished root run.
    async fn persist_run(&self, _run: &Run) -> Result<(), TracerError> {
        Ok(())
    }

    /// Whether a run naming an unknown parent should be reported.
    fn log_missing_parent(&self) -> bool {
        false
    }
}

#[derive(Clone, Default)]
pub struct ListenerManager {
    listeners: Vec<Arc<dyn RunListener>>,
    active: Arc<DashSet<Uuid>>,
}

impl std::fmt::Debug for ListenerManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerManager")
            .field("listeners", &self.listeners.len())
            .field("active", &self.active.len())
            .finish()
    }
}

impl ListenerManager {
    pub fn new(listeners: Vec<Arc<dyn RunListener>>) -> Self {
        Self {
            listeners,
            active: Arc::new(DashSet::new()),
        }
    }

    pub fn noop() -> Self {
        Self::default()
    }

    pub fn is_noop(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn is_active(&self, run_id: &Uuid) -> bool {
        self.active.contains(run_id)
    }

    /// Opens a run. A parent that is not currently active is dropped and the
    /// run becomes a root run.
    pub fn start_run(
        &self,
        name: impl Into<String>,
        run_type: RunType,
        parent_run_id: Option<Uuid>,
        inputs: Value,
    ) -> Run {
        let mut run = Run::new(name, run_type, inputs);
        if let Some(parent) = parent_run_id {
            if self.active.contains(&parent) {
                run.parent_run_id = Some(parent);
            } else if self.listeners.iter().any(|l| l.log_missing_parent()) {
                tracing::warn!(
                    run_id = %run.id,
                    parent_run_id = %parent,
                    "parent run not found, treating as root run"
                );
            }
        }
        self.active.insert(run.id);
        run
    }

    /// Closes an LLM run with `outputs` and notifies every listener.
    pub async fn end_llm_run(&self, mut run: Run, outputs: Value) -> Result<Run, TracerError> {
        run.end_time = Some(Utc::now());
        run.outputs = Some(outputs);
        self.active.remove(&run.id);

        for listener in &self.listeners {
            listener.on_llm_end(&run).await?;
        }
        self.finish(&run).await?;
        Ok(run)
    }

    /// Closes a run that failed. Listeners only see it through `persist_run`.
    pub async fn error_run(&self, mut run: Run, error: String) -> Result<Run, TracerError> {
        run.end_time = Some(Utc::now());
        run.error = Some(error);
        self.active.remove(&run.id);
        self.finish(&run).await?;
        Ok(run)
    }

    /// Closes a non-LLM run, e.g. a chain wrapping a traced LLM.
    pub async fn end_run(&self, mut run: Run, outputs: Value) -> Result<Run, TracerError> {
        run.end_time = Some(Utc::now());
        run.outputs = Some(outputs);
        self.active.remove(&run.id);
        self.finish(&run).await?;
        Ok(run)
    }

    async fn finish(&self, run: &Run) -> Result<(), TracerError> {
        if !run.is_root() {
            return Ok(());
        }
        for listener in &self.listeners {
            listener.persist_run(run).await?;
        }
        Ok(())
    }
}
