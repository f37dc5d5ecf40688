//! Scripted collaborators: channel executors, intent models and embedders
//! whose behavior is fixed up front and whose calls are counted.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use sieve_core::errors::{ChannelError, ClassificationError, EmbeddingError};
use sieve_core::models::{ChannelKind, ChannelRequest, ChannelResult, Embedding};
use sieve_core::traits::{ChannelExecutor, EmbeddingProvider, IntentModel};

/// What a scripted channel does on each call.
#[derive(Debug, Clone)]
pub enum Script {
    /// Return these documents in order.
    Docs(Vec<String>),
    /// Always fail.
    Fail { transient: bool },
    /// Sleep, then return the documents.
    Slow { delay: Duration, docs: Vec<String> },
    /// Fail transiently for the first `failures` calls, then return the documents.
    Flaky { failures: usize, docs: Vec<String> },
}

pub struct ScriptedChannel {
    kind: ChannelKind,
    script: Script,
    calls: AtomicUsize,
    completed: AtomicUsize,
}

fn owned(docs: &[&str]) -> Vec<String> {
    docs.iter().map(|d| d.to_string()).collect()
}

impl ScriptedChannel {
    pub fn new(kind: ChannelKind, script: Script) -> Arc<Self> {
        Arc::new(Self {
            kind,
            script,
            calls: AtomicUsize::new(0),
            completed: AtomicUsize::new(0),
        })
    }

    pub fn returning(kind: ChannelKind, docs: &[&str]) -> Arc<Self> {
        Self::new(kind, Script::Docs(owned(docs)))
    }

    pub fn failing(kind: ChannelKind, transient: bool) -> Arc<Self> {
        Self::new(kind, Script::Fail { transient })
    }

    pub fn slow(kind: ChannelKind, delay: Duration, docs: &[&str]) -> Arc<Self> {
        Self::new(
            kind,
            Script::Slow {
                delay,
                docs: owned(docs),
            },
        )
    }

    pub fn flaky(kind: ChannelKind, failures: usize, docs: &[&str]) -> Arc<Self> {
        Self::new(
            kind,
            Script::Flaky {
                failures,
                docs: owned(docs),
            },
        )
    }

    /// Number of times `query` was entered.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Number of calls that ran to completion (not dropped mid-flight).
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChannelExecutor for ScriptedChannel {
    fn kind(&self) -> ChannelKind {
        self.kind
    }

    async fn query(&self, _request: &ChannelRequest) -> Result<ChannelResult, ChannelError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        let result = match &self.script {
            Script::Docs(docs) => Ok(ChannelResult::from_ordered(docs.clone())),
            Script::Fail { transient: true } => {
                Err(ChannelError::transient(self.kind, "scripted transient failure"))
            }
            Script::Fail { transient: false } => {
                Err(ChannelError::permanent(self.kind, "scripted permanent failure"))
            }
            Script::Slow { delay, docs } => {
                tokio::time::sleep(*delay).await;
                Ok(ChannelResult::from_ordered(docs.clone()))
            }
            Script::Flaky { failures, docs } => {
                if call < *failures {
                    Err(ChannelError::transient(self.kind, "scripted flaky failure"))
                } else {
                    Ok(ChannelResult::from_ordered(docs.clone()))
                }
            }
        };
        self.completed.fetch_add(1, Ordering::SeqCst);
        result
    }
}

/// What a scripted intent model answers.
#[derive(Debug, Clone)]
pub enum ModelScript {
    Label(String),
    Slow { delay: Duration, label: String },
    Error,
}

pub struct ScriptedIntentModel {
    script: ModelScript,
    calls: AtomicUsize,
}

impl ScriptedIntentModel {
    pub fn new(script: ModelScript) -> Arc<Self> {
        Arc::new(Self {
            script,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn label(label: &str) -> Arc<Self> {
        Self::new(ModelScript::Label(label.to_string()))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IntentModel for ScriptedIntentModel {
    async fn classify(
        &self,
        _text: &str,
        _context: &[String],
    ) -> Result<String, ClassificationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.script {
            ModelScript::Label(label) => Ok(label.clone()),
            ModelScript::Slow { delay, label } => {
                tokio::time::sleep(*delay).await;
                Ok(label.clone())
            }
            ModelScript::Error => Err(ClassificationError::ModelFailed {
                reason: "scripted model failure".into(),
            }),
        }
    }
}

/// Embedding provider that always fails.
pub struct FailingEmbedder {
    pub dimensions: usize,
}

#[async_trait]
impl EmbeddingProvider for FailingEmbedder {
    async fn embed(&self, _text: &str) -> Result<Embedding, EmbeddingError> {
        Err(EmbeddingError::InferenceFailed {
            reason: "embedding service unavailable".into(),
        })
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "failing"
    }
}
