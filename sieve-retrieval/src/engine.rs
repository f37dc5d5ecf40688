//! RetrievalEngine: validate → classify → embed once → fan out → fuse.
//!
//! Every channel runs as its own task under one deadline derived from the
//! query's intent. Whatever finished in time is fused; everything else is
//! reported in `Diagnostics` and never turns into an error. Only an invalid
//! query or a caller cancellation escapes as `RetrievalError`.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinSet;
use tokio::time::{sleep_until, timeout_at, Instant};
use tracing::{debug, warn, Instrument};

use sieve_core::cancellation::Cancellable;
use sieve_core::config::{ChannelConfig, SieveConfig};
use sieve_core::constants::{MAX_TOP_N, MIN_TOKEN_LEN};
use sieve_core::errors::{ConfigError, RetrievalError, SieveError};
use sieve_core::intent::IntentProfile;
use sieve_core::models::{
    ChannelKind, ChannelRequest, ChannelResult, ChannelStatus, DegradationEvent, Diagnostics,
    Embedding, FusionResult, Query,
};
use sieve_core::traits::{ChannelExecutor, DualVectorStore, EmbeddingProvider, GraphStore, IntentModel};
use sieve_core::CancellationToken;
use sieve_embeddings::tokenize::tokenize;
use sieve_observability::tracing_setup::events;
use sieve_observability::{channel_span, retrieval_span, DegradationTracker, QueryLog, QueryLogEntry};

use crate::channels::{DenseChannel, GraphGlobalChannel, GraphLocalChannel, SparseChannel};
use crate::execution::ChannelGuard;
use crate::fusion;
use crate::intent::{IntentClassifier, WeightTable};
use crate::query_terms::extract_terms;

/// One executor per channel slot.
pub struct ChannelSet {
    pub dense: Arc<dyn ChannelExecutor>,
    pub sparse: Arc<dyn ChannelExecutor>,
    pub graph_local: Arc<dyn ChannelExecutor>,
    pub graph_global: Arc<dyn ChannelExecutor>,
}

impl ChannelSet {
    /// The four reference channels over a vector store and a graph store.
    pub fn from_stores(
        vectors: Arc<dyn DualVectorStore>,
        graph: Arc<dyn GraphStore>,
        config: &ChannelConfig,
    ) -> Self {
        Self {
            dense: Arc::new(DenseChannel::new(Arc::clone(&vectors))),
            sparse: Arc::new(SparseChannel::new(vectors)),
            graph_local: Arc::new(GraphLocalChannel::new(Arc::clone(&graph))),
            graph_global: Arc::new(GraphGlobalChannel::new(
                graph,
                config.global_top_communities,
            )),
        }
    }

    fn get(&self, kind: ChannelKind) -> &Arc<dyn ChannelExecutor> {
        match kind {
            ChannelKind::Dense => &self.dense,
            ChannelKind::Sparse => &self.sparse,
            ChannelKind::GraphLocal => &self.graph_local,
            ChannelKind::GraphGlobal => &self.graph_global,
        }
    }
}

struct Guards {
    dense: ChannelGuard,
    sparse: ChannelGuard,
    graph_local: ChannelGuard,
    graph_global: ChannelGuard,
}

impl Guards {
    fn get(&self, kind: ChannelKind) -> &ChannelGuard {
        match kind {
            ChannelKind::Dense => &self.dense,
            ChannelKind::Sparse => &self.sparse,
            ChannelKind::GraphLocal => &self.graph_local,
            ChannelKind::GraphGlobal => &self.graph_global,
        }
    }
}

/// Outcome of the single per-query embedding call.
enum QueryEmbedding {
    Ready(Arc<Embedding>),
    Unavailable(String),
}

pub struct RetrievalEngine {
    config: SieveConfig,
    classifier: IntentClassifier,
    embedder: Arc<dyn EmbeddingProvider>,
    guards: Guards,
    query_log: Mutex<QueryLog>,
    degradation: Mutex<DegradationTracker>,
}

impl RetrievalEngine {
    pub fn new(
        config: SieveConfig,
        classifier: IntentClassifier,
        embedder: Arc<dyn EmbeddingProvider>,
        channels: ChannelSet,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        for kind in ChannelKind::ALL {
            let actual = channels.get(kind).kind();
            if actual != kind {
                return Err(ConfigError::ValidationFailed {
                    field: format!("channels.{}", kind.label()),
                    message: format!("executor reports kind {actual}"),
                });
            }
        }

        let guard = |kind| ChannelGuard::new(Arc::clone(channels.get(kind)), &config.channels);
        let guards = Guards {
            dense: guard(ChannelKind::Dense),
            sparse: guard(ChannelKind::Sparse),
            graph_local: guard(ChannelKind::GraphLocal),
            graph_global: guard(ChannelKind::GraphGlobal),
        };
        let query_log = QueryLog::with_capacity(config.observability.query_log_capacity);

        Ok(Self {
            config,
            classifier,
            embedder,
            guards,
            query_log: Mutex::new(query_log),
            degradation: Mutex::new(DegradationTracker::new()),
        })
    }

    /// Wire the reference channels over the given stores. Loads the weight
    /// table from `intent.weights_path` when one is configured.
    pub fn with_stores(
        config: SieveConfig,
        embedder: Arc<dyn EmbeddingProvider>,
        vectors: Arc<dyn DualVectorStore>,
        graph: Arc<dyn GraphStore>,
        model: Option<Arc<dyn IntentModel>>,
    ) -> Result<Self, SieveError> {
        let weights = WeightTable::new(config.intent.weights.clone());
        if let Some(path) = &config.intent.weights_path {
            weights.reload_from_file(Path::new(path))?;
        }
        let mut classifier = IntentClassifier::new(&config.intent, Arc::new(weights));
        if let Some(model) = model {
            classifier = classifier.with_model(model);
        }
        let channels = ChannelSet::from_stores(vectors, graph, &config.channels);
        Ok(Self::new(config, classifier, embedder, channels)?)
    }

    pub fn config(&self) -> &SieveConfig {
        &self.config
    }

    pub fn classifier(&self) -> &IntentClassifier {
        &self.classifier
    }

    pub fn guard(&self, kind: ChannelKind) -> &ChannelGuard {
        self.guards.get(kind)
    }

    pub fn query_log(&self) -> MutexGuard<'_, QueryLog> {
        self.query_log.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn degradation_tracker(&self) -> MutexGuard<'_, DegradationTracker> {
        self.degradation
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Answer `query`. Degraded channels are reported in diagnostics;
    /// only an invalid query or cancellation is an error.
    pub async fn retrieve(
        &self,
        query: &Query,
        cancel: &CancellationToken,
    ) -> Result<FusionResult, RetrievalError> {
        let started = Instant::now();
        let top_n = self.validate(query)?;
        if cancel.is_cancelled() {
            return Err(RetrievalError::Cancelled);
        }

        let profile = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(RetrievalError::Cancelled),
            profile = self.classifier.classify(&query.text, &query.context) => profile,
        };

        let span = retrieval_span!(query.text, profile.intent);
        self.fan_out_and_fuse(query, profile, top_n, started, cancel)
            .instrument(span)
            .await
    }

    fn validate(&self, query: &Query) -> Result<usize, RetrievalError> {
        let invalid = |reason: String| {
            debug!(reason = %reason, "rejected query");
            RetrievalError::InvalidQuery { reason }
        };

        if query.text.trim().is_empty() {
            return Err(invalid("query text is empty".to_string()));
        }
        let chars = query.text.chars().count();
        let max_chars = self.config.fusion.max_query_chars;
        if chars > max_chars {
            return Err(invalid(format!(
                "query is {chars} characters, limit is {max_chars}"
            )));
        }
        if tokenize(&query.text).is_empty() {
            return Err(invalid(format!(
                "query has no term of at least {MIN_TOKEN_LEN} characters"
            )));
        }
        let top_n = query
            .filters
            .top_n
            .unwrap_or(self.config.fusion.default_top_n);
        if top_n == 0 || top_n > MAX_TOP_N {
            return Err(invalid(format!("top_n must be in 1..={MAX_TOP_N}, got {top_n}")));
        }
        Ok(top_n)
    }

    async fn fan_out_and_fuse(
        &self,
        query: &Query,
        profile: IntentProfile,
        top_n: usize,
        started: Instant,
        cancel: &CancellationToken,
    ) -> Result<FusionResult, RetrievalError> {
        let total_budget = self.config.intent.deadlines.for_intent(profile.intent);
        let deadline = started + total_budget;
        let channel_budget = total_budget.mul_f64(self.config.channels.timeout_fraction);

        let mut statuses: BTreeMap<ChannelKind, ChannelStatus> = BTreeMap::new();
        let mut runnable: Vec<ChannelKind> = Vec::new();
        // Every channel runs; a zero weight only drops its list from fusion.
        for kind in ChannelKind::ALL {
            if self.config.channels.skip_zero_weight && profile.weights.get(kind) <= 0.0 {
                statuses.insert(kind, ChannelStatus::Skipped);
            } else {
                runnable.push(kind);
            }
        }

        let mut embedding = None;
        if runnable.iter().any(|k| k.needs_embedding()) {
            match self.embed_query(&query.text, deadline, cancel).await? {
                QueryEmbedding::Ready(e) => embedding = Some(e),
                QueryEmbedding::Unavailable(reason) => {
                    runnable.retain(|kind| {
                        if kind.needs_embedding() {
                            statuses.insert(
                                *kind,
                                ChannelStatus::Failed {
                                    reason: reason.clone(),
                                },
                            );
                            false
                        } else {
                            true
                        }
                    });
                }
            }
        }

        let request = Arc::new(ChannelRequest {
            text: query.text.clone(),
            terms: extract_terms(&query.text),
            embedding,
            top_k: self.config.channels.top_k,
            namespace: query.filters.namespace.clone(),
        });

        let child = cancel.child_token();
        let mut tasks = JoinSet::new();
        let mut pending: BTreeSet<ChannelKind> = BTreeSet::new();
        for kind in runnable {
            let guard = self.guards.get(kind).clone();
            let request = Arc::clone(&request);
            let token = child.clone();
            let budget = channel_budget.min(deadline.saturating_duration_since(Instant::now()));
            let span = channel_span!(kind, profile.weights.get(kind));
            pending.insert(kind);
            tasks.spawn(
                async move { (kind, guard.run(&request, budget, &token).await) }.instrument(span),
            );
        }

        let mut results: BTreeMap<ChannelKind, ChannelResult> = BTreeMap::new();
        while !pending.is_empty() {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    child.cancel();
                    tasks.abort_all();
                    debug!("retrieval cancelled by caller");
                    return Err(RetrievalError::Cancelled);
                }
                _ = sleep_until(deadline) => {
                    child.cancel();
                    tasks.abort_all();
                    let timeout_ms = total_budget.as_millis() as u64;
                    for kind in std::mem::take(&mut pending) {
                        statuses.insert(kind, ChannelStatus::TimedOut { timeout_ms });
                    }
                }
                joined = tasks.join_next() => match joined {
                    Some(Ok((kind, outcome))) => {
                        pending.remove(&kind);
                        match outcome {
                            Ok(result) => {
                                statuses.insert(kind, ChannelStatus::Ok { hits: result.len() });
                                results.insert(kind, result);
                            }
                            Err(e) => {
                                statuses.insert(kind, e.status());
                            }
                        }
                    }
                    Some(Err(e)) => warn!(error = %e, "channel task did not complete"),
                    None => break,
                }
            }
        }
        // Only reachable when a task panicked or was aborted.
        for kind in pending {
            statuses.insert(
                kind,
                ChannelStatus::Failed {
                    reason: "channel task did not complete".to_string(),
                },
            );
        }

        let partial_degradation = statuses.values().any(ChannelStatus::is_degraded);
        let weights = if partial_degradation && self.config.fusion.renormalize_on_degradation {
            let surviving: Vec<ChannelKind> = results.keys().copied().collect();
            profile.weights.renormalized(&surviving)
        } else {
            profile.weights
        };

        let lists: Vec<(ChannelKind, &ChannelResult)> =
            results.iter().map(|(kind, r)| (*kind, r)).collect();
        let mut items = fusion::fuse(&lists, &weights, self.config.fusion.rrf_k);
        items.truncate(top_n);

        let elapsed = started.elapsed();
        let diagnostics = Diagnostics {
            partial_degradation,
            no_results: items.is_empty(),
            intent: profile,
            channels: statuses,
            elapsed_ms: elapsed.as_millis() as u64,
        };
        self.record(query, &diagnostics, items.len(), elapsed);

        Ok(FusionResult { items, diagnostics })
    }

    /// One embedding call per query, bounded by the overall deadline.
    async fn embed_query(
        &self,
        text: &str,
        deadline: Instant,
        cancel: &CancellationToken,
    ) -> Result<QueryEmbedding, RetrievalError> {
        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(RetrievalError::Cancelled),
            outcome = timeout_at(deadline, self.embedder.embed(text)) => outcome,
        };
        Ok(match outcome {
            Ok(Ok(embedding)) => QueryEmbedding::Ready(Arc::new(embedding)),
            Ok(Err(e)) => {
                warn!(provider = self.embedder.name(), error = %e, "query embedding failed");
                QueryEmbedding::Unavailable(format!("embedding unavailable: {e}"))
            }
            Err(_) => {
                warn!(provider = self.embedder.name(), "query embedding hit the deadline");
                QueryEmbedding::Unavailable("embedding timed out".to_string())
            }
        })
    }

    fn record(&self, query: &Query, diagnostics: &Diagnostics, result_count: usize, elapsed: Duration) {
        let degraded = diagnostics.failed_channels();
        {
            let mut tracker = self.degradation_tracker();
            for (kind, status) in &diagnostics.channels {
                let component = format!("channel.{}", kind.label());
                match status {
                    ChannelStatus::Ok { .. } => {
                        if tracker.is_degraded(&component) {
                            tracker.mark_recovered(&component);
                        }
                    }
                    ChannelStatus::Skipped => {}
                    _ => {
                        events::channel_degraded(kind.label(), &status.to_string());
                        tracker.record(DegradationEvent {
                            component,
                            failure: status.to_string(),
                            fallback_used: "empty_result".to_string(),
                            timestamp: chrono::Utc::now(),
                        });
                    }
                }
            }
        }

        self.query_log().record(QueryLogEntry::new(
            query.text.clone(),
            diagnostics.intent.intent,
            elapsed,
            result_count,
            degraded.clone(),
        ));
        events::retrieval_completed(result_count, degraded.len(), diagnostics.elapsed_ms);
        if diagnostics.elapsed_ms >= self.config.observability.slow_query_ms {
            warn!(
                elapsed_ms = diagnostics.elapsed_ms,
                intent = %diagnostics.intent.intent,
                "slow retrieval"
            );
        }
    }
}
