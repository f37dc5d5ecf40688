use serde::{Deserialize, Serialize};

/// Caller-supplied filters for one retrieval.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryFilters {
    /// Restrict every channel to chunks in this namespace.
    pub namespace: Option<String>,
    /// Number of fused items to return. `None` uses the configured default.
    pub top_n: Option<usize>,
}

/// An inbound natural-language query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    pub text: String,
    /// Recent conversation turns, passed to the intent model only.
    #[serde(default)]
    pub context: Vec<String>,
    #[serde(default)]
    pub filters: QueryFilters,
}

impl Query {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            context: Vec::new(),
            filters: QueryFilters::default(),
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.filters.namespace = Some(namespace.into());
        self
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.filters.top_n = Some(top_n);
        self
    }

    pub fn with_context(mut self, turns: Vec<String>) -> Self {
        self.context = turns;
        self
    }
}
