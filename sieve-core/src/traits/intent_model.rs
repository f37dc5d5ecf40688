use async_trait::async_trait;

use crate::errors::ClassificationError;

/// Model-backed intent classifier. Returns the raw label text; parsing
/// and fallback are the caller's job.
#[async_trait]
pub trait IntentModel: Send + Sync {
    async fn classify(&self, text: &str, context: &[String])
        -> Result<String, ClassificationError>;
}
