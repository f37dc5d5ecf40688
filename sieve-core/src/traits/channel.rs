use async_trait::async_trait;

use crate::errors::ChannelError;
use crate::models::{ChannelKind, ChannelRequest, ChannelResult};

/// One retrieval strategy. Implementations hold no per-query mutable state.
#[async_trait]
pub trait ChannelExecutor: Send + Sync {
    fn kind(&self) -> ChannelKind;

    async fn query(&self, request: &ChannelRequest) -> Result<ChannelResult, ChannelError>;
}
