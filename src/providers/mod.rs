use async_trait::async_trait;

use crate::types::{CompletionRequest, RawResponse};

pub mod llamacpp;
pub mod mock;

#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, req: CompletionRequest) -> anyhow::Result<RawResponse>;

    async fn health(&self) -> anyhow::Result<()>;

    fn endpoint(&self) -> String;
}
