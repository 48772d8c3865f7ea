use async_trait::async_trait;
use std::time::Duration;

/// Spacing between consecutive items of a batch call.
#[async_trait]
pub trait Pacing: Send + Sync {
    async fn pause(&self);
}

#[derive(Debug, Clone, Copy)]
pub struct FixedDelay(pub Duration);

#[async_trait]
impl Pacing for FixedDelay {
    async fn pause(&self) {
        if !self.0.is_zero() {
            tokio::time::sleep(self.0).await;
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoDelay;

#[async_trait]
impl Pacing for NoDelay {
    async fn pause(&self) {}
}
