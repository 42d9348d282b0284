use async_trait::async_trait;

use crate::{
    DomainError, GatewayError, GenerationRequest, JobStatusSnapshot, PublishAcknowledgement,
    PublishRequest, PublishedVideoSummary, Route, SubmitAcknowledgement,
};

/// Remote operations the client depends on.
#[async_trait]
pub trait BackendGateway: Send + Sync {
    async fn submit_job(
        &self,
        request: &GenerationRequest,
    ) -> Result<SubmitAcknowledgement, GatewayError>;

    async fn poll_job(&self, job_id: &str) -> Result<JobStatusSnapshot, GatewayError>;

    /// Published videos in the order the backend stored them (oldest first).
    async fn fetch_published_list(&self) -> Result<Vec<PublishedVideoSummary>, GatewayError>;

    async fn fetch_video_detail(&self, id: &str) -> Result<PublishedVideoSummary, GatewayError>;

    async fn fetch_video_binary(&self, id: &str) -> Result<Vec<u8>, GatewayError>;

    async fn fetch_preview_image(&self, id: &str) -> Result<Vec<u8>, GatewayError>;

    async fn publish(
        &self,
        request: &PublishRequest,
    ) -> Result<PublishAcknowledgement, GatewayError>;
}

/// Client-scoped string store that survives restarts.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, DomainError>;
    fn set(&self, key: &str, value: &str) -> Result<(), DomainError>;
    fn remove(&self, key: &str) -> Result<(), DomainError>;
}

pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}
