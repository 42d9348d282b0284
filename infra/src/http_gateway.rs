use std::time::Duration;

use async_trait::async_trait;
use lettervideo_domain::{
    BackendGateway, GatewayError, GenerationRequest, JobStatusSnapshot, PublishAcknowledgement,
    PublishRequest, PublishedVideoSummary, SubmitAcknowledgement,
};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

use crate::wire::{
    GenerateVideoBody, MessageBody, PublishBody, PublishedVideoBody, StatusBody,
    SubmitResponseBody,
};
use crate::ApiEndpoints;

#[derive(Debug, Clone)]
pub struct HttpGatewayConfig {
    pub base_url: String,
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
}

/// [`BackendGateway`] over the backend's JSON API.
pub struct HttpBackendGateway {
    client: Client,
    endpoints: ApiEndpoints,
}

impl HttpBackendGateway {
    pub fn new(config: &HttpGatewayConfig) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|err| GatewayError::transport(err.to_string()))?;
        Ok(Self::with_client(client, ApiEndpoints::new(&config.base_url)))
    }

    pub fn with_client(client: Client, endpoints: ApiEndpoints) -> Self {
        Self { client, endpoints }
    }

    pub fn endpoints(&self) -> &ApiEndpoints {
        &self.endpoints
    }

    async fn send(
        &self,
        request: RequestBuilder,
        route: &'static str,
    ) -> Result<(StatusCode, Vec<u8>), GatewayError> {
        let response = request.send().await.map_err(|err| {
            tracing::warn!(route, error = %err, "backend request failed");
            GatewayError::transport(err.to_string())
        })?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|err| GatewayError::transport(err.to_string()))?;
        tracing::debug!(
            route,
            status = status.as_u16(),
            bytes = body.len(),
            "backend responded"
        );
        Ok((status, body.to_vec()))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: String,
        route: &'static str,
    ) -> Result<T, GatewayError> {
        let (status, body) = self.send(self.client.get(url), route).await?;
        ensure_success(status, &body)?;
        decode(&body)
    }

    async fn get_bytes(&self, url: String, route: &'static str) -> Result<Vec<u8>, GatewayError> {
        let (status, body) = self.send(self.client.get(url), route).await?;
        ensure_success(status, &body)?;
        Ok(body)
    }
}

#[async_trait]
impl BackendGateway for HttpBackendGateway {
    async fn submit_job(
        &self,
        request: &GenerationRequest,
    ) -> Result<SubmitAcknowledgement, GatewayError> {
        let builder = self
            .client
            .post(self.endpoints.generate_video())
            .json(&GenerateVideoBody::from(request));
        let (status, body) = self.send(builder, "generate_video").await?;

        // A rejected payload is still an answer; its message is the discriminator.
        if status == StatusCode::BAD_REQUEST {
            if let Some(message) = MessageBody::parse(&body)
                .message
                .filter(|message| !message.trim().is_empty())
            {
                return Ok(SubmitAcknowledgement {
                    job_id: None,
                    message,
                    queue_position: 0,
                });
            }
        }
        ensure_success(status, &body)?;

        let acknowledgement = SubmitAcknowledgement::from(decode::<SubmitResponseBody>(&body)?);
        tracing::info!(
            status = status.as_u16(),
            job_id = acknowledgement.job_id.as_deref().unwrap_or(""),
            queue_position = acknowledgement.queue_position,
            "submission answered"
        );
        Ok(acknowledgement)
    }

    async fn poll_job(&self, job_id: &str) -> Result<JobStatusSnapshot, GatewayError> {
        let body: StatusBody = self
            .get_json(self.endpoints.video_status(job_id), "video_status")
            .await?;
        Ok(body.into())
    }

    async fn fetch_published_list(&self) -> Result<Vec<PublishedVideoSummary>, GatewayError> {
        let videos: Vec<PublishedVideoBody> = self
            .get_json(self.endpoints.published_videos(), "publicated_videos")
            .await?;
        Ok(videos.into_iter().map(PublishedVideoSummary::from).collect())
    }

    async fn fetch_video_detail(&self, id: &str) -> Result<PublishedVideoSummary, GatewayError> {
        let video: PublishedVideoBody = self
            .get_json(
                self.endpoints.published_video_info(id),
                "publicated_video_info",
            )
            .await?;
        Ok(video.into())
    }

    async fn fetch_video_binary(&self, id: &str) -> Result<Vec<u8>, GatewayError> {
        self.get_bytes(self.endpoints.video(id), "get_video").await
    }

    async fn fetch_preview_image(&self, id: &str) -> Result<Vec<u8>, GatewayError> {
        self.get_bytes(self.endpoints.preview_image(id), "get_image")
            .await
    }

    async fn publish(
        &self,
        request: &PublishRequest,
    ) -> Result<PublishAcknowledgement, GatewayError> {
        let builder = self
            .client
            .post(self.endpoints.publish_video())
            .json(&PublishBody::from(request));
        let (status, body) = self.send(builder, "publish_video").await?;
        ensure_success(status, &body)?;

        Ok(PublishAcknowledgement {
            message: MessageBody::parse(&body).text().unwrap_or_default(),
        })
    }
}

fn ensure_success(status: StatusCode, body: &[u8]) -> Result<(), GatewayError> {
    if status.is_success() {
        return Ok(());
    }
    Err(GatewayError::status(
        status.as_u16(),
        MessageBody::parse(body).text(),
    ))
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, GatewayError> {
    serde_json::from_slice(body).map_err(|err| GatewayError::decode(err.to_string()))
}
