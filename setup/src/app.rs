use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Error};
use lettervideo_application::{
    GalleryUseCase, GalleryUseCaseImpl, JobLifecycleController, PersistentJobHandle,
    ResultUseCase, ResultUseCaseImpl,
};
use lettervideo_configuration::AppConfig;
use lettervideo_domain::{BackendGateway, KeyValueStore, Route};
use lettervideo_infra::{
    ApiEndpoints, ChannelNavigator, FileKeyValueStore, HttpBackendGateway, HttpGatewayConfig,
};
use tokio::sync::mpsc;

use crate::controller_settings;

/// Everything a front end needs, wired from one [`AppConfig`].
pub struct Application {
    pub config: AppConfig,
    pub endpoints: ApiEndpoints,
    pub controller: JobLifecycleController,
    pub gallery: Arc<dyn GalleryUseCase>,
    pub results: Arc<dyn ResultUseCase>,
    routes: Option<mpsc::UnboundedReceiver<Route>>,
}

impl Application {
    pub async fn new(config: AppConfig) -> Result<Self, Error> {
        tracing::info!(
            base_url = %config.backend.base_url,
            state_path = %config.storage.state_path.display(),
            poll_interval_ms = config.polling.interval_ms,
            max_letter_chars = config.letter.max_chars,
            failure_rules = config.failures.rules.len(),
            "initializing letter video client"
        );

        let gateway = HttpBackendGateway::new(&HttpGatewayConfig {
            base_url: config.backend.base_url.clone(),
            request_timeout: Duration::from_millis(config.backend.request_timeout_ms),
            connect_timeout: Duration::from_millis(config.backend.connect_timeout_ms),
        })
        .context("failed to build the backend HTTP client")?;
        let endpoints = gateway.endpoints().clone();

        let store = FileKeyValueStore::open(&config.storage.state_path).with_context(|| {
            format!(
                "failed to open state file {}",
                config.storage.state_path.display()
            )
        })?;

        Ok(Self::with_adapters(
            config,
            endpoints,
            Arc::new(gateway),
            Arc::new(store),
        ))
    }

    /// Wires the application over caller-provided adapters.
    pub fn with_adapters(
        config: AppConfig,
        endpoints: ApiEndpoints,
        gateway: Arc<dyn BackendGateway>,
        store: Arc<dyn KeyValueStore>,
    ) -> Self {
        let (navigator, routes) = ChannelNavigator::channel();
        let controller = JobLifecycleController::new(
            gateway.clone(),
            PersistentJobHandle::new(store),
            Arc::new(navigator),
            controller_settings(&config),
        );
        let gallery: Arc<dyn GalleryUseCase> = Arc::new(GalleryUseCaseImpl::new(gateway.clone()));
        let results: Arc<dyn ResultUseCase> = Arc::new(ResultUseCaseImpl::new(gateway));

        Self {
            config,
            endpoints,
            controller,
            gallery,
            results,
            routes: Some(routes),
        }
    }

    /// Navigation requests issued by the controller. Can be taken once.
    pub fn take_routes(&mut self) -> Option<mpsc::UnboundedReceiver<Route>> {
        self.routes.take()
    }
}
