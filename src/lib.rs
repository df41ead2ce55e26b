pub mod api;
pub mod core;
pub mod utils;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use std::sync::Arc;
use tracing::info;

use crate::{
    core::{
        comparator::{DeepFaceClient, FaceComparator},
        services::{health::HealthService, verification::VerificationService},
        staging::StagingArea,
    },
    utils::{
        config::Config,
        error::{Result, ServiceError},
    },
};

pub struct Application {
    config: Arc<Config>,
    verification_service: Arc<VerificationService>,
    health_service: Arc<HealthService>,
}

impl Application {
    pub async fn new(config: Config) -> Result<Self> {
        let config = Arc::new(config);

        info!("Initializing staging area at {}", config.staging.directory);
        let staging = StagingArea::new(&config.staging).await?;

        info!("Initializing face comparator for {}", config.verifier.endpoint);
        let comparator: Arc<dyn FaceComparator> =
            Arc::new(DeepFaceClient::new(config.verifier.clone())?);

        let verification_service = Arc::new(VerificationService::new(staging, comparator));
        let health_service = Arc::new(HealthService::new());

        Ok(Self {
            config,
            verification_service,
            health_service,
        })
    }

    pub async fn run(&self) -> Result<()> {
        use crate::api::handlers;

        let config = self.config.clone();
        let verification_service = self.verification_service.clone();
        let health_service = self.health_service.clone();

        info!(
            "Starting API server on {}:{}",
            self.config.node.host, self.config.node.port
        );

        HttpServer::new(move || {
            App::new()
                .wrap(Cors::permissive())
                .app_data(web::Data::from(config.clone()))
                .app_data(web::Data::from(verification_service.clone()))
                .app_data(web::Data::from(health_service.clone()))
                .service(handlers::verification::scope())
                .service(handlers::health::scope())
        })
        .bind((self.config.node.host.as_str(), self.config.node.port))
        .map_err(|e| ServiceError::Init(format!("Failed to bind API server: {}", e)))?
        .run()
        .await
        .map_err(|e| ServiceError::Internal(format!("API server terminated abnormally: {}", e)))
    }
}
