use actix_multipart::{Field, Multipart};
use actix_web::{
    web::{self, Data},
    HttpResponse, Scope,
};
use futures::TryStreamExt;
use tracing::{debug, info};

use crate::{
    api::types::VerificationResponse,
    core::services::{
        health::HealthService,
        verification::{UploadedImage, VerificationService},
    },
    utils::{config::Config, error::ServiceError},
};

pub fn scope() -> Scope {
    web::scope("/verify-face").service(web::resource("").route(web::post().to(verify_face)))
}

async fn verify_face(
    service: Data<VerificationService>,
    health: Data<HealthService>,
    config: Data<Config>,
    payload: Multipart,
) -> Result<HttpResponse, ServiceError> {
    health.record_request();
    info!("Received face verification request");

    let (id_card, selfie) = read_required_images(payload, config.staging.max_upload_bytes).await?;

    let comparison = service.verify(id_card, selfie).await?;

    Ok(HttpResponse::Ok().json(VerificationResponse::from(&comparison)))
}

/// Pulls the two required file fields out of the multipart stream. Missing
/// or malformed fields fail here, before anything touches the staging area.
async fn read_required_images(
    mut payload: Multipart,
    max_bytes: usize,
) -> Result<(UploadedImage, UploadedImage), ServiceError> {
    let mut id_card = None;
    let mut selfie = None;

    while let Some(mut field) = payload
        .try_next()
        .await
        .map_err(|e| ServiceError::Validation(format!("Malformed multipart payload: {}", e)))?
    {
        let name = field.name().to_string();
        match name.as_str() {
            "id_card" => id_card = Some(read_image_field(&mut field, max_bytes).await?),
            "selfie" => selfie = Some(read_image_field(&mut field, max_bytes).await?),
            other => {
                debug!("Ignoring unexpected multipart field: {}", other);
                drain_field(&mut field).await?;
            }
        }
    }

    let id_card =
        id_card.ok_or_else(|| ServiceError::Validation("Missing required file field: id_card".into()))?;
    let selfie =
        selfie.ok_or_else(|| ServiceError::Validation("Missing required file field: selfie".into()))?;

    Ok((id_card, selfie))
}

async fn read_image_field(field: &mut Field, max_bytes: usize) -> Result<UploadedImage, ServiceError> {
    let name = field.name().to_string();
    let filename = field
        .content_disposition()
        .get_filename()
        .unwrap_or("upload")
        .to_string();

    let mut bytes = Vec::new();
    while let Some(chunk) = field
        .try_next()
        .await
        .map_err(|e| ServiceError::Validation(format!("Failed to read field {}: {}", name, e)))?
    {
        if bytes.len() + chunk.len() > max_bytes {
            return Err(ServiceError::Validation(format!(
                "Field {} exceeds the {} byte upload limit",
                name, max_bytes
            )));
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(UploadedImage { filename, bytes })
}

async fn drain_field(field: &mut Field) -> Result<(), ServiceError> {
    while field
        .try_next()
        .await
        .map_err(|e| ServiceError::Validation(format!("Malformed multipart payload: {}", e)))?
        .is_some()
    {}
    Ok(())
}
