use std::time::Duration;

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use uuid::Uuid;

use crate::{
    adapters::inbound::http::{
        dto::{
            error_response, AssetDto, DeleteAssetDto, ErrorResponseDto, HealthDto, SignUrlDto,
            SignedUrlDto, SuccessResponseDto, UploadReceiptDto,
        },
        router::AppState,
    },
    domain::models::{AssetKind, UploadAssetRequest},
};

fn bad_request(message: &str) -> (StatusCode, Json<ErrorResponseDto>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponseDto::bad_request(message)),
    )
}

/// Collected multipart fields of an upload form
#[derive(Default)]
struct UploadForm {
    kind: Option<AssetKind>,
    filename: Option<String>,
    content_type: Option<String>,
    data: Option<Bytes>,
    uploaded_by: Option<String>,
    ttl_secs: Option<u64>,
    inline: Option<bool>,
}

async fn read_upload_form(
    mut multipart: Multipart,
) -> Result<UploadForm, (StatusCode, Json<ErrorResponseDto>)> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| bad_request(&format!("Invalid multipart payload: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                form.filename = field.file_name().map(str::to_string);
                form.content_type = field.content_type().map(str::to_string);
                form.data = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|e| bad_request(&format!("Failed to read file field: {}", e)))?,
                );
            }
            "kind" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| bad_request(&format!("Failed to read kind field: {}", e)))?;
                form.kind = Some(
                    AssetKind::parse(&value)
                        .ok_or_else(|| bad_request(&format!("Unknown asset kind: {}", value)))?,
                );
            }
            "uploaded_by" => {
                form.uploaded_by = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| bad_request(&format!("Failed to read field: {}", e)))?,
                );
            }
            "ttl_secs" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| bad_request(&format!("Failed to read field: {}", e)))?;
                form.ttl_secs = Some(
                    value
                        .parse()
                        .map_err(|_| bad_request(&format!("Invalid ttl_secs: {}", value)))?,
                );
            }
            "inline" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| bad_request(&format!("Failed to read field: {}", e)))?;
                form.inline = Some(
                    value
                        .parse()
                        .map_err(|_| bad_request(&format!("Invalid inline flag: {}", value)))?,
                );
            }
            other => {
                return Err(bad_request(&format!("Unexpected field: {}", other)));
            }
        }
    }

    Ok(form)
}

/// Handle asset upload for a title (multipart form: `file`, `kind`,
/// `ttl_secs`, optional `uploaded_by` and `inline`)
pub async fn upload_asset(
    State(app_state): State<AppState>,
    Path(title_id): Path<Uuid>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<UploadReceiptDto>), (StatusCode, Json<ErrorResponseDto>)> {
    let form = read_upload_form(multipart).await?;

    let data = form.data.ok_or_else(|| bad_request("Missing file field"))?;
    let kind = form.kind.ok_or_else(|| bad_request("Missing kind field"))?;
    let ttl_secs = form
        .ttl_secs
        .ok_or_else(|| bad_request("Missing ttl_secs field"))?;

    let request = UploadAssetRequest {
        title_id,
        kind,
        filename: form.filename,
        content_type: form.content_type,
        data,
        uploaded_by: form.uploaded_by.unwrap_or_default(),
        link_ttl: Duration::from_secs(ttl_secs),
        inline: form.inline.unwrap_or(true),
    };

    let receipt = app_state
        .asset_service
        .upload_asset(request)
        .await
        .map_err(error_response)?;

    Ok((StatusCode::CREATED, Json(receipt.into())))
}

/// Handle asset listing for a title, newest first
pub async fn list_title_assets(
    State(app_state): State<AppState>,
    Path(title_id): Path<Uuid>,
) -> Result<Json<Vec<AssetDto>>, (StatusCode, Json<ErrorResponseDto>)> {
    let assets = app_state
        .asset_service
        .assets_for_title(title_id)
        .await
        .map_err(error_response)?;

    Ok(Json(assets.into_iter().map(AssetDto::from).collect()))
}

/// Handle signed URL issuance for an asset
pub async fn sign_asset_url(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<SignUrlDto>,
) -> Result<Json<SignedUrlDto>, (StatusCode, Json<ErrorResponseDto>)> {
    let url = app_state
        .asset_service
        .signed_url(
            id,
            Duration::from_secs(params.ttl_secs),
            params.inline.unwrap_or(true),
            params.filename,
        )
        .await
        .map_err(error_response)?;

    Ok(Json(SignedUrlDto { url }))
}

/// Handle asset deletion
pub async fn delete_asset(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<DeleteAssetDto>,
) -> Result<(StatusCode, Json<SuccessResponseDto>), (StatusCode, Json<ErrorResponseDto>)> {
    app_state
        .asset_service
        .delete_asset(id, params.delete_blob.unwrap_or(false))
        .await
        .map_err(error_response)?;

    Ok((
        StatusCode::OK,
        Json(SuccessResponseDto::new("Asset deleted successfully")),
    ))
}

/// Handle health checks: liveness plus repository reachability
pub async fn health(
    State(app_state): State<AppState>,
) -> Result<Json<HealthDto>, (StatusCode, Json<ErrorResponseDto>)> {
    match app_state.catalog_service.list_genres().await {
        Ok(_) => Ok(Json(HealthDto {
            status: "ok",
            repository: "ok",
        })),
        Err(e) => Err((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponseDto {
                error: "unhealthy".to_string(),
                message: e.to_string(),
            }),
        )),
    }
}
