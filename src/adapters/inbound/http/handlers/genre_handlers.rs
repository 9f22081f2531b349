use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    adapters::inbound::http::{
        dto::{error_response, ErrorResponseDto, GenreDto, SaveGenreDto, SuccessResponseDto},
        router::AppState,
    },
    domain::models::GenreDraft,
};

/// Handle genre creation
pub async fn create_genre(
    State(app_state): State<AppState>,
    Json(dto): Json<SaveGenreDto>,
) -> Result<(StatusCode, Json<GenreDto>), (StatusCode, Json<ErrorResponseDto>)> {
    let genre = app_state
        .catalog_service
        .create_genre(GenreDraft { name: dto.name })
        .await
        .map_err(error_response)?;

    Ok((StatusCode::CREATED, Json(genre.into())))
}

/// Handle genre retrieval
pub async fn get_genre(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<GenreDto>, (StatusCode, Json<ErrorResponseDto>)> {
    let genre = app_state
        .catalog_service
        .get_genre(id)
        .await
        .map_err(error_response)?;

    Ok(Json(genre.into()))
}

/// Handle genre listing, ordered by name
pub async fn list_genres(
    State(app_state): State<AppState>,
) -> Result<Json<Vec<GenreDto>>, (StatusCode, Json<ErrorResponseDto>)> {
    let genres = app_state
        .catalog_service
        .list_genres()
        .await
        .map_err(error_response)?;

    Ok(Json(genres.into_iter().map(GenreDto::from).collect()))
}

/// Handle genre rename
pub async fn update_genre(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(dto): Json<SaveGenreDto>,
) -> Result<Json<GenreDto>, (StatusCode, Json<ErrorResponseDto>)> {
    let genre = app_state
        .catalog_service
        .update_genre(id, GenreDraft { name: dto.name })
        .await
        .map_err(error_response)?;

    Ok(Json(genre.into()))
}

/// Handle genre deletion; rejected while any title references it
pub async fn delete_genre(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<SuccessResponseDto>), (StatusCode, Json<ErrorResponseDto>)> {
    app_state
        .catalog_service
        .delete_genre(id)
        .await
        .map_err(error_response)?;

    Ok((
        StatusCode::OK,
        Json(SuccessResponseDto::new("Genre deleted successfully")),
    ))
}
