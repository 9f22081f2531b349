use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    adapters::inbound::http::{
        dto::{
            error_response, ErrorResponseDto, SaveTitleDto, SearchTitlesDto, SuccessResponseDto,
            TitleDto,
        },
        router::AppState,
    },
    domain::models::{TitleDraft, TitleQuery},
};

fn to_draft(dto: SaveTitleDto) -> TitleDraft {
    TitleDraft {
        name: dto.name,
        kind: dto.kind,
        release_year: dto.release_year,
        synopsis: dto.synopsis,
        average_rating: dto.average_rating,
        genres: dto.genre_ids.into_iter().collect(),
    }
}

/// Handle title creation
pub async fn create_title(
    State(app_state): State<AppState>,
    Json(dto): Json<SaveTitleDto>,
) -> Result<(StatusCode, Json<TitleDto>), (StatusCode, Json<ErrorResponseDto>)> {
    let title = app_state
        .catalog_service
        .create_title(to_draft(dto))
        .await
        .map_err(error_response)?;

    Ok((StatusCode::CREATED, Json(title.into())))
}

/// Handle title retrieval
pub async fn get_title(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TitleDto>, (StatusCode, Json<ErrorResponseDto>)> {
    let title = app_state
        .catalog_service
        .get_title(id)
        .await
        .map_err(error_response)?;

    Ok(Json(title.into()))
}

/// Handle title listing and filtered search; with no query parameters
/// this returns the whole catalog, newest first
pub async fn search_titles(
    State(app_state): State<AppState>,
    Query(params): Query<SearchTitlesDto>,
) -> Result<Json<Vec<TitleDto>>, (StatusCode, Json<ErrorResponseDto>)> {
    let query = TitleQuery {
        name_pattern: params.name,
        kind: params.kind,
        year: params.year,
        genre_id: params.genre_id,
    };

    let titles = app_state
        .catalog_service
        .search_titles(query)
        .await
        .map_err(error_response)?;

    Ok(Json(titles.into_iter().map(TitleDto::from).collect()))
}

/// Handle title update
pub async fn update_title(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(dto): Json<SaveTitleDto>,
) -> Result<Json<TitleDto>, (StatusCode, Json<ErrorResponseDto>)> {
    let title = app_state
        .catalog_service
        .update_title(id, to_draft(dto))
        .await
        .map_err(error_response)?;

    Ok(Json(title.into()))
}

/// Handle title deletion; cascades asset metadata rows
pub async fn delete_title(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<SuccessResponseDto>), (StatusCode, Json<ErrorResponseDto>)> {
    let cascaded = app_state
        .catalog_service
        .delete_title(id)
        .await
        .map_err(error_response)?;

    Ok((
        StatusCode::OK,
        Json(SuccessResponseDto::new(&format!(
            "Title deleted ({} asset record(s) cascaded)",
            cascaded.len()
        ))),
    ))
}
