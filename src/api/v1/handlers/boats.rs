/*
 * Responsibility
 * - /boats CRUD handlers
 * - access is decided by the policy before we get here; handlers only log the
 *   acting subject
 */
use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::IntoResponse,
};

use crate::api::v1::dto::boats::{BoatDto, PageParams};
use crate::api::v1::extractors::CurrentPrincipal;
use crate::error::{AppError, Problem};
use crate::state::AppState;

const BOAT_NOT_FOUND: &str = "Boat not found";

pub async fn list_boats(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    params: Result<Query<PageParams>, QueryRejection>,
) -> Result<Json<Vec<BoatDto>>, AppError> {
    let Query(params) = params?;
    let (limit, offset) = params.limit_offset().map_err(AppError::invalid)?;

    tracing::debug!(subject = principal.subject(), limit, offset, "[GET] list boats");

    let rows = state.boats.list(limit, offset).await?;
    Ok(Json(rows.into_iter().map(BoatDto::from).collect()))
}

pub async fn create_boat(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    payload: Result<Json<BoatDto>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(dto) = payload?;
    if dto.id.is_some() {
        return Err(AppError::invalid(Problem::new("Id must be blank")));
    }
    dto.validate().map_err(AppError::InvalidRequest)?;

    let row = state.boats.create(&dto.into_new_boat()).await?;
    tracing::info!(subject = principal.subject(), boat_id = row.id, "boat created");

    let location = format!("/api/v1/boats/{}", row.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(BoatDto::from(row)),
    ))
}

pub async fn get_boat(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    boat_id: Result<Path<i64>, PathRejection>,
) -> Result<Json<BoatDto>, AppError> {
    let Path(boat_id) = boat_id?;
    tracing::debug!(subject = principal.subject(), boat_id, "[GET] boat");

    let row = state
        .boats
        .get(boat_id)
        .await?
        .ok_or(AppError::NotFound(BOAT_NOT_FOUND))?;

    Ok(Json(BoatDto::from(row)))
}

pub async fn update_boat(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    boat_id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<BoatDto>, JsonRejection>,
) -> Result<Json<BoatDto>, AppError> {
    let Path(boat_id) = boat_id?;
    let Json(dto) = payload?;
    if dto.id.is_some_and(|id| id != boat_id) {
        return Err(AppError::invalid(Problem::new("Inconsistent ids")));
    }
    dto.validate().map_err(AppError::InvalidRequest)?;

    let row = state
        .boats
        .update(boat_id, &dto.into_new_boat())
        .await?
        .ok_or(AppError::NotFound(BOAT_NOT_FOUND))?;
    tracing::info!(subject = principal.subject(), boat_id, "boat updated");

    Ok(Json(BoatDto::from(row)))
}

pub async fn delete_boat(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    boat_id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let Path(boat_id) = boat_id?;

    let existed = state.boats.delete(boat_id).await?;
    tracing::info!(subject = principal.subject(), boat_id, existed, "boat deleted");

    Ok(StatusCode::OK)
}
