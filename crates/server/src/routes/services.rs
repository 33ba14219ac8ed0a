use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use common::types::Message;
use models::service::{Attributes, ServiceId, ServiceRecord};
use serde::Deserialize;
use tracing::{debug, info};

use crate::{errors::JsonApiError, state::AppState};

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct ListQuery {
    /// Only return listings with this business category.
    pub category: Option<String>,
}

/// Leading-integer parse: `42abc` and `42.5` address id 42. Ids without a
/// leading integer, or out of `i64` range, can never match a record.
fn parse_id(raw: &str) -> Result<ServiceId, JsonApiError> {
    let s = raw.trim_start();
    let sign_len = usize::from(s.starts_with(['+', '-']));
    let digits = s[sign_len..].bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return Err(JsonApiError::not_found());
    }
    s[..sign_len + digits].parse::<ServiceId>().map_err(|_| JsonApiError::not_found())
}

#[utoipa::path(
    get, path = "/api/services", tag = "services",
    params(ListQuery),
    responses(
        (status = 200, description = "All listings in insertion order"),
        (status = 500, description = "Failed to fetch services")
    )
)]
pub async fn list_services(
    State(state): State<AppState>,
    Query(q): Query<ListQuery>,
) -> Result<Json<Vec<ServiceRecord>>, JsonApiError> {
    let res = match q.category.as_deref() {
        Some(category) => state.catalog.list_by_category(category).await,
        None => state.catalog.list().await,
    };
    let list = res.map_err(|e| JsonApiError::from_service(e, "Failed to fetch services"))?;
    debug!(count = list.len(), "list services");
    Ok(Json(list))
}

#[utoipa::path(
    get, path = "/api/services/category/{category}", tag = "services",
    params(("category" = String, Path, description = "Display category, e.g. `Trending`")),
    responses(
        (status = 200, description = "Listings in the display category"),
        (status = 500, description = "Failed to fetch services by category")
    )
)]
pub async fn list_by_display_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<Vec<ServiceRecord>>, JsonApiError> {
    let list = state
        .catalog
        .list_by_display_category(&category)
        .await
        .map_err(|e| JsonApiError::from_service(e, "Failed to fetch services by category"))?;
    debug!(%category, count = list.len(), "list services by display category");
    Ok(Json(list))
}

#[utoipa::path(
    get, path = "/api/services/{id}", tag = "services",
    params(("id" = i64, Path, description = "Service id")),
    responses(
        (status = 200, description = "The listing"),
        (status = 404, description = "Service not found"),
        (status = 500, description = "Failed to fetch service")
    )
)]
pub async fn get_service(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ServiceRecord>, JsonApiError> {
    let id = parse_id(&id)?;
    state
        .catalog
        .get(id)
        .await
        .map(Json)
        .map_err(|e| JsonApiError::from_service(e, "Failed to fetch service"))
}

#[utoipa::path(
    post, path = "/api/services", tag = "services",
    request_body = crate::openapi::ServiceInputDoc,
    responses(
        (status = 201, description = "Created; id and timestamps assigned"),
        (status = 500, description = "Failed to create service")
    )
)]
pub async fn create_service(
    State(state): State<AppState>,
    payload: Result<Json<Attributes>, JsonRejection>,
) -> Result<(StatusCode, Json<ServiceRecord>), JsonApiError> {
    let Json(input) = payload?;
    let created = state
        .catalog
        .create(input)
        .await
        .map_err(|e| JsonApiError::from_service(e, "Failed to create service"))?;
    info!(id = created.id, "create service");
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    put, path = "/api/services/{id}", tag = "services",
    params(("id" = i64, Path, description = "Service id")),
    request_body = crate::openapi::ServiceInputDoc,
    responses(
        (status = 200, description = "Updated listing"),
        (status = 404, description = "Service not found"),
        (status = 500, description = "Failed to update service")
    )
)]
pub async fn update_service(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Attributes>, JsonRejection>,
) -> Result<Json<ServiceRecord>, JsonApiError> {
    let id = parse_id(&id)?;
    let Json(partial) = payload?;
    state
        .catalog
        .update(id, partial)
        .await
        .map(Json)
        .map_err(|e| JsonApiError::from_service(e, "Failed to update service"))
}

#[utoipa::path(
    delete, path = "/api/services/{id}", tag = "services",
    params(("id" = i64, Path, description = "Service id")),
    responses(
        (status = 200, description = "Service deleted successfully"),
        (status = 404, description = "Service not found"),
        (status = 500, description = "Failed to delete service")
    )
)]
pub async fn delete_service(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Message>, JsonApiError> {
    let id = parse_id(&id)?;
    match state.catalog.delete(id).await {
        Ok(true) => Ok(Json(Message { message: "Service deleted successfully" })),
        Ok(false) => Err(JsonApiError::not_found()),
        Err(e) => Err(JsonApiError::from_service(e, "Failed to delete service")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_id_reads_leading_integer() {
        assert_eq!(parse_id("1717171717171").unwrap(), 1_717_171_717_171);
        assert_eq!(parse_id(" 42 ").unwrap(), 42);
        assert_eq!(parse_id("42abc").unwrap(), 42);
        assert_eq!(parse_id("1.5").unwrap(), 1);
        assert_eq!(parse_id("-7").unwrap(), -7);
    }

    #[test]
    fn parse_id_without_digits_is_not_found() {
        for raw in ["abc", "", "-", "+x", ".5", "99999999999999999999"] {
            assert_eq!(parse_id(raw).unwrap_err().status, StatusCode::NOT_FOUND, "{raw:?}");
        }
    }
}
