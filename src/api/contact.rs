use axum::{
    Json,
    extract::{Multipart, Path, State, rejection::PathRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;

use crate::api::error::{ApiError, reject};
use crate::api::upload::read_contact_form;
use crate::domain::DomainError;
use crate::infrastructure::AppState;
use crate::infrastructure::config::StatusMode;
use crate::services::contact_service;

/// Unwrap the `:id` segment, reporting a malformed one as `{error}` like any other failure
fn contact_id(id: Result<Path<i32>, PathRejection>, mode: StatusMode) -> Result<i32, ApiError> {
    id.map(|Path(id)| id).map_err(|rejection| {
        ApiError::new(
            DomainError::Validation(format!("id must be an integer: {}", rejection.body_text())),
            mode,
        )
    })
}

/// Create a contact from a multipart form
#[utoipa::path(
    post,
    path = "/api/contact",
    responses(
        (status = 201, description = "Contact created"),
        (status = 400, description = "Missing required field"),
        (status = 413, description = "Upload exceeds the size limit"),
        (status = 409, description = "Phone or email already in use"),
        (status = 500, description = "Upload or database failure")
    )
)]
pub async fn create_contact(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let form = read_contact_form(multipart, &state.uploads)
        .await
        .map_err(reject(state.status_mode))?;

    let contact =
        contact_service::create_contact(state.contact_repo.as_ref(), &state.uploads, form)
            .await
            .map_err(reject(state.status_mode))?;

    Ok((StatusCode::CREATED, Json(contact)))
}

/// List every contact
#[utoipa::path(
    get,
    path = "/api/contact",
    responses(
        (status = 200, description = "All contacts"),
        (status = 500, description = "Database failure")
    )
)]
pub async fn list_contacts(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let contacts = state
        .contact_repo
        .list_all()
        .await
        .map_err(reject(state.status_mode))?;

    Ok(Json(json!({
        "message": "Contacts retrieved",
        "contacts": contacts
    })))
}

/// Get a single contact
#[utoipa::path(
    get,
    path = "/api/contact/{id}",
    params(("id" = i32, Path, description = "Contact id")),
    responses(
        (status = 200, description = "The contact (null for a missing id in legacy mode)"),
        (status = 400, description = "Id is not an integer"),
        (status = 404, description = "No contact with this id")
    )
)]
pub async fn get_contact(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let id = contact_id(id, state.status_mode)?;

    match state.contact_repo.get_by_id(id).await {
        Ok(contact) => Ok(Json(json!({
            "message": "Contact retrieved",
            "contact": contact
        }))),
        // Older clients expect 200 with a null contact
        Err(DomainError::NotFound) if state.status_mode == StatusMode::Legacy => {
            Ok(Json(json!({
                "message": "Contact not found",
                "contact": null
            })))
        }
        Err(e) => Err(ApiError::new(e, state.status_mode)),
    }
}

/// Update a contact; the id travels as a form field
#[utoipa::path(
    put,
    path = "/api/contact",
    responses(
        (status = 201, description = "Number of rows updated (0 for an unknown id)"),
        (status = 400, description = "Missing id or blank required field"),
        (status = 409, description = "Phone or email already in use")
    )
)]
pub async fn update_contact(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let form = read_contact_form(multipart, &state.uploads)
        .await
        .map_err(reject(state.status_mode))?;

    let updated = contact_service::update_contact(
        state.contact_repo.as_ref(),
        &state.uploads,
        form,
        state.prune_uploads,
    )
    .await
    .map_err(reject(state.status_mode))?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Contact updated successfully",
            "updated": updated
        })),
    ))
}

/// Delete a contact
#[utoipa::path(
    delete,
    path = "/api/contact/{id}",
    params(("id" = i32, Path, description = "Contact id")),
    responses(
        (status = 200, description = "Contact deleted (also for unknown ids)"),
        (status = 400, description = "Id is not an integer")
    )
)]
pub async fn delete_contact(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let id = contact_id(id, state.status_mode)?;

    contact_service::delete_contact(
        state.contact_repo.as_ref(),
        &state.uploads,
        id,
        state.prune_uploads,
    )
    .await
    .map_err(reject(state.status_mode))?;

    Ok(Json(json!({ "message": "Contact deleted successfully" })))
}
