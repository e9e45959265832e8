//! Participant CRUD and projection handlers.
//!
//! Every route here sits behind the admin gate.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use census_models::{HomeDetails, Participant, ParticipantDetails, PersonalSummary, WorkDetails};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

const STATUS_SUCCESS: &str = "success";

/// Response for `GET /`.
#[derive(Serialize)]
pub struct ParticipantListResponse {
    pub status: &'static str,
    pub count: usize,
    pub data: Vec<Participant>,
}

/// Response for `GET /details/:email`.
#[derive(Serialize)]
pub struct ParticipantDetailsResponse {
    pub status: &'static str,
    pub data: ParticipantDetails,
}

/// Confirmation for mutations.
#[derive(Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// List every participant.
pub async fn list_participants(State(state): State<AppState>) -> Json<ParticipantListResponse> {
    let data = state.participants.list().await;
    Json(ParticipantListResponse {
        status: STATUS_SUCCESS,
        count: data.len(),
        data,
    })
}

/// Names and dates of birth of every participant.
pub async fn list_personal_details(State(state): State<AppState>) -> Json<Vec<PersonalSummary>> {
    Json(state.participants.list_details().await)
}

pub async fn get_participant_details(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> ApiResult<Json<ParticipantDetailsResponse>> {
    let data = state.participants.get_details(&email).await?;
    Ok(Json(ParticipantDetailsResponse {
        status: STATUS_SUCCESS,
        data,
    }))
}

pub async fn get_work_details(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> ApiResult<Json<WorkDetails>> {
    Ok(Json(state.participants.get_work(&email).await?))
}

pub async fn get_home_details(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> ApiResult<Json<HomeDetails>> {
    Ok(Json(state.participants.get_home(&email).await?))
}

/// Validate and add a participant.
pub async fn create_participant(
    State(state): State<AppState>,
    body: Result<Json<Participant>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<MessageResponse>)> {
    let Json(participant) = body.map_err(invalid_body)?;
    state.participants.create(participant).await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "Participant added successfully",
        }),
    ))
}

/// Replace a participant wholesale. The body is stored as sent.
pub async fn update_participant(
    State(state): State<AppState>,
    Path(email): Path<String>,
    body: Result<Json<Participant>, JsonRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let Json(participant) = body.map_err(invalid_body)?;
    state.participants.replace(&email, participant).await?;

    Ok(Json(MessageResponse {
        message: "Participant updated successfully",
    }))
}

pub async fn delete_participant(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    state.participants.remove(&email).await?;

    Ok(Json(MessageResponse {
        message: "Participant deleted successfully",
    }))
}

fn invalid_body(rejection: JsonRejection) -> ApiError {
    ApiError::bad_request("Invalid request body", rejection.body_text())
}
