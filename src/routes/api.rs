// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! JSON API over the survey repository.

use crate::error::{AppError, Result};
use crate::models::{NewSubmission, NewSurvey, Question, QuestionInput, Submission, Survey};
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/surveys", get(list_surveys).post(create_survey))
        .route("/api/surveys/{id}", get(get_survey).delete(delete_survey))
        .route(
            "/api/surveys/{id}/questions",
            get(list_questions).post(add_question),
        )
        .route(
            "/api/surveys/{id}/submissions",
            get(list_submissions),
        )
        .route(
            "/api/questions/{id}",
            put(update_question).delete(delete_question),
        )
        .route("/api/submissions", post(save_submission))
}

/// Response for endpoints that create a record.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CreatedResponse {
    pub id: String,
}

/// Response for endpoints that only report success.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SuccessResponse {
    pub success: bool,
}

fn validate<T: Validate>(input: &T) -> Result<()> {
    input
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))
}

fn created(id: String) -> (StatusCode, Json<CreatedResponse>) {
    (StatusCode::CREATED, Json(CreatedResponse { id }))
}

// ─── Surveys ─────────────────────────────────────────────────

async fn list_surveys(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Survey>>> {
    Ok(Json(state.repo.get_all_surveys().await?))
}

async fn create_survey(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewSurvey>,
) -> Result<(StatusCode, Json<CreatedResponse>)> {
    validate(&payload)?;
    let id = state.repo.create_survey(&payload).await?;
    Ok(created(id))
}

async fn get_survey(
    State(state): State<Arc<AppState>>,
    Path(survey_id): Path<String>,
) -> Result<Json<Survey>> {
    Ok(Json(state.repo.get_survey_by_id(&survey_id).await?))
}

/// Delete a survey with all of its questions and submissions.
async fn delete_survey(
    State(state): State<Arc<AppState>>,
    Path(survey_id): Path<String>,
) -> Result<Json<SuccessResponse>> {
    tracing::info!(survey_id = %survey_id, "Survey deletion requested");
    let success = state.repo.delete_survey(&survey_id).await?;
    Ok(Json(SuccessResponse { success }))
}

// ─── Questions ───────────────────────────────────────────────

async fn list_questions(
    State(state): State<Arc<AppState>>,
    Path(survey_id): Path<String>,
) -> Result<Json<Vec<Question>>> {
    Ok(Json(state.repo.get_questions_for_survey(&survey_id).await?))
}

async fn add_question(
    State(state): State<Arc<AppState>>,
    Path(survey_id): Path<String>,
    Json(payload): Json<QuestionInput>,
) -> Result<(StatusCode, Json<CreatedResponse>)> {
    validate(&payload)?;
    let id = state.repo.add_question(&survey_id, &payload).await?;
    Ok(created(id))
}

async fn update_question(
    State(state): State<Arc<AppState>>,
    Path(question_id): Path<String>,
    Json(payload): Json<QuestionInput>,
) -> Result<Json<SuccessResponse>> {
    validate(&payload)?;
    let success = state.repo.update_question(&question_id, &payload).await?;
    Ok(Json(SuccessResponse { success }))
}

async fn delete_question(
    State(state): State<Arc<AppState>>,
    Path(question_id): Path<String>,
) -> Result<Json<SuccessResponse>> {
    let success = state.repo.delete_question(&question_id).await?;
    Ok(Json(SuccessResponse { success }))
}

// ─── Submissions ─────────────────────────────────────────────

async fn list_submissions(
    State(state): State<Arc<AppState>>,
    Path(survey_id): Path<String>,
) -> Result<Json<Vec<Submission>>> {
    Ok(Json(state.repo.get_survey_submissions(&survey_id).await?))
}

async fn save_submission(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewSubmission>,
) -> Result<(StatusCode, Json<CreatedResponse>)> {
    validate(&payload)?;
    let id = state.repo.save_user_survey_submission(&payload).await?;
    Ok(created(id))
}
