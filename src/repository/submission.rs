// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use super::{decode_all, SurveyRepository};
use crate::db::{collections, encode_fields, SURVEY_ID_FIELD};
use crate::error::Result;
use crate::models::{NewSubmission, Submission};
use crate::time_utils::now_millis;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SubmissionFields<'a> {
    #[serde(flatten)]
    data: &'a NewSubmission,
    submitted_at: DateTime<Utc>,
}

impl SurveyRepository {
    /// Save a user's survey submission and return its id.
    pub async fn save_user_survey_submission(&self, data: &NewSubmission) -> Result<String> {
        let fields = encode_fields(&SubmissionFields {
            data,
            submitted_at: now_millis(),
        })?;

        let id = self
            .store
            .insert(collections::SUBMISSIONS, fields)
            .await
            .inspect_err(|e| {
                tracing::error!(
                    survey_id = %data.survey_id,
                    error = %e,
                    "Error saving user survey submission"
                )
            })?;

        tracing::info!(
            survey_id = %data.survey_id,
            submission_id = %id,
            "User survey submission saved"
        );
        Ok(id)
    }

    /// All submissions for a survey, in store order.
    pub async fn get_survey_submissions(&self, survey_id: &str) -> Result<Vec<Submission>> {
        let docs = self
            .store
            .query_equals(collections::SUBMISSIONS, SURVEY_ID_FIELD, survey_id)
            .await
            .inspect_err(|e| {
                tracing::error!(survey_id, error = %e, "Error getting submissions for survey")
            })?;
        decode_all(docs)
    }
}
