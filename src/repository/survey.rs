// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use super::{decode_all, SurveyRepository};
use crate::db::{collections, encode_fields};
use crate::error::{AppError, Result};
use crate::models::{NewSurvey, Survey};
use crate::time_utils::now_millis;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Stored shape of a new survey.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SurveyFields<'a> {
    name: &'a str,
    topics: &'a [String],
    created_at: DateTime<Utc>,
}

impl SurveyRepository {
    /// Create a survey and return its id.
    pub async fn create_survey(&self, data: &NewSurvey) -> Result<String> {
        let fields = encode_fields(&SurveyFields {
            name: &data.name,
            topics: &data.topics,
            created_at: now_millis(),
        })?;

        let id = self
            .store
            .insert(collections::SURVEYS, fields)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Error adding survey"))?;

        tracing::info!(survey_id = %id, name = %data.name, "Survey created");
        Ok(id)
    }

    /// All surveys, in store order.
    pub async fn get_all_surveys(&self) -> Result<Vec<Survey>> {
        let docs = self
            .store
            .list(collections::SURVEYS)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Error getting surveys"))?;
        decode_all(docs)
    }

    /// Get a survey by id, failing with `NotFound` if it does not exist.
    pub async fn get_survey_by_id(&self, survey_id: &str) -> Result<Survey> {
        self.find_survey(survey_id)
            .await?
            .ok_or_else(|| AppError::NotFound(AppError::SURVEY_NOT_FOUND.to_string()))
    }

    /// Get a survey by id, `None` if it does not exist.
    pub async fn find_survey(&self, survey_id: &str) -> Result<Option<Survey>> {
        self.store
            .get_by_id(collections::SURVEYS, survey_id)
            .await
            .and_then(|doc| doc.map(|doc| doc.decode()).transpose())
            .inspect_err(|e| tracing::error!(survey_id, error = %e, "Error getting survey"))
    }
}
