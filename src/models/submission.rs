// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Survey submission model for storage and API.

use crate::models::SurveyRef;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::{Validate, ValidationError};

/// Stored submission record (`users` collection).
///
/// Result fields are opaque JSON owned by the front end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Submission {
    /// Store-assigned document ID
    pub id: String,
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub survey_id: SurveyRef,
    /// Survey name at submission time; not updated if the survey is renamed
    #[serde(default)]
    pub survey_name: String,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub user_email: Option<String>,
    #[serde(default)]
    #[cfg_attr(feature = "binding-generation", ts(type = "unknown"))]
    pub topic_results: Value,
    #[serde(default)]
    #[cfg_attr(feature = "binding-generation", ts(type = "unknown"))]
    pub answer_history: Value,
    #[serde(default)]
    #[cfg_attr(feature = "binding-generation", ts(type = "unknown"))]
    pub final_result: Value,
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub submitted_at: DateTime<Utc>,
}

/// Input for saving a submission.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewSubmission {
    #[validate(custom(function = "validate_survey_ref"))]
    pub survey_id: SurveyRef,
    #[serde(default)]
    pub survey_name: String,
    #[serde(default)]
    pub user_name: Option<String>,
    /// Stored as given, blank values included
    #[serde(default)]
    pub user_email: Option<String>,
    #[serde(default)]
    pub topic_results: Value,
    #[serde(default)]
    pub answer_history: Value,
    #[serde(default)]
    pub final_result: Value,
}

impl NewSubmission {
    /// A submission carrying only the survey reference.
    pub fn for_survey(survey_id: impl Into<SurveyRef>) -> Self {
        Self {
            survey_id: survey_id.into(),
            survey_name: String::new(),
            user_name: None,
            user_email: None,
            topic_results: Value::Null,
            answer_history: Value::Null,
            final_result: Value::Null,
        }
    }

    pub fn with_user(mut self, name: &str, email: Option<&str>) -> Self {
        self.user_name = Some(name.to_string());
        self.user_email = email.map(str::to_string);
        self
    }
}

fn validate_survey_ref(survey_id: &SurveyRef) -> Result<(), ValidationError> {
    if survey_id.id().trim().is_empty() {
        return Err(ValidationError::new("empty_survey_id"));
    }
    Ok(())
}
