// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Application-level reference from a dependent record to its survey.

use crate::error::Result;
use crate::models::Survey;
use crate::repository::SurveyRepository;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The `surveyId` of a question or submission.
///
/// The store enforces nothing: the referenced survey may not exist. The
/// reference carries only the id and never owns the survey.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SurveyRef(String);

impl SurveyRef {
    pub fn new(survey_id: impl Into<String>) -> Self {
        Self(survey_id.into())
    }

    pub fn id(&self) -> &str {
        &self.0
    }

    /// Look up the referenced survey; `None` if it no longer exists.
    pub async fn resolve(&self, repo: &SurveyRepository) -> Result<Option<Survey>> {
        repo.find_survey(&self.0).await
    }
}

impl fmt::Display for SurveyRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SurveyRef {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for SurveyRef {
    fn from(value: String) -> Self {
        Self(value)
    }
}
