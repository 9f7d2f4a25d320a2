// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Survey model for storage and API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

/// Stored survey record (`surveys` collection).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Survey {
    /// Store-assigned document ID
    pub id: String,
    /// Display name
    pub name: String,
    /// Ordered topic names
    pub topics: Vec<String>,
    /// When the survey was created
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub created_at: DateTime<Utc>,
}

/// Input for creating a survey.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct NewSurvey {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[serde(default)]
    pub topics: Vec<String>,
}

impl NewSurvey {
    pub fn new(name: impl Into<String>, topics: &[&str]) -> Self {
        Self {
            name: name.into(),
            topics: topics.iter().map(|t| t.to_string()).collect(),
        }
    }
}
