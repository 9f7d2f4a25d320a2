// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Question model for storage and API.

use crate::models::SurveyRef;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

/// Stored question record (`questions` collection).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Question {
    /// Store-assigned document ID
    pub id: String,
    /// Owning survey
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub survey_id: SurveyRef,
    /// Question text
    pub question: String,
    /// Answer buttons, in display order
    pub buttons: Vec<AnswerButton>,
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub created_at: DateTime<Utc>,
    /// Set by every update
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "binding-generation", ts(type = "string | null"))]
    pub updated_at: Option<DateTime<Utc>>,
}

/// An answer button: a label plus whatever the front end attaches to it.
///
/// Deserializes from either `"yes"` or `{"label": "yes", ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ButtonRepr")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct AnswerButton {
    pub label: String,
    #[serde(flatten)]
    #[cfg_attr(feature = "binding-generation", ts(skip))]
    pub attributes: Map<String, Value>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ButtonRepr {
    Label(String),
    Full {
        label: String,
        #[serde(flatten)]
        attributes: Map<String, Value>,
    },
}

impl From<ButtonRepr> for AnswerButton {
    fn from(repr: ButtonRepr) -> Self {
        match repr {
            ButtonRepr::Label(label) => label.into(),
            ButtonRepr::Full { label, attributes } => Self { label, attributes },
        }
    }
}

impl From<String> for AnswerButton {
    fn from(label: String) -> Self {
        Self {
            label,
            attributes: Map::new(),
        }
    }
}

impl From<&str> for AnswerButton {
    fn from(label: &str) -> Self {
        label.to_string().into()
    }
}

/// Input for adding or replacing a question.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct QuestionInput {
    #[validate(length(min = 1, max = 1000))]
    pub question: String,
    #[serde(default)]
    pub buttons: Vec<AnswerButton>,
}

impl QuestionInput {
    pub fn new(question: impl Into<String>, buttons: &[&str]) -> Self {
        Self {
            question: question.into(),
            buttons: buttons.iter().map(|&b| b.into()).collect(),
        }
    }
}
