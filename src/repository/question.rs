// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use super::{decode_all, SurveyRepository};
use crate::db::{collections, encode_fields, SURVEY_ID_FIELD};
use crate::error::Result;
use crate::models::{AnswerButton, Question, QuestionInput};
use crate::time_utils::now_millis;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Stored shape of a new question.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NewQuestionFields<'a> {
    survey_id: &'a str,
    question: &'a str,
    buttons: &'a [AnswerButton],
    created_at: DateTime<Utc>,
}

/// Fields replaced by an update; everything else is left as stored.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QuestionUpdateFields<'a> {
    question: &'a str,
    buttons: &'a [AnswerButton],
    updated_at: DateTime<Utc>,
}

impl SurveyRepository {
    /// Attach a question to a survey and return the question id.
    ///
    /// The survey is not checked for existence.
    pub async fn add_question(&self, survey_id: &str, data: &QuestionInput) -> Result<String> {
        let fields = encode_fields(&NewQuestionFields {
            survey_id,
            question: &data.question,
            buttons: &data.buttons,
            created_at: now_millis(),
        })?;

        let id = self
            .store
            .insert(collections::QUESTIONS, fields)
            .await
            .inspect_err(|e| tracing::error!(survey_id, error = %e, "Error adding question"))?;

        tracing::debug!(survey_id, question_id = %id, "Question added");
        Ok(id)
    }

    /// All questions referencing a survey, in store order.
    pub async fn get_questions_for_survey(&self, survey_id: &str) -> Result<Vec<Question>> {
        let docs = self
            .store
            .query_equals(collections::QUESTIONS, SURVEY_ID_FIELD, survey_id)
            .await
            .inspect_err(|e| tracing::error!(survey_id, error = %e, "Error getting questions"))?;
        decode_all(docs)
    }

    /// Replace a question's text and buttons.
    ///
    /// Fails with `NotFound` if the question does not exist.
    pub async fn update_question(&self, question_id: &str, data: &QuestionInput) -> Result<bool> {
        let fields = encode_fields(&QuestionUpdateFields {
            question: &data.question,
            buttons: &data.buttons,
            updated_at: now_millis(),
        })?;

        self.store
            .update(collections::QUESTIONS, question_id, fields)
            .await
            .inspect_err(|e| tracing::error!(question_id, error = %e, "Error updating question"))?;

        Ok(true)
    }

    /// Delete a question. Deleting an absent question succeeds.
    pub async fn delete_question(&self, question_id: &str) -> Result<bool> {
        self.store
            .delete_by_id(collections::QUESTIONS, question_id)
            .await
            .inspect_err(|e| tracing::error!(question_id, error = %e, "Error deleting question"))?;
        Ok(true)
    }
}
