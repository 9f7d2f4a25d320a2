// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Cascading survey deletion.
//!
//! The store has no foreign keys, so removing a survey means removing its
//! questions and submissions by hand, in this order:
//!
//! 1. Query questions and submissions with `surveyId == id` (concurrently).
//! 2. Delete every question, concurrently, and wait for all of them.
//! 3. Delete the survey document.
//! 4. Delete every submission, concurrently, and wait for all of them.
//!
//! A failed deletion fails its phase once every deletion in the phase has
//! settled, and later phases are skipped. Committed deletions stay deleted,
//! so a failed cascade can leave dependents behind; calling it again picks up
//! where it stopped, since deleting an absent document is a no-op.

use super::SurveyRepository;
use crate::db::{collections, Document, SURVEY_ID_FIELD};
use crate::error::Result;
use futures_util::{stream, StreamExt};

/// Dependents removed by a completed cascade.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CascadeSummary {
    pub questions: usize,
    pub submissions: usize,
}

impl SurveyRepository {
    /// Delete a survey together with its questions and submissions.
    ///
    /// Returns `true` once every phase has completed.
    pub async fn delete_survey(&self, survey_id: &str) -> Result<bool> {
        self.cascade_delete(survey_id).await.inspect_err(|e| {
            tracing::error!(
                survey_id,
                error = %e,
                "Error deleting survey and associated data"
            )
        })?;
        Ok(true)
    }

    /// Run the cascade and report how many dependents were deleted.
    pub async fn cascade_delete(&self, survey_id: &str) -> Result<CascadeSummary> {
        // 1. Fetch dependents before touching anything
        let (questions, submissions) = tokio::try_join!(
            self.store
                .query_equals(collections::QUESTIONS, SURVEY_ID_FIELD, survey_id),
            self.store
                .query_equals(collections::SUBMISSIONS, SURVEY_ID_FIELD, survey_id),
        )?;

        tracing::debug!(
            survey_id,
            questions = questions.len(),
            submissions = submissions.len(),
            "Fetched survey dependents"
        );

        // 2. Questions
        self.delete_all(collections::QUESTIONS, &questions).await?;
        tracing::debug!(survey_id, count = questions.len(), "Deleted questions");

        // 3. Survey
        self.store
            .delete_by_id(collections::SURVEYS, survey_id)
            .await?;
        tracing::debug!(survey_id, "Deleted survey document");

        // 4. Submissions
        self.delete_all(collections::SUBMISSIONS, &submissions)
            .await?;
        tracing::debug!(survey_id, count = submissions.len(), "Deleted submissions");

        let summary = CascadeSummary {
            questions: questions.len(),
            submissions: submissions.len(),
        };

        tracing::info!(
            survey_id,
            questions = summary.questions,
            submissions = summary.submissions,
            "Deleted survey and its associated questions and user submissions"
        );

        Ok(summary)
    }

    /// Delete documents concurrently and wait until every deletion settles.
    ///
    /// At most `max_concurrent_deletes` deletions are in flight; setting it to
    /// `usize::MAX` issues the whole batch at once. Fails with the first error
    /// in completion order.
    async fn delete_all(&self, collection: &str, docs: &[Document]) -> Result<()> {
        let store = self.store.as_ref();
        let ids: Vec<String> = docs.iter().map(|doc| doc.id.clone()).collect();

        let results = stream::iter(ids)
            .map(|id| async move { store.delete_by_id(collection, &id).await })
            .buffer_unordered(self.options.max_concurrent_deletes.max(1))
            .collect::<Vec<Result<()>>>()
            .await;

        let failed = results.iter().filter(|r| r.is_err()).count();
        if failed > 0 {
            tracing::warn!(
                collection,
                failed,
                attempted = results.len(),
                "Deletion batch failed; committed deletions are not rolled back"
            );
        }

        results.into_iter().collect::<Result<Vec<()>>>()?;
        Ok(())
    }
}
