// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use std::sync::Arc;
use survey_store::config::Config;
use survey_store::db::{FirestoreStore, MemoryStore};
use survey_store::models::{NewSubmission, NewSurvey, QuestionInput};
use survey_store::repository::SurveyRepository;
use survey_store::routes::create_router;
use survey_store::AppState;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a repository on the Firestore emulator.
#[allow(dead_code)]
pub async fn firestore_repo() -> SurveyRepository {
    let store = FirestoreStore::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator");
    SurveyRepository::with_store(store)
}

/// Create a repository on a fresh in-memory store.
///
/// The store handle shares data with the repository, for inspection and
/// fault injection.
#[allow(dead_code)]
pub fn memory_repo() -> (SurveyRepository, MemoryStore) {
    let store = MemoryStore::new();
    (SurveyRepository::with_store(store.clone()), store)
}

/// Ids produced by [`seed_pets_survey`].
#[allow(dead_code)]
pub struct PetsSurvey {
    pub survey_id: String,
    pub question_id: String,
    pub submission_id: String,
}

/// Create the "Pets" survey with one question and one submission.
#[allow(dead_code)]
pub async fn seed_pets_survey(repo: &SurveyRepository) -> PetsSurvey {
    let survey_id = repo
        .create_survey(&NewSurvey::new("Pets", &["cat", "dog"]))
        .await
        .unwrap();
    let question_id = repo
        .add_question(&survey_id, &QuestionInput::new("Like cats?", &["yes", "no"]))
        .await
        .unwrap();
    let submission_id = repo
        .save_user_survey_submission(
            &NewSubmission::for_survey(survey_id.as_str()).with_user("A", None),
        )
        .await
        .unwrap();

    PetsSurvey {
        survey_id,
        question_id,
        submission_id,
    }
}

/// Create a test app on an in-memory store.
/// Returns the router, the shared state and the store.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>, MemoryStore) {
    let config = Config::test_default();
    let (repo, store) = memory_repo();

    let state = Arc::new(AppState { config, repo });

    (create_router(state.clone()), state, store)
}
