// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Survey, question and submission operations against the in-memory store.

use serde_json::json;
use std::io;
use std::sync::{Arc, Mutex};
use survey_store::db::collections::{QUESTIONS, SUBMISSIONS, SURVEYS};
use survey_store::db::memory::StoreOp;
use survey_store::error::AppError;
use survey_store::models::{AnswerButton, NewSubmission, NewSurvey, QuestionInput};

mod common;
use common::{memory_repo, seed_pets_survey};

// ═══════════════════════════════════════════════════════════════════════════
// SURVEY TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_create_and_get_survey_round_trip() {
    let (repo, store) = memory_repo();
    let before = chrono::Utc::now();

    let id = repo
        .create_survey(&NewSurvey::new("Pets", &["cat", "dog"]))
        .await
        .unwrap();
    let survey = repo.get_survey_by_id(&id).await.unwrap();

    assert_eq!(survey.id, id);
    assert_eq!(survey.name, "Pets");
    assert_eq!(survey.topics, vec!["cat", "dog"]);
    assert!(survey.created_at >= before - chrono::Duration::milliseconds(1));

    // Exactly the written fields plus the stamp are persisted
    let mut keys: Vec<String> = store
        .snapshot()
        .get(SURVEYS)
        .and_then(|docs| docs.get(&id).cloned())
        .unwrap()
        .keys()
        .cloned()
        .collect();
    keys.sort();
    assert_eq!(keys, vec!["createdAt", "name", "topics"]);
}

#[tokio::test]
async fn test_get_missing_survey_is_not_found() {
    let (repo, _store) = memory_repo();

    let err = repo.get_survey_by_id("nope").await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(ref msg) if msg == "Survey not found"));

    assert!(repo.find_survey("nope").await.unwrap().is_none());
}

#[tokio::test]
async fn test_get_all_surveys() {
    let (repo, _store) = memory_repo();
    assert!(repo.get_all_surveys().await.unwrap().is_empty());

    repo.create_survey(&NewSurvey::new("One", &[])).await.unwrap();
    repo.create_survey(&NewSurvey::new("Two", &["x"])).await.unwrap();

    let mut names: Vec<String> = repo
        .get_all_surveys()
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.name)
        .collect();
    names.sort();
    assert_eq!(names, vec!["One", "Two"]);
}

#[tokio::test]
async fn test_store_failures_propagate_unchanged() {
    let (repo, store) = memory_repo();

    store.fail_on(StoreOp::Insert, SURVEYS);
    let err = repo
        .create_survey(&NewSurvey::new("Pets", &[]))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::StoreWrite(_)));

    store.fail_on(StoreOp::List, SURVEYS);
    let err = repo.get_all_surveys().await.unwrap_err();
    assert!(matches!(err, AppError::StoreRead(_)));

    store.fail_on(StoreOp::Get, SURVEYS);
    let err = repo.get_survey_by_id("any").await.unwrap_err();
    assert!(matches!(err, AppError::StoreRead(_)));

    // Exactly one attempt per call
    assert_eq!(store.calls_to(StoreOp::Insert, SURVEYS).len(), 1);
    assert_eq!(store.len(SURVEYS), 0);
}

/// Collects formatted log output so tests can count events.
#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl LogBuffer {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

#[tokio::test]
async fn test_survey_read_failure_logged_once() {
    let (repo, store) = memory_repo();
    let logs = LogBuffer::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    store.fail_on(StoreOp::Get, SURVEYS);
    let err = repo.get_survey_by_id("any").await.unwrap_err();
    assert!(matches!(err, AppError::StoreRead(_)));
    assert_eq!(logs.contents().matches("Error getting survey").count(), 1);

    // A missing survey is an ordinary outcome, not a store error
    store.clear_faults();
    let err = repo.get_survey_by_id("any").await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(logs.contents().matches("Error getting survey").count(), 1);
    assert_eq!(store.calls_to(StoreOp::Get, SURVEYS).len(), 2);
}

// ═══════════════════════════════════════════════════════════════════════════
// QUESTION TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_add_and_list_questions() {
    let (repo, _store) = memory_repo();
    let pets = seed_pets_survey(&repo).await;

    let questions = repo.get_questions_for_survey(&pets.survey_id).await.unwrap();
    assert_eq!(questions.len(), 1);

    let q = &questions[0];
    assert_eq!(q.id, pets.question_id);
    assert_eq!(q.survey_id.id(), pets.survey_id);
    assert_eq!(q.question, "Like cats?");
    let labels: Vec<&str> = q.buttons.iter().map(|b| b.label.as_str()).collect();
    assert_eq!(labels, vec!["yes", "no"]);
    assert!(q.updated_at.is_none());

    // The reference resolves to the owning survey
    let survey = q.survey_id.resolve(&repo).await.unwrap().unwrap();
    assert_eq!(survey.id, pets.survey_id);
}

#[tokio::test]
async fn test_add_question_does_not_check_survey() {
    let (repo, _store) = memory_repo();

    let id = repo
        .add_question("ghost", &QuestionInput::new("Anyone?", &[]))
        .await
        .unwrap();

    let questions = repo.get_questions_for_survey("ghost").await.unwrap();
    assert_eq!(questions[0].id, id);
    assert!(questions[0].survey_id.resolve(&repo).await.unwrap().is_none());
}

#[tokio::test]
async fn test_update_question_replaces_text_and_buttons() {
    let (repo, _store) = memory_repo();
    let pets = seed_pets_survey(&repo).await;
    let original = repo.get_questions_for_survey(&pets.survey_id).await.unwrap()[0].clone();

    let mut input = QuestionInput::new("Like dogs?", &["woof"]);
    let mut fancy = AnswerButton::from("meh");
    fancy.attributes.insert("topic".to_string(), json!("dog"));
    input.buttons.push(fancy.clone());

    assert!(repo.update_question(&pets.question_id, &input).await.unwrap());

    let updated = repo.get_questions_for_survey(&pets.survey_id).await.unwrap()[0].clone();
    assert_eq!(updated.question, "Like dogs?");
    assert_eq!(updated.buttons, vec![AnswerButton::from("woof"), fancy]);
    assert_eq!(updated.created_at, original.created_at);
    assert_eq!(updated.survey_id, original.survey_id);
    assert!(updated.updated_at.unwrap() >= original.created_at);
}

#[tokio::test]
async fn test_update_missing_question_is_not_found() {
    let (repo, store) = memory_repo();

    let err = repo
        .update_question("nope", &QuestionInput::new("?", &[]))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(store.len(QUESTIONS), 0);
}

#[tokio::test]
async fn test_delete_question() {
    let (repo, store) = memory_repo();
    let pets = seed_pets_survey(&repo).await;

    assert!(repo.delete_question(&pets.question_id).await.unwrap());
    assert!(repo
        .get_questions_for_survey(&pets.survey_id)
        .await
        .unwrap()
        .is_empty());

    // Absent id is a no-op success
    let mutations = store.mutations();
    assert!(repo.delete_question(&pets.question_id).await.unwrap());
    assert_eq!(store.mutations(), mutations);

    // The survey itself is unaffected
    assert!(repo.get_survey_by_id(&pets.survey_id).await.is_ok());
}

// ═══════════════════════════════════════════════════════════════════════════
// SUBMISSION TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_save_and_list_submissions() {
    let (repo, store) = memory_repo();
    let pets = seed_pets_survey(&repo).await;

    let mut full = NewSubmission::for_survey(pets.survey_id.as_str())
        .with_user("B", Some("b@example.com"));
    full.survey_name = "Pets".to_string();
    full.topic_results = json!({"cat": 3, "dog": 1});
    full.answer_history = json!([{"question": "Like cats?", "answer": "yes"}]);
    full.final_result = json!("cat");
    let full_id = repo.save_user_survey_submission(&full).await.unwrap();

    let mut submissions = repo.get_survey_submissions(&pets.survey_id).await.unwrap();
    submissions.sort_by_key(|s| s.user_name.clone());
    assert_eq!(submissions.len(), 2);

    assert_eq!(submissions[0].id, pets.submission_id);
    assert_eq!(submissions[0].user_name.as_deref(), Some("A"));

    let saved = &submissions[1];
    assert_eq!(saved.id, full_id);
    assert_eq!(saved.survey_name, "Pets");
    assert_eq!(saved.user_email.as_deref(), Some("b@example.com"));
    assert_eq!(saved.topic_results["cat"], 3);
    assert_eq!(saved.final_result, json!("cat"));

    assert_eq!(store.len(SUBMISSIONS), 2);
}

#[tokio::test]
async fn test_survey_name_snapshot_is_not_a_live_relation() {
    let (repo, _store) = memory_repo();

    let mut input = NewSubmission::for_survey("missing-survey");
    input.survey_name = "Old Name".to_string();
    repo.save_user_survey_submission(&input).await.unwrap();

    let submissions = repo.get_survey_submissions("missing-survey").await.unwrap();
    assert_eq!(submissions[0].survey_name, "Old Name");
    assert!(submissions[0].survey_id.resolve(&repo).await.unwrap().is_none());
}
