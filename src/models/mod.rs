// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod question;
pub mod reference;
pub mod submission;
pub mod survey;

pub use question::{AnswerButton, Question, QuestionInput};
pub use reference::SurveyRef;
pub use submission::{NewSubmission, Submission};
pub use survey::{NewSurvey, Survey};
