// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Survey Store: persistence for surveys, questions and submissions
//!
//! This crate provides the repository that the survey front end uses to
//! create surveys, attach questions, record submissions, and delete a
//! survey together with everything that references it.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod repository;
pub mod routes;
pub mod time_utils;

use config::Config;
use repository::SurveyRepository;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub repo: SurveyRepository,
}
