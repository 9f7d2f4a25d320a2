// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Survey repository: typed operations over the document store.
//!
//! Provides high-level operations for:
//! - Surveys (create, list, lookup, cascading delete)
//! - Questions (attached to a survey by `surveyId`)
//! - Submissions (user results, stored in the `users` collection)
//!
//! Every operation logs store failures and returns them unchanged. Nothing
//! is retried.

mod cascade;
mod question;
mod submission;
mod survey;

pub use cascade::CascadeSummary;

use crate::config::{Config, DEFAULT_MAX_CONCURRENT_DELETES};
use crate::db::{Document, DocumentStore};
use crate::error::Result;
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Tuning for repository operations.
#[derive(Debug, Clone, Copy)]
pub struct RepositoryOptions {
    /// Upper bound on deletions in flight during one cascade phase.
    /// `usize::MAX` deletes a whole phase at once.
    pub max_concurrent_deletes: usize,
}

impl Default for RepositoryOptions {
    fn default() -> Self {
        Self {
            max_concurrent_deletes: DEFAULT_MAX_CONCURRENT_DELETES,
        }
    }
}

impl From<&Config> for RepositoryOptions {
    fn from(config: &Config) -> Self {
        Self {
            max_concurrent_deletes: config.max_concurrent_deletes,
        }
    }
}

/// Survey repository over an injected document store.
#[derive(Clone)]
pub struct SurveyRepository {
    store: Arc<dyn DocumentStore>,
    options: RepositoryOptions,
}

impl SurveyRepository {
    pub fn new(store: Arc<dyn DocumentStore>, options: RepositoryOptions) -> Self {
        Self { store, options }
    }

    /// Repository with default options.
    pub fn with_store<S: DocumentStore + 'static>(store: S) -> Self {
        Self::new(Arc::new(store), RepositoryOptions::default())
    }

    pub fn options(&self) -> RepositoryOptions {
        self.options
    }
}

fn decode_all<T: DeserializeOwned>(docs: Vec<Document>) -> Result<Vec<T>> {
    docs.into_iter().map(Document::decode).collect()
}
