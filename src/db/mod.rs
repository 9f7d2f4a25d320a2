// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Database layer: the document store boundary and its implementations.

pub mod firestore;
pub mod memory;

pub use self::firestore::FirestoreStore;
pub use self::memory::MemoryStore;

use crate::error::{AppError, Result};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use futures_util::future::BoxFuture;
use ring::rand::{SecureRandom, SystemRandom};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

/// Collection names as constants.
pub mod collections {
    pub const SURVEYS: &str = "surveys";
    pub const QUESTIONS: &str = "questions";
    /// Survey submissions live in the `users` collection
    pub const SUBMISSIONS: &str = "users";
}

/// Field holding the application-level foreign key to a survey.
pub const SURVEY_ID_FIELD: &str = "surveyId";

/// Random bytes per document id; 15 bytes encode to 20 base64 characters.
const DOCUMENT_ID_BYTES: usize = 15;

/// Schema-free document fields.
pub type Fields = Map<String, Value>;

/// A stored document: its store-assigned id plus its fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
}

impl Document {
    /// Decode the document into a record type.
    ///
    /// The id is injected as the `id` field so records can carry it.
    pub fn decode<T: DeserializeOwned>(self) -> Result<T> {
        let mut fields = self.fields;
        fields.insert("id".to_string(), Value::String(self.id.clone()));
        serde_json::from_value(Value::Object(fields)).map_err(|e| {
            AppError::StoreRead(format!("Malformed document {}: {}", self.id, e))
        })
    }
}

/// Encode a record as document fields.
pub fn encode_fields<T: Serialize>(record: &T) -> Result<Fields> {
    match serde_json::to_value(record) {
        Ok(Value::Object(fields)) => Ok(fields),
        Ok(other) => Err(AppError::Internal(anyhow::anyhow!(
            "Record did not serialize to an object: {}",
            other
        ))),
        Err(e) => Err(AppError::Internal(e.into())),
    }
}

/// Generate a new document id (20 URL-safe characters).
pub fn new_document_id() -> Result<String> {
    let mut bytes = [0u8; DOCUMENT_ID_BYTES];
    SystemRandom::new()
        .fill(&mut bytes)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("System RNG unavailable")))?;
    Ok(URL_SAFE_NO_PAD.encode(bytes))
}

/// Primitive operations of a remote document store.
///
/// Reads fail with [`AppError::StoreRead`] and writes with
/// [`AppError::StoreWrite`]. Deleting an absent document is a no-op.
pub trait DocumentStore: Send + Sync {
    /// Insert a new document and return its store-assigned id.
    fn insert<'a>(&'a self, collection: &'a str, fields: Fields) -> BoxFuture<'a, Result<String>>;

    /// Get a document by id.
    fn get_by_id<'a>(
        &'a self,
        collection: &'a str,
        id: &'a str,
    ) -> BoxFuture<'a, Result<Option<Document>>>;

    /// All documents whose `field` equals `value`, in store order.
    fn query_equals<'a>(
        &'a self,
        collection: &'a str,
        field: &'a str,
        value: &'a str,
    ) -> BoxFuture<'a, Result<Vec<Document>>>;

    /// All documents in a collection, in store order.
    fn list<'a>(&'a self, collection: &'a str) -> BoxFuture<'a, Result<Vec<Document>>>;

    /// Delete a document by id.
    fn delete_by_id<'a>(&'a self, collection: &'a str, id: &'a str) -> BoxFuture<'a, Result<()>>;

    /// Merge `fields` into an existing document.
    ///
    /// Fails with [`AppError::NotFound`] if the document does not exist.
    fn update<'a>(
        &'a self,
        collection: &'a str,
        id: &'a str,
        fields: Fields,
    ) -> BoxFuture<'a, Result<()>>;
}
