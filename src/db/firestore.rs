// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore-backed document store.
//!
//! Documents are read as untyped JSON maps. The Firestore deserializer adds
//! `_firestore_*` metadata keys to every document; the id is taken from
//! `_firestore_id` and the rest are dropped.

use super::{new_document_id, Document, DocumentStore, Fields};
use crate::error::{AppError, Result};
use firestore::errors::FirestoreError;
use firestore::FirestoreWritePrecondition;
use futures_util::future::BoxFuture;
use serde_json::Value;

const FIRESTORE_ID_KEY: &str = "_firestore_id";
const FIRESTORE_META_PREFIX: &str = "_firestore_";

/// Document store backed by Cloud Firestore.
#[derive(Clone)]
pub struct FirestoreStore {
    client: firestore::FirestoreDb,
}

impl FirestoreStore {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self> {
        // The emulator rejects real credentials lookups; use an unauthenticated connection
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id).await.map_err(|e| {
            AppError::Internal(anyhow::anyhow!("Failed to connect to Firestore: {}", e))
        })?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self { client })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Internal(anyhow::anyhow!(
                "Failed to connect to Firestore Emulator: {}",
                e
            ))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self { client })
    }
}

/// Split Firestore metadata out of a deserialized document map.
fn into_document(mut raw: Fields) -> Result<Document> {
    let id = match raw.remove(FIRESTORE_ID_KEY) {
        Some(Value::String(id)) => id,
        _ => {
            return Err(AppError::StoreRead(
                "Document returned without an id".to_string(),
            ))
        }
    };
    raw.retain(|key, _| !key.starts_with(FIRESTORE_META_PREFIX));
    Ok(Document { id, fields: raw })
}

fn into_documents(raw: Vec<Fields>) -> Result<Vec<Document>> {
    raw.into_iter().map(into_document).collect()
}

fn read_error(e: FirestoreError) -> AppError {
    AppError::StoreRead(e.to_string())
}

fn write_error(e: FirestoreError) -> AppError {
    AppError::StoreWrite(e.to_string())
}

impl DocumentStore for FirestoreStore {
    fn insert<'a>(&'a self, collection: &'a str, fields: Fields) -> BoxFuture<'a, Result<String>> {
        Box::pin(async move {
            let id = new_document_id()?;
            let _: () = self
                .client
                .fluent()
                .insert()
                .into(collection)
                .document_id(&id)
                .object(&fields)
                .execute()
                .await
                .map_err(write_error)?;
            Ok(id)
        })
    }

    fn get_by_id<'a>(
        &'a self,
        collection: &'a str,
        id: &'a str,
    ) -> BoxFuture<'a, Result<Option<Document>>> {
        Box::pin(async move {
            let raw: Option<Fields> = self
                .client
                .fluent()
                .select()
                .by_id_in(collection)
                .obj()
                .one(id)
                .await
                .map_err(read_error)?;
            raw.map(into_document).transpose()
        })
    }

    fn query_equals<'a>(
        &'a self,
        collection: &'a str,
        field: &'a str,
        value: &'a str,
    ) -> BoxFuture<'a, Result<Vec<Document>>> {
        Box::pin(async move {
            let raw: Vec<Fields> = self
                .client
                .fluent()
                .select()
                .from(collection)
                .filter(move |q| q.field(field).eq(value))
                .obj()
                .query()
                .await
                .map_err(read_error)?;
            into_documents(raw)
        })
    }

    fn list<'a>(&'a self, collection: &'a str) -> BoxFuture<'a, Result<Vec<Document>>> {
        Box::pin(async move {
            let raw: Vec<Fields> = self
                .client
                .fluent()
                .select()
                .from(collection)
                .obj()
                .query()
                .await
                .map_err(read_error)?;
            into_documents(raw)
        })
    }

    fn delete_by_id<'a>(&'a self, collection: &'a str, id: &'a str) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            self.client
                .fluent()
                .delete()
                .from(collection)
                .document_id(id)
                .execute()
                .await
                .map_err(write_error)?;
            Ok(())
        })
    }

    fn update<'a>(
        &'a self,
        collection: &'a str,
        id: &'a str,
        fields: Fields,
    ) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            let paths: Vec<String> = fields.keys().cloned().collect();
            let result: std::result::Result<(), FirestoreError> = self
                .client
                .fluent()
                .update()
                .fields(paths)
                .in_col(collection)
                .precondition(FirestoreWritePrecondition::Exists(true))
                .document_id(id)
                .object(&fields)
                .execute()
                .await;

            match result {
                Ok(()) => Ok(()),
                Err(FirestoreError::DataNotFoundError(_)) => Err(AppError::NotFound(format!(
                    "Document {}/{} not found",
                    collection, id
                ))),
                Err(e) => Err(write_error(e)),
            }
        })
    }
}
