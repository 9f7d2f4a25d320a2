// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process document store.
//!
//! Used for local development and to exercise the repository without a
//! Firestore emulator. Supports injected failures, an optional per-call
//! latency, and a journal of every call it served.

use super::{new_document_id, Document, DocumentStore, Fields};
use crate::error::{AppError, Result};
use dashmap::{DashMap, DashSet};
use futures_util::future::BoxFuture;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Store primitive, used for fault injection and the call journal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    Insert,
    Get,
    Query,
    List,
    Delete,
    Update,
}

impl StoreOp {
    fn is_write(self) -> bool {
        matches!(self, StoreOp::Insert | StoreOp::Delete | StoreOp::Update)
    }
}

/// One call served by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreCall {
    pub op: StoreOp,
    pub collection: String,
    /// Document id for get/delete/update/insert, queried value for queries
    pub target: Option<String>,
    pub failed: bool,
}

type FaultKey = (StoreOp, String, Option<String>);

/// In-memory document store. Clones share the same data.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    collections: DashMap<String, BTreeMap<String, Fields>>,
    faults: DashSet<FaultKey>,
    journal: Mutex<Vec<StoreCall>>,
    mutations: AtomicUsize,
    deletes_in_flight: AtomicUsize,
    peak_deletes_in_flight: AtomicUsize,
    latency: Mutex<Option<Duration>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every call by `latency` before it takes effect.
    pub fn set_latency(&self, latency: Option<Duration>) {
        *lock(&self.inner.latency) = latency;
    }

    /// Make every `op` against `collection` fail.
    pub fn fail_on(&self, op: StoreOp, collection: &str) {
        self.inner.faults.insert((op, collection.to_string(), None));
    }

    /// Make `op` against one document fail.
    pub fn fail_on_document(&self, op: StoreOp, collection: &str, id: &str) {
        self.inner
            .faults
            .insert((op, collection.to_string(), Some(id.to_string())));
    }

    /// Remove all injected faults.
    pub fn clear_faults(&self) {
        self.inner.faults.clear();
    }

    /// Insert a document with a caller-chosen id, bypassing journal and faults.
    pub fn seed(&self, collection: &str, id: &str, fields: Fields) {
        self.inner
            .collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), fields);
    }

    /// Whether a document currently exists.
    pub fn contains(&self, collection: &str, id: &str) -> bool {
        self.inner
            .collections
            .get(collection)
            .is_some_and(|docs| docs.contains_key(id))
    }

    /// Number of documents in a collection.
    pub fn len(&self, collection: &str) -> usize {
        self.inner
            .collections
            .get(collection)
            .map_or(0, |docs| docs.len())
    }

    /// Copy of every collection, for comparing whole-store states.
    pub fn snapshot(&self) -> BTreeMap<String, BTreeMap<String, Fields>> {
        self.inner
            .collections
            .iter()
            .filter(|entry| !entry.value().is_empty())
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }

    /// Calls that changed stored state.
    pub fn mutations(&self) -> usize {
        self.inner.mutations.load(Ordering::SeqCst)
    }

    /// Highest number of deletions observed in flight at once.
    pub fn peak_deletes_in_flight(&self) -> usize {
        self.inner.peak_deletes_in_flight.load(Ordering::SeqCst)
    }

    /// Every call served so far, in arrival order.
    pub fn calls(&self) -> Vec<StoreCall> {
        lock(&self.inner.journal).clone()
    }

    /// Calls of one kind against one collection.
    pub fn calls_to(&self, op: StoreOp, collection: &str) -> Vec<StoreCall> {
        self.calls()
            .into_iter()
            .filter(|call| call.op == op && call.collection == collection)
            .collect()
    }

    /// Simulate latency, consult injected faults and journal the call.
    async fn begin(&self, op: StoreOp, collection: &str, target: Option<&str>) -> Result<()> {
        let latency = *lock(&self.inner.latency);
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        let faulted = self
            .inner
            .faults
            .contains(&(op, collection.to_string(), None))
            || target.is_some_and(|t| {
                self.inner
                    .faults
                    .contains(&(op, collection.to_string(), Some(t.to_string())))
            });

        lock(&self.inner.journal).push(StoreCall {
            op,
            collection: collection.to_string(),
            target: target.map(str::to_string),
            failed: faulted,
        });

        if !faulted {
            return Ok(());
        }

        let message = format!(
            "Injected {:?} failure on {}/{}",
            op,
            collection,
            target.unwrap_or("*")
        );
        tracing::debug!(%message, "Memory store fault");
        if op.is_write() {
            Err(AppError::StoreWrite(message))
        } else {
            Err(AppError::StoreRead(message))
        }
    }

    fn record_mutation(&self) {
        self.inner.mutations.fetch_add(1, Ordering::SeqCst);
    }

    fn documents(&self, collection: &str, filter: impl Fn(&Fields) -> bool) -> Vec<Document> {
        self.inner
            .collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|(_, fields)| filter(fields))
                    .map(|(id, fields)| Document {
                        id: id.clone(),
                        fields: fields.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    // A panicking test thread must not take the store down with it
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Tracks one in-flight deletion for peak concurrency accounting.
struct InFlight<'a>(&'a Inner);

impl<'a> InFlight<'a> {
    fn enter(inner: &'a Inner) -> Self {
        let now = inner.deletes_in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        inner.peak_deletes_in_flight.fetch_max(now, Ordering::SeqCst);
        Self(inner)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.deletes_in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

impl DocumentStore for MemoryStore {
    fn insert<'a>(&'a self, collection: &'a str, fields: Fields) -> BoxFuture<'a, Result<String>> {
        Box::pin(async move {
            let id = new_document_id()?;
            self.begin(StoreOp::Insert, collection, Some(&id)).await?;
            self.seed(collection, &id, fields);
            self.record_mutation();
            Ok(id)
        })
    }

    fn get_by_id<'a>(
        &'a self,
        collection: &'a str,
        id: &'a str,
    ) -> BoxFuture<'a, Result<Option<Document>>> {
        Box::pin(async move {
            self.begin(StoreOp::Get, collection, Some(id)).await?;
            let doc = self.inner.collections.get(collection).and_then(|docs| {
                docs.get(id).map(|fields| Document {
                    id: id.to_string(),
                    fields: fields.clone(),
                })
            });
            Ok(doc)
        })
    }

    fn query_equals<'a>(
        &'a self,
        collection: &'a str,
        field: &'a str,
        value: &'a str,
    ) -> BoxFuture<'a, Result<Vec<Document>>> {
        Box::pin(async move {
            self.begin(StoreOp::Query, collection, Some(value)).await?;
            Ok(self.documents(collection, |fields| {
                fields.get(field).and_then(|v| v.as_str()) == Some(value)
            }))
        })
    }

    fn list<'a>(&'a self, collection: &'a str) -> BoxFuture<'a, Result<Vec<Document>>> {
        Box::pin(async move {
            self.begin(StoreOp::List, collection, None).await?;
            Ok(self.documents(collection, |_| true))
        })
    }

    fn delete_by_id<'a>(&'a self, collection: &'a str, id: &'a str) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            let _in_flight = InFlight::enter(&self.inner);
            self.begin(StoreOp::Delete, collection, Some(id)).await?;
            let removed = self
                .inner
                .collections
                .get_mut(collection)
                .and_then(|mut docs| docs.remove(id));
            if removed.is_some() {
                self.record_mutation();
            }
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
            self.begin(StoreOp::Update, collection, Some(id)).await?;
            let mut docs = self
                .inner
                .collections
                .get_mut(collection)
                .ok_or_else(|| not_found(collection, id))?;
            let doc = docs.get_mut(id).ok_or_else(|| not_found(collection, id))?;
            doc.extend(fields);
            drop(docs);
            self.record_mutation();
            Ok(())
        })
    }
}

fn not_found(collection: &str, id: &str) -> AppError {
    AppError::NotFound(format!("Document {}/{} not found", collection, id))
}
