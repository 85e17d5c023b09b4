// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper for read-only collection export.

use crate::db::convert;
use crate::error::BackupError;
use crate::models::ServiceCredential;
use crate::services::CollectionExporter;
use futures_util::future::{FutureExt, LocalBoxFuture};
use futures_util::TryStreamExt;
use serde_json::{Map, Value};

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a Firestore client authenticated with a service-account key.
    ///
    /// The project comes from the credential unless `project_override` is set.
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn connect(
        credential: &ServiceCredential,
        project_override: Option<&str>,
    ) -> Result<Self, BackupError> {
        let project_id = project_override.unwrap_or(&credential.project_id);

        // If the emulator environment variable is set, use unauthenticated connection
        // so the real key is never sent to a local endpoint.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());
        let client = firestore::FirestoreDb::with_options_service_account_key_file(
            options,
            credential.path.clone(),
        )
        .await
            .map_err(|e| BackupError::Connect(e.to_string()))?;

        tracing::info!(
            project = project_id,
            client_email = %credential.client_email,
            "Connected to Firestore"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, BackupError> {
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
        .map_err(|e| BackupError::Connect(format!("Firestore Emulator: {}", e)))?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, String> {
        self.client
            .as_ref()
            .ok_or_else(|| "Database not connected (offline mode)".to_string())
    }

    /// Read every document of a top-level collection.
    ///
    /// Returns an object keyed by document ID, each value holding that
    /// document's fields. Documents arrive ordered by ID. Subcollections are
    /// exported recursively under each document's `subCollection` key.
    pub async fn export_collection(&self, collection: &str) -> Result<Value, BackupError> {
        let client = self
            .get_client()
            .map_err(|e| BackupError::export(collection, e))?;

        let exported = export_documents(client, None, collection)
            .await
            .map_err(|e| BackupError::export(collection, e))?;

        tracing::debug!(collection, documents = exported.len(), "Collection exported");

        Ok(Value::Object(exported))
    }

    /// Write a top-level document. Used to seed the emulator in tests.
    pub async fn put_document<T>(
        &self,
        collection: &str,
        document_id: &str,
        object: &T,
    ) -> Result<(), BackupError>
    where
        T: serde::Serialize + Sync + Send + for<'de> serde::Deserialize<'de>,
    {
        self.put(None, collection, document_id, object).await
    }

    /// Write a document into a subcollection of `parent_collection/parent_id`.
    pub async fn put_nested_document<T>(
        &self,
        (parent_collection, parent_id): (&str, &str),
        collection: &str,
        document_id: &str,
        object: &T,
    ) -> Result<(), BackupError>
    where
        T: serde::Serialize + Sync + Send + for<'de> serde::Deserialize<'de>,
    {
        let client = self.get_client().map_err(BackupError::Database)?;
        let parent = format!(
            "{}/{}/{}",
            client.get_documents_path(),
            parent_collection,
            parent_id
        );
        self.put(Some(&parent), collection, document_id, object).await
    }

    async fn put<T>(
        &self,
        parent: Option<&str>,
        collection: &str,
        document_id: &str,
        object: &T,
    ) -> Result<(), BackupError>
    where
        T: serde::Serialize + Sync + Send + for<'de> serde::Deserialize<'de>,
    {
        let builder = self
            .get_client()
            .map_err(BackupError::Database)?
            .fluent()
            .update()
            .in_col(collection)
            .document_id(document_id);
        let builder = match parent {
            Some(parent) => builder.parent(parent),
            None => builder,
        };

        let _: () = builder
            .object(object)
            .execute()
            .await
            .map_err(|e| BackupError::Database(e.to_string()))?;
        Ok(())
    }
}

/// Export all documents of `collection` under `parent` (the database root
/// when `None`), descending into each document's subcollections.
fn export_documents<'a>(
    client: &'a firestore::FirestoreDb,
    parent: Option<&'a str>,
    collection: &'a str,
) -> LocalBoxFuture<'a, Result<Map<String, Value>, String>> {
    async move {
        let query = client.fluent().select().from(collection);
        let query = match parent {
            Some(parent) => query.parent(parent),
            None => query,
        };
        let mut docs = query
            .stream_query_with_errors()
            .await
            .map_err(|e| e.to_string())?;

        let mut exported = Map::new();
        while let Some(doc) = docs.try_next().await.map_err(|e| e.to_string())? {
            let mut fields = convert::document_to_json(&doc);
            let nested = export_subcollections(client, &doc.name).await?;
            convert::attach_subcollections(&mut fields, nested);

            exported.insert(convert::document_id(&doc.name).to_string(), fields);
        }

        Ok(exported)
    }
    .boxed_local()
}

/// Export every subcollection of the document named `document_name`,
/// keyed by subcollection ID.
async fn export_subcollections(
    client: &firestore::FirestoreDb,
    document_name: &str,
) -> Result<Map<String, Value>, String> {
    let mut ids = client
        .fluent()
        .list()
        .collections()
        .parent(document_name)
        .stream_all_with_errors()
        .await
        .map_err(|e| e.to_string())?;

    let mut nested = Map::new();
    while let Some(id) = ids.try_next().await.map_err(|e| e.to_string())? {
        let docs = export_documents(client, Some(document_name), &id).await?;
        nested.insert(id, Value::Object(docs));
    }

    Ok(nested)
}

impl CollectionExporter for FirestoreDb {
    async fn export(&self, collection: &str) -> Result<Value, BackupError> {
        self.export_collection(collection).await
    }
}
