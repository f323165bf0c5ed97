//! Cloud Firestore backend
//!
//! Talks to the Firestore REST API (`documents:runQuery`) and decodes its
//! typed values into plain JSON.

use super::traits::{Document, DocumentStore, RangeQuery, StoreError};
use crate::config::FirestoreSettings;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Firestore REST client scoped to one database
#[derive(Clone)]
pub struct FirestoreStore {
    client: Client,
    endpoint: Url,
    access_token: Option<String>,
}

impl FirestoreStore {
    /// Create a client from settings
    pub fn with_settings(settings: &FirestoreSettings) -> Result<Self> {
        let endpoint = Self::run_query_url(settings)?;

        let client = Client::builder()
            .timeout(Duration::from_millis(settings.request_timeout_ms))
            .gzip(true)
            .brotli(true)
            .build()
            .context("failed to build Firestore HTTP client")?;

        Ok(Self {
            client,
            endpoint,
            access_token: settings.access_token.clone(),
        })
    }

    /// `{base}/projects/{project}/databases/{database}/documents:runQuery`
    pub fn run_query_url(settings: &FirestoreSettings) -> Result<Url> {
        let raw = format!(
            "{}/projects/{}/databases/{}/documents:runQuery",
            settings.base_url.trim_end_matches('/'),
            settings.project_id,
            settings.database
        );
        Url::parse(&raw).with_context(|| format!("invalid Firestore endpoint: {}", raw))
    }

    /// Runquery request body for a range query
    pub fn structured_query(query: &RangeQuery) -> Value {
        let bound = |op: &str, value: &str| {
            json!({
                "fieldFilter": {
                    "field": { "fieldPath": query.field },
                    "op": op,
                    "value": { "stringValue": value }
                }
            })
        };

        json!({
            "structuredQuery": {
                "from": [{ "collectionId": query.collection }],
                "where": {
                    "compositeFilter": {
                        "op": "AND",
                        "filters": [
                            bound("GREATER_THAN_OR_EQUAL", &query.start),
                            bound("LESS_THAN_OR_EQUAL", &query.end)
                        ]
                    }
                },
                "orderBy": [{
                    "field": { "fieldPath": query.field },
                    "direction": "ASCENDING"
                }],
                "limit": query.limit
            }
        })
    }

    /// Map an error response onto the store error taxonomy
    fn status_error(status: StatusCode, body: &str) -> StoreError {
        let message = error_message(body).unwrap_or_else(|| status.to_string());
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                StoreError::PermissionDenied(message)
            }
            StatusCode::BAD_REQUEST | StatusCode::NOT_FOUND | StatusCode::PRECONDITION_FAILED => {
                StoreError::InvalidQuery(message)
            }
            _ => StoreError::Unavailable(format!("{}: {}", status, message)),
        }
    }
}

#[async_trait]
impl DocumentStore for FirestoreStore {
    fn name(&self) -> &str {
        "firestore"
    }

    async fn range_query(&self, query: &RangeQuery) -> Result<Vec<Document>, StoreError> {
        let mut request = self
            .client
            .post(self.endpoint.clone())
            .json(&Self::structured_query(query));

        if let Some(ref token) = self.access_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!(
                "Firestore query on {} failed with {}",
                query.collection, status
            );
            return Err(Self::status_error(status, &body));
        }

        let items: Vec<RunQueryItem> = serde_json::from_str(&body)
            .map_err(|e| StoreError::Malformed(e.to_string()))?;

        let documents: Vec<Document> = items
            .into_iter()
            .filter_map(|item| item.document)
            .map(RawDocument::into_document)
            .collect();

        debug!(
            "Firestore returned {} documents from {}",
            documents.len(),
            query.collection
        );

        Ok(documents)
    }
}

/// One element of the runQuery response stream
#[derive(Debug, Deserialize)]
struct RunQueryItem {
    document: Option<RawDocument>,
}

#[derive(Debug, Deserialize)]
struct RawDocument {
    /// `projects/{p}/databases/{d}/documents/{collection}/{id}`
    name: String,
    #[serde(default)]
    fields: Map<String, Value>,
}

impl RawDocument {
    fn into_document(self) -> Document {
        let id = self
            .name
            .rsplit('/')
            .next()
            .unwrap_or(self.name.as_str())
            .to_string();

        let fields = self
            .fields
            .iter()
            .map(|(key, value)| (key.clone(), decode_value(value)))
            .collect();

        Document { id, fields }
    }
}

/// Convert a Firestore typed value into plain JSON
fn decode_value(value: &Value) -> Value {
    let Some(object) = value.as_object() else {
        return Value::Null;
    };

    if let Some(s) = object.get("stringValue") {
        return s.clone();
    }
    if let Some(i) = object.get("integerValue") {
        // Int64 values arrive as strings
        return match i {
            Value::String(s) => s.parse::<i64>().map(Value::from).unwrap_or_else(|_| i.clone()),
            other => other.clone(),
        };
    }
    if let Some(d) = object.get("doubleValue") {
        return d.clone();
    }
    if let Some(b) = object.get("booleanValue") {
        return b.clone();
    }
    if let Some(t) = object.get("timestampValue") {
        return t.clone();
    }
    if let Some(r) = object.get("referenceValue") {
        return r.clone();
    }
    if let Some(map) = object.get("mapValue") {
        let fields = map
            .get("fields")
            .and_then(Value::as_object)
            .map(|fields| {
                fields
                    .iter()
                    .map(|(k, v)| (k.clone(), decode_value(v)))
                    .collect::<Map<_, _>>()
            })
            .unwrap_or_default();
        return Value::Object(fields);
    }
    if let Some(array) = object.get("arrayValue") {
        let values = array
            .get("values")
            .and_then(Value::as_array)
            .map(|values| values.iter().map(decode_value).collect())
            .unwrap_or_default();
        return Value::Array(values);
    }

    Value::Null
}

/// Pull `error.message` out of a Google API error body
fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let error = match &value {
        Value::Array(items) => items.first()?.get("error")?,
        other => other.get("error")?,
    };
    error.get("message")?.as_str().map(String::from)
}
