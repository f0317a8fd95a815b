//! Document-store client.
//!
//! The boundary contract with the hosted store is small: query a named
//! collection (optionally filtered by equality on one field, ordered by one
//! field descending, limited to N documents), create a document, and merge a
//! partial field update into an existing document. Nothing here retries;
//! failures surface as [`Error::Store`](crate::error::Error) and the caller
//! decides whether to re-trigger.

mod document;

pub use document::{ArrayValue, Document, FieldValue, LatLng, MapValue};

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use url::Url;

use crate::error::Error;
use crate::fetch::Fetch;

/// Client for one named collection in the document store
#[derive(Debug, Clone)]
pub struct CollectionClient {
    /// Database root URL (everything before `/documents`)
    base_url: String,

    /// API key sent with every request
    api_key: String,

    /// The collection name
    collection: String,

    /// HTTP client used for requests
    http_client: Client,

    /// Access token of the signed-in user, if any
    auth_token: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct CollectionSelector {
    collection_id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct FieldReference {
    field_path: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct FieldFilter {
    field: FieldReference,
    op: String,
    value: FieldValue,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct Filter {
    field_filter: FieldFilter,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct OrderBy {
    field: FieldReference,
    direction: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct StructuredQuery {
    from: Vec<CollectionSelector>,
    #[serde(rename = "where", skip_serializing_if = "Option::is_none")]
    filter: Option<Filter>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    order_by: Vec<OrderBy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    limit: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct RunQueryRequest {
    structured_query: StructuredQuery,
}

/// One entry of a query response; trailing entries may carry no document
#[derive(Debug, Deserialize)]
struct RunQueryEntry {
    #[serde(default)]
    document: Option<Document>,
}

/// Builder for a collection query
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    base_url: String,
    api_key: String,
    auth_token: Option<String>,
    http_client: Client,
    query: StructuredQuery,
}

impl QueryBuilder {
    /// Filter to documents where `field` equals `value`
    pub fn filter_eq(mut self, field: &str, value: FieldValue) -> Self {
        self.query.filter = Some(Filter {
            field_filter: FieldFilter {
                field: FieldReference {
                    field_path: field.to_string(),
                },
                op: "EQUAL".to_string(),
                value,
            },
        });
        self
    }

    /// Order results by `field`, newest first
    pub fn order_by_desc(mut self, field: &str) -> Self {
        self.query.order_by = vec![OrderBy {
            field: FieldReference {
                field_path: field.to_string(),
            },
            direction: "DESCENDING".to_string(),
        }];
        self
    }

    /// Limit the number of documents returned
    pub fn limit(mut self, count: u32) -> Self {
        self.query.limit = Some(count);
        self
    }

    fn request_body(&self) -> RunQueryRequest {
        RunQueryRequest {
            structured_query: self.query.clone(),
        }
    }

    /// Execute the query and return the matching documents
    pub async fn run(&self) -> Result<Vec<Document>, Error> {
        let url = format!("{}/documents:runQuery", self.base_url);

        let mut fetch = Fetch::post(&self.http_client, &url)
            .header("apikey", &self.api_key)
            .json(&self.request_body())?;
        if let Some(token) = &self.auth_token {
            fetch = fetch.bearer_auth(token);
        }

        let entries = fetch.execute::<Vec<RunQueryEntry>>().await?;
        Ok(entries.into_iter().filter_map(|e| e.document).collect())
    }
}

impl CollectionClient {
    /// Create a new collection client
    pub(crate) fn new(
        base_url: &str,
        api_key: &str,
        collection: &str,
        http_client: Client,
    ) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            collection: collection.to_string(),
            http_client,
            auth_token: None,
        }
    }

    /// Attach the signed-in user's access token to subsequent requests
    pub fn with_auth(mut self, token: &str) -> Self {
        self.auth_token = Some(token.to_string());
        self
    }

    /// The collection name this client targets
    pub fn collection(&self) -> &str {
        &self.collection
    }

    fn document_url(&self, id: &str) -> String {
        format!("{}/documents/{}/{}", self.base_url, self.collection, id)
    }

    /// Start building a query against this collection
    pub fn query(&self) -> QueryBuilder {
        QueryBuilder {
            base_url: self.base_url.clone(),
            api_key: self.api_key.clone(),
            auth_token: self.auth_token.clone(),
            http_client: self.http_client.clone(),
            query: StructuredQuery {
                from: vec![CollectionSelector {
                    collection_id: self.collection.clone(),
                }],
                filter: None,
                order_by: Vec::new(),
                limit: None,
            },
        }
    }

    /// Fetch a single document by id
    pub async fn get(&self, id: &str) -> Result<Document, Error> {
        let mut fetch = Fetch::get(&self.http_client, &self.document_url(id))
            .header("apikey", &self.api_key);
        if let Some(token) = &self.auth_token {
            fetch = fetch.bearer_auth(token);
        }
        fetch.execute::<Document>().await
    }

    /// Create a new document; the store assigns the id
    pub async fn create(
        &self,
        fields: HashMap<String, FieldValue>,
    ) -> Result<Document, Error> {
        let url = format!("{}/documents/{}", self.base_url, self.collection);
        let body = Document {
            fields,
            ..Default::default()
        };

        let mut fetch = Fetch::post(&self.http_client, &url)
            .header("apikey", &self.api_key)
            .json(&body)?;
        if let Some(token) = &self.auth_token {
            fetch = fetch.bearer_auth(token);
        }
        fetch.execute::<Document>().await
    }

    /// Merge a partial field update into an existing document.
    ///
    /// Only the listed fields are touched (update mask), and the update
    /// requires the document to exist, so a create is never issued by
    /// accident.
    pub async fn update(
        &self,
        id: &str,
        fields: HashMap<String, FieldValue>,
    ) -> Result<Document, Error> {
        let mut url = Url::parse(&self.document_url(id))?;
        {
            let mut pairs = url.query_pairs_mut();
            let mut paths: Vec<&String> = fields.keys().collect();
            paths.sort();
            for path in paths {
                pairs.append_pair("updateMask.fieldPaths", path);
            }
            pairs.append_pair("currentDocument.exists", "true");
        }

        let body = Document {
            fields,
            ..Default::default()
        };

        let mut fetch = Fetch::patch(&self.http_client, url.as_str())
            .header("apikey", &self.api_key)
            .json(&body)?;
        if let Some(token) = &self.auth_token {
            fetch = fetch.bearer_auth(token);
        }
        fetch.execute::<Document>().await
    }
}
