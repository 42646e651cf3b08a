//! Shopify Admin API GraphQL client.
//!
//! Holds the endpoint and access token for one store; constructed per
//! request from credentials the endpoint layer resolved (the store suffix is
//! part of the request, so there is no process-wide client).

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::instrument;

use super::AdminApiError;
use super::edges::flatten_edges;
use crate::config::ShopifyCredentials;

/// Hard cap on sequential page fetches. A healthy store stays far below
/// this; an upstream that never clears `hasNextPage` would otherwise loop
/// forever.
const MAX_PAGES: usize = 1000;

/// A GraphQL query with its variables, sent as `{query, variables}`.
///
/// Immutable per page except for the `cursor` variable the paginator
/// injects between pages.
#[derive(Debug, Clone, Serialize)]
pub struct QueryPayload {
    query: &'static str,
    variables: Map<String, Value>,
}

impl QueryPayload {
    #[must_use]
    pub fn new(query: &'static str) -> Self {
        Self {
            query,
            variables: Map::new(),
        }
    }

    /// Merge the pagination cursor into the variables, preserving the rest.
    fn set_cursor(&mut self, cursor: Value) {
        self.variables.insert("cursor".to_string(), cursor);
    }
}

/// Shopify Admin API GraphQL client.
#[derive(Clone)]
pub struct AdminClient {
    inner: Arc<AdminClientInner>,
}

struct AdminClientInner {
    client: reqwest::Client,
    endpoint: String,
    access_token: SecretString,
}

impl AdminClient {
    /// Create a client for the store the given credentials belong to.
    #[must_use]
    pub fn new(credentials: &ShopifyCredentials, api_version: &str) -> Self {
        let endpoint = format!(
            "{}/admin/api/{}/graphql.json",
            credentials.url().trim_end_matches('/'),
            api_version
        );

        Self {
            inner: Arc::new(AdminClientInner {
                client: reqwest::Client::new(),
                endpoint,
                access_token: credentials.access_token().clone(),
            }),
        }
    }

    /// Execute a single GraphQL query and unwrap the `data` envelope.
    ///
    /// # Errors
    ///
    /// Returns `AdminApiError::Http` if the transport fails, or
    /// `AdminApiError::Upstream` carrying the raw body if the response is
    /// non-2xx, unparseable, or has no `data` (Shopify reports query and
    /// auth errors this way with a 200 status).
    #[instrument(skip(self, payload))]
    pub async fn execute(&self, payload: &QueryPayload) -> Result<Value, AdminApiError> {
        let response = self
            .inner
            .client
            .post(&self.inner.endpoint)
            .header("X-Shopify-Access-Token", self.inner.access_token.expose_secret())
            .header("Content-Type", "application/json")
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Shopify API returned non-success status"
            );
            return Err(AdminApiError::Upstream { body });
        }

        let Ok(mut json) = serde_json::from_str::<Value>(&body) else {
            return Err(AdminApiError::Upstream { body });
        };

        match json.get_mut("data") {
            Some(data) if !data.is_null() => Ok(data.take()),
            _ => Err(AdminApiError::Upstream { body }),
        }
    }

    /// Execute a query and follow `pageInfo` cursors until exhausted.
    ///
    /// Each page's `results` connection is flattened and its items appended
    /// in page order. Pages are fetched strictly sequentially: the next
    /// request's cursor only exists once the previous response arrives.
    ///
    /// # Errors
    ///
    /// Propagates `execute` errors, returns `AdminApiError::MissingResults`
    /// if a page has no `results` list, and `AdminApiError::PageLimitExceeded`
    /// if the upstream still reports another page after [`MAX_PAGES`] fetches.
    #[instrument(skip(self, payload))]
    pub async fn paginate(&self, mut payload: QueryPayload) -> Result<Vec<Value>, AdminApiError> {
        let mut items = Vec::new();

        for _ in 0..MAX_PAGES {
            let data = self.execute(&payload).await?;
            let cursor = next_cursor(&data);

            let mut page = flatten_edges(data);
            match page.get_mut("results").map(Value::take) {
                Some(Value::Array(page_items)) => items.extend(page_items),
                _ => {
                    return Err(AdminApiError::MissingResults {
                        body: page.to_string(),
                    });
                }
            }

            match cursor {
                Some(cursor) => payload.set_cursor(cursor),
                None => return Ok(items),
            }
        }

        Err(AdminApiError::PageLimitExceeded(MAX_PAGES))
    }
}

/// Read the cursor for the next page from an unflattened `data` envelope.
///
/// Returns `None` when `pageInfo` is absent or `hasNextPage` is not `true`,
/// which ends pagination.
fn next_cursor(data: &Value) -> Option<Value> {
    let page_info = data.get("results")?.get("pageInfo")?;
    if page_info
        .get("hasNextPage")
        .and_then(Value::as_bool)
        .unwrap_or(false)
    {
        Some(page_info.get("endCursor").cloned().unwrap_or(Value::Null))
    } else {
        None
    }
}
