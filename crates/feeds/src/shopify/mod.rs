//! Shopify Admin API client for feed exports.
//!
//! # Architecture
//!
//! - Queries are fixed GraphQL documents sent as `{query, variables}` with
//!   `reqwest`; responses are untyped JSON reshaped structurally (see
//!   [`flatten_edges`]), so no schema codegen is involved
//! - Cursor pagination is followed strictly sequentially; each page's cursor
//!   comes from the previous response
//! - No caching, no retries: a failed upstream call aborts the whole fetch

mod admin;
mod edges;
mod feeds;

pub use admin::{AdminClient, QueryPayload};
pub use edges::flatten_edges;
pub use feeds::{
    CollectionRecord, ProductRecord, VariantProduct, VariantRecord, fetch_collections,
    fetch_products, fetch_variants,
};

use thiserror::Error;

/// Errors that can occur when interacting with the Shopify Admin API.
#[derive(Debug, Error)]
pub enum AdminApiError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A feed item did not match the expected node shape.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The response carried no `data` envelope; `body` is the raw upstream
    /// body for diagnostics (GraphQL errors, auth failures, HTML error pages).
    #[error("unexpected Shopify response: {body}")]
    Upstream { body: String },

    /// The `data` envelope lacked a `results` connection.
    #[error("Shopify response missing `results`: {body}")]
    MissingResults { body: String },

    /// The upstream kept reporting `hasNextPage` past the hard cap.
    #[error("pagination exceeded {0} pages")]
    PageLimitExceeded(usize),
}
