//! Feed endpoint handlers.
//!
//! Each handler is a direct passthrough: resolve credentials for the
//! requested store, build a client, invoke the fetcher, serialize the
//! result as a JSON array.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use tracing::instrument;

use crate::config::ShopifyCredentials;
use crate::error::Result;
use crate::shopify::{
    self, AdminClient, CollectionRecord, ProductRecord, VariantRecord,
};
use crate::state::AppState;

/// Query parameters accepted by every feed endpoint.
#[derive(Debug, Deserialize)]
pub struct FeedQuery {
    /// Credential-set suffix for multi-store setups.
    pub store: Option<String>,
}

/// Serve all published products.
#[instrument(skip(state))]
pub async fn products(
    State(state): State<AppState>,
    Query(query): Query<FeedQuery>,
) -> Result<Json<Vec<ProductRecord>>> {
    let client = admin_client(&state, query.store.as_deref())?;
    Ok(Json(shopify::fetch_products(&client).await?))
}

/// Serve all variants, deduplicated by SKU.
#[instrument(skip(state))]
pub async fn variants(
    State(state): State<AppState>,
    Query(query): Query<FeedQuery>,
) -> Result<Json<Vec<VariantRecord>>> {
    let client = admin_client(&state, query.store.as_deref())?;
    let disable_published_check = state.config().disable_published_check;
    Ok(Json(
        shopify::fetch_variants(&client, disable_published_check).await?,
    ))
}

/// Serve all collections.
#[instrument(skip(state))]
pub async fn collections(
    State(state): State<AppState>,
    Query(query): Query<FeedQuery>,
) -> Result<Json<Vec<CollectionRecord>>> {
    let client = admin_client(&state, query.store.as_deref())?;
    Ok(Json(shopify::fetch_collections(&client).await?))
}

/// Resolve credentials for the requested store and build a client.
///
/// Runs per request: the `store` suffix arrives with the request, so there
/// is no process-wide credential set to validate at startup.
fn admin_client(state: &AppState, store: Option<&str>) -> Result<AdminClient> {
    let credentials = ShopifyCredentials::resolve(store)?;
    Ok(AdminClient::new(
        &credentials,
        &state.config().api_version,
    ))
}
