//! Feed fetchers: products, variants, and collections.
//!
//! Each fetcher drives one GraphQL document through the paginator, then
//! applies its post-processing: the published-channel filter for products,
//! the SKU filter/dedupe pipeline for variants, nothing for collections.
//! Fields queried only for filtering (`status`,
//! `publishedOnCurrentPublication`) never appear in the output records.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::admin::{AdminClient, QueryPayload};
use super::AdminApiError;

const PRODUCTS_QUERY: &str = "query getProducts($cursor: String) {
    results: products(first: 250, after: $cursor) {
        edges {
            node {
                title
                handle
                publishedOnCurrentPublication
            }
        }
        pageInfo {
            hasNextPage
            endCursor
        }
    }
}";

const VARIANTS_QUERY: &str = "query getVariants($cursor: String) {
    results: productVariants(first: 250, after: $cursor) {
        edges {
            node {
                title
                sku
                product {
                    title
                    handle
                    status
                    publishedOnCurrentPublication
                }
            }
        }
        pageInfo {
            hasNextPage
            endCursor
        }
    }
}";

const COLLECTIONS_QUERY: &str = "query getCollections($cursor: String) {
    results: collections(first: 250, after: $cursor) {
        edges {
            node {
                title
                handle
            }
        }
        pageInfo {
            hasNextPage
            endCursor
        }
    }
}";

// =============================================================================
// Records
// =============================================================================

/// A product as exposed on `/feeds/products`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductRecord {
    pub title: String,
    pub handle: String,
}

/// A variant as exposed on `/feeds/variants`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantRecord {
    pub title: String,
    pub sku: String,
    /// `"{product title} - {variant title} ({sku})"`, a title that reads
    /// well in the import tool's dashboard.
    pub dashboard_title: String,
    pub product: VariantProduct,
}

/// The parent product embedded in a [`VariantRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariantProduct {
    pub title: String,
    pub handle: String,
}

/// A collection as exposed on `/feeds/collections`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionRecord {
    pub title: String,
    pub handle: String,
}

// =============================================================================
// Wire nodes
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductNode {
    #[serde(default)]
    title: String,
    #[serde(default)]
    handle: String,
    #[serde(default)]
    published_on_current_publication: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct VariantNode {
    #[serde(default)]
    title: String,
    #[serde(default)]
    sku: Option<String>,
    #[serde(default)]
    product: VariantProductNode,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VariantProductNode {
    #[serde(default)]
    title: String,
    #[serde(default)]
    handle: String,
    #[serde(default)]
    status: String,
    #[serde(default)]
    published_on_current_publication: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct CollectionNode {
    #[serde(default)]
    title: String,
    #[serde(default)]
    handle: String,
}

fn nodes_of<T>(items: Vec<serde_json::Value>) -> Result<Vec<T>, AdminApiError>
where
    T: serde::de::DeserializeOwned,
{
    items
        .into_iter()
        .map(|item| serde_json::from_value(item).map_err(AdminApiError::from))
        .collect()
}

// =============================================================================
// Fetchers
// =============================================================================

/// Fetch all products published to the current sales channel.
///
/// Products not published to the sales channel of the custom app whose
/// credentials are in use (e.g., wholesale-only products) are dropped.
/// Upstream pagination order is preserved.
///
/// # Errors
///
/// Returns `AdminApiError` if any page fetch fails or an item does not match
/// the product node shape.
#[instrument(skip(client))]
pub async fn fetch_products(client: &AdminClient) -> Result<Vec<ProductRecord>, AdminApiError> {
    let items = client.paginate(QueryPayload::new(PRODUCTS_QUERY)).await?;
    let nodes: Vec<ProductNode> = nodes_of(items)?;

    Ok(nodes
        .into_iter()
        .filter(|node| node.published_on_current_publication.unwrap_or(false))
        .map(|node| ProductRecord {
            title: node.title,
            handle: node.handle,
        })
        .collect())
}

/// Fetch all variants of all products, deduplicated by SKU.
///
/// Shopify allows the same SKU on multiple variants, but the import tool
/// uses it as the unique identifier, so duplicates must collapse to one
/// record (see [`build_variant_feed`] for the tie-break rule).
///
/// # Errors
///
/// Returns `AdminApiError` if any page fetch fails or an item does not match
/// the variant node shape.
#[instrument(skip(client))]
pub async fn fetch_variants(
    client: &AdminClient,
    disable_published_check: bool,
) -> Result<Vec<VariantRecord>, AdminApiError> {
    let items = client.paginate(QueryPayload::new(VARIANTS_QUERY)).await?;
    let nodes: Vec<VariantNode> = nodes_of(items)?;

    Ok(build_variant_feed(nodes, disable_published_check))
}

/// Fetch all collections. No post-processing beyond flattening.
///
/// # Errors
///
/// Returns `AdminApiError` if any page fetch fails or an item does not match
/// the collection node shape.
#[instrument(skip(client))]
pub async fn fetch_collections(
    client: &AdminClient,
) -> Result<Vec<CollectionRecord>, AdminApiError> {
    let items = client.paginate(QueryPayload::new(COLLECTIONS_QUERY)).await?;
    let nodes: Vec<CollectionNode> = nodes_of(items)?;

    Ok(nodes
        .into_iter()
        .map(|node| CollectionRecord {
            title: node.title,
            handle: node.handle,
        })
        .collect())
}

// =============================================================================
// Variant pipeline
// =============================================================================

/// Apply the variant post-processing pipeline, in this order:
///
/// 1. Drop variants with an empty or missing SKU.
/// 2. Unless `disable_published_check`, drop variants whose product is not
///    published to the current sales channel.
/// 3. Dedupe by SKU: the first ACTIVE occurrence wins; a non-ACTIVE entry is
///    replaced by whichever later duplicate comes along, in place, so the
///    winner takes over the loser's position.
/// 4. Derive the dashboard title.
fn build_variant_feed(
    nodes: Vec<VariantNode>,
    disable_published_check: bool,
) -> Vec<VariantRecord> {
    let filtered = nodes
        .into_iter()
        .filter(|node| node.sku.as_deref().is_some_and(|sku| !sku.is_empty()))
        .filter(|node| {
            disable_published_check
                || node.product.published_on_current_publication.unwrap_or(false)
        });

    let mut deduped: Vec<VariantNode> = Vec::new();
    for node in filtered {
        match deduped.iter().position(|kept| kept.sku == node.sku) {
            Some(index) if deduped[index].product.status != "ACTIVE" => deduped[index] = node,
            Some(_) => {}
            None => deduped.push(node),
        }
    }

    deduped.into_iter().map(VariantRecord::from).collect()
}

impl From<VariantNode> for VariantRecord {
    fn from(node: VariantNode) -> Self {
        let VariantNode {
            title,
            sku,
            product,
        } = node;
        let sku = sku.unwrap_or_default();

        let mut dashboard_title = format!("{} - {}", product.title, title);
        if !sku.is_empty() {
            dashboard_title.push_str(&format!(" ({sku})"));
        }

        Self {
            title,
            sku,
            dashboard_title,
            product: VariantProduct {
                title: product.title,
                handle: product.handle,
            },
        }
    }
}
