use serde::{Deserialize, Serialize};

use crate::domain::{Category, ProductId, SortKey};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: f64,
    pub category: String,
    #[serde(rename = "inStock")]
    pub in_stock: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// One page of results. `total` counts matches across every page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListResponse {
    pub items: Vec<Product>,
    pub page: u32,
    pub limit: u32,
    pub total: u64,
}

/// `GET /products` body as received, before item shaping. Every field may be
/// missing; items stay untyped until they pass through the shaper.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListPagePayload {
    #[serde(default)]
    pub items: Option<Vec<serde_json::Value>>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub total: Option<u64>,
}

/// Query parameters for `GET /products`. Absent filters are left out of the
/// query string entirely; `page` and `limit` are always sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    pub page: u32,
    pub limit: u32,
    #[serde(
        rename = "sortKey",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub sort_key: Option<SortKey>,
}
