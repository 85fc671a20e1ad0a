use std::collections::HashMap;

use axum::{
    extract::{Path, Query, RawQuery, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use catalog_types::{
    domain::{Category, ProductId, SortKey},
    protocol::Product,
};
use parking_lot::Mutex;
use serde_json::json;
use tokio::net::TcpListener;

use super::*;
use crate::view::{ListView, ProductDetailView};

#[derive(Clone, Default)]
struct StubState {
    catalog: Arc<Vec<Product>>,
    list_queries: Arc<Mutex<Vec<String>>>,
    detail_requests: Arc<Mutex<Vec<String>>>,
}

impl StubState {
    fn list_queries(&self) -> Vec<String> {
        self.list_queries.lock().clone()
    }
}

/// Filters, sorts and pages the fixture the way the real endpoint does.
async fn stub_list_products(
    State(state): State<StubState>,
    RawQuery(raw): RawQuery,
    Query(params): Query<HashMap<String, String>>,
) -> Json<serde_json::Value> {
    state.list_queries.lock().push(raw.unwrap_or_default());

    let needle = params
        .get("query")
        .map(|q| q.to_lowercase())
        .unwrap_or_default();
    let category = params.get("category").cloned();
    let page: usize = params.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
    let limit: usize = params.get("limit").and_then(|l| l.parse().ok()).unwrap_or(8);

    let mut matches: Vec<Product> = state
        .catalog
        .iter()
        .filter(|p| p.name.to_lowercase().contains(&needle))
        .filter(|p| category.as_deref().map_or(true, |c| p.category == c))
        .cloned()
        .collect();
    if let Some(key) = params.get("sortKey").and_then(|k| k.parse::<SortKey>().ok()) {
        key.sort(&mut matches);
    }

    let total = matches.len();
    let items: Vec<Product> = matches
        .into_iter()
        .skip((page - 1) * limit)
        .take(limit)
        .collect();
    Json(json!({ "items": items, "page": page, "limit": limit, "total": total }))
}

async fn stub_product(
    State(state): State<StubState>,
    Path(id): Path<String>,
) -> Result<Json<Product>, StatusCode> {
    state.detail_requests.lock().push(id.clone());
    state
        .catalog
        .iter()
        .find(|p| p.id.as_str() == id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn spawn_catalog_server(catalog: Vec<Product>) -> anyhow::Result<(String, StubState)> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let state = StubState {
        catalog: Arc::new(catalog),
        ..StubState::default()
    };
    let app = Router::new()
        .route("/products", get(stub_list_products))
        .route("/products/:id", get(stub_product))
        .with_state(state.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok((format!("http://{addr}"), state))
}

/// Answers every request with a fixed status and body.
async fn spawn_raw_server(status: StatusCode, body: &'static str) -> anyhow::Result<String> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let app = Router::new().fallback(move || async move { (status, body) });
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(format!("http://{addr}"))
}

fn product(id: &str, name: &str, category: &str, price: f64) -> Product {
    Product {
        id: ProductId::new(id),
        name: name.to_string(),
        price,
        category: category.to_string(),
        in_stock: true,
        description: Some(format!("{name} description")),
    }
}

fn fixture() -> Vec<Product> {
    vec![
        product("123", "Product 123", "Electronics", 19.99),
        product("7", "Garden Hose", "Garden", 24.5),
        product("8", "Desk Lamp", "Home", 12.0),
        product("9", "USB Cable", "Electronics", 5.25),
    ]
}

fn client_for(server_url: String) -> CatalogClient {
    CatalogClient::new(ClientSettings {
        server_url,
        ..ClientSettings::default()
    })
    .expect("client")
}

async fn settled(session: &ProductListSession) -> FetchState {
    let mut rx = session.subscribe();
    let state = rx
        .wait_for(|state| !state.is_loading())
        .await
        .expect("state channel")
        .clone();
    state
}

#[tokio::test]
async fn list_links_to_detail_with_dollar_price() {
    let (server_url, stub) = spawn_catalog_server(fixture()).await.expect("spawn server");
    let client = client_for(server_url);

    let session = client.open_list();
    let state = settled(&session).await;
    let view = ListView::new(&state, session.query_state());

    let row = view.link("Product 123").expect("product link");
    assert_eq!(row.href, "/products/123");
    assert_eq!(row.price_label, "$19.99");

    let detail = client.product_detail(row.id.as_str()).await;
    let detail_view = ProductDetailView::from_state(&detail).expect("detail ready");
    assert!(detail_view.price_label.starts_with('$'));
    assert_eq!(detail_view.price_label, "$19.99");
    assert_eq!(detail_view.category, "Electronics");
    assert_eq!(stub.detail_requests.lock().clone(), vec!["123".to_string()]);
}

#[tokio::test]
async fn category_parameter_follows_selection() {
    let (server_url, stub) = spawn_catalog_server(fixture()).await.expect("spawn server");
    let client = client_for(server_url);

    let mut session = client.open_list();
    settled(&session).await;

    session.set_category(Category::Electronics);
    let state = settled(&session).await;
    let names: Vec<_> = state
        .data()
        .expect("ready")
        .items
        .iter()
        .map(|p| p.name.clone())
        .collect();
    assert_eq!(names, vec!["Product 123", "USB Cable"]);

    session.set_category(Category::All);
    settled(&session).await;

    let queries = stub.list_queries();
    assert_eq!(queries.len(), 3);
    assert_eq!(queries[0], "page=1&limit=50&sortKey=nameAZ");
    assert!(queries[1].contains("category=Electronics"), "{}", queries[1]);
    assert!(!queries[2].contains("category"), "{}", queries[2]);
}

#[tokio::test]
async fn search_text_reaches_server_after_settling() {
    let (server_url, stub) = spawn_catalog_server(fixture()).await.expect("spawn server");
    let client = client_for(server_url);

    let mut session = client.open_list();
    settled(&session).await;

    session.set_query("Product 1");
    session.settle().await;
    let state = settled(&session).await;

    let data = state.data().expect("ready");
    assert_eq!(data.total, 1);
    assert_eq!(data.items[0].id.as_str(), "123");

    let queries = stub.list_queries();
    assert_eq!(queries.len(), 2);
    assert!(queries[1].starts_with("query=Product+1&"), "{}", queries[1]);
}

#[tokio::test]
async fn server_sort_and_paging_are_echoed() {
    let (server_url, _stub) = spawn_catalog_server(fixture()).await.expect("spawn server");
    let client = client_for(server_url);

    let mut initial = QueryState::new(catalog_types::domain::PageSize::Ten);
    initial.set_sort(SortSpec::new(SortKey::PriceHL));
    let session = client.open_list_with(initial);
    let state = settled(&session).await;

    let data = state.data().expect("ready");
    let prices: Vec<f64> = data.items.iter().map(|p| p.price).collect();
    assert_eq!(prices, vec![24.5, 19.99, 12.0, 5.25]);
    assert_eq!((data.page, data.limit, data.total), (1, 10, 4));
    assert_eq!(session.pagination().total_pages(), 1);
}

#[tokio::test]
async fn error_status_fails_list_and_notifies() {
    let server_url = spawn_raw_server(StatusCode::INTERNAL_SERVER_ERROR, "boom")
        .await
        .expect("spawn server");
    let client = client_for(server_url);
    let mut events = client.subscribe_events();

    let session = client.open_list();
    let state = settled(&session).await;
    assert_eq!(state, FetchState::Failed(FetchError::Http { status: 500 }));
    assert!(matches!(
        ListView::new(&state, session.query_state()),
        ListView::Error(_)
    ));

    match events.recv().await.expect("event") {
        CatalogEvent::Notification(notification) => {
            assert_eq!(notification.message, "Network response was not ok (500)");
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[tokio::test]
async fn non_json_body_is_malformed() {
    let server_url = spawn_raw_server(StatusCode::OK, "<html>oops</html>")
        .await
        .expect("spawn server");
    let client = client_for(server_url);

    let session = client.open_list();
    let state = settled(&session).await;
    assert!(matches!(
        state.error(),
        Some(FetchError::MalformedResponse(_))
    ));
}

#[tokio::test]
async fn unreachable_server_is_network_failure() {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let client = client_for(format!("http://{addr}"));
    let session = client.open_list();
    let state = settled(&session).await;
    assert!(matches!(state.error(), Some(FetchError::Network(_))));
}

#[tokio::test]
async fn unknown_product_is_not_found() {
    let (server_url, _stub) = spawn_catalog_server(fixture()).await.expect("spawn server");
    let client = client_for(server_url);
    let mut events = client.subscribe_events();

    let detail = client.product_detail("404-me").await;
    assert_eq!(
        detail.error(),
        Some(&FetchError::NotFound {
            id: ProductId::new("404-me")
        })
    );
    match events.recv().await.expect("event") {
        CatalogEvent::Notification(notification) => {
            assert_eq!(notification.message, "Product not found (404)");
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[tokio::test]
async fn detail_error_status_uses_detail_wording() {
    let server_url = spawn_raw_server(StatusCode::SERVICE_UNAVAILABLE, "")
        .await
        .expect("spawn server");
    let client = client_for(server_url);
    let mut events = client.subscribe_events();

    let detail = client.product_detail("123").await;
    assert_eq!(detail.error(), Some(&FetchError::Http { status: 503 }));
    match events.recv().await.expect("event") {
        CatalogEvent::Notification(notification) => {
            assert_eq!(notification.message, "Failed to fetch product (503)");
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[tokio::test]
async fn blank_product_id_is_rejected_without_request() {
    let (server_url, stub) = spawn_catalog_server(fixture()).await.expect("spawn server");
    let client = client_for(server_url);

    let detail = client.product_detail("  ").await;
    assert_eq!(detail.error(), Some(&FetchError::MissingProductId));
    assert!(stub.detail_requests.lock().is_empty());
}
