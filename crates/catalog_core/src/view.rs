//! Render-ready projections of fetch state for list and detail screens.

use catalog_types::{domain::ProductId, protocol::Product};

use crate::{detail::DetailState, fetch::FetchState, pagination::PaginationWindow, QueryState};

pub const NO_ROWS: &str = "No rows";

pub fn product_href(id: &ProductId) -> String {
    format!("/products/{id}")
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductRow {
    pub id: ProductId,
    pub link_label: String,
    pub href: String,
    pub price_label: String,
    pub category: String,
    pub stock_label: &'static str,
}

impl From<&Product> for ProductRow {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            link_label: product.name.clone(),
            href: product_href(&product.id),
            price_label: format!("${:.2}", product.price),
            category: product.category.clone(),
            stock_label: if product.in_stock {
                "In Stock"
            } else {
                "Out of Stock"
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ListView {
    Loading,
    Error(String),
    Table {
        rows: Vec<ProductRow>,
        pagination: PaginationWindow,
    },
}

impl ListView {
    pub fn new(state: &FetchState, query: &QueryState) -> Self {
        match state {
            FetchState::Loading => ListView::Loading,
            FetchState::Failed(error) => ListView::Error(error.to_string()),
            FetchState::Ready(data) => ListView::Table {
                rows: data.items.iter().map(ProductRow::from).collect(),
                pagination: PaginationWindow::compute(
                    data.total,
                    query.limit().get(),
                    query.page(),
                ),
            },
        }
    }

    /// Row lookup by link label, as a user would find it on screen.
    pub fn link(&self, label: &str) -> Option<&ProductRow> {
        match self {
            ListView::Table { rows, .. } => rows.iter().find(|row| row.link_label == label),
            _ => None,
        }
    }

    /// Placeholder shown in place of rows for a ready but empty page.
    pub fn placeholder(&self) -> Option<&'static str> {
        match self {
            ListView::Table { rows, .. } if rows.is_empty() => Some(NO_ROWS),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductDetailView {
    pub name: String,
    pub price_label: String,
    pub category: String,
    pub stock_label: &'static str,
    pub description: String,
}

impl From<&Product> for ProductDetailView {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            price_label: format!("${}", product.price),
            category: product.category.clone(),
            stock_label: if product.in_stock { "Yes" } else { "No" },
            description: product
                .description
                .as_deref()
                .filter(|text| !text.is_empty())
                .unwrap_or("-")
                .to_string(),
        }
    }
}

impl ProductDetailView {
    pub fn from_state(state: &DetailState) -> Option<Self> {
        state.product().map(Self::from)
    }
}

#[cfg(test)]
mod tests {
    use catalog_types::protocol::ListResponse;

    use super::*;

    fn product(id: &str, price: f64, in_stock: bool) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            price,
            category: "Electronics".into(),
            in_stock,
            description: None,
        }
    }

    #[test]
    fn rows_link_to_detail_and_format_price() {
        let row = ProductRow::from(&product("123", 19.5, false));
        assert_eq!(row.link_label, "Product 123");
        assert_eq!(row.href, "/products/123");
        assert_eq!(row.price_label, "$19.50");
        assert_eq!(row.stock_label, "Out of Stock");
    }

    #[test]
    fn detail_view_prefixes_price_and_fills_description() {
        let view = ProductDetailView::from(&product("7", 20.0, true));
        assert_eq!(view.price_label, "$20");
        assert_eq!(view.stock_label, "Yes");
        assert_eq!(view.description, "-");

        let view = ProductDetailView::from(&product("8", 4.99, false));
        assert_eq!(view.price_label, "$4.99");
        assert_eq!(view.stock_label, "No");
    }

    #[test]
    fn empty_ready_page_shows_placeholder() {
        let state = FetchState::Ready(ListResponse {
            items: Vec::new(),
            page: 1,
            limit: 50,
            total: 0,
        });
        let view = ListView::new(&state, &QueryState::default());
        assert_eq!(view.placeholder(), Some(NO_ROWS));
        assert_eq!(ListView::new(&FetchState::Loading, &QueryState::default()).placeholder(), None);
    }
}
