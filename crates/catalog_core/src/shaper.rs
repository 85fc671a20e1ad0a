//! Field selection from loosely-typed server records into [`Product`].

use catalog_types::{domain::ProductId, protocol::Product};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::FetchError;

/// How records with missing or mistyped fields are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShapeMode {
    /// Gaps become empty values (`""`, `0`, `false`) and are logged.
    #[default]
    Lenient,
    /// Any gap in a required field fails the whole fetch.
    Strict,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ResultShaper {
    mode: ShapeMode,
}

impl ResultShaper {
    pub fn new(mode: ShapeMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> ShapeMode {
        self.mode
    }

    pub fn shape_items(&self, records: &[Value]) -> Result<Vec<Product>, FetchError> {
        let mut products = Vec::with_capacity(records.len());
        let mut incomplete = 0usize;
        for (index, record) in records.iter().enumerate() {
            let (product, gaps) = select_fields(record);
            if !gaps.is_empty() {
                self.check_gaps(&format!("item {index}"), &gaps)?;
                incomplete += 1;
            }
            products.push(product);
        }
        if incomplete > 0 {
            warn!(
                incomplete,
                total = records.len(),
                "catalog: product records had missing fields; using empty values"
            );
        }
        Ok(products)
    }

    pub fn shape_product(&self, record: &Value) -> Result<Product, FetchError> {
        let (product, gaps) = select_fields(record);
        if !gaps.is_empty() {
            self.check_gaps("product", &gaps)?;
            warn!(
                missing = %gaps.join(","),
                "catalog: product record had missing fields; using empty values"
            );
        }
        Ok(product)
    }

    fn check_gaps(&self, location: &str, gaps: &[&'static str]) -> Result<(), FetchError> {
        match self.mode {
            ShapeMode::Strict => Err(FetchError::MalformedResponse(format!(
                "{location}: missing or invalid {}",
                gaps.join(", ")
            ))),
            ShapeMode::Lenient => {
                debug!(location, missing = %gaps.join(","), "catalog: lenient field selection");
                Ok(())
            }
        }
    }
}

fn select_fields(record: &Value) -> (Product, Vec<&'static str>) {
    let mut gaps = Vec::new();

    let id = match record.get("id") {
        Some(Value::String(id)) => id.clone(),
        Some(Value::Number(id)) => id.to_string(),
        _ => {
            gaps.push("id");
            String::new()
        }
    };
    let name = text_field(record, "name", &mut gaps);
    let price = record
        .get("price")
        .and_then(Value::as_f64)
        .unwrap_or_else(|| {
            gaps.push("price");
            0.0
        });
    let category = text_field(record, "category", &mut gaps);
    let in_stock = record
        .get("inStock")
        .and_then(Value::as_bool)
        .unwrap_or_else(|| {
            gaps.push("inStock");
            false
        });
    let description = record
        .get("description")
        .and_then(Value::as_str)
        .map(str::to_owned);

    (
        Product {
            id: ProductId(id),
            name,
            price,
            category,
            in_stock,
            description,
        },
        gaps,
    )
}

fn text_field(record: &Value, field: &'static str, gaps: &mut Vec<&'static str>) -> String {
    match record.get(field).and_then(Value::as_str) {
        Some(value) => value.to_owned(),
        None => {
            gaps.push(field);
            String::new()
        }
    }
}
