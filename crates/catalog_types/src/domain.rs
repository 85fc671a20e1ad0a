use std::{cmp::Ordering, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{error::DomainError, protocol::Product};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub String);

impl ProductId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Closed set of catalog categories. `All` is the "no filter" sentinel and is
/// never sent to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Category {
    #[default]
    All,
    Automotive,
    Beauty,
    Books,
    Clothing,
    Electronics,
    Garden,
    Grocery,
    Home,
    Sports,
    Toys,
}

impl Category {
    pub const ALL: [Category; 11] = [
        Category::All,
        Category::Automotive,
        Category::Beauty,
        Category::Books,
        Category::Clothing,
        Category::Electronics,
        Category::Garden,
        Category::Grocery,
        Category::Home,
        Category::Sports,
        Category::Toys,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::All => "All",
            Category::Automotive => "Automotive",
            Category::Beauty => "Beauty",
            Category::Books => "Books",
            Category::Clothing => "Clothing",
            Category::Electronics => "Electronics",
            Category::Garden => "Garden",
            Category::Grocery => "Grocery",
            Category::Home => "Home",
            Category::Sports => "Sports",
            Category::Toys => "Toys",
        }
    }

    pub fn is_filter(self) -> bool {
        self != Category::All
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Category::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| DomainError::UnknownCategory(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortKey {
    #[default]
    #[serde(rename = "nameAZ")]
    NameAZ,
    #[serde(rename = "nameZA")]
    NameZA,
    #[serde(rename = "categoryAZ")]
    CategoryAZ,
    #[serde(rename = "categoryZA")]
    CategoryZA,
    #[serde(rename = "priceLH")]
    PriceLH,
    #[serde(rename = "priceHL")]
    PriceHL,
}

impl SortKey {
    pub const ALL: [SortKey; 6] = [
        SortKey::NameAZ,
        SortKey::NameZA,
        SortKey::CategoryAZ,
        SortKey::CategoryZA,
        SortKey::PriceLH,
        SortKey::PriceHL,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::NameAZ => "nameAZ",
            SortKey::NameZA => "nameZA",
            SortKey::CategoryAZ => "categoryAZ",
            SortKey::CategoryZA => "categoryZA",
            SortKey::PriceLH => "priceLH",
            SortKey::PriceHL => "priceHL",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortKey::NameAZ => "Name: A to Z",
            SortKey::NameZA => "Name: Z to A",
            SortKey::CategoryAZ => "Category: A to Z",
            SortKey::CategoryZA => "Category: Z to A",
            SortKey::PriceLH => "Price: Low to High",
            SortKey::PriceHL => "Price: High to Low",
        }
    }

    /// Ordering the server is expected to apply for this key. Text keys
    /// compare case-insensitively.
    pub fn compare(self, a: &Product, b: &Product) -> Ordering {
        match self {
            SortKey::NameAZ => caseless_cmp(&a.name, &b.name),
            SortKey::NameZA => caseless_cmp(&b.name, &a.name),
            SortKey::CategoryAZ => caseless_cmp(&a.category, &b.category),
            SortKey::CategoryZA => caseless_cmp(&b.category, &a.category),
            SortKey::PriceLH => a.price.total_cmp(&b.price),
            SortKey::PriceHL => b.price.total_cmp(&a.price),
        }
    }

    /// Stable sort of `products` by this key.
    pub fn sort(self, products: &mut [Product]) {
        products.sort_by(|a, b| self.compare(a, b));
    }
}

fn caseless_cmp(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        SortKey::ALL
            .into_iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| DomainError::UnknownSortKey(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PageSize {
    Ten,
    Twenty,
    #[default]
    Fifty,
    Hundred,
}

impl PageSize {
    pub const ALL: [PageSize; 4] = [
        PageSize::Ten,
        PageSize::Twenty,
        PageSize::Fifty,
        PageSize::Hundred,
    ];

    pub fn get(self) -> u32 {
        match self {
            PageSize::Ten => 10,
            PageSize::Twenty => 20,
            PageSize::Fifty => 50,
            PageSize::Hundred => 100,
        }
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

impl TryFrom<u32> for PageSize {
    type Error = DomainError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        PageSize::ALL
            .into_iter()
            .find(|size| size.get() == value)
            .ok_or(DomainError::UnsupportedPageSize(value))
    }
}

impl FromStr for PageSize {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: u32 = s
            .trim()
            .parse()
            .map_err(|_| DomainError::InvalidPageSize(s.to_string()))?;
        PageSize::try_from(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(name: &str, category: &str, price: f64) -> Product {
        Product {
            id: ProductId::new(name),
            name: name.to_string(),
            price,
            category: category.to_string(),
            in_stock: true,
            description: None,
        }
    }

    #[test]
    fn category_parses_case_insensitively() {
        assert_eq!("electronics".parse::<Category>(), Ok(Category::Electronics));
        assert_eq!(" All ".parse::<Category>(), Ok(Category::All));
        assert!(matches!(
            "Weapons".parse::<Category>(),
            Err(DomainError::UnknownCategory(_))
        ));
    }

    #[test]
    fn sort_key_wire_names_round_trip_through_serde() {
        for key in SortKey::ALL {
            let json = serde_json::to_string(&key).expect("serialize");
            assert_eq!(json, format!("\"{}\"", key.as_str()));
        }
    }

    #[test]
    fn page_size_accepts_only_offered_values() {
        assert_eq!(PageSize::try_from(20), Ok(PageSize::Twenty));
        assert_eq!(PageSize::try_from(25), Err(DomainError::UnsupportedPageSize(25)));
        assert!(matches!(
            "ten".parse::<PageSize>(),
            Err(DomainError::InvalidPageSize(_))
        ));
        assert_eq!(PageSize::default().get(), 50);
    }

    #[test]
    fn name_sort_ignores_case() {
        let mut items = vec![
            product("banana", "Grocery", 1.0),
            product("Apple", "Grocery", 2.0),
            product("cherry", "Grocery", 3.0),
        ];
        SortKey::NameAZ.sort(&mut items);
        let names: Vec<_> = items.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Apple", "banana", "cherry"]);

        SortKey::NameZA.sort(&mut items);
        let names: Vec<_> = items.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["cherry", "banana", "Apple"]);
    }

    #[test]
    fn price_sort_orders_numerically() {
        let mut items = vec![
            product("a", "Toys", 10.5),
            product("b", "Toys", 2.0),
            product("c", "Toys", 100.0),
        ];
        SortKey::PriceLH.sort(&mut items);
        let prices: Vec<_> = items.iter().map(|p| p.price).collect();
        assert_eq!(prices, [2.0, 10.5, 100.0]);

        SortKey::PriceHL.sort(&mut items);
        let prices: Vec<_> = items.iter().map(|p| p.price).collect();
        assert_eq!(prices, [100.0, 10.5, 2.0]);
    }

    #[test]
    fn category_sort_is_stable_within_equal_categories() {
        let mut items = vec![
            product("x", "toys", 1.0),
            product("y", "Books", 1.0),
            product("z", "Toys", 1.0),
        ];
        SortKey::CategoryAZ.sort(&mut items);
        let names: Vec<_> = items.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["y", "x", "z"]);
    }
}
