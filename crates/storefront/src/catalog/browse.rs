//! Sorting, filtering, and category selection over a fetched listing.
//!
//! The backend serves the catalog as one JSON array; everything the
//! browsing pages do with it happens here, in memory.

use cedar_thread_core::Product;

/// Sort orders offered by the listing pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    PriceLowToHigh,
    PriceHighToLow,
    NameAToZ,
    NameZToA,
}

impl SortKey {
    /// Parse the `?sort=` query value.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "low-to-high" => Some(Self::PriceLowToHigh),
            "high-to-low" => Some(Self::PriceHighToLow),
            "a-to-z" => Some(Self::NameAToZ),
            "z-to-a" => Some(Self::NameZToA),
            _ => None,
        }
    }

    /// Query value for links and the select control.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PriceLowToHigh => "low-to-high",
            Self::PriceHighToLow => "high-to-low",
            Self::NameAToZ => "a-to-z",
            Self::NameZToA => "z-to-a",
        }
    }

    /// Label shown in the sort select.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::PriceLowToHigh => "Price: Low to High",
            Self::PriceHighToLow => "Price: High to Low",
            Self::NameAToZ => "Name: A to Z",
            Self::NameZToA => "Name: Z to A",
        }
    }

    /// All keys, for rendering the select control.
    pub const ALL: [Self; 4] = [
        Self::PriceLowToHigh,
        Self::PriceHighToLow,
        Self::NameAToZ,
        Self::NameZToA,
    ];
}

/// Sort `products` in place. Stable for equal keys.
pub fn sort(products: &mut [Product], key: SortKey) {
    match key {
        SortKey::PriceLowToHigh => {
            products.sort_by(|a, b| a.effective_price().cmp(&b.effective_price()));
        }
        SortKey::PriceHighToLow => {
            products.sort_by(|a, b| b.effective_price().cmp(&a.effective_price()));
        }
        SortKey::NameAToZ => {
            products.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        }
        SortKey::NameZToA => {
            products.sort_by(|a, b| b.name.to_lowercase().cmp(&a.name.to_lowercase()));
        }
    }
}

/// Keep products whose name contains `query`, case-insensitively.
///
/// An empty or whitespace query keeps everything.
#[must_use]
pub fn filter_by_name(mut products: Vec<Product>, query: &str) -> Vec<Product> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return products;
    }
    products.retain(|p| p.name.to_lowercase().contains(&needle));
    products
}

/// Keep products in `category` (case-insensitive exact match).
#[must_use]
pub fn in_category(mut products: Vec<Product>, category: &str) -> Vec<Product> {
    products.retain(|p| p.category.eq_ignore_ascii_case(category));
    products
}

/// Distinct categories present in the listing, sorted for display.
#[must_use]
pub fn categories(products: &[Product]) -> Vec<String> {
    let mut seen: Vec<String> = products
        .iter()
        .filter(|p| !p.category.is_empty())
        .map(|p| p.category.to_lowercase())
        .collect();
    seen.sort();
    seen.dedup();
    seen
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use cedar_thread_core::ProductId;
    use rust_decimal::Decimal;

    use super::*;

    fn product(id: i64, name: &str, price: i64) -> Product {
        Product {
            id: ProductId::new(id),
            name: name.to_string(),
            price: Decimal::new(price, 0),
            original_price: Decimal::new(price, 0),
            discount_price: None,
            images: vec![],
            rating: 0.0,
            reviews: 0,
            material: String::new(),
            available_sizes: vec![],
            stock: 1,
            color: String::new(),
            category: "shirts".to_string(),
            created_at: None,
        }
    }

    #[test]
    fn test_sort_price_low_to_high() {
        let mut products = vec![product(1, "B", 10), product(2, "A", 5)];
        sort(&mut products, SortKey::PriceLowToHigh);
        assert_eq!(products[0].name, "A");
        assert_eq!(products[0].price, Decimal::new(5, 0));
        assert_eq!(products[1].name, "B");
        assert_eq!(products[1].price, Decimal::new(10, 0));
    }

    #[test]
    fn test_sort_name_a_to_z() {
        let mut products = vec![product(1, "B", 10), product(2, "A", 5)];
        sort(&mut products, SortKey::NameAToZ);
        let names: Vec<&str> = products.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["A", "B"]);
    }

    #[test]
    fn test_sort_is_stable_for_equal_keys() {
        let mut products = vec![
            product(1, "First", 20),
            product(2, "Second", 20),
            product(3, "Third", 20),
        ];
        sort(&mut products, SortKey::PriceLowToHigh);
        let ids: Vec<i64> = products.iter().map(|p| p.id.as_i64()).collect();
        assert_eq!(ids, [1, 2, 3]);
    }

    #[test]
    fn test_sort_uses_discounted_price() {
        let mut cheap_on_sale = product(1, "Sale", 100);
        cheap_on_sale.discount_price = Some(Decimal::new(5, 0));
        let mut products = vec![cheap_on_sale, product(2, "Plain", 10)];
        sort(&mut products, SortKey::PriceLowToHigh);
        assert_eq!(products[0].name, "Sale");
    }

    #[test]
    fn test_sort_name_is_case_insensitive() {
        let mut products = vec![product(1, "banana", 1), product(2, "Apple", 1)];
        sort(&mut products, SortKey::NameAToZ);
        assert_eq!(products[0].name, "Apple");
    }

    #[test]
    fn test_filter_by_name() {
        let products = vec![
            product(1, "Linen Shirt", 10),
            product(2, "Wool Scarf", 20),
            product(3, "Denim Shirt", 30),
        ];
        let hits = filter_by_name(products, "shirt");
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().all(|p| p.name.to_lowercase().contains("shirt")));
    }

    #[test]
    fn test_filter_empty_query_keeps_all() {
        let products = vec![product(1, "A", 1), product(2, "B", 2)];
        assert_eq!(filter_by_name(products, "   ").len(), 2);
    }

    #[test]
    fn test_in_category() {
        let mut scarf = product(2, "Scarf", 20);
        scarf.category = "accessories".to_string();
        let products = vec![product(1, "Shirt", 10), scarf];

        let hits = in_category(products, "Accessories");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Scarf");
    }

    #[test]
    fn test_categories_distinct_sorted() {
        let mut scarf = product(2, "Scarf", 20);
        scarf.category = "Accessories".to_string();
        let products = vec![product(1, "A", 1), scarf, product(3, "B", 2)];
        assert_eq!(categories(&products), ["accessories", "shirts"]);
    }

    #[test]
    fn test_sort_key_parse() {
        assert_eq!(SortKey::parse("low-to-high"), Some(SortKey::PriceLowToHigh));
        assert_eq!(SortKey::parse("a-to-z"), Some(SortKey::NameAToZ));
        assert_eq!(SortKey::parse("bogus"), None);
    }
}
