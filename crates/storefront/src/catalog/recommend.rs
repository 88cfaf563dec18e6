//! Product recommendations for the detail page.
//!
//! Three heuristic slices over the fetched listing - top-rated, newest,
//! deepest discount - combined into at most eight unique tiles. First
//! occurrence wins on duplicate ids; when the slices overlap, the grid is
//! backfilled from the popularity ranking.

use std::collections::HashSet;

use rust_decimal::Decimal;

use cedar_thread_core::{Product, ProductId};

/// Tiles taken from the popularity ranking.
const POPULAR_SLOTS: usize = 3;
/// Tiles taken from the recency ranking.
const RECENT_SLOTS: usize = 3;
/// Tiles taken from the discount ranking.
const DISCOUNT_SLOTS: usize = 2;
/// Size of the recommendation grid.
const TOTAL_SLOTS: usize = POPULAR_SLOTS + RECENT_SLOTS + DISCOUNT_SLOTS;

/// Recommendations for a product detail page.
///
/// `exclude` (the product being viewed) never appears in its own grid.
#[must_use]
pub fn related(products: &[Product], exclude: ProductId) -> Vec<Product> {
    let candidates: Vec<&Product> = products.iter().filter(|p| p.id != exclude).collect();
    combined(&candidates)
}

/// Combine the three heuristic slices into at most eight unique products.
fn combined(candidates: &[&Product]) -> Vec<Product> {
    let by_popularity = ranked_by_popularity(candidates);
    let by_recency = ranked_by_recency(candidates);
    let by_discount = ranked_by_discount(candidates);

    let mut seen: HashSet<ProductId> = HashSet::new();
    let mut picks: Vec<Product> = Vec::with_capacity(TOTAL_SLOTS);

    let slices = [
        (&by_popularity, POPULAR_SLOTS),
        (&by_recency, RECENT_SLOTS),
        (&by_discount, DISCOUNT_SLOTS),
    ];
    for (ranking, slots) in slices {
        for product in ranking.iter().take(slots) {
            if seen.insert(product.id) {
                picks.push((*product).clone());
            }
        }
    }

    // Overlapping slices leave gaps; fill them from the popularity tail.
    for product in &by_popularity {
        if picks.len() >= TOTAL_SLOTS {
            break;
        }
        if seen.insert(product.id) {
            picks.push((*product).clone());
        }
    }

    picks
}

fn ranked_by_popularity<'a>(candidates: &[&'a Product]) -> Vec<&'a Product> {
    let mut ranked = candidates.to_vec();
    ranked.sort_by(|a, b| {
        b.rating
            .total_cmp(&a.rating)
            .then_with(|| b.reviews.cmp(&a.reviews))
    });
    ranked
}

fn ranked_by_recency<'a>(candidates: &[&'a Product]) -> Vec<&'a Product> {
    let mut ranked = candidates.to_vec();
    // Products without a creation date sort last.
    ranked.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    ranked
}

fn ranked_by_discount<'a>(candidates: &[&'a Product]) -> Vec<&'a Product> {
    let mut ranked: Vec<&Product> = candidates
        .iter()
        .copied()
        .filter(|p| p.on_sale())
        .collect();
    ranked.sort_by(|a, b| {
        b.discount_percent()
            .unwrap_or(Decimal::ZERO)
            .cmp(&a.discount_percent().unwrap_or(Decimal::ZERO))
    });
    ranked
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    #[allow(clippy::cast_precision_loss)]
    fn product(id: i64, rating: f64, day: u32, discount: Option<i64>) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            price: Decimal::new(100, 0),
            original_price: Decimal::new(100, 0),
            discount_price: discount.map(|d| Decimal::new(d, 0)),
            images: vec![],
            rating,
            reviews: 10,
            material: String::new(),
            available_sizes: vec![],
            stock: 1,
            color: String::new(),
            category: String::new(),
            created_at: Some(Utc.with_ymd_and_hms(2026, 7, day, 0, 0, 0).unwrap()),
        }
    }

    #[test]
    fn test_takes_three_three_two() {
        // 20 distinct products: ratings descend with id, dates ascend,
        // discounts only on ids 8..=13 (deeper markdown for higher ids).
        let products: Vec<Product> = (1..=20)
            .map(|id| {
                let discount = (8..=13).contains(&id).then_some(100 - id * 4);
                product(id, 5.0 - id as f64 * 0.1, u32::try_from(id).unwrap(), discount)
            })
            .collect();

        let picks = related(&products, ProductId::new(99));
        assert_eq!(picks.len(), 8);

        let ids: Vec<i64> = picks.iter().map(|p| p.id.as_i64()).collect();
        // Popularity: highest ratings are the lowest ids.
        assert_eq!(&ids[0..3], &[1, 2, 3]);
        // Recency: newest creation dates are the highest ids.
        assert_eq!(&ids[3..6], &[20, 19, 18]);
        // Discount: deepest markdowns are the highest discounted ids.
        assert_eq!(&ids[6..8], &[13, 12]);
    }

    #[test]
    fn test_backfills_from_popularity_when_discount_slice_overlaps() {
        // The most recent products are also the only discounted ones, so
        // the discount slice contributes nothing new and the grid is
        // topped up from the popularity tail.
        let products: Vec<Product> = (1..=20)
            .map(|id| {
                let discount = (id >= 19).then_some(100 - id * 4);
                product(id, 5.0 - id as f64 * 0.1, u32::try_from(id).unwrap(), discount)
            })
            .collect();

        let picks = related(&products, ProductId::new(99));
        let ids: Vec<i64> = picks.iter().map(|p| p.id.as_i64()).collect();
        assert_eq!(ids, [1, 2, 3, 20, 19, 18, 4, 5]);
    }

    #[test]
    fn test_excludes_viewed_product() {
        let products: Vec<Product> = (1..=10)
            .map(|id| product(id, 4.0, u32::try_from(id).unwrap(), None))
            .collect();
        let picks = related(&products, ProductId::new(3));
        assert!(picks.iter().all(|p| p.id != ProductId::new(3)));
    }

    #[test]
    fn test_dedupes_and_backfills_when_slices_overlap() {
        // Five products where the top-rated are also the newest and the
        // most discounted: every slice picks the same heads.
        let products: Vec<Product> = (1..=5)
            .map(|id| {
                product(
                    id,
                    5.0 - id as f64 * 0.1,
                    u32::try_from(6 - id).unwrap(),
                    Some(id * 10),
                )
            })
            .collect();

        let picks = related(&products, ProductId::new(99));
        let ids: HashSet<i64> = picks.iter().map(|p| p.id.as_i64()).collect();
        // All five products appear exactly once; no duplicates pad the grid.
        assert_eq!(picks.len(), 5);
        assert_eq!(ids.len(), 5);
    }

    #[test]
    fn test_small_catalogs_yield_what_exists() {
        let products = vec![product(1, 4.0, 1, None)];
        let picks = related(&products, ProductId::new(1));
        assert!(picks.is_empty());
    }
}
