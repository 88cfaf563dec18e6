//! Mock catalog data.
//!
//! Placeholder products with randomized fields, regenerated on every
//! render. The flash-sale carousel uses these where no backend call is
//! made; the seeder CLI uses them to fill a demo backend.

use chrono::{Duration, Utc};
use rand::Rng;
use rand::seq::IndexedRandom;
use rust_decimal::Decimal;

use cedar_thread_core::{Product, ProductId};

const ADJECTIVES: &[&str] = &[
    "Coastal", "Heritage", "Everyday", "Harbor", "Meadow", "Juniper", "Alpine", "Ember",
];

const GARMENTS: &[&str] = &[
    "Shirt", "Tee", "Hoodie", "Cardigan", "Chinos", "Skirt", "Jacket", "Scarf", "Dress",
];

const MATERIALS: &[&str] = &["Linen", "Cotton", "Wool", "Denim", "Corduroy", "Flannel"];

const COLORS: &[&str] = &[
    "white", "black", "navy", "olive", "rust", "sand", "charcoal", "sage",
];

const CATEGORIES: &[&str] = &["shirts", "knitwear", "trousers", "outerwear", "accessories"];

const SIZES: &[&str] = &["XS", "S", "M", "L", "XL"];

/// Id range reserved for mock batches, clear of real catalog ids.
const MOCK_ID_BASE: i64 = 900_000;

/// Generate `count` flash-sale products.
///
/// Every product carries an active markdown (discount strictly below the
/// original price) and a batch-unique id. Fields are re-randomized on every
/// call; nothing is persisted.
#[must_use]
pub fn flash_sale_products(count: usize) -> Vec<Product> {
    let mut rng = rand::rng();
    (0..count).map(|i| generate(&mut rng, i)).collect()
}

fn generate<R: Rng + ?Sized>(rng: &mut R, index: usize) -> Product {
    let adjective = ADJECTIVES.choose(rng).copied().unwrap_or("Everyday");
    let material = MATERIALS.choose(rng).copied().unwrap_or("Cotton");
    let garment = GARMENTS.choose(rng).copied().unwrap_or("Shirt");

    // Dollar amounts with cents; markdown factor stays under 1.0 so the
    // sale price is always strictly below the original.
    let original = Decimal::new(rng.random_range(1800..=14000), 2);
    let factor = Decimal::new(rng.random_range(55..=85), 2);
    let discounted = (original * factor).round_dp(2);

    let sizes: Vec<String> = {
        let mut picked: Vec<String> = SIZES
            .iter()
            .filter(|_| rng.random_bool(0.6))
            .map(|s| (*s).to_string())
            .collect();
        if picked.is_empty() {
            picked.push("M".to_string());
        }
        picked
    };

    Product {
        id: ProductId::new(MOCK_ID_BASE + i64::try_from(index).unwrap_or(0)),
        name: format!("{adjective} {material} {garment}"),
        price: original,
        original_price: original,
        discount_price: Some(discounted),
        images: vec![format!(
            "/static/images/placeholder/{}-{}.jpg",
            material.to_lowercase(),
            garment.to_lowercase()
        )],
        rating: f64::from(rng.random_range(30..=50_u32)) / 10.0,
        reviews: rng.random_range(0..=480),
        material: material.to_lowercase(),
        available_sizes: sizes,
        stock: rng.random_range(0..=25),
        color: COLORS.choose(rng).copied().unwrap_or("white").to_string(),
        category: CATEGORIES.choose(rng).copied().unwrap_or("shirts").to_string(),
        created_at: Some(Utc::now() - Duration::days(rng.random_range(0..120))),
    }
}
