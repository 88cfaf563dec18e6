//! Demo catalog seeding.
//!
//! Generates mock products with the storefront's generator and pushes them
//! through the admin client, so a demo backend has something to serve.

use cedar_thread_admin::catalog::{AdminCatalogClient, ProductDraft};
use cedar_thread_admin::config::AdminConfig;
use cedar_thread_core::Product;
use cedar_thread_storefront::catalog::mock;

/// Generate `count` mock products and create them in the backend.
pub async fn run(count: usize) -> Result<(), Box<dyn std::error::Error>> {
    let config = AdminConfig::from_env()?;
    let client = AdminCatalogClient::new(&config.catalog);

    let mut created = 0_usize;
    for product in mock::flash_sale_products(count) {
        let draft = draft_from(&product);
        match client.create_product(&draft).await {
            Ok(created_product) => {
                created += 1;
                tracing::info!(product_id = %created_product.id, name = %draft.name, "seeded product");
            }
            Err(e) => {
                tracing::warn!(name = %draft.name, "failed to seed product: {e}");
            }
        }
    }

    tracing::info!("seeded {created}/{count} products");
    Ok(())
}

fn draft_from(product: &Product) -> ProductDraft {
    ProductDraft {
        name: product.name.clone(),
        price: product.price,
        original_price: product.original_price,
        discount_price: product.discount_price,
        images: product.images.clone(),
        material: product.material.clone(),
        available_sizes: product.available_sizes.clone(),
        stock: product.stock,
        color: product.color.clone(),
        category: product.category.clone(),
    }
}
