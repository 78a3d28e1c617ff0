//! Read-only catalog lookup seam plus an in-memory implementation.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use draftsync_core::{ProductId, VariationId};

use crate::product::{Product, ProductVariation};

/// Read access to locally cached products and variations.
///
/// The synchronizer resolves every product reference in an edit input
/// through this trait. Implementations must be safe to share across
/// threads; lookups return owned clones so callers never hold a lock.
pub trait CatalogReader: Send + Sync {
    fn product(&self, id: ProductId) -> Option<Product>;

    fn variation(&self, product_id: ProductId, id: VariationId) -> Option<ProductVariation>;
}

impl<C> CatalogReader for Arc<C>
where
    C: CatalogReader + ?Sized,
{
    fn product(&self, id: ProductId) -> Option<Product> {
        (**self).product(id)
    }

    fn variation(&self, product_id: ProductId, id: VariationId) -> Option<ProductVariation> {
        (**self).variation(product_id, id)
    }
}

/// In-memory catalog for tests and embedding.
///
/// Interior mutability so a shared `Arc<InMemoryCatalog>` can be refreshed
/// while readers keep their handle.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    products: RwLock<HashMap<ProductId, Product>>,
    variations: RwLock<HashMap<(ProductId, VariationId), ProductVariation>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_product(&self, product: Product) {
        if let Ok(mut products) = self.products.write() {
            products.insert(product.id(), product);
        }
    }

    pub fn insert_variation(&self, variation: ProductVariation) {
        if let Ok(mut variations) = self.variations.write() {
            variations.insert((variation.product_id(), variation.id()), variation);
        }
    }

    pub fn remove_product(&self, id: ProductId) {
        if let Ok(mut products) = self.products.write() {
            products.remove(&id);
        }
    }
}

impl CatalogReader for InMemoryCatalog {
    fn product(&self, id: ProductId) -> Option<Product> {
        self.products.read().ok()?.get(&id).cloned()
    }

    fn variation(&self, product_id: ProductId, id: VariationId) -> Option<ProductVariation> {
        self.variations.read().ok()?.get(&(product_id, id)).cloned()
    }
}
