use serde::{Deserialize, Serialize};

use draftsync_core::{ProductId, VariationId};

/// Product status lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    Draft,
    Active,
    Archived,
}

/// Immutable product record as mirrored from the remote catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    name: String,
    sku: String,
    /// Price in smallest currency unit (e.g., cents).
    price_cents: u64,
    status: ProductStatus,
}

impl Product {
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        sku: impl Into<String>,
        price_cents: u64,
        status: ProductStatus,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            sku: sku.into(),
            price_cents,
            status,
        }
    }

    pub fn id(&self) -> ProductId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sku(&self) -> &str {
        &self.sku
    }

    pub fn price_cents(&self) -> u64 {
        self.price_cents
    }

    pub fn status(&self) -> ProductStatus {
        self.status
    }

    /// Check if the product can be added to an order (must be Active).
    pub fn can_be_purchased(&self) -> bool {
        self.status == ProductStatus::Active
    }
}

/// A single attribute/option pair distinguishing a variation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariationAttribute {
    pub name: String,
    pub option: String,
}

/// Immutable product-variation record.
///
/// A variation carries its own price; the parent product's status still
/// gates purchasability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductVariation {
    id: VariationId,
    product_id: ProductId,
    /// Price in smallest currency unit (e.g., cents).
    price_cents: u64,
    attributes: Vec<VariationAttribute>,
}

impl ProductVariation {
    pub fn new(
        id: VariationId,
        product_id: ProductId,
        price_cents: u64,
        attributes: Vec<VariationAttribute>,
    ) -> Self {
        Self {
            id,
            product_id,
            price_cents,
            attributes,
        }
    }

    pub fn id(&self) -> VariationId {
        self.id
    }

    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    pub fn price_cents(&self) -> u64 {
        self.price_cents
    }

    pub fn attributes(&self) -> &[VariationAttribute] {
        &self.attributes
    }
}
