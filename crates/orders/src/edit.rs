use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use draftsync_core::{FeeLineId, LineItemId, ProductId, ShippingLineId, VariationId};

use crate::draft::{Address, OrderStatus};

/// Reference to a purchasable thing in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductRef {
    Product(ProductId),
    Variation(ProductId, VariationId),
}

impl ProductRef {
    pub fn product_id(&self) -> ProductId {
        match self {
            ProductRef::Product(id) => *id,
            ProductRef::Variation(id, _) => *id,
        }
    }

    pub fn variation_id(&self) -> Option<VariationId> {
        match self {
            ProductRef::Product(_) => None,
            ProductRef::Variation(_, id) => Some(*id),
        }
    }
}

/// One user action against the draft.
///
/// Ephemeral: consumed by the synchronizer as soon as it is ingested. A
/// `Set*` with an existing id updates that line; with no id it appends a
/// new one. `SetItem` with quantity zero deletes the line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EditInput {
    SetItem {
        item_id: Option<LineItemId>,
        product: ProductRef,
        quantity: i64,
        discount_cents: u64,
    },
    RemoveItem {
        item_id: LineItemId,
    },
    SetAddresses {
        billing: Option<Address>,
        shipping: Option<Address>,
    },
    SetStatus {
        status: OrderStatus,
    },
    SetFee {
        id: Option<FeeLineId>,
        name: String,
        amount_cents: u64,
    },
    RemoveFee {
        id: FeeLineId,
    },
    SetShipping {
        id: Option<ShippingLineId>,
        method_id: String,
        method_title: String,
        amount_cents: u64,
    },
    RemoveShipping {
        id: ShippingLineId,
    },
    SetCoupon {
        code: String,
    },
    RemoveCoupon {
        code: String,
    },
    SetCustomerNote {
        note: String,
    },
}

/// An edit input stamped by the local edit stream.
///
/// `seq` is strictly increasing in arrival order; reconciliation uses it to
/// tell which edits a given recalculation request already covered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimestampedEdit {
    pub seq: u64,
    pub recorded_at: DateTime<Utc>,
    pub input: EditInput,
}
