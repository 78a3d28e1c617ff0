//! Folds edit inputs into draft snapshots.
//!
//! Every function here is pure with respect to the draft: the input snapshot
//! is never mutated, a new one is returned. Product references are resolved
//! against the catalog at apply time, so an edit can fail if the product has
//! vanished locally since the user tapped it.

use draftsync_catalog::CatalogReader;
use draftsync_core::{DraftError, DraftResult, FeeLineId, LineItemId, ShippingLineId};

use crate::draft::{CouponLine, DraftOrder, FeeLine, LineItem, ShippingLine};
use crate::edit::{EditInput, ProductRef, TimestampedEdit};

/// Apply a single edit input to a draft, producing the next snapshot.
///
/// Computed-only fields (taxes, order totals, coupon discounts) are never
/// touched; a changed line has its tax cleared so a stale value is not
/// carried across a quantity change.
pub fn apply_edit<C: CatalogReader>(
    catalog: &C,
    draft: &DraftOrder,
    input: &EditInput,
) -> DraftResult<DraftOrder> {
    match input {
        EditInput::SetItem {
            item_id,
            product,
            quantity,
            discount_cents,
        } => set_item(catalog, draft, *item_id, *product, *quantity, *discount_cents),
        EditInput::RemoveItem { item_id } => {
            let mut items = draft.line_items().to_vec();
            items.retain(|item| item.id != *item_id);
            Ok(draft.clone().with_line_items(items))
        }
        EditInput::SetAddresses { billing, shipping } => Ok(draft
            .clone()
            .with_billing_address(billing.clone())
            .with_shipping_address(shipping.clone())),
        EditInput::SetStatus { status } => Ok(draft.clone().with_status(*status)),
        EditInput::SetFee {
            id,
            name,
            amount_cents,
        } => set_fee(draft, *id, name, *amount_cents),
        EditInput::RemoveFee { id } => {
            let mut fees = draft.fee_lines().to_vec();
            fees.retain(|fee| fee.id != *id);
            Ok(draft.clone().with_fee_lines(fees))
        }
        EditInput::SetShipping {
            id,
            method_id,
            method_title,
            amount_cents,
        } => set_shipping(draft, *id, method_id, method_title, *amount_cents),
        EditInput::RemoveShipping { id } => {
            let mut lines = draft.shipping_lines().to_vec();
            lines.retain(|line| line.id != *id);
            Ok(draft.clone().with_shipping_lines(lines))
        }
        EditInput::SetCoupon { code } => set_coupon(draft, code),
        EditInput::RemoveCoupon { code } => {
            let mut coupons = draft.coupon_lines().to_vec();
            coupons.retain(|coupon| coupon.code != *code);
            Ok(draft.clone().with_coupon_lines(coupons))
        }
        EditInput::SetCustomerNote { note } => {
            let note = if note.is_empty() {
                None
            } else {
                Some(note.clone())
            };
            Ok(draft.clone().with_customer_note(note))
        }
    }
}

/// Order-preserving fold of timestamped edits into a draft.
///
/// An edit that no longer applies (e.g. the product vanished from the local
/// catalog mid-flight) is logged and skipped; the draft is never corrupted.
pub fn apply_edits<'a, C, I>(catalog: &C, draft: &DraftOrder, edits: I) -> DraftOrder
where
    C: CatalogReader,
    I: IntoIterator<Item = &'a TimestampedEdit>,
{
    let mut current = draft.clone();
    for edit in edits {
        match apply_edit(catalog, &current, &edit.input) {
            Ok(next) => current = next,
            Err(err) => {
                tracing::warn!(seq = edit.seq, "dropping edit that no longer applies: {err}");
            }
        }
    }
    current
}

fn set_item<C: CatalogReader>(
    catalog: &C,
    draft: &DraftOrder,
    item_id: Option<LineItemId>,
    product: ProductRef,
    quantity: i64,
    discount_cents: u64,
) -> DraftResult<DraftOrder> {
    if quantity < 0 {
        return Err(DraftError::validation("quantity must not be negative"));
    }

    // Quantity zero deletes the referenced line.
    if quantity == 0 {
        let Some(item_id) = item_id else {
            return Err(DraftError::validation(
                "quantity must be positive when adding an item",
            ));
        };
        let mut items = draft.line_items().to_vec();
        items.retain(|item| item.id != item_id);
        return Ok(draft.clone().with_line_items(items));
    }

    let parent = catalog
        .product(product.product_id())
        .ok_or_else(|| DraftError::product_not_found(product.product_id().to_string()))?;

    if !parent.can_be_purchased() {
        return Err(DraftError::validation(format!(
            "product '{}' cannot be purchased",
            parent.sku()
        )));
    }

    let unit_price_cents = match product {
        ProductRef::Product(_) => parent.price_cents(),
        ProductRef::Variation(product_id, variation_id) => catalog
            .variation(product_id, variation_id)
            .ok_or_else(|| DraftError::product_not_found(variation_id.to_string()))?
            .price_cents(),
    };

    let subtotal_cents = unit_price_cents * quantity as u64;
    if discount_cents > subtotal_cents {
        return Err(DraftError::validation("discount exceeds line subtotal"));
    }

    let item = LineItem {
        id: item_id.unwrap_or_else(LineItemId::new),
        product_id: product.product_id(),
        variation_id: product.variation_id(),
        name: parent.name().to_string(),
        quantity,
        unit_price_cents,
        discount_cents,
        subtotal_cents,
        total_cents: subtotal_cents - discount_cents,
        // Stale tax must not survive a quantity change; the next
        // recalculation restores the authoritative value.
        total_tax_cents: 0,
    };

    let mut items = draft.line_items().to_vec();
    match items.iter().position(|existing| existing.id == item.id) {
        Some(index) => items[index] = item,
        None => items.push(item),
    }

    Ok(draft.clone().with_line_items(items))
}

fn set_fee(
    draft: &DraftOrder,
    id: Option<FeeLineId>,
    name: &str,
    amount_cents: u64,
) -> DraftResult<DraftOrder> {
    if name.is_empty() {
        return Err(DraftError::validation("fee name must not be empty"));
    }

    let fee = FeeLine {
        id: id.unwrap_or_else(FeeLineId::new),
        name: name.to_string(),
        amount_cents,
        total_tax_cents: 0,
    };

    let mut fees = draft.fee_lines().to_vec();
    match fees.iter().position(|existing| existing.id == fee.id) {
        Some(index) => fees[index] = fee,
        None => fees.push(fee),
    }

    Ok(draft.clone().with_fee_lines(fees))
}

fn set_shipping(
    draft: &DraftOrder,
    id: Option<ShippingLineId>,
    method_id: &str,
    method_title: &str,
    amount_cents: u64,
) -> DraftResult<DraftOrder> {
    if method_id.is_empty() {
        return Err(DraftError::validation("shipping method id must not be empty"));
    }

    let line = ShippingLine {
        id: id.unwrap_or_else(ShippingLineId::new),
        method_id: method_id.to_string(),
        method_title: method_title.to_string(),
        amount_cents,
        total_tax_cents: 0,
    };

    let mut lines = draft.shipping_lines().to_vec();
    match lines.iter().position(|existing| existing.id == line.id) {
        Some(index) => lines[index] = line,
        None => lines.push(line),
    }

    Ok(draft.clone().with_shipping_lines(lines))
}

fn set_coupon(draft: &DraftOrder, code: &str) -> DraftResult<DraftOrder> {
    if code.is_empty() {
        return Err(DraftError::validation("coupon code must not be empty"));
    }

    if draft.coupon_lines().iter().any(|coupon| coupon.code == code) {
        return Ok(draft.clone());
    }

    let mut coupons = draft.coupon_lines().to_vec();
    coupons.push(CouponLine {
        code: code.to_string(),
        discount_cents: 0,
    });

    Ok(draft.clone().with_coupon_lines(coupons))
}
