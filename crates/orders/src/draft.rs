use serde::{Deserialize, Serialize};

use draftsync_core::{FeeLineId, LineItemId, OrderId, ProductId, ShippingLineId, SiteId, VariationId};

/// Order status lifecycle as the remote understands it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[serde(rename = "auto-draft")]
    AutoDraft,
    Pending,
    Processing,
    #[serde(rename = "on-hold")]
    OnHold,
    Completed,
    Cancelled,
}

/// Postal address attached to an order (billing or shipping).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub first_name: String,
    pub last_name: String,
    pub company: Option<String>,
    pub address_1: String,
    pub address_2: Option<String>,
    pub city: String,
    pub state: String,
    pub postcode: String,
    pub country: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// A product (or variation) line on the draft.
///
/// `subtotal_cents` and `total_cents` are derived locally from the unit
/// price; `total_tax_cents` is computed-only and owned by the remote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: LineItemId,
    pub product_id: ProductId,
    pub variation_id: Option<VariationId>,
    pub name: String,
    pub quantity: i64,
    /// Price in smallest currency unit (e.g., cents).
    pub unit_price_cents: u64,
    pub discount_cents: u64,
    pub subtotal_cents: u64,
    pub total_cents: u64,
    pub total_tax_cents: u64,
}

/// A flat fee line. `total_tax_cents` is computed-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeLine {
    pub id: FeeLineId,
    pub name: String,
    pub amount_cents: u64,
    pub total_tax_cents: u64,
}

/// A shipping method line. `total_tax_cents` is computed-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingLine {
    pub id: ShippingLineId,
    pub method_id: String,
    pub method_title: String,
    pub amount_cents: u64,
    pub total_tax_cents: u64,
}

/// A coupon applied to the order. The discount is computed-only; locally we
/// only know the code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CouponLine {
    pub code: String,
    pub discount_cents: u64,
}

/// Order-level totals. Entirely computed-only: the remote recalculation is
/// the single source of truth for every field here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTotals {
    pub items_subtotal_cents: u64,
    pub discount_total_cents: u64,
    pub shipping_total_cents: u64,
    pub total_tax_cents: u64,
    pub total_cents: u64,
}

/// Snapshot of an order being composed.
///
/// Replaced wholesale on every change; the `with_*` constructors are the
/// only way to produce a modified snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftOrder {
    site_id: SiteId,
    remote_id: Option<OrderId>,
    status: OrderStatus,
    line_items: Vec<LineItem>,
    billing_address: Option<Address>,
    shipping_address: Option<Address>,
    fee_lines: Vec<FeeLine>,
    shipping_lines: Vec<ShippingLine>,
    coupon_lines: Vec<CouponLine>,
    customer_note: Option<String>,
    totals: OrderTotals,
}

impl DraftOrder {
    /// A fresh, never-synced draft for the given site.
    pub fn empty(site_id: SiteId) -> Self {
        Self {
            site_id,
            remote_id: None,
            status: OrderStatus::AutoDraft,
            line_items: Vec::new(),
            billing_address: None,
            shipping_address: None,
            fee_lines: Vec::new(),
            shipping_lines: Vec::new(),
            coupon_lines: Vec::new(),
            customer_note: None,
            totals: OrderTotals::default(),
        }
    }

    pub fn site_id(&self) -> SiteId {
        self.site_id
    }

    pub fn remote_id(&self) -> Option<OrderId> {
        self.remote_id
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn line_items(&self) -> &[LineItem] {
        &self.line_items
    }

    pub fn billing_address(&self) -> Option<&Address> {
        self.billing_address.as_ref()
    }

    pub fn shipping_address(&self) -> Option<&Address> {
        self.shipping_address.as_ref()
    }

    pub fn fee_lines(&self) -> &[FeeLine] {
        &self.fee_lines
    }

    pub fn shipping_lines(&self) -> &[ShippingLine] {
        &self.shipping_lines
    }

    pub fn coupon_lines(&self) -> &[CouponLine] {
        &self.coupon_lines
    }

    pub fn customer_note(&self) -> Option<&str> {
        self.customer_note.as_deref()
    }

    pub fn totals(&self) -> &OrderTotals {
        &self.totals
    }

    pub fn line_item(&self, id: LineItemId) -> Option<&LineItem> {
        self.line_items.iter().find(|item| item.id == id)
    }

    /// True once the remote has acknowledged the order at least once.
    pub fn exists_remotely(&self) -> bool {
        self.remote_id.is_some()
    }

    pub fn with_remote_id(mut self, remote_id: OrderId) -> Self {
        self.remote_id = Some(remote_id);
        self
    }

    pub fn with_status(mut self, status: OrderStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_line_items(mut self, line_items: Vec<LineItem>) -> Self {
        self.line_items = line_items;
        self
    }

    pub fn with_billing_address(mut self, billing_address: Option<Address>) -> Self {
        self.billing_address = billing_address;
        self
    }

    pub fn with_shipping_address(mut self, shipping_address: Option<Address>) -> Self {
        self.shipping_address = shipping_address;
        self
    }

    pub fn with_fee_lines(mut self, fee_lines: Vec<FeeLine>) -> Self {
        self.fee_lines = fee_lines;
        self
    }

    pub fn with_shipping_lines(mut self, shipping_lines: Vec<ShippingLine>) -> Self {
        self.shipping_lines = shipping_lines;
        self
    }

    pub fn with_coupon_lines(mut self, coupon_lines: Vec<CouponLine>) -> Self {
        self.coupon_lines = coupon_lines;
        self
    }

    pub fn with_customer_note(mut self, customer_note: Option<String>) -> Self {
        self.customer_note = customer_note;
        self
    }

    pub fn with_totals(mut self, totals: OrderTotals) -> Self {
        self.totals = totals;
        self
    }
}
