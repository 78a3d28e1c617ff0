//! The draft synchronizer engine.
//!
//! Owns the canonical draft and runs the edit → debounce → recalculate →
//! reconcile loop. The engine is deliberately synchronous: every
//! time-sensitive operation takes `now`, requests are returned to the
//! caller instead of being sent, and responses are fed back in. The tokio
//! driver wires it to a real clock and client; tests drive it directly.

use std::time::Duration;

use chrono::{DateTime, Utc};

use draftsync_catalog::CatalogReader;
use draftsync_core::{DraftError, DraftResult};
use draftsync_events::EventBus;
use draftsync_orders::{DraftOrder, EditInput, TimestampedEdit, apply_edit, apply_edits};

use crate::debounce::DebounceTimer;
use crate::event::SyncEvent;
use crate::remote::{RecalcError, RecalcRequest};
use crate::state::SyncState;
use crate::stream::EditStream;

/// Tunables for the synchronizer.
#[derive(Debug, Clone, Copy)]
pub struct SyncConfig {
    /// Quiescence window between the last edit and the recalculation
    /// request. Tests pass an explicit value; never assume the default is
    /// meaningful.
    pub debounce_window: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            debounce_window: Duration::from_millis(500),
        }
    }
}

/// Descriptor of the single request currently in flight.
#[derive(Debug, Clone, Copy)]
struct InFlight {
    request_seq: u64,
    /// Highest edit sequence number incorporated in the candidate. Edits
    /// above this arrived after dispatch and must be replayed on top of
    /// the response.
    edit_floor: u64,
    blocking: bool,
}

/// Reconciled state holder plus orchestration.
///
/// Invariants:
/// - at most one request in flight; edits during flight queue and trigger
///   exactly one follow-up after resolution;
/// - `working` always equals the canonical draft with every pending edit
///   applied in arrival order;
/// - pending edits are only discharged by a successful reconciliation that
///   covered them.
pub struct DraftSynchronizer<C, B> {
    catalog: C,
    bus: B,
    stream: EditStream,
    /// Last reconciled draft (or the initial draft before any sync).
    canonical: DraftOrder,
    /// What observers see: canonical + pending edits.
    working: DraftOrder,
    pending: Vec<TimestampedEdit>,
    timer: DebounceTimer,
    state: SyncState,
    in_flight: Option<InFlight>,
    next_request_seq: u64,
    commit_requested: bool,
}

impl<C, B> DraftSynchronizer<C, B>
where
    C: CatalogReader,
    B: EventBus<SyncEvent>,
{
    pub fn new(catalog: C, bus: B, initial: DraftOrder, config: SyncConfig) -> Self {
        Self {
            catalog,
            bus,
            stream: EditStream::new(),
            working: initial.clone(),
            canonical: initial,
            pending: Vec::new(),
            timer: DebounceTimer::new(config.debounce_window),
            state: SyncState::Idle,
            in_flight: None,
            next_request_seq: 1,
            commit_requested: false,
        }
    }

    /// The draft observers should render: canonical + pending edits.
    pub fn order(&self) -> &DraftOrder {
        &self.working
    }

    /// The last reconciled draft.
    pub fn canonical(&self) -> &DraftOrder {
        &self.canonical
    }

    pub fn state(&self) -> &SyncState {
        &self.state
    }

    pub fn has_pending_edits(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Deadline the caller should wake up at to issue the next request.
    /// `None` while a request is in flight: the resolution drives the
    /// follow-up, not the timer.
    pub fn next_deadline(&self) -> Option<DateTime<Utc>> {
        if self.in_flight.is_some() {
            None
        } else {
            self.timer.deadline()
        }
    }

    /// Ingest one user action.
    ///
    /// The edit is stamped, applied to the working draft, and buffered for
    /// the next recalculation. An edit that fails its local preconditions
    /// is logged and dropped without touching the draft. Rejected outright
    /// while a blocking sync is in flight.
    pub fn submit(&mut self, input: EditInput, now: DateTime<Utc>) -> DraftResult<()> {
        if self.state.blocks_edits() {
            return Err(DraftError::invariant(
                "editing is blocked while the order is being finalized",
            ));
        }

        let edit = self.stream.record(input, now);
        match apply_edit(&self.catalog, &self.working, &edit.input) {
            Ok(next) => {
                self.working = next;
                self.pending.push(edit);
            }
            Err(err) => {
                tracing::warn!(seq = edit.seq, "dropping edit: {err}");
                return Err(err);
            }
        }

        // A fresh edit supersedes a surfaced failure; the next debounce
        // window will issue a new candidate including the old edits.
        if self.state.is_error() {
            self.set_state(SyncState::Idle, now);
        }

        self.timer.arm(now);
        self.publish_draft(now);
        Ok(())
    }

    /// Issue a request if the debounce window has elapsed.
    ///
    /// While a request is in flight the candidate is held; the follow-up is
    /// issued by `resolve`, never here. That is what bounds the system to
    /// one outstanding request.
    pub fn poll(&mut self, now: DateTime<Utc>) -> Option<RecalcRequest> {
        if self.in_flight.is_some() {
            return None;
        }
        if !self.timer.fire_due(now) {
            return None;
        }
        if self.pending.is_empty() {
            return None;
        }
        Some(self.issue(now))
    }

    /// Reconcile a successful response.
    ///
    /// Edits covered by the request are discharged; edits recorded after
    /// dispatch are replayed on top of the response (local wins for
    /// editable fields, the response stays authoritative for computed
    /// ones). Returns the follow-up request if anything queued up
    /// mid-flight.
    pub fn resolve(&mut self, response: DraftOrder, now: DateTime<Utc>) -> Option<RecalcRequest> {
        let Some(in_flight) = self.in_flight.take() else {
            tracing::warn!("ignoring recalculation response with no request in flight");
            return None;
        };

        tracing::debug!(
            request_seq = in_flight.request_seq,
            replayed = self
                .pending
                .iter()
                .filter(|edit| edit.seq > in_flight.edit_floor)
                .count(),
            "reconciling recalculation response"
        );

        self.pending.retain(|edit| edit.seq > in_flight.edit_floor);
        let merged = apply_edits(&self.catalog, &response, self.pending.iter());
        self.canonical = merged.clone();
        self.working = merged;

        if in_flight.blocking {
            self.commit_requested = false;
        }

        self.publish_draft(now);

        if !self.pending.is_empty() || self.commit_requested {
            return Some(self.issue(now));
        }

        self.set_state(SyncState::Idle, now);
        None
    }

    /// Record a failed request.
    ///
    /// The last-known-good draft and every pending edit survive; nothing is
    /// retried automatically.
    pub fn fail(&mut self, error: RecalcError, now: DateTime<Utc>) {
        if self.in_flight.take().is_none() {
            tracing::warn!("ignoring recalculation failure with no request in flight");
            return;
        }

        tracing::error!("order recalculation failed: {error}");
        self.set_state(SyncState::Error(error), now);
    }

    /// User-initiated retry after a failure. Re-issues the same candidate
    /// when no edits intervened.
    pub fn retry(&mut self, now: DateTime<Utc>) -> Option<RecalcRequest> {
        if !self.state.is_error() {
            return None;
        }
        if self.pending.is_empty() && !self.commit_requested && self.canonical.exists_remotely() {
            self.set_state(SyncState::Idle, now);
            return None;
        }
        Some(self.issue(now))
    }

    /// Finalize the order: skip the debounce and sync now, blocking
    /// further edits until the remote confirms. If a request is already in
    /// flight, the follow-up issued at resolution carries the blocking
    /// flag instead.
    pub fn commit(&mut self, now: DateTime<Utc>) -> Option<RecalcRequest> {
        self.commit_requested = true;
        self.timer.cancel();
        if self.in_flight.is_some() {
            return None;
        }
        Some(self.issue(now))
    }

    fn issue(&mut self, now: DateTime<Utc>) -> RecalcRequest {
        // The initial remote create blocks like a commit: there is no
        // order to keep editing against until the remote acknowledges it.
        let blocking = self.commit_requested || !self.canonical.exists_remotely();

        let request_seq = self.next_request_seq;
        self.next_request_seq += 1;

        self.in_flight = Some(InFlight {
            request_seq,
            edit_floor: self.stream.last_seq(),
            blocking,
        });
        self.timer.cancel();
        self.set_state(SyncState::Syncing { blocking }, now);

        tracing::debug!(request_seq, blocking, "issuing recalculation request");

        RecalcRequest {
            candidate: self.working.clone(),
            issued_at: now,
            request_seq,
            blocking,
        }
    }

    fn set_state(&mut self, state: SyncState, now: DateTime<Utc>) {
        if self.state == state {
            return;
        }
        self.state = state;
        if let Err(err) = self.bus.publish(SyncEvent::StateChanged {
            state: self.state.clone(),
            at: now,
        }) {
            tracing::warn!("failed to publish sync state change: {err:?}");
        }
    }

    fn publish_draft(&self, now: DateTime<Utc>) {
        if let Err(err) = self.bus.publish(SyncEvent::DraftUpdated {
            order: self.working.clone(),
            at: now,
        }) {
            tracing::warn!("failed to publish draft update: {err:?}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use draftsync_catalog::{InMemoryCatalog, Product, ProductStatus};
    use draftsync_core::{OrderId, ProductId, SiteId};
    use draftsync_events::{InMemoryEventBus, Subscription};
    use draftsync_orders::{OrderStatus, OrderTotals, ProductRef};

    use crate::clock::{Clock, ManualClock};

    const WINDOW: Duration = Duration::from_millis(500);

    type TestSynchronizer =
        DraftSynchronizer<Arc<InMemoryCatalog>, Arc<InMemoryEventBus<SyncEvent>>>;

    struct Fixture {
        synchronizer: TestSynchronizer,
        clock: ManualClock,
        catalog: Arc<InMemoryCatalog>,
        events: Subscription<SyncEvent>,
        product_id: ProductId,
    }

    /// A draft that the remote already knows, so regular recalculations are
    /// non-blocking.
    fn existing_draft() -> DraftOrder {
        DraftOrder::empty(SiteId::new()).with_remote_id(OrderId::new())
    }

    fn fixture_with(initial: DraftOrder) -> Fixture {
        let catalog = Arc::new(InMemoryCatalog::new());
        let product_id = ProductId::new();
        catalog.insert_product(Product::new(
            product_id,
            "Mug",
            "MUG-1",
            1500,
            ProductStatus::Active,
        ));

        let bus = Arc::new(InMemoryEventBus::new());
        let events = bus.subscribe();
        let synchronizer = DraftSynchronizer::new(
            Arc::clone(&catalog),
            Arc::clone(&bus),
            initial,
            SyncConfig {
                debounce_window: WINDOW,
            },
        );

        Fixture {
            synchronizer,
            clock: ManualClock::new(Utc::now()),
            catalog,
            events,
            product_id,
        }
    }

    fn fixture() -> Fixture {
        fixture_with(existing_draft())
    }

    fn set_quantity(product_id: ProductId, quantity: i64) -> EditInput {
        EditInput::SetItem {
            item_id: None,
            product: ProductRef::Product(product_id),
            quantity,
            discount_cents: 0,
        }
    }

    /// Simulate the remote: fill in computed fields, assign an id on
    /// create, echo everything else back.
    fn recalculated(candidate: &DraftOrder) -> DraftOrder {
        let items_subtotal: u64 = candidate
            .line_items()
            .iter()
            .map(|item| item.subtotal_cents)
            .sum();
        let discount: u64 = candidate
            .line_items()
            .iter()
            .map(|item| item.discount_cents)
            .sum();
        let shipping: u64 = candidate
            .shipping_lines()
            .iter()
            .map(|line| line.amount_cents)
            .sum();
        let fees: u64 = candidate
            .fee_lines()
            .iter()
            .map(|fee| fee.amount_cents)
            .sum();
        let tax = (items_subtotal - discount) / 10;

        let response = candidate.clone().with_totals(OrderTotals {
            items_subtotal_cents: items_subtotal,
            discount_total_cents: discount,
            shipping_total_cents: shipping,
            total_tax_cents: tax,
            total_cents: items_subtotal - discount + shipping + fees + tax,
        });

        match candidate.remote_id() {
            Some(_) => response,
            None => response.with_remote_id(OrderId::new()),
        }
    }

    #[test]
    fn candidate_equals_the_fold_of_all_inputs_in_order() {
        let mut f = fixture();
        let initial = f.synchronizer.canonical().clone();

        let edits = [
            set_quantity(f.product_id, 1),
            EditInput::SetStatus { status: OrderStatus::Pending },
            EditInput::SetCustomerNote {
                note: "ring twice".to_string(),
            },
        ];
        for (i, edit) in edits.iter().enumerate() {
            f.synchronizer
                .submit(edit.clone(), f.clock.advance(Duration::from_millis(10 * i as u64 + 1)))
                .unwrap();
        }

        let request = f.synchronizer.poll(f.clock.advance(WINDOW)).unwrap();

        // Independently fold the same inputs over the prior canonical draft.
        let mut expected = initial;
        for edit in &edits {
            expected = apply_edit(f.catalog.as_ref(), &expected, edit).unwrap();
        }
        // Line ids are minted inside the synchronizer's fold; compare the
        // editable content field by field.
        assert_eq!(request.candidate.status(), expected.status());
        assert_eq!(request.candidate.customer_note(), expected.customer_note());
        assert_eq!(request.candidate.line_items().len(), expected.line_items().len());
        assert_eq!(
            request.candidate.line_items()[0].quantity,
            expected.line_items()[0].quantity
        );
        assert_eq!(
            request.candidate.line_items()[0].subtotal_cents,
            expected.line_items()[0].subtotal_cents
        );
    }

    #[test]
    fn rapid_edits_within_the_window_issue_a_single_request() {
        let mut f = fixture();

        f.synchronizer
            .submit(set_quantity(f.product_id, 1), f.clock.now())
            .unwrap();
        let item_id = f.synchronizer.order().line_items()[0].id;

        // Two quantity updates 50ms apart, both inside the window.
        for _ in 0..2 {
            let now = f.clock.advance(Duration::from_millis(50));
            f.synchronizer
                .submit(
                    EditInput::SetItem {
                        item_id: Some(item_id),
                        product: ProductRef::Product(f.product_id),
                        quantity: 3,
                        discount_cents: 0,
                    },
                    now,
                )
                .unwrap();
        }

        // Nothing fires before the window elapses.
        assert!(f.synchronizer.poll(f.clock.advance(Duration::from_millis(100))).is_none());

        let request = f.synchronizer.poll(f.clock.advance(WINDOW)).unwrap();
        assert_eq!(request.candidate.line_items().len(), 1);
        assert_eq!(request.candidate.line_items()[0].quantity, 3);

        // And exactly one: the timer is spent.
        assert!(f.synchronizer.resolve(recalculated(&request.candidate), f.clock.now()).is_none());
        assert!(f.synchronizer.poll(f.clock.advance(WINDOW)).is_none());
    }

    #[test]
    fn edit_during_flight_queues_exactly_one_follow_up() {
        let mut f = fixture();

        f.synchronizer
            .submit(set_quantity(f.product_id, 2), f.clock.now())
            .unwrap();
        let request = f.synchronizer.poll(f.clock.advance(WINDOW)).unwrap();

        // Mid-flight edit: queued, no second request from the timer.
        f.synchronizer
            .submit(
                EditInput::SetStatus { status: OrderStatus::Pending },
                f.clock.advance(Duration::from_millis(50)),
            )
            .unwrap();
        assert!(f.synchronizer.poll(f.clock.advance(WINDOW)).is_none());

        let follow_up = f
            .synchronizer
            .resolve(recalculated(&request.candidate), f.clock.now())
            .expect("one follow-up for the mid-flight edit");
        assert_eq!(follow_up.candidate.status(), OrderStatus::Pending);

        // Resolving the follow-up leaves nothing queued.
        assert!(f
            .synchronizer
            .resolve(recalculated(&follow_up.candidate), f.clock.now())
            .is_none());
        assert!(f.synchronizer.poll(f.clock.advance(WINDOW)).is_none());
        assert!(f.synchronizer.state().is_idle());
    }

    #[test]
    fn reconciling_the_same_response_twice_is_idempotent() {
        let mut f = fixture();

        f.synchronizer
            .submit(set_quantity(f.product_id, 2), f.clock.now())
            .unwrap();
        let request = f.synchronizer.poll(f.clock.advance(WINDOW)).unwrap();
        let response = recalculated(&request.candidate);

        f.synchronizer.resolve(response.clone(), f.clock.now());
        let first = f.synchronizer.canonical().clone();

        // Force a second cycle with the identical response and no
        // intervening edits.
        let commit = f.synchronizer.commit(f.clock.now()).unwrap();
        assert_eq!(commit.candidate, first);
        f.synchronizer.resolve(response, f.clock.now());

        assert_eq!(f.synchronizer.canonical(), &first);
    }

    #[test]
    fn local_edit_after_dispatch_wins_over_stale_remote_value() {
        let mut f = fixture();

        f.synchronizer
            .submit(set_quantity(f.product_id, 2), f.clock.now())
            .unwrap();
        let request = f.synchronizer.poll(f.clock.advance(WINDOW)).unwrap();

        // The user changes the status while the request is in flight; the
        // response still carries the old status.
        f.synchronizer
            .submit(
                EditInput::SetStatus { status: OrderStatus::OnHold },
                f.clock.advance(Duration::from_millis(20)),
            )
            .unwrap();

        let response = recalculated(&request.candidate).with_status(OrderStatus::Pending);
        f.synchronizer.resolve(response, f.clock.now());

        assert_eq!(f.synchronizer.canonical().status(), OrderStatus::OnHold);
    }

    #[test]
    fn computed_fields_come_from_the_remote() {
        let mut f = fixture();

        f.synchronizer
            .submit(set_quantity(f.product_id, 2), f.clock.now())
            .unwrap();
        let request = f.synchronizer.poll(f.clock.advance(WINDOW)).unwrap();
        let response = recalculated(&request.candidate);
        let remote_totals = *response.totals();

        f.synchronizer.resolve(response, f.clock.now());

        assert_eq!(f.synchronizer.canonical().totals(), &remote_totals);
        assert_ne!(remote_totals, OrderTotals::default());
    }

    #[test]
    fn shipping_line_added_mid_flight_survives_the_merge() {
        let mut f = fixture();

        f.synchronizer
            .submit(set_quantity(f.product_id, 1), f.clock.now())
            .unwrap();
        let request = f.synchronizer.poll(f.clock.advance(WINDOW)).unwrap();

        f.synchronizer
            .submit(
                EditInput::SetShipping {
                    id: None,
                    method_id: "flat_rate".to_string(),
                    method_title: "Flat rate".to_string(),
                    amount_cents: 600,
                },
                f.clock.advance(Duration::from_millis(30)),
            )
            .unwrap();

        let response = recalculated(&request.candidate);
        let remote_totals = *response.totals();
        let follow_up = f
            .synchronizer
            .resolve(response, f.clock.now())
            .expect("exactly one follow-up");

        // Merged draft: remote-computed totals plus the new shipping line.
        let merged = f.synchronizer.canonical();
        assert_eq!(merged.totals(), &remote_totals);
        assert_eq!(merged.shipping_lines().len(), 1);
        assert_eq!(merged.shipping_lines()[0].method_id, "flat_rate");
        assert_eq!(follow_up.candidate.shipping_lines().len(), 1);

        assert!(f
            .synchronizer
            .resolve(recalculated(&follow_up.candidate), f.clock.now())
            .is_none());
    }

    #[test]
    fn failure_preserves_the_draft_and_retry_reissues_the_same_candidate() {
        let mut f = fixture();
        let before = f.synchronizer.canonical().clone();

        f.synchronizer
            .submit(set_quantity(f.product_id, 2), f.clock.now())
            .unwrap();
        let request = f.synchronizer.poll(f.clock.advance(WINDOW)).unwrap();

        f.synchronizer.fail(
            RecalcError::Validation {
                field: Some("billing.postcode".to_string()),
                message: "invalid postcode".to_string(),
            },
            f.clock.now(),
        );

        assert_eq!(f.synchronizer.canonical(), &before);
        assert!(f.synchronizer.state().is_error());
        assert!(f.synchronizer.has_pending_edits());

        let retried = f.synchronizer.retry(f.clock.now()).unwrap();
        assert_eq!(retried.candidate, request.candidate);
        assert!(f.synchronizer.state().is_syncing());
    }

    #[test]
    fn new_edit_clears_a_surfaced_error() {
        let mut f = fixture();

        f.synchronizer
            .submit(set_quantity(f.product_id, 1), f.clock.now())
            .unwrap();
        let request = f.synchronizer.poll(f.clock.advance(WINDOW)).unwrap();
        f.synchronizer
            .fail(RecalcError::Network("connection reset".to_string()), f.clock.now());
        assert!(f.synchronizer.state().is_error());

        f.synchronizer
            .submit(
                EditInput::SetCustomerNote { note: "asap".to_string() },
                f.clock.advance(Duration::from_millis(10)),
            )
            .unwrap();
        assert!(f.synchronizer.state().is_idle());

        // The next window issues a candidate carrying both the old and the
        // new edits.
        let next = f.synchronizer.poll(f.clock.advance(WINDOW)).unwrap();
        assert_eq!(next.candidate.line_items().len(), 1);
        assert_eq!(next.candidate.customer_note(), Some("asap"));
        assert!(next.candidate.line_items()[0].quantity == 1);
        assert_ne!(next.request_seq, request.request_seq);
    }

    #[test]
    fn initial_remote_create_is_blocking() {
        let mut f = fixture_with(DraftOrder::empty(SiteId::new()));

        f.synchronizer
            .submit(set_quantity(f.product_id, 1), f.clock.now())
            .unwrap();
        let request = f.synchronizer.poll(f.clock.advance(WINDOW)).unwrap();
        assert!(request.blocking);
        assert!(f.synchronizer.state().blocks_edits());

        // Edits are rejected, not queued, while the create is in flight.
        let err = f
            .synchronizer
            .submit(set_quantity(f.product_id, 5), f.clock.now())
            .unwrap_err();
        assert!(matches!(err, DraftError::InvariantViolation(_)));

        f.synchronizer.resolve(recalculated(&request.candidate), f.clock.now());
        assert!(f.synchronizer.canonical().exists_remotely());
        assert!(f.synchronizer.state().is_idle());

        // Subsequent recalculations are background syncs.
        f.synchronizer
            .submit(set_quantity(f.product_id, 2), f.clock.now())
            .unwrap();
        let request = f.synchronizer.poll(f.clock.advance(WINDOW)).unwrap();
        assert!(!request.blocking);
    }

    #[test]
    fn commit_skips_the_debounce_and_blocks_edits() {
        let mut f = fixture();

        f.synchronizer
            .submit(set_quantity(f.product_id, 1), f.clock.now())
            .unwrap();

        // No window has elapsed; commit issues immediately.
        let request = f.synchronizer.commit(f.clock.now()).unwrap();
        assert!(request.blocking);
        assert!(f.synchronizer.state().blocks_edits());

        f.synchronizer.resolve(recalculated(&request.candidate), f.clock.now());
        assert!(f.synchronizer.state().is_idle());
    }

    #[test]
    fn commit_during_flight_makes_the_follow_up_blocking() {
        let mut f = fixture();

        f.synchronizer
            .submit(set_quantity(f.product_id, 1), f.clock.now())
            .unwrap();
        let request = f.synchronizer.poll(f.clock.advance(WINDOW)).unwrap();
        assert!(!request.blocking);

        assert!(f.synchronizer.commit(f.clock.now()).is_none());

        let follow_up = f
            .synchronizer
            .resolve(recalculated(&request.candidate), f.clock.now())
            .expect("commit follow-up");
        assert!(follow_up.blocking);

        f.synchronizer
            .resolve(recalculated(&follow_up.candidate), f.clock.now());
        assert!(f.synchronizer.state().is_idle());
    }

    #[test]
    fn dropped_edit_leaves_draft_and_queue_untouched() {
        let mut f = fixture();
        let missing = ProductId::new();

        let err = f
            .synchronizer
            .submit(set_quantity(missing, 1), f.clock.now())
            .unwrap_err();
        assert!(matches!(err, DraftError::ProductNotFound(_)));
        assert!(f.synchronizer.order().line_items().is_empty());
        assert!(!f.synchronizer.has_pending_edits());
        assert!(f.synchronizer.poll(f.clock.advance(WINDOW)).is_none());
    }

    #[test]
    fn stray_response_without_a_request_is_ignored() {
        let mut f = fixture();
        let before = f.synchronizer.canonical().clone();

        let stray = recalculated(&before);
        assert!(f.synchronizer.resolve(stray, f.clock.now()).is_none());
        assert_eq!(f.synchronizer.canonical(), &before);
        assert!(f.synchronizer.state().is_idle());
    }

    #[test]
    fn observers_see_draft_updates_and_state_transitions_in_order() {
        let mut f = fixture();

        f.synchronizer
            .submit(set_quantity(f.product_id, 2), f.clock.now())
            .unwrap();
        let request = f.synchronizer.poll(f.clock.advance(WINDOW)).unwrap();
        f.synchronizer.resolve(recalculated(&request.candidate), f.clock.now());

        let events = f.events.drain();
        let mut kinds: Vec<&'static str> = Vec::new();
        let mut states: Vec<SyncState> = Vec::new();
        for event in &events {
            match event {
                SyncEvent::DraftUpdated { .. } => kinds.push("draft"),
                SyncEvent::StateChanged { state, .. } => {
                    kinds.push("state");
                    states.push(state.clone());
                }
            }
        }

        assert_eq!(kinds, vec!["draft", "state", "draft", "state"]);
        assert_eq!(
            states,
            vec![SyncState::Syncing { blocking: false }, SyncState::Idle]
        );
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 128,
                ..ProptestConfig::default()
            })]

            /// Property: however many edits arrive while a request is in
            /// flight, resolution issues exactly one follow-up and the
            /// final canonical draft reflects the last edit.
            #[test]
            fn mid_flight_edits_collapse_into_one_follow_up(
                quantities in prop::collection::vec(1i64..20, 1..8)
            ) {
                let mut f = fixture();

                f.synchronizer
                    .submit(set_quantity(f.product_id, 1), f.clock.now())
                    .unwrap();
                let item_id = f.synchronizer.order().line_items()[0].id;
                let request = f.synchronizer.poll(f.clock.advance(WINDOW)).unwrap();

                for quantity in &quantities {
                    let now = f.clock.advance(Duration::from_millis(5));
                    f.synchronizer
                        .submit(
                            EditInput::SetItem {
                                item_id: Some(item_id),
                                product: ProductRef::Product(f.product_id),
                                quantity: *quantity,
                                discount_cents: 0,
                            },
                            now,
                        )
                        .unwrap();
                    // The timer never races the in-flight request.
                    prop_assert!(f
                        .synchronizer
                        .poll(f.clock.advance(Duration::from_millis(1)))
                        .is_none());
                }

                let follow_up = f
                    .synchronizer
                    .resolve(recalculated(&request.candidate), f.clock.now())
                    .expect("one follow-up for the mid-flight edits");
                prop_assert_eq!(
                    follow_up.candidate.line_items()[0].quantity,
                    *quantities.last().unwrap()
                );

                prop_assert!(f
                    .synchronizer
                    .resolve(recalculated(&follow_up.candidate), f.clock.now())
                    .is_none());
                prop_assert_eq!(
                    f.synchronizer.canonical().line_items()[0].quantity,
                    *quantities.last().unwrap()
                );
                prop_assert!(f.synchronizer.state().is_idle());
            }
        }
    }
}
