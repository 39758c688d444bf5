//! Request sequencing.
//!
//! Every dispatched lookup gets a strictly increasing sequence number. When a
//! response arrives, it is applied only if its sequence number is still the
//! most recently issued one; anything older is stale and dropped. This makes
//! the widget indifferent to the order in which responses complete.
//!
//! The sequencer also counts requests that have not resolved yet. The loading
//! indicator stays on until that count drops back to zero, stale requests
//! included.

use horizon_autocomplete_core::logging::targets;

use crate::source::{response_pair, CandidateSource, Delivery, ResponseSlot, SlotState};

/// A lookup that was actually dispatched to the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRequest {
    /// Position of this request in dispatch order, starting at 1.
    pub sequence: u64,
    /// The query text sent to the source.
    pub query: String,
}

/// How a resolved request relates to the newest dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// No newer request was dispatched; the response should be applied.
    Current,
    /// A newer request exists; the response must be ignored.
    Stale,
}

/// A request whose response has arrived.
#[derive(Debug)]
pub struct Resolution {
    /// The request that resolved.
    pub request: LookupRequest,
    /// Whether the response may be applied.
    pub completion: Completion,
    /// What the source delivered.
    pub delivery: Delivery,
}

#[derive(Debug)]
struct InFlight {
    request: LookupRequest,
    slot: ResponseSlot,
}

/// Issues sequence numbers and decides which responses are applied.
#[derive(Debug, Default)]
pub struct RequestSequencer {
    last_issued: u64,
    pending: usize,
    in_flight: Vec<InFlight>,
}

impl RequestSequencer {
    /// Create a sequencer with nothing issued.
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign the next sequence number to `query` and count it as pending.
    pub fn issue(&mut self, query: &str) -> LookupRequest {
        self.last_issued += 1;
        self.pending += 1;
        LookupRequest {
            sequence: self.last_issued,
            query: query.to_owned(),
        }
    }

    /// Record that `request` resolved and classify it.
    pub fn complete(&mut self, request: &LookupRequest) -> Completion {
        self.pending = self.pending.saturating_sub(1);
        if self.is_current(request) {
            Completion::Current
        } else {
            tracing::trace!(
                target: targets::SEQUENCER,
                sequence = request.sequence,
                last_issued = self.last_issued,
                "dropping stale response"
            );
            Completion::Stale
        }
    }

    /// Whether `request` is the most recently issued one.
    pub fn is_current(&self, request: &LookupRequest) -> bool {
        request.sequence == self.last_issued
    }

    /// Issue a request for `query` and hand it to `source`.
    #[tracing::instrument(skip(self, source), target = "horizon_autocomplete::sequencer", level = "trace")]
    pub fn dispatch(&mut self, query: &str, source: &dyn CandidateSource) -> LookupRequest {
        let request = self.issue(query);
        let (responder, slot) = response_pair();
        self.in_flight.push(InFlight {
            request: request.clone(),
            slot,
        });
        tracing::debug!(target: targets::SEQUENCER, sequence = request.sequence, query, "dispatching lookup");
        source.fetch(query, responder);
        request
    }

    /// Collect every in-flight request that has resolved, in dispatch order.
    pub fn poll_responses(&mut self) -> Vec<Resolution> {
        let mut resolved = Vec::new();
        let mut still_pending = Vec::with_capacity(self.in_flight.len());

        for mut in_flight in self.in_flight.drain(..) {
            match in_flight.slot.try_take() {
                SlotState::Pending => still_pending.push(in_flight),
                SlotState::Ready(delivery) => resolved.push((in_flight.request, delivery)),
            }
        }
        self.in_flight = still_pending;

        resolved
            .into_iter()
            .map(|(request, delivery)| {
                let completion = self.complete(&request);
                Resolution {
                    request,
                    completion,
                    delivery,
                }
            })
            .collect()
    }

    /// Forget every in-flight request. Their responders see a closed channel.
    pub fn abandon_all(&mut self) {
        self.pending = self.pending.saturating_sub(self.in_flight.len());
        self.in_flight.clear();
    }

    /// The highest sequence number issued so far (0 before the first).
    pub fn last_issued(&self) -> u64 {
        self.last_issued
    }

    /// Requests issued but not yet resolved.
    pub fn pending(&self) -> usize {
        self.pending
    }

    /// Whether the loading indicator should be on.
    pub fn is_loading(&self) -> bool {
        self.pending > 0
    }
}
