//! Candidate sources.
//!
//! Every supplier shape is resolved into one contract, [`CandidateSource`]:
//! `fetch(query, responder)` where the [`Responder`] resolves the request
//! exactly once, now or later, from any thread.
//!
//! # Source shapes
//!
//! - [`Source::List`]: a fixed list filtered by case-insensitive substring
//!   match on each item's label (else value, else the item itself)
//! - [`Source::Remote`]: an HTTP endpoint queried with `?query=...`
//!   (requires the `remote` feature)
//! - [`Source::Custom`]: any [`CandidateSource`], including closures
//!
//! # Custom sources
//!
//! A custom source must always resolve its responder, even on error. A
//! responder that is kept alive without ever delivering keeps the widget's
//! loading indicator on. Dropping a responder counts as delivering `None`.
//!
//! ```
//! use horizon_autocomplete::source::{Responder, Source};
//! use horizon_autocomplete::RawItem;
//!
//! let source = Source::custom(|query: &str, responder: Responder| {
//!     responder.respond(vec![RawItem::text(format!("{query}!"))]);
//! });
//! ```

use std::sync::Arc;

use horizon_autocomplete_core::logging::targets;
use regex::RegexBuilder;
use tokio::sync::oneshot::{self, error::TryRecvError};

use crate::candidate::RawItem;
use crate::error::Result;

/// What a source hands back for one request. `None` mirrors a `null`
/// response: nothing to show, menu closes.
pub type Delivery = Option<Vec<RawItem>>;

/// Single-use handle that resolves one lookup request.
#[derive(Debug)]
pub struct Responder {
    tx: oneshot::Sender<Delivery>,
}

impl Responder {
    /// Resolve the request.
    ///
    /// Delivering after the widget was destroyed is a silent no-op.
    pub fn deliver(self, delivery: Delivery) {
        if self.tx.send(delivery).is_err() {
            tracing::trace!(target: targets::SOURCE, "response delivered after the widget went away");
        }
    }

    /// Resolve the request with candidates.
    pub fn respond(self, items: Vec<RawItem>) {
        self.deliver(Some(items));
    }

    /// Resolve the request with no candidates.
    pub fn respond_empty(self) {
        self.deliver(Some(Vec::new()));
    }

    /// Whether nobody is waiting for this response any more.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// The receiving half of a [`Responder`].
#[derive(Debug)]
pub(crate) struct ResponseSlot {
    rx: oneshot::Receiver<Delivery>,
}

/// Result of checking a [`ResponseSlot`].
#[derive(Debug)]
pub(crate) enum SlotState {
    Pending,
    Ready(Delivery),
}

impl ResponseSlot {
    /// Take the delivery if the responder resolved (or was dropped).
    pub(crate) fn try_take(&mut self) -> SlotState {
        match self.rx.try_recv() {
            Ok(delivery) => SlotState::Ready(delivery),
            Err(TryRecvError::Empty) => SlotState::Pending,
            Err(TryRecvError::Closed) => {
                tracing::debug!(target: targets::SOURCE, "responder dropped without delivering");
                SlotState::Ready(None)
            }
        }
    }
}

/// Create a connected responder and slot.
pub(crate) fn response_pair() -> (Responder, ResponseSlot) {
    let (tx, rx) = oneshot::channel();
    (Responder { tx }, ResponseSlot { rx })
}

/// A supplier of suggestions for a query.
pub trait CandidateSource: Send + Sync {
    /// Start fetching candidates for `query` and resolve `responder` with them.
    fn fetch(&self, query: &str, responder: Responder);
}

impl<F> CandidateSource for F
where
    F: Fn(&str, Responder) + Send + Sync,
{
    fn fetch(&self, query: &str, responder: Responder) {
        self(query, responder)
    }
}

/// A fixed list of suggestions.
#[derive(Debug, Clone, Default)]
pub struct StaticListSource {
    items: Vec<RawItem>,
}

impl StaticListSource {
    /// Create a list source.
    pub fn new(items: Vec<RawItem>) -> Self {
        Self { items }
    }

    /// The full, unfiltered list.
    pub fn items(&self) -> &[RawItem] {
        &self.items
    }

    /// Items whose match text contains `query`, ignoring case, in list order.
    ///
    /// The query is matched literally; regex metacharacters have no meaning.
    pub fn matches(&self, query: &str) -> Vec<RawItem> {
        let matcher = match RegexBuilder::new(&regex::escape(query))
            .case_insensitive(true)
            .build()
        {
            Ok(matcher) => matcher,
            Err(err) => {
                tracing::debug!(target: targets::SOURCE, %err, "query too large to match");
                return Vec::new();
            }
        };

        self.items
            .iter()
            .filter(|item| item.match_text().is_some_and(|text| matcher.is_match(&text)))
            .cloned()
            .collect()
    }
}

impl CandidateSource for StaticListSource {
    fn fetch(&self, query: &str, responder: Responder) {
        responder.respond(self.matches(query));
    }
}

/// The supplier configuration a widget is constructed with.
#[derive(Clone)]
pub enum Source {
    /// A fixed list of strings or records.
    List(Vec<RawItem>),
    /// A remote endpoint URL answering `GET ?query=...` with a JSON array.
    Remote(String),
    /// A caller-provided source.
    Custom(Arc<dyn CandidateSource>),
}

impl Source {
    /// A fixed list from anything convertible into raw items.
    pub fn list<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<RawItem>,
    {
        Self::List(items.into_iter().map(Into::into).collect())
    }

    /// A remote endpoint.
    pub fn remote(endpoint: impl Into<String>) -> Self {
        Self::Remote(endpoint.into())
    }

    /// A caller-provided source.
    pub fn custom(source: impl CandidateSource + 'static) -> Self {
        Self::Custom(Arc::new(source))
    }
}

impl Default for Source {
    fn default() -> Self {
        Self::List(Vec::new())
    }
}

impl std::fmt::Debug for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::List(items) => f.debug_tuple("List").field(&items.len()).finish(),
            Self::Remote(endpoint) => f.debug_tuple("Remote").field(endpoint).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Resolve a source configuration into a fetchable source.
pub fn resolve_source(source: Source) -> Result<Arc<dyn CandidateSource>> {
    match source {
        Source::List(items) => Ok(Arc::new(StaticListSource::new(items))),
        Source::Custom(source) => Ok(source),
        #[cfg(feature = "remote")]
        Source::Remote(endpoint) => Ok(Arc::new(crate::remote::RemoteSource::new(&endpoint)?)),
        #[cfg(not(feature = "remote"))]
        Source::Remote(_) => Err(crate::error::AutocompleteError::RemoteDisabled),
    }
}
