//! Horizon Autocomplete - an asynchronous suggestion widget core.
//!
//! As the user types into a text field, the widget fetches candidate
//! completions from a [`Source`], shows them in a menu and lets the user pick
//! one with the keyboard or the pointer.
//!
//! The interesting part is keeping that consistent while lookups are in
//! flight:
//!
//! - **Debouncing**: bursts of keystrokes collapse into one lookup
//! - **Sequencing**: only the response to the most recent lookup is ever
//!   shown, whatever order responses arrive in
//! - **Navigation**: cyclic keyboard navigation over the open menu
//! - **Notifications**: typed per-widget signals, two of them vetoable
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use horizon_autocomplete::{Autocomplete, AutocompleteOptions, ManualClock, Source};
//!
//! let clock = ManualClock::new();
//! let mut widget = Autocomplete::new(Source::list(["apple", "banana"]), AutocompleteOptions::default())
//!     .unwrap()
//!     .with_clock(Arc::new(clock.clone()));
//!
//! widget.selected.connect(|candidate| println!("picked {}", candidate.value));
//!
//! widget.type_text("ban");
//! clock.advance_ms(300);
//! widget.poll();
//! assert_eq!(widget.candidates()[0].label, "banana");
//! ```
//!
//! # Feature Flags
//!
//! - `remote` (default): [`Source::Remote`] over HTTP with `reqwest`

pub mod candidate;
pub mod debouncer;
pub mod error;
pub mod events;
pub mod navigation;
pub mod options;
#[cfg(feature = "remote")]
pub mod remote;
pub mod render;
pub mod sequencer;
pub mod source;
pub mod widget;

pub use candidate::{normalize, Candidate, CandidateList, RawItem};
pub use debouncer::Debouncer;
pub use error::{AutocompleteError, Result};
#[cfg(feature = "remote")]
pub use error::SourceError;
pub use events::{EventBase, InputEvent, Key, KeyEvent, MouseEvent};
pub use navigation::{Direction, NavigationState};
pub use options::AutocompleteOptions;
#[cfg(feature = "remote")]
pub use remote::RemoteSource;
pub use render::{menu_rows, HtmlMenu, ItemTemplate, MenuRow, MenuTemplate, MenuView};
pub use sequencer::{Completion, LookupRequest, RequestSequencer, Resolution};
pub use source::{CandidateSource, Delivery, Responder, Source, StaticListSource};
pub use widget::{Autocomplete, WidgetState};

pub use horizon_autocomplete_core::{
    Clock, ConnectionGuard, ConnectionId, ManualClock, Propagation, Signal, SystemClock,
    VetoSignal,
};

/// Prelude module for convenient imports.
///
/// ```
/// use horizon_autocomplete::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        Autocomplete, AutocompleteOptions, Candidate, CandidateSource, Key, KeyEvent,
        Propagation, RawItem, Responder, Source,
    };
}
