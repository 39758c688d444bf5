//! Widget configuration.
//!
//! Options can be built in code or deserialized from the JSON an embedding
//! page would attach to the field (`{"minLength": 3, "delay": 150}`). Keys
//! that are absent keep their defaults.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::render::{ItemTemplate, MenuTemplate};

/// Default minimum query length before a lookup is dispatched.
pub const DEFAULT_MIN_LENGTH: usize = 2;

/// Default debounce window.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(300);

/// Configuration for an [`Autocomplete`](crate::Autocomplete).
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use horizon_autocomplete::AutocompleteOptions;
///
/// let options = AutocompleteOptions::default()
///     .with_min_length(1)
///     .with_delay(Duration::from_millis(150));
/// assert!(options.auto_focus);
///
/// let parsed = AutocompleteOptions::from_json(r#"{"minLength": 1, "delay": 150}"#).unwrap();
/// assert_eq!(parsed, options);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AutocompleteOptions {
    /// Queries shorter than this (in characters) close the menu instead of
    /// dispatching.
    pub min_length: usize,
    /// Quiescence window before a keystroke triggers a lookup.
    #[serde(with = "duration_millis")]
    pub delay: Duration,
    /// Whether opening the menu activates the first row.
    pub auto_focus: bool,
    /// Container markup for the default menu view.
    pub menu: MenuTemplate,
    /// Row markup for the default menu view.
    pub item: ItemTemplate,
}

impl Default for AutocompleteOptions {
    fn default() -> Self {
        Self {
            min_length: DEFAULT_MIN_LENGTH,
            delay: DEFAULT_DELAY,
            auto_focus: true,
            menu: MenuTemplate::default(),
            item: ItemTemplate::default(),
        }
    }
}

impl AutocompleteOptions {
    /// Parse options from JSON, filling absent keys with defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Set the minimum query length.
    pub fn with_min_length(mut self, min_length: usize) -> Self {
        self.min_length = min_length;
        self
    }

    /// Set the debounce window.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Set whether the first row is activated on open.
    pub fn with_auto_focus(mut self, auto_focus: bool) -> Self {
        self.auto_focus = auto_focus;
        self
    }

    /// Set the menu container markup.
    pub fn with_menu_template(mut self, menu: impl Into<String>) -> Self {
        self.menu = MenuTemplate::new(menu);
        self
    }

    /// Set the menu row markup.
    pub fn with_item_template(mut self, item: impl Into<String>) -> Self {
        self.item = ItemTemplate::new(item);
        self
    }
}

mod duration_millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(delay: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(delay.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
