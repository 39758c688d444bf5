//! The autocomplete interaction controller.
//!
//! [`Autocomplete`] owns the field model, the debouncer, the request
//! sequencer, the navigation state and the menu view, and keeps them
//! consistent across keyboard, pointer and focus events.
//!
//! # Driving the widget
//!
//! The host forwards UI events to the handler methods and calls
//! [`poll`](Autocomplete::poll) from its event loop. Polling fires the
//! debounce timer when it has elapsed and applies any responses that arrived
//! in the meantime. [`time_until_next_timer`](Autocomplete::time_until_next_timer)
//! tells the host how long it may sleep.
//!
//! ```
//! use std::sync::Arc;
//! use horizon_autocomplete::{Autocomplete, AutocompleteOptions, Key, ManualClock, Source};
//!
//! let clock = ManualClock::new();
//! let mut widget = Autocomplete::new(
//!     Source::list(["apple", "banana", "apricot"]),
//!     AutocompleteOptions::default(),
//! )
//! .unwrap()
//! .with_clock(Arc::new(clock.clone()));
//!
//! widget.focus();
//! widget.type_text("ap");
//! clock.advance_ms(300);
//! widget.poll();
//!
//! assert!(widget.is_open());
//! assert_eq!(widget.candidates().len(), 2);
//!
//! widget.press(Key::Enter);
//! assert_eq!(widget.value(), "apple");
//! ```
//!
//! # Signals
//!
//! - `lookup(String)`: before a lookup is dispatched; vetoable
//! - `response(Option<CandidateList>)`: after a current response was normalized
//! - `shown(())`: the menu opened or was re-rendered with new results; vetoable
//! - `hidden(())`: the menu closed
//! - `selected(Candidate)`: a candidate was committed into the field
//! - `changed(Option<Candidate>)`: on blur, when the value differs from the
//!   value at focus time

use std::sync::Arc;
use std::time::{Duration, Instant};

use horizon_autocomplete_core::logging::targets;
use horizon_autocomplete_core::{Clock, PerfSpan, Signal, SystemClock, VetoSignal};

use crate::candidate::{normalize, Candidate, CandidateList};
use crate::debouncer::Debouncer;
use crate::error::{AutocompleteError, Result};
use crate::events::{EventBase, InputEvent, Key, KeyEvent, MouseEvent};
use crate::navigation::{Direction, NavigationState};
use crate::options::AutocompleteOptions;
use crate::render::{menu_rows, HtmlMenu, MenuView};
use crate::sequencer::{Completion, LookupRequest, RequestSequencer};
use crate::source::{resolve_source, CandidateSource, Delivery, Source};

/// A snapshot of the controller's observable state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetState {
    /// Whether the menu is showing.
    pub is_open: bool,
    /// The highlighted row.
    pub active_index: Option<usize>,
    /// Dispatched lookups that have not resolved yet.
    pub pending_count: usize,
    /// The value written by the last committed selection.
    pub last_committed_value: String,
    /// The field value recorded by the last lookup.
    pub last_queried_value: String,
}

#[derive(Debug, Default)]
struct FieldState {
    value: String,
    read_only: bool,
    focused: bool,
}

/// An autocomplete attached to one text field.
pub struct Autocomplete {
    /// Emitted before a lookup is dispatched, with the query. Vetoing
    /// abandons the lookup.
    pub lookup: VetoSignal<String>,
    /// Emitted with the normalized result of the current lookup (`None`
    /// when the source delivered nothing at all).
    pub response: Signal<Option<CandidateList>>,
    /// Emitted after the menu was shown. Vetoing closes it again.
    pub shown: VetoSignal<()>,
    /// Emitted when a visible menu closes.
    pub hidden: Signal<()>,
    /// Emitted when a candidate is committed into the field.
    pub selected: Signal<Candidate>,
    /// Emitted on blur when the value differs from the value at focus time,
    /// carrying the last selected candidate.
    pub changed: Signal<Option<Candidate>>,

    options: AutocompleteOptions,
    source: Arc<dyn CandidateSource>,
    clock: Arc<dyn Clock>,
    menu: Box<dyn MenuView>,

    sequencer: RequestSequencer,
    debouncer: Debouncer,
    navigation: NavigationState,
    field: FieldState,

    query: Option<String>,
    previous: Option<String>,
    selected_item: Option<Candidate>,
    last_committed: String,
    cancel_lookup: bool,
    mouse_over_menu: bool,

    suppress_key_press: bool,
    suppress_key_press_repeat: bool,
    suppress_input: bool,
}

impl Autocomplete {
    /// Create a widget over `source`.
    ///
    /// Fails only when the source cannot be set up (a malformed remote
    /// endpoint, or a remote source without a tokio runtime).
    pub fn new(source: Source, options: AutocompleteOptions) -> Result<Self> {
        let source = resolve_source(source)?;
        let menu = HtmlMenu::new(options.menu.clone(), options.item.clone());
        Ok(Self {
            lookup: VetoSignal::new(),
            response: Signal::new(),
            shown: VetoSignal::new(),
            hidden: Signal::new(),
            selected: Signal::new(),
            changed: Signal::new(),
            debouncer: Debouncer::new(options.delay),
            options,
            source,
            clock: Arc::new(SystemClock),
            menu: Box::new(menu),
            sequencer: RequestSequencer::new(),
            navigation: NavigationState::new(),
            field: FieldState::default(),
            query: None,
            previous: None,
            selected_item: None,
            last_committed: String::new(),
            cancel_lookup: false,
            mouse_over_menu: false,
            suppress_key_press: false,
            suppress_key_press_repeat: false,
            suppress_input: false,
        })
    }

    /// Read time from `clock` instead of the system clock.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the default markup menu.
    pub fn with_menu_view(mut self, menu: Box<dyn MenuView>) -> Self {
        self.menu = menu;
        self
    }

    /// Start with `value` in the field.
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.field.value = value.into();
        self
    }

    // =========================================================================
    // Field
    // =========================================================================

    /// The field's current text.
    pub fn value(&self) -> &str {
        &self.field.value
    }

    /// Replace the field's text without triggering a lookup.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.field.value = value.into();
    }

    /// Whether the field is read-only. A read-only field ignores every key.
    pub fn is_read_only(&self) -> bool {
        self.field.read_only
    }

    /// Make the field read-only or editable.
    pub fn set_read_only(&mut self, read_only: bool) {
        self.field.read_only = read_only;
    }

    /// Whether the field has focus.
    pub fn is_focused(&self) -> bool {
        self.field.focused
    }

    /// The options the widget was built with.
    pub fn options(&self) -> &AutocompleteOptions {
        &self.options
    }

    // =========================================================================
    // State
    // =========================================================================

    /// Whether the menu is showing.
    pub fn is_open(&self) -> bool {
        self.navigation.is_open()
    }

    /// The highlighted row.
    pub fn active_index(&self) -> Option<usize> {
        self.navigation.active_index()
    }

    /// The highlighted candidate.
    pub fn active_candidate(&self) -> Option<&Candidate> {
        self.navigation.active_candidate()
    }

    /// The candidates in the open menu; empty while closed.
    pub fn candidates(&self) -> &[Candidate] {
        self.navigation.candidates()
    }

    /// The field value recorded by the last lookup.
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// The candidate committed since the field last gained focus.
    pub fn selected_item(&self) -> Option<&Candidate> {
        self.selected_item.as_ref()
    }

    /// Whether lookups are still outstanding (the loading indicator).
    pub fn is_loading(&self) -> bool {
        self.sequencer.is_loading()
    }

    /// Snapshot of the observable state.
    pub fn state(&self) -> WidgetState {
        WidgetState {
            is_open: self.is_open(),
            active_index: self.active_index(),
            pending_count: self.sequencer.pending(),
            last_committed_value: self.last_committed.clone(),
            last_queried_value: self.query.clone().unwrap_or_default(),
        }
    }

    // =========================================================================
    // Event loop integration
    // =========================================================================

    /// Fire the debounce timer if due and apply arrived responses.
    pub fn poll(&mut self) {
        let now = self.clock.now();
        self.poll_at(now);
    }

    /// Like [`poll`](Self::poll) at an explicit instant.
    ///
    /// Responses that arrived before the timer fired are applied first, so
    /// they are judged against the requests that existed when they arrived.
    pub fn poll_at(&mut self, now: Instant) {
        self.drain_responses();
        if self.debouncer.poll_at(now) {
            self.on_debounce_elapsed();
            self.drain_responses();
        }
    }

    fn drain_responses(&mut self) {
        for resolution in self.sequencer.poll_responses() {
            if resolution.completion == Completion::Current {
                self.apply_response(resolution.delivery);
            }
        }
    }

    /// How long until the debounce timer fires, if one is armed.
    pub fn time_until_next_timer(&mut self) -> Option<Duration> {
        let now = self.clock.now();
        self.debouncer.time_until_fire(now)
    }

    /// Whether a timer is armed or a lookup is in flight.
    pub fn has_pending_work(&self) -> bool {
        self.debouncer.is_pending() || self.sequencer.pending() > 0
    }

    // =========================================================================
    // Input handlers
    // =========================================================================

    /// Handle a key going down.
    pub fn key_down(&mut self, event: &mut KeyEvent) {
        if self.field.read_only {
            self.suppress_key_press = true;
            self.suppress_input = true;
            self.suppress_key_press_repeat = true;
            return;
        }

        self.suppress_key_press = false;
        self.suppress_input = false;
        self.suppress_key_press_repeat = false;

        match event.key {
            Key::ArrowUp => {
                self.suppress_key_press = true;
                self.navigate(Direction::Previous, &mut event.base);
            }
            Key::ArrowDown => {
                self.suppress_key_press = true;
                self.navigate(Direction::Next, &mut event.base);
            }
            key if key.is_enter() => {
                if self.navigation.active_candidate().is_some() {
                    self.suppress_key_press = true;
                    event.base.accept();
                    self.commit();
                }
            }
            Key::Tab => {
                if self.navigation.active_candidate().is_some() {
                    self.commit();
                }
            }
            Key::Escape => {
                if self.is_open() {
                    if let Some(query) = self.query.clone() {
                        self.field.value = query;
                    }
                    self.hide();
                    event.base.accept();
                }
            }
            _ => {
                self.suppress_key_press_repeat = true;
                self.schedule_lookup();
            }
        }
    }

    /// Handle the character-producing phase of a key (`keypress`).
    pub fn key_press(&mut self, event: &mut KeyEvent) {
        if self.suppress_key_press {
            self.suppress_key_press = false;
            if self.is_open() {
                event.base.accept();
            }
            return;
        }
        if self.suppress_key_press_repeat {
            return;
        }
        match event.key {
            Key::ArrowUp => self.navigate(Direction::Previous, &mut event.base),
            Key::ArrowDown => self.navigate(Direction::Next, &mut event.base),
            _ => {}
        }
    }

    /// Handle a change of the field's text.
    pub fn input(&mut self, event: &mut InputEvent) {
        if self.suppress_input {
            self.suppress_input = false;
            event.base.accept();
            return;
        }
        self.schedule_lookup();
    }

    /// Handle the field gaining focus.
    pub fn focus(&mut self) {
        self.field.focused = true;
        self.selected_item = None;
        self.previous = Some(self.field.value.clone());
    }

    /// Handle the field losing focus.
    ///
    /// While the pointer is over the menu this only records the focus loss,
    /// so that clicking a row does not close the menu under the click.
    pub fn blur(&mut self) {
        self.field.focused = false;
        if self.mouse_over_menu {
            return;
        }
        self.debouncer.cancel();
        if self.previous.as_deref() != Some(self.field.value.as_str()) {
            self.changed.emit(self.selected_item.clone());
        }
        self.hide();
    }

    /// Handle the pointer entering menu row `row`.
    pub fn mouse_enter_row(&mut self, row: usize) {
        self.mouse_over_menu = true;
        if row < self.navigation.candidates().len() {
            self.navigation.set_active(Some(row));
            self.render_menu();
        }
    }

    /// Handle the pointer leaving menu row `row`.
    pub fn mouse_leave_row(&mut self, _row: usize) {
        self.mouse_over_menu = false;
    }

    /// Handle a click on a menu row.
    pub fn click_row(&mut self, event: &mut MouseEvent) {
        if event.row >= self.navigation.candidates().len() {
            tracing::debug!(target: targets::WIDGET, row = event.row, "click outside the menu rows ignored");
            return;
        }
        self.navigation.set_active(Some(event.row));
        self.commit();
        if !self.field.focused {
            self.focus();
        }
        event.base.accept();
    }

    // =========================================================================
    // Conveniences
    // =========================================================================

    /// Type `text` one character at a time, as a user would.
    ///
    /// Each character goes through `key_down`, `key_press`, the edit itself
    /// and `input`.
    pub fn type_text(&mut self, text: &str) {
        for ch in text.chars() {
            let mut down = KeyEvent::new(ch);
            self.key_down(&mut down);
            if down.base.is_accepted() {
                continue;
            }
            let mut press = KeyEvent::new(ch);
            self.key_press(&mut press);
            if self.field.read_only {
                continue;
            }
            self.field.value.push(ch);
            self.input(&mut InputEvent::new());
        }
    }

    /// Press and release `key`. Returns whether its default was suppressed.
    ///
    /// `Backspace` removes the last character when the default is not
    /// suppressed.
    pub fn press(&mut self, key: Key) -> bool {
        let mut down = KeyEvent::new(key);
        self.key_down(&mut down);
        let mut press = KeyEvent::new(key);
        self.key_press(&mut press);
        let suppressed = down.base.is_accepted() || press.base.is_accepted();

        if key == Key::Backspace
            && !suppressed
            && !self.field.read_only
            && self.field.value.pop().is_some()
        {
            self.input(&mut InputEvent::new());
        }
        suppressed
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Look up candidates for `query`, or for the field's value when `None`.
    ///
    /// The field's value is recorded as the widget's query either way. A
    /// query shorter than the minimum length closes the menu. Returns the
    /// dispatched request, or `None` if the lookup was gated or vetoed.
    ///
    /// The response is applied on the next [`poll`](Self::poll).
    pub fn lookup(&mut self, query: Option<&str>) -> Option<LookupRequest> {
        let query = query.map_or_else(|| self.field.value.clone(), str::to_owned);
        self.query = Some(self.field.value.clone());

        if query.chars().count() < self.options.min_length {
            tracing::trace!(target: targets::WIDGET, min_length = self.options.min_length, "query below minimum length");
            self.hide();
            return None;
        }

        if !self.lookup.emit(query.clone()) {
            tracing::debug!(target: targets::WIDGET, query = %query, "lookup vetoed");
            return None;
        }

        self.cancel_lookup = false;
        Some(self.sequencer.dispatch(&query, self.source.as_ref()))
    }

    /// Commit the active candidate into the field.
    ///
    /// Writes its value into the field, emits `selected`, closes the menu and
    /// remembers the candidate for the next `changed` notification.
    pub fn select(&mut self) -> Result<Candidate> {
        let candidate = self
            .navigation
            .active_candidate()
            .cloned()
            .ok_or(AutocompleteError::NoActiveCandidate)?;

        self.previous = Some(self.field.value.clone());
        self.field.value = candidate.value.clone();
        self.query = Some(self.field.value.clone());
        self.last_committed = candidate.value.clone();
        tracing::debug!(target: targets::WIDGET, value = %candidate.value, "candidate selected");
        self.selected.emit(candidate.clone());
        self.hide();
        self.selected_item = Some(candidate.clone());
        Ok(candidate)
    }

    /// Close the menu and ignore the in-flight lookup's result.
    ///
    /// The next dispatched lookup may open the menu again.
    pub fn hide(&mut self) {
        self.cancel_lookup = true;
        self.close_menu();
    }

    /// Tear the widget down.
    ///
    /// Disconnects every listener, cancels the debounce timer, drops
    /// in-flight lookups and detaches the menu view.
    pub fn destroy(mut self) {
        self.lookup.disconnect_all();
        self.response.disconnect_all();
        self.shown.disconnect_all();
        self.hidden.disconnect_all();
        self.selected.disconnect_all();
        self.changed.disconnect_all();

        self.debouncer.cancel();
        self.sequencer.abandon_all();
        self.navigation.close();
        self.menu.detach();
        tracing::debug!(target: targets::WIDGET, "autocomplete destroyed");
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn schedule_lookup(&mut self) {
        let now = self.clock.now();
        self.debouncer.schedule(now);
    }

    fn on_debounce_elapsed(&mut self) {
        if self.query.as_deref() == Some(self.field.value.as_str()) {
            tracing::trace!(target: targets::WIDGET, "field unchanged since last lookup, skipping");
            return;
        }
        self.lookup(None);
    }

    fn navigate(&mut self, direction: Direction, base: &mut EventBase) {
        if !self.is_open() {
            return;
        }
        self.navigation.advance(direction);
        self.render_menu();
        base.accept();
    }

    fn commit(&mut self) {
        debug_assert!(
            self.navigation.active_candidate().is_some(),
            "commit requires an active candidate"
        );
        if let Err(err) = self.select() {
            tracing::error!(target: targets::WIDGET, %err, "selection committed without an active candidate");
        }
    }

    fn apply_response(&mut self, delivery: Delivery) {
        let _perf = PerfSpan::new("apply_response");
        let candidates = delivery.map(normalize);
        self.response.emit(candidates.clone());

        match candidates {
            Some(candidates) if !candidates.is_empty() && !self.cancel_lookup => {
                self.show(candidates);
            }
            _ => self.close_menu(),
        }
    }

    fn show(&mut self, candidates: CandidateList) {
        let was_open = self.is_open();
        self.navigation.open(candidates, self.options.auto_focus);
        self.render_menu();
        self.menu.show();

        if !self.shown.emit(()) {
            tracing::debug!(target: targets::WIDGET, "shown vetoed, closing menu");
            self.navigation.close();
            self.menu.hide();
            self.mouse_over_menu = false;
            if was_open {
                self.hidden.emit(());
            }
        }
    }

    fn close_menu(&mut self) {
        if self.navigation.close() {
            self.menu.hide();
            self.mouse_over_menu = false;
            self.hidden.emit(());
        }
    }

    fn render_menu(&mut self) {
        let rows = menu_rows(self.navigation.candidates(), self.navigation.active_index());
        self.menu.render(&rows);
    }
}

impl std::fmt::Debug for Autocomplete {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Autocomplete")
            .field("value", &self.field.value)
            .field("query", &self.query)
            .field("navigation", &self.navigation)
            .field("pending", &self.sequencer.pending())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::Responder;
    use horizon_autocomplete_core::ManualClock;
    use parking_lot::Mutex;

    fn widget(items: &[&str]) -> (Autocomplete, ManualClock) {
        let clock = ManualClock::new();
        let widget = Autocomplete::new(Source::list(items.iter().copied()), AutocompleteOptions::default())
            .unwrap()
            .with_clock(Arc::new(clock.clone()));
        (widget, clock)
    }

    fn settle(widget: &mut Autocomplete, clock: &ManualClock) {
        clock.advance_ms(300);
        widget.poll();
    }

    #[test]
    fn test_typing_opens_menu_after_debounce() {
        let (mut widget, clock) = widget(&["apple", "banana", "apricot"]);
        widget.focus();
        widget.type_text("ap");

        clock.advance_ms(299);
        widget.poll();
        assert!(!widget.is_open());

        clock.advance_ms(1);
        widget.poll();
        assert!(widget.is_open());
        assert_eq!(widget.active_index(), Some(0));
        assert_eq!(widget.query(), Some("ap"));
    }

    #[test]
    fn test_arrow_keys_are_suppressed_only_while_open() {
        let (mut widget, clock) = widget(&["apple", "apricot"]);
        assert!(!widget.press(Key::ArrowDown));

        widget.type_text("ap");
        settle(&mut widget, &clock);
        assert!(widget.press(Key::ArrowDown));
        assert_eq!(widget.active_index(), Some(1));
    }

    #[test]
    fn test_enter_without_active_candidate_is_ignored() {
        let clock = ManualClock::new();
        let mut widget = Autocomplete::new(
            Source::list(["apple", "apricot"]),
            AutocompleteOptions::default().with_auto_focus(false),
        )
        .unwrap()
        .with_clock(Arc::new(clock.clone()));

        widget.type_text("ap");
        settle(&mut widget, &clock);
        assert!(widget.is_open());
        assert!(!widget.press(Key::Enter));
        assert!(widget.is_open());
        assert_eq!(widget.value(), "ap");
    }

    #[test]
    fn test_select_without_active_candidate_errors() {
        let (mut widget, _clock) = widget(&["apple"]);
        assert!(matches!(widget.select(), Err(AutocompleteError::NoActiveCandidate)));
    }

    #[test]
    fn test_unchanged_field_skips_lookup() {
        let (mut widget, clock) = widget(&["apple"]);
        let count = Arc::new(Mutex::new(0));
        let count_clone = count.clone();
        widget.lookup.observe(move |_| *count_clone.lock() += 1);

        widget.type_text("ap");
        settle(&mut widget, &clock);
        assert_eq!(*count.lock(), 1);

        // Cursor movement schedules a lookup but the text did not change.
        widget.press(Key::ArrowLeft);
        settle(&mut widget, &clock);
        assert_eq!(*count.lock(), 1);
    }

    #[test]
    fn test_hide_cancels_late_response() {
        let held: Arc<Mutex<Vec<Responder>>> = Arc::new(Mutex::new(Vec::new()));
        let held_clone = held.clone();
        let clock = ManualClock::new();
        let mut widget = Autocomplete::new(
            Source::custom(move |_: &str, responder: Responder| held_clone.lock().push(responder)),
            AutocompleteOptions::default(),
        )
        .unwrap()
        .with_clock(Arc::new(clock.clone()));

        widget.type_text("ap");
        settle(&mut widget, &clock);
        assert!(widget.is_loading());

        widget.hide();
        held.lock().remove(0).respond(vec!["apple".into()]);
        widget.poll();
        assert!(!widget.is_open());
        assert!(!widget.is_loading());
    }

    #[test]
    fn test_state_snapshot() {
        let (mut widget, clock) = widget(&["apple", "apricot"]);
        widget.type_text("ap");
        settle(&mut widget, &clock);
        widget.press(Key::Enter);

        let state = widget.state();
        assert!(!state.is_open);
        assert_eq!(state.active_index, None);
        assert_eq!(state.pending_count, 0);
        assert_eq!(state.last_committed_value, "apple");
        assert_eq!(state.last_queried_value, "apple");
    }

    #[test]
    fn test_time_until_next_timer() {
        let (mut widget, clock) = widget(&["apple"]);
        assert_eq!(widget.time_until_next_timer(), None);
        widget.type_text("a");
        clock.advance_ms(100);
        assert_eq!(widget.time_until_next_timer(), Some(Duration::from_millis(200)));
        assert!(widget.has_pending_work());
    }

    #[test]
    fn test_repeated_arrow_key_press_navigates() {
        let (mut widget, clock) = widget(&["apple", "apricot", "april"]);
        widget.type_text("ap");
        settle(&mut widget, &clock);
        assert_eq!(widget.active_index(), Some(0));

        let mut down = KeyEvent::new(Key::ArrowDown);
        widget.key_down(&mut down);
        assert!(down.base.is_accepted());
        assert_eq!(widget.active_index(), Some(1));

        // The keypress paired with the keydown is swallowed.
        let mut paired = KeyEvent::new(Key::ArrowDown);
        widget.key_press(&mut paired);
        assert!(paired.base.is_accepted());
        assert_eq!(widget.active_index(), Some(1));

        // Auto-repeat delivered as bare keypresses keeps moving.
        let mut repeat = KeyEvent::new(Key::ArrowDown);
        widget.key_press(&mut repeat);
        assert!(repeat.base.is_accepted());
        assert_eq!(widget.active_index(), Some(2));

        let mut repeat = KeyEvent::new(Key::ArrowUp);
        widget.key_press(&mut repeat);
        assert_eq!(widget.active_index(), Some(1));
    }

    #[test]
    fn test_key_press_after_edit_key_down_is_ignored() {
        let (mut widget, clock) = widget(&["apple", "apricot"]);
        widget.type_text("ap");
        settle(&mut widget, &clock);

        let mut down = KeyEvent::new('r');
        widget.key_down(&mut down);
        assert!(!down.base.is_accepted());

        let mut press = KeyEvent::new(Key::ArrowDown);
        widget.key_press(&mut press);
        assert!(!press.base.is_accepted());
        assert_eq!(widget.active_index(), Some(0));
        assert!(widget.is_open());
    }

    #[test]
    fn test_numpad_enter_commits() {
        let (mut widget, clock) = widget(&["apple", "apricot"]);
        let selected = Arc::new(Mutex::new(Vec::new()));
        let selected_clone = selected.clone();
        widget
            .selected
            .connect(move |candidate: &Candidate| selected_clone.lock().push(candidate.value.clone()));

        widget.type_text("ap");
        settle(&mut widget, &clock);
        widget.press(Key::ArrowDown);

        let mut down = KeyEvent::new(Key::NumpadEnter);
        widget.key_down(&mut down);
        assert!(down.base.is_accepted());
        assert_eq!(widget.value(), "apricot");
        assert!(!widget.is_open());
        assert_eq!(*selected.lock(), vec!["apricot".to_owned()]);

        // The trailing keypress is swallowed and not suppressed once closed.
        let mut press = KeyEvent::new(Key::NumpadEnter);
        widget.key_press(&mut press);
        assert!(!press.base.is_accepted());
    }
}
