//! Integration tests for out-of-order responses.

use std::sync::Arc;

use horizon_autocomplete::{
    Autocomplete, AutocompleteOptions, CandidateList, ManualClock, RawItem, Responder, Source,
};
use parking_lot::Mutex;

type Held = Arc<Mutex<Vec<(String, Responder)>>>;

fn deferred_widget() -> (Autocomplete, Held) {
    let (widget, held, _) = clocked_deferred_widget();
    (widget, held)
}

fn clocked_deferred_widget() -> (Autocomplete, Held, ManualClock) {
    let held: Held = Arc::new(Mutex::new(Vec::new()));
    let held_clone = held.clone();
    let clock = ManualClock::new();
    let widget = Autocomplete::new(
        Source::custom(move |query: &str, responder: Responder| {
            held_clone.lock().push((query.to_owned(), responder));
        }),
        AutocompleteOptions::default(),
    )
    .unwrap()
    .with_clock(Arc::new(clock.clone()));
    (widget, held, clock)
}

fn permutations(n: usize) -> Vec<Vec<usize>> {
    if n == 0 {
        return vec![Vec::new()];
    }
    let mut out = Vec::new();
    for shorter in permutations(n - 1) {
        for pos in 0..=shorter.len() {
            let mut perm = shorter.clone();
            perm.insert(pos, n - 1);
            out.push(perm);
        }
    }
    out
}

#[test]
fn test_only_latest_lookup_is_rendered_in_any_order() {
    let queries = ["ap", "app", "appl", "apple"];

    for order in permutations(queries.len()) {
        let (mut widget, held) = deferred_widget();
        let responses: Arc<Mutex<Vec<Option<CandidateList>>>> = Arc::new(Mutex::new(Vec::new()));
        let responses_clone = responses.clone();
        widget
            .response
            .connect(move |list| responses_clone.lock().push(list.clone()));

        for query in queries {
            widget.set_value(query);
            widget.lookup(None).unwrap();
        }
        assert_eq!(widget.state().pending_count, queries.len());

        let mut slots: Vec<Option<(String, Responder)>> =
            held.lock().drain(..).map(Some).collect();

        for &index in &order {
            let (query, responder) = slots[index].take().unwrap();
            responder.respond(vec![RawItem::text(format!("{query}-result"))]);
            widget.poll();

            // Before the latest responds nothing is shown; afterwards only its list.
            let labels: Vec<_> = widget.candidates().iter().map(|c| c.label.clone()).collect();
            assert!(
                labels.is_empty() || labels == vec!["apple-result".to_owned()],
                "order {order:?} rendered {labels:?}"
            );
        }

        assert!(!widget.is_loading(), "order {order:?}");
        assert_eq!(widget.candidates()[0].label, "apple-result");
        assert_eq!(responses.lock().len(), 1, "order {order:?}");
    }
}

#[test]
fn test_loading_stays_on_until_every_request_resolves() {
    let (mut widget, held) = deferred_widget();
    widget.set_value("ap");
    widget.lookup(None);
    widget.set_value("ab");
    widget.lookup(None);

    let mut responders = held.lock().drain(..).collect::<Vec<_>>();
    let (_, first) = responders.remove(0);
    let (_, second) = responders.remove(0);

    second.respond(vec!["abc".into()]);
    widget.poll();
    assert!(widget.is_open());
    assert!(widget.is_loading());

    first.respond(vec!["apple".into()]);
    widget.poll();
    assert!(!widget.is_loading());
    assert_eq!(widget.candidates()[0].value, "abc");
}

#[test]
fn test_dropped_responder_still_drains_pending() {
    let (mut widget, held) = deferred_widget();
    widget.set_value("ap");
    widget.lookup(None);
    held.lock().clear();

    widget.poll();
    assert!(!widget.is_loading());
    assert!(!widget.is_open());
}

#[test]
fn test_response_from_another_thread() {
    let (mut widget, held) = deferred_widget();
    widget.set_value("ap");
    widget.lookup(None);

    let (_, responder) = held.lock().remove(0);
    std::thread::spawn(move || responder.respond(vec![RawItem::record("Apple", "apple")]))
        .join()
        .unwrap();

    widget.poll();
    assert_eq!(widget.candidates()[0].label, "Apple");
    assert_eq!(widget.candidates()[0].value, "apple");
}

#[test]
fn test_response_arriving_before_debounce_fires_is_applied() {
    let (mut widget, held, clock) = clocked_deferred_widget();
    widget.focus();
    widget.type_text("ap");
    clock.advance_ms(300);
    widget.poll();
    assert_eq!(held.lock().len(), 1);

    // Another keystroke arms the debounce while the first lookup is in flight.
    widget.type_text("r");
    clock.advance_ms(100);
    let (query, responder) = held.lock().remove(0);
    assert_eq!(query, "ap");
    responder.respond(vec!["apple".into()]);

    // The host slept past the debounce deadline before polling once.
    clock.advance_ms(200);
    widget.poll();

    assert_eq!(held.lock().len(), 1);
    assert_eq!(held.lock()[0].0, "apr");
    assert!(widget.is_open());
    assert_eq!(widget.candidates()[0].value, "apple");
    assert!(widget.is_loading());

    let (_, responder) = held.lock().remove(0);
    responder.respond(vec!["apricot".into()]);
    widget.poll();
    assert_eq!(widget.candidates()[0].value, "apricot");
    assert!(!widget.is_loading());
}
