//! Tests for the element contract through trait objects and borrowed
//! documents, plus signal delivery across threads.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use horizon_trellis_core::{
    Dom, DomError, DomEvent, ElementId, EventKind, Key, MemoryDom, Selector, Signal,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Builds `<ul id="list"><li class="item">..</li>..</ul>` through a trait
/// object only.
fn build_list(dom: &mut dyn Dom, items: &[&str]) -> ElementId {
    let list = dom.create_element("ul");
    dom.set_attribute(list, "id", "list");
    let body = dom.body();
    dom.append_child(body, list).unwrap();
    for item in items {
        let li = dom.create_element("li");
        dom.add_class(li, "item");
        dom.set_text(li, item);
        dom.append_child(list, li).unwrap();
    }
    list
}

#[test]
fn test_dyn_dom_round_trip() {
    init_tracing();
    let mut dom = MemoryDom::new();
    let list = build_list(&mut dom, &["a", "b", "c"]);

    assert_eq!(dom.element_by_id("list"), Some(list));
    assert_eq!(dom.text(list), "abc");
    let items = dom.query_selector_all(list, &Selector::Class("item".into()));
    assert_eq!(items.len(), 3);
    assert_eq!(dom.next_sibling(items[0]), Some(items[1]));
    assert_eq!(dom.next_sibling(items[2]), None);
}

#[test]
fn test_borrowed_document_is_a_dom() {
    fn count_items<D: Dom>(dom: D) -> usize {
        let list = dom.element_by_id("list").unwrap();
        dom.query_selector_all(list, &Selector::parse(".item").unwrap())
            .len()
    }

    let mut dom = MemoryDom::new();
    build_list(&mut dom, &["a", "b"]);
    assert_eq!(count_items(&mut dom), 2);
    // Still usable after the borrow ends.
    assert_eq!(count_items(&mut dom), 2);
}

#[test]
fn test_tree_errors() {
    let mut dom = MemoryDom::new();
    let list = build_list(&mut dom, &["a"]);
    let item = dom.children(list)[0];

    assert!(matches!(
        dom.append_child(item, list),
        Err(DomError::HierarchyCycle { .. })
    ));

    let stray = dom.create_element("li");
    let other = dom.create_element("ul");
    assert!(matches!(
        dom.insert_before(list, stray, Some(other)),
        Err(DomError::NotAChild { .. })
    ));

    dom.remove_element(other);
    assert!(matches!(
        dom.append_child(other, stray),
        Err(DomError::UnknownElement(_))
    ));
}

#[test]
fn test_form_state() {
    let mut dom = MemoryDom::new();
    let input = dom.create_element("input");
    let option = dom.create_element("option");

    dom.set_value(input, "kiwi");
    dom.set_selected(option, true);
    assert_eq!(dom.value(input), "kiwi");
    assert!(dom.is_selected(option));

    dom.focus(input);
    dom.blur(option);
    assert_eq!(dom.focused(), Some(input));
    dom.blur(input);
    assert_eq!(dom.focused(), None);
}

#[test]
fn test_event_prevent_default() {
    let mut dom = MemoryDom::new();
    let input = dom.create_element("input");

    let mut event = DomEvent::key_down(input, Key::from_name("Enter"));
    assert_eq!(event.kind, EventKind::KeyDown);
    assert_eq!(event.key, Some(Key::Enter));
    assert!(!event.is_default_prevented());
    event.prevent_default();
    assert!(event.is_default_prevented());
}

#[test]
fn test_signal_across_threads() {
    let signal = Arc::new(Signal::<String>::new());
    let total = Arc::new(AtomicUsize::new(0));

    let sink = total.clone();
    signal.connect(move |value: &String| {
        sink.fetch_add(value.len(), Ordering::SeqCst);
    });

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let signal = signal.clone();
            std::thread::spawn(move || signal.emit("kiwi".to_string()))
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(total.load(Ordering::SeqCst), 16);
}
