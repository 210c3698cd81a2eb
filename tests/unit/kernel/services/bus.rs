use super::*;
use std::cell::RefCell;
use std::rc::Rc;

fn recorder(bus: &mut EventBus, kind: Option<EventKind>) -> Rc<RefCell<Vec<String>>> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let record = move |event: &DocumentEvent| sink.borrow_mut().push(event.kind().name().to_string());
    match kind {
        Some(kind) => bus.subscribe(kind, record),
        None => bus.subscribe_all(record),
    };
    seen
}

#[test]
fn test_publish_is_synchronous_and_ordered() {
    let mut bus = EventBus::new();
    let seen = recorder(&mut bus, None);

    bus.publish(DocumentEvent::DocumentTitleChanged {
        document_id: "d1".into(),
        title: "Notes".into(),
    });
    bus.publish(DocumentEvent::FileSystemUpdated);

    assert_eq!(
        *seen.borrow(),
        vec!["document-title-changed", "file-system-updated"]
    );
}

#[test]
fn test_topic_filter() {
    let mut bus = EventBus::new();
    let seen = recorder(&mut bus, Some(EventKind::DocumentsUpdated));

    bus.publish(DocumentEvent::FileSystemUpdated);
    bus.publish(DocumentEvent::DocumentsUpdated);

    assert_eq!(*seen.borrow(), vec!["documents-updated"]);
}

#[test]
fn test_unsubscribe() {
    let mut bus = EventBus::new();
    let seen = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&seen);
    let id = bus.subscribe_all(move |_| *counter.borrow_mut() += 1);

    bus.publish(DocumentEvent::FileSystemUpdated);
    assert!(bus.unsubscribe(id));
    assert!(!bus.unsubscribe(id));
    bus.publish(DocumentEvent::FileSystemUpdated);

    assert_eq!(*seen.borrow(), 1);
}

#[test]
fn test_channel_subscription_receives_in_order() {
    let mut bus = EventBus::new();
    let (_, mut rx) = bus.channel(None);

    bus.publish(DocumentEvent::DocumentDeleted {
        document_id: "d1".into(),
    });
    bus.publish(DocumentEvent::DocumentsUpdated);

    let events = rx.drain();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].document_id(), Some("d1"));
    assert_eq!(events[1], DocumentEvent::DocumentsUpdated);
    assert!(rx.try_recv().is_err());
}

#[test]
fn test_dropped_channel_is_pruned() {
    let mut bus = EventBus::new();
    let (_, rx) = bus.channel(Some(EventKind::FileSystemUpdated));
    assert_eq!(bus.subscriber_count(), 1);

    drop(rx);
    bus.publish(DocumentEvent::FileSystemUpdated);
    assert_eq!(bus.subscriber_count(), 0);
}

#[test]
fn test_event_wire_format() {
    let event = DocumentEvent::DocumentTitleChanged {
        document_id: "d1".into(),
        title: "Notes".into(),
    };
    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "type": "document-title-changed",
            "detail": {"documentId": "d1", "title": "Notes"}
        })
    );

    let back: DocumentEvent =
        serde_json::from_value(serde_json::json!({"type": "file-system-updated"})).unwrap();
    assert_eq!(back, DocumentEvent::FileSystemUpdated);
}

#[test]
fn test_event_kind_names_roundtrip() {
    for kind in EventKind::ALL {
        assert_eq!(EventKind::from_name(kind.name()), Some(kind));
    }
    assert_eq!(EventKind::from_name("nope"), None);
}
