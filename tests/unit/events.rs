use super::*;
use serde_json::json;
use std::cell::RefCell;
use std::rc::Rc;

fn collector() -> (Rc<RefCell<Vec<ContentUnit>>>, impl FnMut(&ContentUnit) + 'static) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    (seen, move |unit: &ContentUnit| sink.borrow_mut().push(unit.clone()))
}

#[test]
fn units_wait_until_the_first_subscriber() {
    let mut bus = EventBus::default();
    let first = bus.publish(ContentUnit::new("glyph.rendered", "post-1"));
    bus.publish(ContentUnit::new("glyph.failed", "post-2").with_payload(json!({ "error": "x" })));
    assert_eq!(first, "cu-1");
    assert_eq!(bus.pending_len(), 2);

    let (seen, sink) = collector();
    bus.subscribe(sink);
    assert_eq!(bus.pending_len(), 0);
    {
        let seen = seen.borrow();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].kind, "glyph.rendered");
        assert_eq!(seen[1].id, "cu-2");
        assert_eq!(seen[1].payload["error"], "x");
    }

    bus.publish(ContentUnit::new("glyph.rendered", "post-3"));
    assert_eq!(seen.borrow().len(), 3);
    assert_eq!(bus.pending_len(), 0);
}

#[test]
fn full_queue_drops_the_oldest_unit() {
    let mut bus = EventBus::new(2);
    for source in ["a", "b", "c"] {
        bus.publish(ContentUnit::new("glyph.rendered", source));
    }
    assert_eq!(bus.pending_len(), 2);
    assert_eq!(bus.dropped(), 1);

    let (seen, sink) = collector();
    bus.subscribe(sink);
    let sources: Vec<String> = seen.borrow().iter().map(|u| u.source.clone()).collect();
    assert_eq!(sources, ["b", "c"]);
}

#[test]
fn every_subscriber_sees_live_units() {
    let mut bus = EventBus::new(0);
    bus.publish(ContentUnit::new("lost", "x"));
    assert_eq!(bus.dropped(), 1);

    let (a, sink_a) = collector();
    let (b, sink_b) = collector();
    bus.subscribe(sink_a);
    bus.subscribe(sink_b);
    bus.publish(ContentUnit::new("glyph.rendered", "y").with_modality("text"));
    assert_eq!(bus.subscriber_count(), 2);
    assert_eq!(a.borrow().len(), 1);
    assert_eq!(b.borrow()[0].modality, "text");
    assert_eq!(b.borrow()[0].provenance.producer, "glyphic");
}
