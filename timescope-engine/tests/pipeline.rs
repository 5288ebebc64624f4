//! End-to-end: raw batch in, index built, observers driven by the cursor.

use std::sync::{Arc, Mutex};

use serde_json::json;
use timescope_engine::{Observer, TimelineEngine};
use timescope_index::EventTypeIndex;
use timescope_protocol::{parse_timestamp_ms, LogEvent};

fn batch() -> Vec<LogEvent> {
    [
        json!({"date": "2024-01-01T00:00:00Z", "message": "login", "user": "x"}),
        json!({"date": "2024-01-01T00:00:05Z", "message": "click", "target": "y"}),
        json!({"date": "2024-01-01T00:00:10Z", "message": "login", "user": "z"}),
    ]
    .into_iter()
    .map(|v| LogEvent::from_value(v).expect("object"))
    .collect()
}

fn epoch(rfc3339: &str) -> i64 {
    parse_timestamp_ms(&json!(rfc3339)).expect("valid timestamp")
}

#[test]
fn batch_to_index_to_dispatch() {
    let (index, report) = EventTypeIndex::build_from_batch(batch()).expect("discovery");
    assert_eq!(report.ingested, 3);
    assert_eq!(report.skipped, 0);

    let mut types = index.types();
    types.sort_unstable();
    assert_eq!(types, vec!["click", "login"]);
    assert_eq!(index.bucket("login").expect("login bucket").len(), 2);

    let at_07 = index
        .bucket("login")
        .unwrap()
        .last_at_or_before(epoch("2024-01-01T00:00:07Z"))
        .expect("entry at or before 00:00:07");
    assert_eq!(at_07.payload.get("user"), Some(&json!("x")));

    // Two widgets scrub across the loaded range.
    let seen: Arc<Mutex<Vec<(String, usize)>>> = Arc::new(Mutex::new(Vec::new()));
    let mut engine = TimelineEngine::new();
    for widget in ["login-table", "click-counter"] {
        let event_type = widget.split('-').next().unwrap().to_string();
        let sink = seen.clone();
        let id = widget.to_string();
        engine.register(Observer::new(
            widget,
            vec![event_type.clone()],
            move |cursor, index| {
                let count = index
                    .bucket(&event_type)
                    .map(|bucket| bucket.count_in_range(i64::MIN, cursor))
                    .unwrap_or(0);
                sink.lock().unwrap().push((id.clone(), count));
                Ok(())
            },
        ));
    }

    engine.move_to(epoch("2024-01-01T00:00:07Z"), &index);
    engine.move_to(epoch("2024-01-01T00:00:10Z"), &index);

    let seen = seen.lock().unwrap();
    assert_eq!(
        *seen,
        vec![
            ("login-table".to_string(), 1),
            ("click-counter".to_string(), 1),
            ("login-table".to_string(), 2),
            ("click-counter".to_string(), 1),
        ]
    );
}

#[test]
fn widget_interested_in_an_absent_type_sees_no_data() {
    let (mut index, _) = EventTypeIndex::build_from_batch(batch()).expect("discovery");

    // A widget can declare interest before any data for the type exists.
    index.get_or_create_bucket("purchase");

    let observed = Arc::new(Mutex::new(None));
    let sink = observed.clone();
    let mut engine = TimelineEngine::new();
    engine.register(Observer::new(
        "purchase-radial",
        vec!["purchase".to_string()],
        move |cursor, index| {
            let latest = index
                .bucket("purchase")
                .and_then(|bucket| bucket.last_at_or_before(cursor))
                .map(|point| point.timestamp_ms);
            *sink.lock().unwrap() = Some(latest);
            Ok(())
        },
    ));

    engine.move_to(epoch("2024-01-01T00:00:10Z"), &index);
    // Absence of data is a normal query result, not an error.
    assert_eq!(*observed.lock().unwrap(), Some(None));
}
