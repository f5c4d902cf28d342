//! Property-based tests for todo record normalization
//!
//! Uses proptest to generate server records in every encoding the backend
//! has used and checks they land in one canonical shape.

use proptest::prelude::*;
use serde_json::json;
use tasksync::egui_app::types::RawTodo;
use tasksync::shared::{Priority, TodoId};

fn flag_value(encoding: u8, set: bool) -> serde_json::Value {
    match encoding % 3 {
        0 => json!(set),
        1 => json!(if set { 1 } else { 0 }),
        _ => json!(if set { "1" } else { "0" }),
    }
}

proptest! {
    #[test]
    fn test_completion_is_either_flag(
        id in 1u64..1_000_000,
        is_completed in proptest::option::of(any::<bool>()),
        completed in proptest::option::of(any::<bool>()),
        encoding in any::<u8>(),
    ) {
        let mut record = json!({"id": id, "title": "t"});
        if let Some(set) = is_completed {
            record["is_completed"] = flag_value(encoding, set);
        }
        if let Some(set) = completed {
            record["completed"] = flag_value(encoding / 3, set);
        }

        let raw: RawTodo = serde_json::from_value(record).unwrap();
        let item = raw.normalize().unwrap();

        prop_assert_eq!(item.id, TodoId::Server(id));
        prop_assert_eq!(
            item.completed,
            is_completed.unwrap_or(false) || completed.unwrap_or(false)
        );
    }

    #[test]
    fn test_title_falls_back_to_text(
        title in proptest::option::of("[a-zA-Z ]{1,20}"),
        text in "[a-zA-Z ]{1,20}",
    ) {
        let mut record = json!({"id": 1, "text": text});
        if let Some(title) = &title {
            record["title"] = json!(title);
        }

        let item = serde_json::from_value::<RawTodo>(record).unwrap().normalize().unwrap();
        prop_assert_eq!(item.title, title.unwrap_or(text));
    }

    #[test]
    fn test_priority_is_always_valid(priority in proptest::option::of(".{0,10}")) {
        let mut record = json!({"id": 1, "title": "t"});
        if let Some(priority) = &priority {
            record["priority"] = json!(priority);
        }

        let item = serde_json::from_value::<RawTodo>(record).unwrap().normalize().unwrap();
        let expected = priority
            .as_deref()
            .map(Priority::parse_lenient)
            .unwrap_or(Priority::Medium);
        prop_assert_eq!(item.priority, expected);
    }

    #[test]
    fn test_records_without_numeric_id_are_dropped(id in "[a-z]{1,8}") {
        let raw: RawTodo = serde_json::from_value(json!({"id": id, "title": "t"})).unwrap();
        prop_assert!(raw.normalize().is_none());
    }
}
