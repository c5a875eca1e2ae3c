// Cache key derivation tests

use serde_json::json;
use std::sync::Arc;
use trellis::cache::key::generate_key;
use trellis::ViewData;

fn data(value: serde_json::Value) -> ViewData {
    ViewData::from_json(value)
}

#[test]
fn test_key_order_is_irrelevant() {
    let a = generate_key("home", "index", &data(json!({"a": 1, "b": 2})));

    let mut b = ViewData::new();
    b.insert("b", json!(2));
    b.insert("a", json!(1));

    assert_eq!(a, generate_key("home", "index", &b));
}

#[test]
fn test_any_value_change_changes_key() {
    let base = generate_key("home", "index", &data(json!({"a": 1, "list": [1, 2, 3]})));

    for changed in [
        json!({"a": 2, "list": [1, 2, 3]}),
        json!({"a": 1, "list": [1, 2, 4]}),
        json!({"a": 1, "list": [1, 2, 3], "extra": null}),
        json!({"a": "1", "list": [1, 2, 3]}),
    ] {
        assert_ne!(base, generate_key("home", "index", &data(changed)));
    }
}

#[test]
fn test_controller_and_page_are_part_of_key() {
    let d = data(json!({"a": 1}));
    let key = generate_key("home", "index", &d);
    assert!(key.starts_with("home:index:"));
    assert_ne!(key, generate_key("blog", "index", &d));
    assert_ne!(key, generate_key("home", "about", &d));
}

#[test]
fn test_helpers_do_not_affect_key() {
    let plain = data(json!({"title": "x"}));
    let mut with_helper = plain.clone();
    with_helper.insert_helper("url", Arc::new(|path: &str| format!("/{path}")));

    assert_eq!(
        generate_key("home", "index", &plain),
        generate_key("home", "index", &with_helper)
    );
}

#[test]
fn test_separator_inside_names_does_not_collide() {
    let d = data(json!({"a": 1}));
    let nested = generate_key("admin:users", "list", &d);
    let split = generate_key("admin", "users:list", &d);
    assert_ne!(nested, split);
    assert_eq!(nested.matches(':').count(), 2);
    assert_eq!(split.matches(':').count(), 2);
}

#[test]
fn test_page_with_extension_stays_readable() {
    let key = generate_key("home", "index.html", &data(json!({})));
    assert!(key.starts_with("home:index.html:"));
}
