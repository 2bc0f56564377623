// SPDX-License-Identifier: MIT

use serde::Serialize;

use super::{apply_limit, format_or_json, handle_list, OutputFormat};

#[derive(Debug, Clone, Serialize)]
struct FakeEntry {
    name: String,
}

#[test]
fn handle_list_prints_empty_message_for_an_empty_slice() {
    let items: Vec<FakeEntry> = vec![];
    let result = handle_list(OutputFormat::Text, &items, "No entries found", |_items, _out| {
        panic!("render_text should not run for an empty slice");
    });
    assert!(result.is_ok());
}

#[test]
fn handle_list_renders_text_for_a_nonempty_slice() {
    let items = vec![FakeEntry { name: "a".into() }];
    let mut rendered = false;
    let result = handle_list(OutputFormat::Text, &items, "No entries found", |items, _out| {
        rendered = true;
        assert_eq!(items.len(), 1);
    });
    assert!(result.is_ok());
    assert!(rendered);
}

#[test]
fn handle_list_json_does_not_invoke_the_text_renderer() {
    let items = vec![FakeEntry { name: "a".into() }];
    let result = handle_list(OutputFormat::Json, &items, "No entries found", |_items, _out| {
        panic!("render_text should not run for JSON output");
    });
    assert!(result.is_ok());
}

#[test]
fn format_or_json_calls_text_fn_in_text_mode() {
    let mut called = false;
    let result = format_or_json(OutputFormat::Text, &FakeEntry { name: "a".into() }, || called = true);
    assert!(result.is_ok());
    assert!(called);
}

#[test]
fn apply_limit_truncates_and_reports_remaining() {
    let mut items: Vec<i32> = (0..10).collect();
    let truncation = apply_limit(&mut items, 3, false);
    assert_eq!(items.len(), 3);
    assert_eq!(truncation.unwrap().remaining, 7);
}

#[test]
fn apply_limit_no_limit_keeps_everything() {
    let mut items: Vec<i32> = (0..10).collect();
    let truncation = apply_limit(&mut items, 3, true);
    assert_eq!(items.len(), 10);
    assert!(truncation.is_none());
}
