use serde_json::{json, Value};
use slide_deck::{
    repair::{extract_fenced_block, parse_json_array, repair_truncated_array, slice_array},
    DeckError, Page,
};

#[test]
fn valid_arrays_parse_unchanged() {
    let raw = r#"[{"title":"A","keyPoints":["x"]},{"title":"B","nested":{"v":[1,2]}}]"#;
    let parsed: Vec<Value> = parse_json_array(raw).expect("valid JSON");
    let expected: Vec<Value> = serde_json::from_str(raw).expect("valid JSON");
    assert_eq!(parsed, expected);
}

#[test]
fn fenced_blocks_and_prose_are_stripped() {
    let raw = "Here are your slides:\n```json\n[{\"title\":\"Cover\"}]\n```\nEnjoy!";
    let pages: Vec<Page> = parse_json_array(raw).expect("fenced JSON");
    assert_eq!(pages.len(), 1);
    assert_eq!(pages[0].title, "Cover");

    let raw = "Sure! [{\"title\":\"Only\"}] Let me know if you need more.";
    let pages: Vec<Page> = parse_json_array(raw).expect("prose-wrapped JSON");
    assert_eq!(pages[0].title, "Only");
}

#[test]
fn extract_fenced_block_handles_language_tags() {
    assert_eq!(extract_fenced_block("```html\n<p>hi</p>\n```"), Some("<p>hi</p>"));
    assert_eq!(extract_fenced_block("```\n[1]\n```"), Some("[1]"));
    assert_eq!(extract_fenced_block("no fence"), None);
    assert_eq!(extract_fenced_block("```json\n[1, 2"), None);
}

#[test]
fn slice_array_keeps_unclosed_tail() {
    assert_eq!(slice_array("text [1, 2] more"), "[1, 2]");
    assert_eq!(slice_array("text [{\"a\": 1},"), "[{\"a\": 1},");
    assert_eq!(slice_array("no array"), "no array");
}

#[test]
fn keeps_complete_objects_when_the_last_one_is_cut() {
    let raw = r#"[{"title":"One","keyPoints":["a","b"]},{"title":"Two","content":"x"}, {"title":"Thr"#;
    let pages: Vec<Value> = parse_json_array(raw).expect("repairable");
    assert_eq!(
        pages,
        vec![
            json!({ "title": "One", "keyPoints": ["a", "b"] }),
            json!({ "title": "Two", "content": "x" }),
        ]
    );
}

#[test]
fn keeps_complete_objects_with_dangling_comma() {
    let repaired = repair_truncated_array(r#"[{"title":"One"},"#);
    assert_eq!(repaired, r#"[{"title":"One"}]"#);
}

#[test]
fn cuts_first_object_at_last_complete_property() {
    let raw = r#"[{"title":"Cover","emphasis":"Big idea","content":"The material beg"#;
    let pages: Vec<Value> = parse_json_array(raw).expect("repairable");
    assert_eq!(pages, vec![json!({ "title": "Cover", "emphasis": "Big idea" })]);
}

#[test]
fn brackets_and_quotes_inside_strings_do_not_count() {
    let raw = r#"[{"title":"Use {braces}, [brackets] and \"quotes\"","content":"ok"},{"title":"cut"#;
    let pages: Vec<Value> = parse_json_array(raw).expect("repairable");
    assert_eq!(
        pages,
        vec![json!({ "title": "Use {braces}, [brackets] and \"quotes\"", "content": "ok" })]
    );
}

#[test]
fn restores_a_lost_leading_bracket() {
    let repaired = repair_truncated_array(r#"{"title":"One"},{"title":"Tw"#);
    assert_eq!(repaired, r#"[{"title":"One"}]"#);
}

#[test]
fn unrecoverable_text_is_returned_unchanged() {
    assert_eq!(repair_truncated_array("[{\"title"), "[{\"title");
}

#[test]
fn failures_report_the_start_of_the_text() {
    let raw = format!("[{{\"title{}", "x".repeat(800));
    let error = parse_json_array::<Page>(&raw).expect_err("unrepairable");

    match error {
        DeckError::Parse { excerpt, .. } => {
            assert_eq!(excerpt.chars().count(), 500);
            assert!(raw.starts_with(&excerpt));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
