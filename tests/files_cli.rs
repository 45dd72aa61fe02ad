//! End-to-end checks for the file helpers through the `sfconn` binary.

mod common;

use common::Sandbox;
use std::collections::BTreeSet;

#[test]
fn write_then_read_json_round_trips() {
    let sandbox = Sandbox::new().expect("sandbox");

    let written = sandbox
        .run(&["write-json", "value.json", r#"{"a":1}"#])
        .expect("write");
    assert!(written.success, "stderr: {}", written.stderr);
    assert_eq!(
        std::fs::read_to_string(sandbox.path().join("value.json")).expect("file"),
        "{\n  \"a\": 1\n}"
    );

    let read = sandbox.run(&["read-json", "value.json"]).expect("read");
    assert!(read.success, "stderr: {}", read.stderr);
    let value: serde_json::Value = serde_json::from_str(&read.stdout).expect("stdout JSON");
    assert_eq!(value, serde_json::json!({"a": 1}));
}

#[test]
fn plain_text_values_are_written_as_json_strings() {
    let sandbox = Sandbox::new().expect("sandbox");

    let written = sandbox
        .run(&["write-json", "note.json", "hello there"])
        .expect("write");
    assert!(written.success, "stderr: {}", written.stderr);
    assert_eq!(
        std::fs::read_to_string(sandbox.path().join("note.json")).expect("file"),
        "\"hello there\""
    );
}

#[test]
fn string_flag_keeps_json_looking_values_as_strings() {
    let sandbox = Sandbox::new().expect("sandbox");

    for (name, value) in [("n.json", "123"), ("b.json", "true"), ("z.json", "null")] {
        let written = sandbox
            .run(&["write-json", "--string", name, value])
            .expect("write");
        assert!(written.success, "stderr: {}", written.stderr);
        assert_eq!(
            std::fs::read_to_string(sandbox.path().join(name)).expect("file"),
            format!("\"{value}\"")
        );
    }

    let parsed = sandbox.run(&["write-json", "p.json", "123"]).expect("write");
    assert!(parsed.success, "stderr: {}", parsed.stderr);
    assert_eq!(
        std::fs::read_to_string(sandbox.path().join("p.json")).expect("file"),
        "123"
    );
}

#[test]
fn read_json_on_missing_path_logs_one_error() {
    let sandbox = Sandbox::new().expect("sandbox");

    let result = sandbox.run(&["read-json", "absent.json"]).expect("run");
    assert!(!result.success);
    assert!(result.stdout.is_empty());
    let errors = result.error_lines();
    assert_eq!(errors.len(), 1, "stderr: {}", result.stderr);
    assert!(errors[0].contains("does not exist"));
}

#[test]
fn read_text_prints_file_verbatim() {
    let sandbox = Sandbox::new().expect("sandbox");
    std::fs::write(sandbox.path().join("notes.txt"), "alpha\nbeta\n").expect("seed");

    let result = sandbox.run(&["read-text", "notes.txt"]).expect("run");
    assert!(result.success, "stderr: {}", result.stderr);
    assert_eq!(result.stdout, "alpha\nbeta\n");
}

#[test]
fn ls_lists_every_entry() {
    let sandbox = Sandbox::new().expect("sandbox");
    let data = sandbox.path().join("data");
    std::fs::create_dir(&data).expect("mkdir");
    for name in ["one.json", "two.json", "three.txt"] {
        std::fs::write(data.join(name), "{}").expect("seed");
    }

    let result = sandbox.run(&["ls", "data"]).expect("run");
    assert!(result.success, "stderr: {}", result.stderr);
    let names: BTreeSet<&str> = result.stdout.lines().collect();
    assert_eq!(names, BTreeSet::from(["one.json", "two.json", "three.txt"]));
}
