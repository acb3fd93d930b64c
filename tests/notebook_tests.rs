//! Tests for loading the brief and the submission from disk.

use std::{fs, path::PathBuf};

use aigrade::{
    GradeError, SubmissionSource,
    input::{load_assignment, load_submission, notebook::CELL_SEPARATOR},
};
use serde_json::json;
use uuid::Uuid;

fn temp_root() -> PathBuf {
    let root = std::env::temp_dir().join(format!("aigrade-input-{}", Uuid::new_v4()));
    fs::create_dir_all(&root).expect("create temp root");
    root
}

#[test]
fn notebook_yields_only_code_cells_in_order() {
    let root = temp_root();
    let path = root.join("solution.ipynb");
    let nb = json!({
        "nbformat": 4,
        "nbformat_minor": 5,
        "metadata": {},
        "cells": [
            {"cell_type": "markdown", "metadata": {}, "source": ["# Title\n"]},
            {"cell_type": "code", "metadata": {}, "execution_count": 1, "outputs": [
                {"output_type": "stream", "name": "stdout", "text": ["3\n"]}
            ], "source": ["def add(a, b):\n", "    return a + b"]},
            {"cell_type": "raw", "metadata": {}, "source": "raw text"},
            {"cell_type": "code", "metadata": {}, "execution_count": 2, "outputs": [],
             "source": ["print(add(1, 2))"]},
            {"cell_type": "markdown", "metadata": {}, "source": "Done."},
            {"cell_type": "code", "metadata": {}, "execution_count": null, "outputs": [],
             "source": "assert add(2, 2) == 4"}
        ]
    });
    fs::write(&path, serde_json::to_string_pretty(&nb).expect("serialize")).expect("write nb");

    let code = load_submission(&SubmissionSource::Notebook(path)).expect("load notebook");
    let expected = [
        "def add(a, b):\n    return a + b",
        "print(add(1, 2))",
        "assert add(2, 2) == 4",
    ]
    .join(CELL_SEPARATOR);

    assert_eq!(code.as_str(), expected);
    assert!(!code.as_str().contains("Title"));
    assert!(!code.as_str().contains("raw text"));
    assert!(!code.as_str().contains("Done."));

    let _ = fs::remove_dir_all(root);
}

#[test]
fn script_is_read_verbatim() {
    let root = temp_root();
    let path = root.join("solution.py");
    let source = "def add(a,b): return a+b\n\n\nprint(add(1, 2))\n";
    fs::write(&path, source).expect("write script");

    let code = load_submission(&SubmissionSource::Script(path)).expect("load script");
    assert_eq!(code.as_str(), source);

    let _ = fs::remove_dir_all(root);
}

#[test]
fn malformed_notebook_is_a_parse_error() {
    let root = temp_root();
    let path = root.join("broken.ipynb");
    fs::write(&path, r#"{"cells": [ {"cell_type": "code", "source": ["x = 1"] "#).expect("write");

    match load_submission(&SubmissionSource::Notebook(path.clone())) {
        Err(GradeError::InputParse { path: p, .. }) => assert_eq!(p, path),
        other => panic!("expected parse error, got {other:?}"),
    }

    let _ = fs::remove_dir_all(root);
}

#[test]
fn notebook_without_code_is_empty_input() {
    let root = temp_root();
    let path = root.join("prose.ipynb");
    fs::write(&path, r#"{"cells": [{"cell_type": "markdown", "source": ["only words"]}]}"#)
        .expect("write");

    assert!(matches!(
        load_submission(&SubmissionSource::Notebook(path)),
        Err(GradeError::EmptyInput { what: "student code", .. })
    ));

    let _ = fs::remove_dir_all(root);
}

#[test]
fn missing_files_are_not_found() {
    let root = temp_root();

    assert!(matches!(
        load_assignment(&root.join("assignment.txt")),
        Err(GradeError::InputNotFound { .. })
    ));
    assert!(matches!(
        load_submission(&SubmissionSource::Script(root.join("solution.py"))),
        Err(GradeError::InputNotFound { .. })
    ));

    let _ = fs::remove_dir_all(root);
}

#[test]
fn blank_assignment_is_rejected() {
    let root = temp_root();
    let path = root.join("assignment.txt");
    fs::write(&path, "  \n\t\n").expect("write");

    let err = load_assignment(&path).expect_err("blank brief");
    assert!(matches!(err, GradeError::EmptyInput { what: "assignment requirements", .. }));
    assert_eq!(err.exit_code(), 4);

    let _ = fs::remove_dir_all(root);
}

#[test]
fn latin1_assignment_is_decoded() {
    let root = temp_root();
    let path = root.join("assignment.txt");
    fs::write(&path, b"R\xe9sum\xe9 parser").expect("write");

    let spec = load_assignment(&path).expect("decoded");
    assert_eq!(spec.as_str(), "Résumé parser");

    let _ = fs::remove_dir_all(root);
}
