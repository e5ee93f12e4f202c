use std::path::PathBuf;

use todos::error::{exit_codes, Error, JsonError};

#[test]
fn exit_codes_map_correctly() {
    let user = Error::InvalidArgument("bad".to_string());
    assert_eq!(user.exit_code(), exit_codes::USER_ERROR);

    let missing = Error::TaskNotFound("abc".to_string());
    assert_eq!(missing.exit_code(), exit_codes::USER_ERROR);

    let op = Error::LockFailed(PathBuf::from("store/.lock"));
    assert_eq!(op.exit_code(), exit_codes::OPERATION_FAILED);

    let io = Error::from(std::io::Error::new(std::io::ErrorKind::Other, "disk"));
    assert_eq!(io.exit_code(), exit_codes::OPERATION_FAILED);
}

#[test]
fn json_error_includes_code_and_details() {
    let err = Error::TagNotFound("urgnt".to_string());
    let json = JsonError::from(&err);
    assert_eq!(json.code, exit_codes::USER_ERROR);
    assert!(json.message.contains("Tag not found"));
    assert_eq!(json.details, Some(serde_json::json!({ "input": "urgnt" })));
}

#[test]
fn ambiguous_details_list_candidates() {
    let err = Error::Ambiguous {
        kind: "task",
        input: "ab".to_string(),
        candidates: vec!["ab12".to_string(), "ab34".to_string()],
    };
    assert_eq!(err.to_string(), "Ambiguous task 'ab': ab12, ab34");
    assert_eq!(
        err.details(),
        Some(serde_json::json!({
            "kind": "task",
            "input": "ab",
            "candidates": ["ab12", "ab34"],
        }))
    );
}

#[test]
fn corrupt_store_names_the_key() {
    let source = match serde_json::from_str::<Vec<String>>("{oops") {
        Err(err) => err,
        Ok(_) => panic!("expected parse failure"),
    };
    let err = Error::CorruptStore {
        key: "todos".to_string(),
        source,
    };
    assert_eq!(err.exit_code(), exit_codes::OPERATION_FAILED);
    assert!(err.to_string().starts_with("Corrupt store value for key 'todos'"));
    assert_eq!(err.details(), Some(serde_json::json!({ "key": "todos" })));
}

#[test]
fn ambiguous_candidates_keep_separators_intact() {
    let err = Error::Ambiguous {
        kind: "user",
        input: "smith".to_string(),
        candidates: vec!["Smith, Ann".to_string(), "Smith, Bob".to_string()],
    };
    let details = JsonError::from(&err).details.expect("details");
    assert_eq!(details["candidates"], serde_json::json!(["Smith, Ann", "Smith, Bob"]));
}
