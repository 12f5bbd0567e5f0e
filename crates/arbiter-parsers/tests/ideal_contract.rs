use arbiter_core::{ArbiterError, IdealCategory, ResponseFormat};
use arbiter_parsers::{IdealAnswerContract, OutputContract};
use serde_json::json;

#[test]
fn accepts_known_category() {
    let reply = json!({"choice": "subset-consistent", "reason": "omits the 60-day limit"});
    let choice = IdealAnswerContract::new().validate(&reply).unwrap();
    assert_eq!(choice.choice, IdealCategory::SubsetConsistent);
    assert_eq!(choice.reason, "omits the 60-day limit");
}

#[test]
fn category_match_ignores_case_and_padding() {
    let reply = json!({"choice": "  Fully-Equivalent ", "reason": "same facts"});
    let choice = IdealAnswerContract::new().validate(&reply).unwrap();
    assert_eq!(choice.choice, IdealCategory::FullyEquivalent);
}

#[test]
fn rejects_category_outside_the_set() {
    let reply = json!({"choice": "mostly-right", "reason": "close enough"});
    let err = IdealAnswerContract::new().validate(&reply).unwrap_err();
    assert!(matches!(err, ArbiterError::SchemaViolation { ref field, .. } if field == "choice"));
}

#[test]
fn missing_reason_is_a_violation() {
    let reply = json!({"choice": "disagreement"});
    let err = IdealAnswerContract::new().validate(&reply).unwrap_err();
    assert!(matches!(err, ArbiterError::SchemaViolation { ref field, .. } if field == "reason"));
}

#[test]
fn response_format_is_a_non_strict_json_schema() {
    let format = IdealAnswerContract::new().describe().to_response_format();
    match format {
        ResponseFormat::JsonSchema { name, schema, strict } => {
            assert_eq!(name, "ideal_answer_evaluation");
            assert!(!strict);
            assert!(schema.to_string().contains("immaterial-difference"));
        }
        other => panic!("unexpected format {other:?}"),
    }
}
