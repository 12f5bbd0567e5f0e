use arbiter_core::{ArbiterError, RubricMetric};
use arbiter_parsers::{FormatInstructions, OutputContract, RubricContract};
use serde_json::{json, Value};

fn entry(metric: &str, score: u64) -> Value {
    json!({"metric": metric, "score": score, "reason": format!("{metric} reasoning")})
}

fn full_reply() -> Value {
    json!({"metrics": [
        entry("Faithfulness", 90),
        entry("Completeness", 80),
        entry("Conciseness", 70),
        entry("Relevance", 95),
        entry("Tone & Politeness", 100),
    ]})
}

#[test]
fn accepts_all_five_metrics() {
    let items = RubricContract::new().validate(&full_reply()).unwrap();
    let labels: Vec<&str> = items.iter().map(|i| i.label.as_str()).collect();
    assert_eq!(
        labels,
        vec!["Faithfulness", "Completeness", "Conciseness", "Relevance", "Tone & Politeness"]
    );
    assert_eq!(items[3].score, 95);
    assert_eq!(items[0].reason, "Faithfulness reasoning");
}

#[test]
fn reorders_into_declared_metric_order() {
    let reply = json!({"metrics": [
        entry("Tone & Politeness", 100),
        entry("relevance", 95),
        entry("Conciseness", 70),
        entry("Faithfulness", 90),
        entry("Completeness", 80),
    ]});
    let items = RubricContract::new().validate(&reply).unwrap();
    let expected: Vec<&str> = RubricMetric::ALL.iter().map(|m| m.label()).collect();
    let labels: Vec<&str> = items.iter().map(|i| i.label.as_str()).collect();
    assert_eq!(labels, expected);
    assert_eq!(items[0].score, 90);
    assert_eq!(items[4].score, 100);
}

#[test]
fn drops_unknown_metrics() {
    let mut reply = full_reply();
    reply["metrics"]
        .as_array_mut()
        .unwrap()
        .push(entry("Creativity", 40));
    let items = RubricContract::new().validate(&reply).unwrap();
    assert_eq!(items.len(), 5);
    assert!(items.iter().all(|i| i.label != "Creativity"));
}

#[test]
fn missing_metric_is_a_violation() {
    let mut reply = full_reply();
    reply["metrics"].as_array_mut().unwrap().remove(2);
    let err = RubricContract::new().validate(&reply).unwrap_err();
    match err {
        ArbiterError::SchemaViolation { field, reason } => {
            assert_eq!(field, "metrics");
            assert!(reason.contains("Conciseness"));
        }
        other => panic!("expected schema violation, got {other:?}"),
    }
}

#[test]
fn duplicate_metric_is_a_violation() {
    let mut reply = full_reply();
    reply["metrics"]
        .as_array_mut()
        .unwrap()
        .push(entry("Faithfulness", 10));
    let err = RubricContract::new().validate(&reply).unwrap_err();
    assert!(matches!(err, ArbiterError::SchemaViolation { ref field, .. } if field == "metrics[5].metric"));
}

#[test]
fn out_of_range_score_names_the_field() {
    let mut reply = full_reply();
    reply["metrics"][1]["score"] = json!(150);
    let err = RubricContract::new().validate(&reply).unwrap_err();
    assert!(matches!(err, ArbiterError::SchemaViolation { ref field, .. } if field == "metrics[1].score"));
}

#[test]
fn blank_reason_is_a_violation() {
    let mut reply = full_reply();
    reply["metrics"][0]["reason"] = json!("  ");
    assert!(RubricContract::new().validate(&reply).is_err());
}

#[test]
fn non_object_reply_is_a_violation() {
    let err = RubricContract::new().validate(&json!([1, 2, 3])).unwrap_err();
    assert!(matches!(err, ArbiterError::SchemaViolation { ref field, .. } if field == "$"));
}

#[test]
fn schema_lists_the_metric_labels() {
    let contract = RubricContract::new();
    let description = contract.describe();
    assert_eq!(description.name, "rubric_evaluation");
    let text = description.schema.to_string();
    assert!(text.contains("Tone & Politeness"));
    assert!(text.contains("metrics"));
    assert!(contract.get_format_instructions().contains("JSON Schema"));
}
