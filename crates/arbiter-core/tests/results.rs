use arbiter_core::{
    ConversationTurn, ErrorResult, IdealCategory, IdealChoice, Outcome, ReferenceData, Role,
    RubricMetric, ScoreItem,
};
use serde_json::json;

#[test]
fn rubric_metrics_keep_declared_order() {
    let labels: Vec<&str> = RubricMetric::ALL.iter().map(|m| m.label()).collect();
    assert_eq!(
        labels,
        vec![
            "Faithfulness",
            "Completeness",
            "Conciseness",
            "Relevance",
            "Tone & Politeness"
        ]
    );
}

#[test]
fn rubric_metric_label_matching_is_lenient_on_case_and_ampersand() {
    assert_eq!(
        RubricMetric::from_label("  faithfulness "),
        Some(RubricMetric::Faithfulness)
    );
    assert_eq!(
        RubricMetric::from_label("Tone and Politeness"),
        Some(RubricMetric::TonePoliteness)
    );
    assert_eq!(RubricMetric::from_label("Helpfulness"), None);
}

#[test]
fn ideal_category_parses_only_the_five_values() {
    for category in IdealCategory::ALL {
        assert_eq!(category.as_str().parse::<IdealCategory>().unwrap(), category);
    }
    assert_eq!(
        " Fully-Equivalent ".parse::<IdealCategory>().unwrap(),
        IdealCategory::FullyEquivalent
    );
    let err = "mostly-right".parse::<IdealCategory>().unwrap_err();
    assert!(err.to_string().contains("choice"));
}

#[test]
fn score_item_serializes_label_as_metric() {
    let item = ScoreItem {
        label: "Relevance".to_string(),
        score: 90,
        reason: "On topic".to_string(),
    };
    assert_eq!(
        serde_json::to_value(&item).unwrap(),
        json!({"metric": "Relevance", "score": 90, "reason": "On topic"})
    );
}

#[test]
fn outcome_serializes_untagged() {
    let ok: Outcome<IdealChoice> = Outcome::Succeeded(IdealChoice {
        choice: IdealCategory::FullyEquivalent,
        reason: "identical".to_string(),
    });
    assert_eq!(
        serde_json::to_value(&ok).unwrap(),
        json!({"choice": "fully-equivalent", "reason": "identical"})
    );

    let failed: Outcome<IdealChoice> = Outcome::Failed(ErrorResult::new("quota"));
    assert_eq!(serde_json::to_value(&failed).unwrap(), json!({"error": "quota"}));
    assert!(!failed.is_success());
    assert_eq!(failed.error().map(|e| e.error.as_str()), Some("quota"));
}

#[test]
fn conversation_turn_roles_are_lowercase_on_the_wire() {
    let turn: ConversationTurn =
        serde_json::from_value(json!({"role": "assistant", "content": "Hi"})).unwrap();
    assert_eq!(turn, ConversationTurn::new(Role::Assistant, "Hi"));
    assert!(serde_json::from_value::<ConversationTurn>(json!({"role": "tool", "content": "x"}))
        .is_err());
}

#[test]
fn reference_data_iterates_in_key_order() {
    let mut data = ReferenceData::new();
    data.insert("phone".to_string(), "555-0100".to_string());
    data.insert("hours".to_string(), "9am-5pm".to_string());
    let keys: Vec<&str> = data.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["hours", "phone"]);
}
