use std::sync::Arc;

use arbiter::core::{ArbiterError, ConversationTurn};
use arbiter::models::ScriptedChatModel;
use arbiter::{
    EngineConfig, EvaluateIdealRequest, EvaluateQagRequest, EvaluateRubricRequest,
    EvaluationEngine, ENV_API_KEY,
};
use serde_json::json;

/// Canned judge replies used when no API key is configured.
fn offline_judge() -> ScriptedChatModel {
    ScriptedChatModel::from_replies([
        json!({"metrics": [
            {"metric": "Faithfulness", "score": 5, "reason": "The agent claims 24/7 opening, but the company data says 9am-5pm."},
            {"metric": "Completeness", "score": 60, "reason": "It answers the question, with the wrong hours."},
            {"metric": "Conciseness", "score": 95, "reason": "A single sentence."},
            {"metric": "Relevance", "score": 90, "reason": "Addresses opening hours."},
            {"metric": "Tone & Politeness", "score": 80, "reason": "Neutral and polite."},
        ]})
        .to_string(),
        json!({"choice": "fully-equivalent", "reason": "The answer is word-for-word the ideal answer."})
            .to_string(),
        json!({"questions": [
            {"question": "What are the opening hours?", "accuracy": 0, "completeness": 70, "relevance": 100, "reasoning": "Gives 24/7 instead of 9am-5pm."},
            {"question": "Is the store open at midnight?", "accuracy": 0, "completeness": 50, "relevance": 80, "reasoning": "Implies yes; the data says no."},
            {"question": "Is the store open at noon?", "accuracy": 100, "completeness": 50, "relevance": 80, "reasoning": "24/7 covers noon."},
        ]})
        .to_string(),
    ])
}

#[tokio::main]
async fn main() -> Result<(), ArbiterError> {
    tracing_subscriber::fmt::init();

    let engine = if std::env::var(ENV_API_KEY).is_ok() {
        println!("Using the OpenAI judge configured in the environment.");
        EvaluationEngine::from_env()?
    } else {
        println!("{ENV_API_KEY} is not set; using canned judge replies.");
        EvaluationEngine::builder()
            .config(EngineConfig::new("offline-demo")?)
            .chat_model(Arc::new(offline_judge()))
            .build()?
    };

    let history = vec![ConversationTurn::user("What are your hours?")];
    let company_data = [("hours".to_string(), "9am-5pm".to_string())].into();

    println!("\n=== Rubric ===");
    let rubric = engine
        .evaluate_response_rubric(EvaluateRubricRequest {
            message_history: history.clone(),
            company_data,
            agent_answer: "We are open 24/7.".to_string(),
            model: None,
        })
        .await?;
    print_json(&rubric);

    println!("\n=== Ideal answer ===");
    let answer = "We are open from 9am to 5pm, Monday to Friday.";
    let ideal = engine
        .evaluate_response_ideal(EvaluateIdealRequest {
            message_history: history.clone(),
            agent_answer: answer.to_string(),
            ideal_answer: answer.to_string(),
            model: None,
        })
        .await?;
    print_json(&ideal);

    println!("\n=== Question-answer generation ===");
    let qag = engine
        .evaluate_response_qag(EvaluateQagRequest {
            message_history: history,
            company_data: [("hours".to_string(), "9am-5pm".to_string())].into(),
            agent_answer: "We are open 24/7.".to_string(),
            model: None,
        })
        .await?;
    print_json(&qag);

    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(e) => eprintln!("cannot render result: {e}"),
    }
}
