use std::collections::BTreeMap;

use arbiter_core::{ArbiterError, RubricMetric, ScoreItem};
use schemars::JsonSchema;
use serde_json::Value;

use crate::contract::{array_field, as_object, score_field, text_field};
use crate::{OutputContract, SchemaDescription};

#[allow(dead_code)]
#[derive(JsonSchema)]
struct RubricReply {
    /// One entry for each of the five metrics.
    #[schemars(length(min = 5, max = 5))]
    metrics: Vec<MetricEntry>,
}

#[allow(dead_code)]
#[derive(JsonSchema)]
struct MetricEntry {
    metric: MetricLabel,
    /// Integer score from 0 to 100.
    #[schemars(range(min = 0, max = 100))]
    score: u8,
    /// Why this score was given.
    reason: String,
}

#[allow(dead_code)]
#[derive(JsonSchema)]
enum MetricLabel {
    Faithfulness,
    Completeness,
    Conciseness,
    Relevance,
    #[serde(rename = "Tone & Politeness")]
    TonePoliteness,
}

/// Contract for the rubric strategy: exactly the five fixed metrics.
///
/// Unknown extra metrics are dropped. A missing or repeated metric is a
/// violation. Output is always in `RubricMetric::ALL` order, whatever order
/// the model used.
#[derive(Debug, Clone, Copy, Default)]
pub struct RubricContract;

impl RubricContract {
    pub fn new() -> Self {
        Self
    }
}

impl OutputContract for RubricContract {
    type Output = Vec<ScoreItem>;

    fn describe(&self) -> SchemaDescription {
        SchemaDescription::new(
            "rubric_evaluation",
            Value::from(schemars::schema_for!(RubricReply)),
        )
    }

    fn validate(&self, reply: &Value) -> Result<Vec<ScoreItem>, ArbiterError> {
        let root = as_object(reply, "$")?;
        let entries = array_field(root, "metrics", "")?;

        let mut scored: BTreeMap<RubricMetric, ScoreItem> = BTreeMap::new();
        for (i, entry) in entries.iter().enumerate() {
            let path = format!("metrics[{i}]");
            let entry = as_object(entry, &path)?;
            let label = text_field(entry, "metric", &path)?;
            let Some(metric) = RubricMetric::from_label(&label) else {
                tracing::debug!(metric = %label, "dropping unknown rubric metric");
                continue;
            };
            let item = ScoreItem {
                label: metric.label().to_string(),
                score: score_field(entry, "score", &path)?,
                reason: text_field(entry, "reason", &path)?,
            };
            if scored.insert(metric, item).is_some() {
                return Err(ArbiterError::schema_violation(
                    format!("{path}.metric"),
                    format!("metric '{}' reported more than once", metric.label()),
                ));
            }
        }

        RubricMetric::ALL
            .iter()
            .map(|metric| {
                scored.remove(metric).ok_or_else(|| {
                    ArbiterError::schema_violation(
                        "metrics",
                        format!("missing metric '{}'", metric.label()),
                    )
                })
            })
            .collect()
    }
}
