use response_tracing_core::Value;
use serde::Deserialize;

/// Text of one generation, taken from an LLM run's outputs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TracedGeneration {
    pub text: String,
}

#[derive(Deserialize)]
struct LlmOutputs {
    generations: Vec<Vec<Value>>,
}

/// Flattens `outputs["generations"]` (a sequence of sequences) in order and
/// keeps every entry that carries a `"text"` key.
///
/// Missing outputs, a missing `generations` field, or one that is not a
/// sequence of sequences all yield nothing. Non-string texts are kept as
/// their JSON rendering.
pub fn extract_generations(outputs: Option<&Value>) -> Vec<TracedGeneration> {
    let Some(outputs) = outputs else {
        return Vec::new();
    };
    let parsed = match LlmOutputs::deserialize(outputs) {
        Ok(parsed) => parsed,
        Err(err) => {
            tracing::debug!(error = %err, "run outputs carry no generations");
            return Vec::new();
        }
    };

    parsed
        .generations
        .iter()
        .flatten()
        .filter_map(|entry| entry.get("text"))
        .map(|text| TracedGeneration {
            text: match text {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            },
        })
        .collect()
}
