//! Answer records produced from model output.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One recognised expression and its solution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub expr: String,
    pub result: String,
    /// True when `expr` is a variable that should be remembered with `result`.
    #[serde(default)]
    pub assign: bool,
}

impl Answer {
    /// Build an answer from one object of the model's JSON array.
    ///
    /// The model is loose about types: numbers and booleans in `expr`/`result`
    /// are kept as their JSON text, and `assign` is read by truthiness.
    pub fn from_object(object: &Map<String, Value>) -> Self {
        Self {
            expr: scalar_text(object.get("expr")),
            result: scalar_text(object.get("result")),
            assign: object.get("assign").map(is_truthy).unwrap_or(false),
        }
    }
}

fn scalar_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => s.trim().eq_ignore_ascii_case("true"),
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        _ => false,
    }
}

/// Outcome of analysing one image.
///
/// Only `Answers` carries data for the caller; the other variants exist so a
/// failed parse or model call is distinguishable from "nothing found".
#[derive(Debug, Clone, PartialEq)]
pub enum Analysis {
    Answers(Vec<Answer>),
    Unparsed { raw: String, reason: String },
    ModelFailed { reason: String },
}

impl Analysis {
    /// Short label reported in the `x-analysis-outcome` response header.
    pub fn outcome(&self) -> &'static str {
        match self {
            Analysis::Answers(_) => "answers",
            Analysis::Unparsed { .. } => "unparsed",
            Analysis::ModelFailed { .. } => "model-error",
        }
    }

    pub fn into_answers(self) -> Vec<Answer> {
        match self {
            Analysis::Answers(answers) => answers,
            Analysis::Unparsed { .. } | Analysis::ModelFailed { .. } => Vec::new(),
        }
    }
}
