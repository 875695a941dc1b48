use crate::models::Answer;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Body of `POST /calculate`.
#[derive(Debug, Deserialize)]
pub struct CalculateRequest {
    /// Canvas snapshot as a data URI, e.g. `data:image/png;base64,...`.
    pub image: String,
    /// Variables assigned by earlier calculations, keyed by name.
    /// Absent and `null` both mean no variables.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub dict_of_vars: Map<String, Value>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Map<String, Value>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Serialize)]
pub struct CalculateResponse {
    pub message: &'static str,
    pub data: Vec<Answer>,
    pub status: &'static str,
}

impl CalculateResponse {
    pub fn processed(data: Vec<Answer>) -> Self {
        Self {
            message: "Image processed",
            data,
            status: "success",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FailureResponse {
    pub message: &'static str,
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub kind: &'static str,
    pub detail: String,
}
