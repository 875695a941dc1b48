//! `POST /calculate`: solve the math drawn on a canvas snapshot.

use crate::dtos::{CalculateRequest, CalculateResponse, ErrorBody, FailureResponse};
use crate::services::{AnalyzeError, DataUri, DataUriError};
use crate::startup::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

pub const ANALYSIS_OUTCOME_HEADER: &str = "x-analysis-outcome";

/// Everything that turns a calculation into a 500.
#[derive(Error, Debug)]
pub enum CalculateError {
    #[error("invalid request body: {0}")]
    InvalidBody(#[from] JsonRejection),

    #[error("invalid image data URI: {0}")]
    InvalidImage(#[from] DataUriError),

    #[error("scratch storage failed: {0}")]
    Storage(#[from] std::io::Error),

    #[error(transparent)]
    Analyze(#[from] AnalyzeError),
}

impl CalculateError {
    fn kind(&self) -> &'static str {
        match self {
            CalculateError::InvalidBody(_) => "invalid_body",
            CalculateError::InvalidImage(_) => "invalid_image",
            CalculateError::Storage(_) | CalculateError::Analyze(_) => "storage",
        }
    }
}

impl IntoResponse for CalculateError {
    fn into_response(self) -> Response {
        tracing::error!(kind = self.kind(), "Image processing failed: {}", self);

        let body = FailureResponse {
            message: "Image processing failed",
            error: ErrorBody {
                kind: self.kind(),
                detail: self.to_string(),
            },
        };

        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

pub async fn calculate(
    State(state): State<AppState>,
    payload: Result<Json<CalculateRequest>, JsonRejection>,
) -> Result<Response, CalculateError> {
    let Json(request) = payload?;

    let image = DataUri::parse(&request.image)?;

    tracing::info!(
        mime_type = %image.mime_type,
        size = image.bytes.len(),
        vars = request.dict_of_vars.len(),
        "Processing canvas image"
    );

    let scratch = state.scratch.persist(&image.bytes, image.extension()).await?;

    let analysis = state
        .analyzer
        .analyze(scratch.path(), image.image_mime(), &request.dict_of_vars)
        .await;

    scratch.discard().await;

    let analysis = analysis?;
    let outcome = analysis.outcome();
    let data = analysis.into_answers();

    tracing::info!(answers = data.len(), outcome, "Image processed");

    let mut response = Json(CalculateResponse::processed(data)).into_response();
    response.headers_mut().insert(
        HeaderName::from_static(ANALYSIS_OUTCOME_HEADER),
        HeaderValue::from_static(outcome),
    );

    Ok(response)
}
