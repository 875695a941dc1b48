//! Image analysis: prompt + image to the vision model, reply to answers.

use crate::models::Analysis;
use crate::services::answer_parser::parse_answers;
use crate::services::prompt::build_prompt;
use crate::services::providers::{InlineImage, VisionProvider};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyzeError {
    #[error("failed to read image {path}: {source}")]
    ReadImage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Clone)]
pub struct ImageAnalyzer {
    provider: Arc<dyn VisionProvider>,
}

impl ImageAnalyzer {
    pub fn new(provider: Arc<dyn VisionProvider>) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &Arc<dyn VisionProvider> {
        &self.provider
    }

    /// Analyse the image at `image_path`.
    ///
    /// Only a failure to read the image is an error. Model failures and
    /// unparsable replies come back as the matching [`Analysis`] variant.
    pub async fn analyze(
        &self,
        image_path: &Path,
        mime_type: &str,
        dict_of_vars: &Map<String, Value>,
    ) -> Result<Analysis, AnalyzeError> {
        let bytes = tokio::fs::read(image_path)
            .await
            .map_err(|source| AnalyzeError::ReadImage {
                path: image_path.to_path_buf(),
                source,
            })?;

        let image = InlineImage {
            mime_type: mime_type.to_string(),
            data: STANDARD.encode(&bytes),
        };
        let prompt = build_prompt(dict_of_vars);

        let response = match self.provider.generate(&prompt, &image).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(error = %e, "Vision model call failed");
                return Ok(Analysis::ModelFailed {
                    reason: e.to_string(),
                });
            }
        };

        let analysis = parse_answers(&response.text);

        tracing::info!(
            outcome = analysis.outcome(),
            input_tokens = response.input_tokens,
            output_tokens = response.output_tokens,
            finish_reason = ?response.finish_reason,
            "Image analysed"
        );

        Ok(analysis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Answer;
    use crate::services::providers::mock::MockVisionProvider;
    use serde_json::json;

    async fn image_file(dir: &tempfile::TempDir, bytes: &[u8]) -> PathBuf {
        let path = dir.path().join("canvas.png");
        tokio::fs::write(&path, bytes).await.unwrap();
        path
    }

    #[tokio::test]
    async fn sends_base64_image_and_prompt_with_variables() {
        let dir = tempfile::tempdir().unwrap();
        let path = image_file(&dir, b"hello").await;
        let mock = Arc::new(MockVisionProvider::replying("[]"));
        let analyzer = ImageAnalyzer::new(mock.clone());

        let vars = json!({"x": "5"}).as_object().cloned().unwrap();
        analyzer.analyze(&path, "image/png", &vars).await.unwrap();

        let requests = mock.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].image.data, "aGVsbG8=");
        assert_eq!(requests[0].image.mime_type, "image/png");
        assert!(requests[0].prompt.contains(r#"{"x":"5"}"#));
    }

    #[tokio::test]
    async fn parses_model_reply() {
        let dir = tempfile::tempdir().unwrap();
        let path = image_file(&dir, b"img").await;
        let analyzer = ImageAnalyzer::new(Arc::new(MockVisionProvider::replying(
            "```json\n[{\"expr\": \"x\", \"result\": \"4\", \"assign\": true}]\n```",
        )));

        let analysis = analyzer.analyze(&path, "image/png", &Map::new()).await.unwrap();
        assert_eq!(
            analysis,
            Analysis::Answers(vec![Answer {
                expr: "x".to_string(),
                result: "4".to_string(),
                assign: true,
            }])
        );
    }

    #[tokio::test]
    async fn model_failure_is_an_outcome() {
        let dir = tempfile::tempdir().unwrap();
        let path = image_file(&dir, b"img").await;
        let analyzer = ImageAnalyzer::new(Arc::new(MockVisionProvider::failing()));

        let analysis = analyzer.analyze(&path, "image/png", &Map::new()).await.unwrap();
        assert_eq!(analysis.outcome(), "model-error");
    }

    #[tokio::test]
    async fn missing_image_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let analyzer = ImageAnalyzer::new(Arc::new(MockVisionProvider::replying("[]")));

        let err = analyzer
            .analyze(&dir.path().join("absent.png"), "image/png", &Map::new())
            .await
            .unwrap_err();
        assert!(matches!(err, AnalyzeError::ReadImage { .. }));
    }
}
